//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! This wraps the model in an `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`),
//! builds an L-BFGS solver with the configured line search, tolerances, and
//! memory, and runs the executor to a normalized [`OptimOutcome`].
//!
//! The two line-search strategies produce distinct solver types, so the
//! construction is matched per variant and the executor run is shared through
//! a generic helper. When the `obs_slog` feature is enabled a terminal slog
//! observer is attached and the starting log-likelihood is printed before the
//! first iteration.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        traits::{
            Cost, DEFAULT_LBFGS_MEM, Grad, LineSearcher, LogLikelihood, MLEOptions, OptimOutcome,
            Theta,
        },
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::{
    core::{Executor, IterState, Solver, State},
    solver::{
        linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
        quasinewton::LBFGS,
    },
};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Iteration state shared by both L-BFGS variants.
type LbfgsState = IterState<Theta, Grad, (), (), (), f64>;

/// Maximize a log-likelihood `ℓ(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an `ArgMinAdapter` that exposes a *minimization*
///   problem `c(θ) = -ℓ(θ)` to `argmin`.
/// - Builds an L-BFGS solver with either **Hager–Zhang** or **More–Thuente**
///   line search based on `opts.line_searcher`, applying `opts.lbfgs_mem`
///   (default [`DEFAULT_LBFGS_MEM`]) and any tolerances in `opts.tols`.
/// - Runs the executor with `theta0` and the optional iteration cap, then
///   normalizes the final state into an [`OptimOutcome`].
///
/// # Parameters
/// - `f`: Your model implementing [`LogLikelihood`].
/// - `theta0`: Initial parameter vector (consumed by the executor).
/// - `data`: Model data passed through to `value`/`grad`.
/// - `opts`: Optimizer options (tolerances, line search choice, etc.).
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates solver configuration errors (invalid tolerances).
/// - Propagates runtime errors from the executor (e.g., line search
///   failures) and validation errors from [`OptimOutcome::new`].
///
/// # Returns
/// An [`OptimOutcome`] containing `theta_hat`, best value `ℓ(θ̂)`,
/// termination status, iteration counts, function evaluation counts, and
/// optionally the gradient norm.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use mixedlvm::optimization::loglik_optimizer::{
///     maximize, MLEOptions, Tolerances, LineSearcher, LogLikelihood
/// };
///
/// struct MyLL;
/// impl LogLikelihood for MyLL {
///     type Data = ();
///     fn value(&self, theta: &ndarray::Array1<f64>, _: &()) -> mixedlvm::optimization::errors::OptResult<f64> {
///         // Simple concave log-likelihood: -(θ·θ)
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &ndarray::Array1<f64>, _: &()) -> mixedlvm::optimization::errors::OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let f = MyLL;
/// let theta0 = array![0.1, -0.2, 0.3];
/// let data = ();
/// let opts = MLEOptions {
///     tols: Tolerances { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(200) },
///     line_searcher: LineSearcher::HagerZhang,
///     lbfgs_mem: None,
/// };
///
/// let out = maximize(&f, theta0.clone(), &data, &opts)?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), mixedlvm::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let ls: MoreThuenteLineSearch<Theta, Grad, Cost> = MoreThuenteLineSearch::new();
            let solver = apply_tolerances(LBFGS::new(ls, mem), opts)?;
            run_solver(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let ls: HagerZhangLineSearch<Theta, Grad, Cost> = HagerZhangLineSearch::new();
            let solver = apply_tolerances(LBFGS::new(ls, mem), opts)?;
            run_solver(theta0, opts, problem, solver)
        }
    }
}

// ---- Helper methods ----

/// Wire optional gradient/cost tolerances into an L-BFGS solver.
///
/// When a tolerance is `None` the corresponding `with_tolerance_*` method is
/// not called, leaving argmin's defaults in effect.
///
/// # Errors
/// Propagates argmin configuration errors (e.g., a rejected tolerance) via
/// the crate's `From<argmin::core::Error>` conversion.
fn apply_tolerances<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Run a configured solver on an adapted problem and normalize the result.
///
/// Shared by both line-search variants: sets the initial parameters and the
/// optional iteration cap, attaches the slog observer behind the `obs_slog`
/// feature, executes, and converts the final state into an [`OptimOutcome`]
/// (flipping the best cost back to the log-likelihood scale).
///
/// # Errors
/// - Propagates argmin runtime errors (solver or line-search failures).
/// - Propagates validation errors from [`OptimOutcome::new`].
fn run_solver<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, LbfgsState> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    log_initial_state(&theta0, &problem)?;
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: ell(theta0) = {:.6}{}",
        ll0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
