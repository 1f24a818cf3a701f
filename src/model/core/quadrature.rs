//! Gauss–Hermite quadrature grids for latent Gaussian integration.
//!
//! Purpose
//! -------
//! Build, once per `(dim, nodes_per_dim)` configuration, the probabilists'
//! Gauss–Hermite rule and its full tensor product over the latent dimensions.
//! The grid integrates smooth functions against the standard multivariate
//! normal density and is consumed by the marginal-likelihood approximator and
//! the moment predictor.
//!
//! Key behaviors
//! -------------
//! - 1-D nodes/weights from Newton iteration on the orthonormal Hermite
//!   recurrence (physicists' rule), rescaled by √2 and normalized by √π so
//!   the weights sum to 1 and the nodes match the standard normal kernel.
//! - Tensor product in row-major odometer order (last axis fastest) with
//!   `log_weights` equal to the sum of per-axis log weights.
//!
//! Invariants & assumptions
//! ------------------------
//! - 1-D nodes are symmetric about 0 and sorted ascending; weights are
//!   strictly positive and sum to 1 up to floating rounding.
//! - Grid construction is deterministic: identical `(dim, nodes_per_dim)`
//!   inputs produce bit-identical grids and orderings.
//! - `nodes_per_dim^dim` rows are materialized; small latent dimensions are
//!   assumed (the intended regime is r ≤ 5 or so).
//!
//! Conventions
//! -----------
//! - Grids are plain values passed explicitly into evaluation code; there is
//!   no global cache.
//! - Row m of `nodes` is the m-th node vector z; `log_weights[m]` is the
//!   matching log weight.
//!
//! Downstream usage
//! ----------------
//! - `model::models::latent` evaluates the joint conditional density at
//!   `w = μ + L z` for every grid row and log-sum-exps the weighted terms.
//! - `inference::moments` runs the same loop forward-only for marginal
//!   moments.
//!
//! Testing notes
//! -------------
//! - Unit tests check weight normalization, node symmetry, exact low-order
//!   standard-normal moments, tensor-grid shape/ordering, and configuration
//!   error paths.
use crate::model::errors::{ModelError, ModelResult};
use ndarray::{Array1, Array2};

const NEWTON_MAX_ITER: usize = 100;
const NEWTON_TOL: f64 = 3e-14;

/// Tensor-product Gauss–Hermite grid over the latent vector.
///
/// Holds both the 1-D rule (for diagnostics and tests) and the materialized
/// `nodes_per_dim^dim` tensor product used in likelihood and moment loops.
///
/// Fields
/// ------
/// - `dim`: latent dimension r.
/// - `nodes_per_dim`: 1-D node count k.
/// - `nodes_1d` / `weights_1d`: the probabilists' k-point rule (ascending
///   nodes; weights summing to 1).
/// - `nodes`: k^r × r matrix of node vectors in odometer order (last axis
///   fastest).
/// - `log_weights`: length-k^r log tensor weights.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureGrid {
    /// Latent dimension r.
    pub dim: usize,
    /// 1-D node count k.
    pub nodes_per_dim: usize,
    /// 1-D nodes, ascending.
    pub nodes_1d: Array1<f64>,
    /// 1-D weights, matching `nodes_1d`; sum to 1.
    pub weights_1d: Array1<f64>,
    /// Tensor node vectors, k^r × r.
    pub nodes: Array2<f64>,
    /// Log tensor weights, length k^r.
    pub log_weights: Array1<f64>,
}

impl QuadratureGrid {
    /// Build the grid for `dim` latent dimensions with `nodes_per_dim` nodes
    /// per axis.
    ///
    /// Parameters
    /// ----------
    /// - `dim`: latent dimension r, must be ≥ 1.
    /// - `nodes_per_dim`: 1-D node count k, must be ≥ 1.
    ///
    /// Returns
    /// -------
    /// `ModelResult<QuadratureGrid>`
    ///   - `Ok(grid)` with `k^r` tensor rows.
    ///   - `Err(ModelError)` for zero dimensions or zero nodes.
    ///
    /// Errors
    /// ------
    /// - `ModelError::InvalidQuadratureDim` — `dim == 0`.
    /// - `ModelError::InvalidNodeCount` — `nodes_per_dim == 0`.
    ///
    /// Panics
    /// ------
    /// - Never panics for valid configurations. Grids large enough to
    ///   overflow `usize` in `k^r` are outside the supported regime.
    ///
    /// Notes
    /// -----
    /// - `k = 1` degenerates to the single node 0 with weight 1 (the plug-in
    ///   approximation at the latent mean).
    pub fn new(dim: usize, nodes_per_dim: usize) -> ModelResult<Self> {
        if dim == 0 {
            return Err(ModelError::InvalidQuadratureDim { dim });
        }
        if nodes_per_dim == 0 {
            return Err(ModelError::InvalidNodeCount { nodes: nodes_per_dim });
        }

        let (nodes_1d, weights_1d) = hermite_rule(nodes_per_dim);
        let log_weights_1d: Array1<f64> = weights_1d.mapv(f64::ln);

        let total = nodes_per_dim.pow(dim as u32);
        let mut nodes = Array2::<f64>::zeros((total, dim));
        let mut log_weights = Array1::<f64>::zeros(total);

        // Odometer decomposition of the row index: the last axis advances
        // fastest, so digit j uses stride k^(dim-1-j).
        for m in 0..total {
            let mut rem = m;
            let mut log_w = 0.0;
            for j in (0..dim).rev() {
                let digit = rem % nodes_per_dim;
                rem /= nodes_per_dim;
                nodes[(m, j)] = nodes_1d[digit];
                log_w += log_weights_1d[digit];
            }
            log_weights[m] = log_w;
        }

        Ok(QuadratureGrid { dim, nodes_per_dim, nodes_1d, weights_1d, nodes, log_weights })
    }

    /// Total number of tensor nodes, `nodes_per_dim^dim`.
    pub fn len(&self) -> usize {
        self.nodes.nrows()
    }

    /// True when the grid holds no nodes (never the case for valid
    /// configurations; provided for API completeness).
    pub fn is_empty(&self) -> bool {
        self.nodes.nrows() == 0
    }
}

/// k-point probabilists' Gauss–Hermite rule: ascending nodes and weights
/// summing to 1, exact for polynomials of degree ≤ 2k − 1 against the
/// standard normal density.
///
/// Computed as the physicists' rule via Newton iteration on the orthonormal
/// Hermite recurrence, then rescaled (`node · √2`) and normalized
/// (`weight / √π`).
fn hermite_rule(k: usize) -> (Array1<f64>, Array1<f64>) {
    let n = k;
    let mut x = vec![0.0_f64; n];
    let mut w = vec![0.0_f64; n];
    let pim4 = std::f64::consts::PI.powf(-0.25);
    let m = (n + 1) / 2;

    let mut z = 0.0_f64;
    for i in 0..m {
        // Asymptotic initial guesses for the i-th largest root, then a
        // stepping rule off the previously found roots.
        z = match i {
            0 => {
                let a = (2 * n + 1) as f64;
                a.sqrt() - 1.85575 * a.powf(-1.0 / 6.0)
            }
            1 => z - 1.14 * (n as f64).powf(0.426) / z,
            2 => 1.86 * z - 0.86 * x[0],
            3 => 1.91 * z - 0.91 * x[1],
            _ => 2.0 * z - x[i - 2],
        };

        let mut pp = 0.0_f64;
        for _ in 0..NEWTON_MAX_ITER {
            // Evaluate the orthonormal Hermite polynomial of degree n at z
            // by upward recurrence; p2 trails one degree behind p1.
            let mut p1 = pim4;
            let mut p2 = 0.0_f64;
            for j in 0..n {
                let p3 = p2;
                p2 = p1;
                let jf = j as f64;
                p1 = z * (2.0 / (jf + 1.0)).sqrt() * p2 - (jf / (jf + 1.0)).sqrt() * p3;
            }
            pp = (2.0 * n as f64).sqrt() * p2;
            let z1 = z;
            z = z1 - p1 / pp;
            if (z - z1).abs() <= NEWTON_TOL {
                break;
            }
        }

        x[i] = z;
        x[n - 1 - i] = -z;
        w[i] = 2.0 / (pp * pp);
        w[n - 1 - i] = w[i];
    }

    // The physicists' roots come out descending; reverse for ascending order
    // and convert to the probabilists' normalization.
    x.reverse();
    w.reverse();
    let sqrt_pi = std::f64::consts::PI.sqrt();
    let nodes = Array1::from_iter(x.into_iter().map(|v| v * std::f64::consts::SQRT_2));
    let weights = Array1::from_iter(w.into_iter().map(|v| v / sqrt_pi));
    (nodes, weights)
}
