use nalgebra::{Cholesky, DMatrix, SVD, SymmetricEigen};
use ndarray::{Array1, Array2};
use tracing::trace;

use crate::GaussianState;
use crate::core::basis::Basis;
use crate::core::errors::MeasureError;
use crate::core::utils;

/// Iteration cap handed to nalgebra's iterative decompositions.
pub(crate) const MAX_ITERATIONS: usize = 10_000;

/// Rounding error of a spectrum value, in units of `dim * eps * cond(V)`.
const NOISE_ULPS: f64 = 8.0;

/// Symplectic spectrum together with its relative rounding error.
pub(crate) struct Spectrum {
    /// Ascending symplectic eigenvalues.
    pub values: Array1<f64>,
    /// Relative error bound on every entry of `values`.
    pub noise: f64,
}

/// Symplectic spectrum of `state.covar`, ascending and not scaled by `hbar`.
///
/// These are the moduli of the eigenvalues of $\Omega V$; every value is at
/// least `hbar/2` for a physical state.
///
/// # Errors
///
/// Returns `MeasureError::NotPositiveDefinite` when the covariance has no
/// Cholesky factor and `MeasureError::NoConvergence` when an eigen solver
/// stalls.
pub fn symplectic_spectrum(state: &GaussianState) -> Result<Array1<f64>, MeasureError> {
    Ok(williamson(&state.basis, &state.covar)?.values)
}

/// Symplectic spectrum of a symmetric positive definite matrix in `basis`.
///
/// With $V = L L^T$, the matrix $K = L^T \Omega L$ is antisymmetric and
/// similar to $\Omega V$, so its singular values are the symplectic
/// eigenvalues, each appearing twice.
pub(crate) fn williamson(basis: &Basis, covar: &Array2<f64>) -> Result<Spectrum, MeasureError> {
    let v = utils::to_dmatrix(&covar.view());
    let dim = v.nrows();
    let cond = condition_number(&v)?;

    let l = Cholesky::new(v)
        .ok_or(MeasureError::NotPositiveDefinite)?
        .l();
    let omega = utils::to_dmatrix(&basis.symplectic_form().view());
    let k = l.transpose() * omega * &l;

    let svd = SVD::try_new(k, false, false, f64::EPSILON, MAX_ITERATIONS)
        .ok_or(MeasureError::NoConvergence(MAX_ITERATIONS))?;
    let mut singular: Vec<f64> = svd.singular_values.iter().copied().collect();
    singular.sort_by(f64::total_cmp);

    let values: Array1<f64> = singular
        .chunks(2)
        .map(|pair| pair.iter().sum::<f64>() / pair.len() as f64)
        .collect();
    let noise = noise_floor(dim, cond);

    trace!(nmodes = basis.nmodes(), spectrum = ?values, cond, "symplectic spectrum");
    Ok(Spectrum { values, noise })
}

/// Ratio of the largest to the smallest eigenvalue magnitude of a symmetric
/// matrix.
pub(crate) fn condition_number(m: &DMatrix<f64>) -> Result<f64, MeasureError> {
    let eigen = SymmetricEigen::try_new(m.clone(), f64::EPSILON, MAX_ITERATIONS)
        .ok_or(MeasureError::NoConvergence(MAX_ITERATIONS))?;

    let (lo, hi) = eigen
        .eigenvalues
        .iter()
        .map(|x| x.abs())
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), x| (lo.min(x), hi.max(x)));
    Ok(if hi == 0.0 { 1.0 } else { hi / lo })
}

/// Relative rounding error of spectral values of a `dim`-sized problem with
/// condition number `cond`.
pub(crate) fn noise_floor(dim: usize, cond: f64) -> f64 {
    NOISE_ULPS * dim as f64 * f64::EPSILON * cond
}
