use tracing::{debug, warn};

use super::MeasureConfig;
use super::spectrum::williamson;
use crate::GaussianState;
use crate::core::errors::MeasureError;
use crate::core::utils;

/// Purity $\mathrm{Tr}\,\rho^2 = (\hbar/2)^N / \sqrt{\det V}$.
///
/// Equals 1 for pure states and lies in `(0, 1]` for physical states.
pub fn purity(state: &GaussianState) -> f64 {
    let det = utils::to_dmatrix(&state.covar.view()).determinant();
    (state.hbar / 2.0).powi(state.nmodes() as i32) / det.sqrt()
}

/// Von Neumann entropy with the default [`MeasureConfig`].
pub fn entropy_vn(state: &GaussianState) -> Result<f64, MeasureError> {
    entropy_vn_with(state, &MeasureConfig::default())
}

/// Von Neumann entropy $\sum_i f(\nu_i/\hbar)$ in nats, where
/// $f(x) = (x + \tfrac12)\ln(x + \tfrac12) - (x - \tfrac12)\ln(x - \tfrac12)$.
///
/// Values inside the edge band around `1/2` contribute zero. A value below
/// the band means the state is unphysical and the result is `NaN`.
///
/// # Errors
///
/// Fails when the covariance is not positive definite or the spectrum
/// cannot be computed.
pub fn entropy_vn_with(state: &GaussianState, config: &MeasureConfig) -> Result<f64, MeasureError> {
    debug!(nmodes = state.nmodes(), tol = config.tol, "von Neumann entropy");

    let spectrum = williamson(&state.basis, &state.covar)?;
    let edge = config.edge(0.5 * spectrum.noise);

    let entropy = spectrum
        .values
        .iter()
        .map(|&nu| nu / state.hbar)
        .filter(|x| (x - 0.5).abs() > edge)
        .map(|x| {
            if x < 0.5 {
                warn!(x, edge, "symplectic eigenvalue below the physical bound");
                return f64::NAN;
            }
            (x + 0.5) * (x + 0.5).ln() - (x - 0.5) * (x - 0.5).ln()
        })
        .sum();

    Ok(entropy)
}
