use ndarray::Array2;
use tracing::{debug, warn};

use super::MeasureConfig;
use super::spectrum::{self, MAX_ITERATIONS, williamson};
use crate::GaussianState;
use crate::core::errors::MeasureError;
use crate::core::utils;

/// Largest relative asymmetry of $\Omega^T M$ still treated as rounding.
const SYMMETRY_TOL: f64 = 1e-8;

/// Fidelity between two states with the default [`MeasureConfig`].
pub fn fidelity(state1: &GaussianState, state2: &GaussianState) -> Result<f64, MeasureError> {
    fidelity_with(state1, state2, &MeasureConfig::default())
}

/// Uhlmann fidelity $\mathrm{Tr}\sqrt{\sqrt{\rho_1}\rho_2\sqrt{\rho_1}}$ of
/// two Gaussian states.
///
/// With moments rescaled to `hbar = 1`, `A = mean2 - mean1` and
/// `B = covar1 + covar2`:
///
/// $F = \frac{e^{-\frac14 A^T B^{-1} A}}{\det(B)^{1/4}}
///      \sqrt{\prod_k \left(x_k + \sqrt{x_k^2 - 1}\right)}$
///
/// where $\pm i x_k / 2$ are the eigenvalues of
/// $M = B^{-1}(\Omega/4 + V_2 \Omega V_1)$. Only factors with `x` above the
/// edge band around 1 enter the product. A value below the band is
/// unphysical and gives `NaN`.
///
/// $\Omega^T M$ is symmetric, so the $x_k$ are read off as twice its
/// symplectic spectrum. The real Schur form of $M$ is the fallback when that
/// matrix is not positive definite.
///
/// # Errors
///
/// Returns `MeasureError::BasisMismatch` or `MeasureError::HbarMismatch` when
/// the states are not expressed in the same basis and units,
/// `MeasureError::SingularMatrix` when `B` cannot be factorized and
/// `MeasureError::NoConvergence` when the eigenvalues cannot be computed.
pub fn fidelity_with(
    state1: &GaussianState,
    state2: &GaussianState,
    config: &MeasureConfig,
) -> Result<f64, MeasureError> {
    if state1.basis != state2.basis {
        return Err(MeasureError::BasisMismatch);
    }
    if state1.hbar != state2.hbar {
        return Err(MeasureError::HbarMismatch {
            left: state1.hbar,
            right: state2.hbar,
        });
    }
    debug!(nmodes = state1.nmodes(), tol = config.tol, "gaussian fidelity");

    let hbar = state1.hbar;
    let v1 = &state1.covar / hbar;
    let v2 = &state2.covar / hbar;
    let delta = (&state2.mean - &state1.mean) / hbar.sqrt();
    let omega = state1.basis.symplectic_form();

    let b = utils::to_dmatrix(&(&v1 + &v2).view());
    let noise = spectrum::noise_floor(b.nrows(), spectrum::condition_number(&b)?);
    let lu = b.lu();
    let det = lu.determinant();
    if det == 0.0 {
        return Err(MeasureError::SingularMatrix);
    }

    let b_inv_delta = lu
        .solve(&utils::to_dvector(&delta.view()))
        .ok_or(MeasureError::SingularMatrix)?;
    let exponent = -0.25 * utils::to_dvector(&delta.view()).dot(&b_inv_delta);

    let rhs: Array2<f64> = &omega / 4.0 + v2.dot(&omega).dot(&v1);
    let aux = lu
        .solve(&utils::to_dmatrix(&rhs.view()))
        .ok_or(MeasureError::SingularMatrix)?;
    let aux = utils::from_dmatrix(&aux);

    let (xs, noise) = auxiliary_spectrum(state1, &omega, &aux, noise)?;
    let edge = config.edge(noise);

    let product: f64 = xs
        .iter()
        .filter(|&&x| (x - 1.0).abs() > edge)
        .map(|&x| {
            if x < 1.0 {
                warn!(x, edge, "fidelity eigenvalue below the physical bound");
                return f64::NAN;
            }
            x + (x * x - 1.0).sqrt()
        })
        .product();

    Ok(exponent.exp() / det.powf(0.25) * product.sqrt())
}

/// The `x_k` of [`fidelity_with`] and their rounding error, `noise` being
/// the error already carried by `aux`.
fn auxiliary_spectrum(
    state: &GaussianState,
    omega: &Array2<f64>,
    aux: &Array2<f64>,
    noise: f64,
) -> Result<(Vec<f64>, f64), MeasureError> {
    let v_aux = omega.t().dot(aux);
    let scale = v_aux.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    let skew = (&v_aux - &v_aux.t())
        .iter()
        .fold(0.0_f64, |m, x| m.max(x.abs()));

    if skew <= SYMMETRY_TOL * scale {
        let v_aux = (&v_aux + &v_aux.t()) / 2.0;
        match williamson(&state.basis, &v_aux) {
            Ok(spec) => {
                let xs = spec.values.iter().map(|nu| 2.0 * nu).collect();
                return Ok((xs, noise + spec.noise));
            }
            Err(MeasureError::NotPositiveDefinite) => {}
            Err(err) => return Err(err),
        }
    }

    debug!(skew, scale, "auxiliary matrix is not a covariance, using the Schur form");
    let xs = utils::complex_eigenvalues(&aux.view(), MAX_ITERATIONS)
        .ok_or(MeasureError::NoConvergence(MAX_ITERATIONS))?
        .iter()
        .filter(|z| z.im > 0.0)
        .map(|z| 2.0 * z.im)
        .collect();
    Ok((xs, noise))
}
