use ndarray::Array2;
use tracing::{debug, warn};

use super::MeasureConfig;
use super::spectrum::williamson;
use crate::GaussianState;
use crate::core::errors::MeasureError;
use crate::core::utils;

/// Covariance matrix of the partial transpose over the given 1-based modes.
///
/// Transposition maps $p \to -p$, so the momentum row and column of every
/// listed mode change sign. The state itself is not modified.
pub fn partial_transpose(
    state: &GaussianState,
    indices: &[usize],
) -> Result<Array2<f64>, MeasureError> {
    let modes = utils::validate_modes(indices, state.nmodes())?;

    let mut covar = state.covar.clone();
    for mode in modes {
        let p = state.basis.p_index(mode);
        covar.row_mut(p).mapv_inplace(|x| -x);
        covar.column_mut(p).mapv_inplace(|x| -x);
    }
    Ok(covar)
}

/// Logarithmic negativity with the default [`MeasureConfig`].
pub fn logarithmic_negativity(
    state: &GaussianState,
    indices: &[usize],
) -> Result<f64, MeasureError> {
    logarithmic_negativity_with(state, indices, &MeasureConfig::default())
}

/// Logarithmic negativity across the cut between `indices` and the rest.
///
/// With $\tilde\nu_k$ the symplectic spectrum of the partially transposed
/// covariance and $x_k = \tilde\nu_k / \hbar$, this is
/// $-\sum_{tol < x_k < 1/2} \ln(2 x_k)$ in nats. Zero for separable states.
/// Values inside the edge band below `1/2` are rounding noise of a separable
/// cut and are skipped. A value `x <= tol` gives `NaN`.
///
/// # Errors
///
/// Returns `MeasureError::StateError` wrapping an index error when a mode is
/// outside `1..=nmodes`, repeated, or none is given, and
/// `MeasureError::NotPositiveDefinite` for a covariance without a Cholesky
/// factor.
pub fn logarithmic_negativity_with(
    state: &GaussianState,
    indices: &[usize],
    config: &MeasureConfig,
) -> Result<f64, MeasureError> {
    debug!(nmodes = state.nmodes(), ?indices, "logarithmic negativity");
    let transposed = partial_transpose(state, indices)?;

    let spectrum = williamson(&state.basis, &transposed)?;
    let edge = config.edge(0.5 * spectrum.noise);

    let negativity = spectrum
        .values
        .iter()
        .map(|&nu| nu / state.hbar)
        .filter(|&x| x < 0.5 - edge)
        .map(|x| {
            if x <= config.tol {
                warn!(x, "partially transposed spectrum vanishes");
                return f64::NAN;
            }
            -(2.0 * x).ln()
        })
        .sum();

    Ok(negativity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::StateError;
    use crate::{Basis, DirectSum};
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    /// Two-mode squeezed vacuum in the `hbar = 2` convention.
    fn tmsv(r: f64) -> GaussianState {
        let (c, s) = ((2.0 * r).cosh(), (2.0 * r).sinh());
        GaussianState::new(
            Basis::interleaved(2),
            Array1::zeros(4),
            array![
                [c, 0.0, s, 0.0],
                [0.0, c, 0.0, -s],
                [s, 0.0, c, 0.0],
                [0.0, -s, 0.0, c]
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_partial_transpose_flips_momentum() {
        let state = tmsv(0.5);
        let pt = partial_transpose(&state, &[2]).unwrap();

        assert_eq!(pt[[1, 3]], -state.covar[[1, 3]]);
        assert_eq!(pt[[3, 3]], state.covar[[3, 3]]);
        assert_eq!(pt[[0, 2]], state.covar[[0, 2]]);
        // the caller's covariance is untouched
        assert_eq!(state, tmsv(0.5));
    }

    #[test]
    fn test_partial_transpose_block_layout() {
        let state = tmsv(0.5).change_basis(Basis::block(2));
        let pt = partial_transpose(&state, &[1]).unwrap();
        // p_1 sits at index nmodes + 0
        assert_eq!(pt[[2, 3]], -state.covar[[2, 3]]);
        assert_eq!(pt[[0, 1]], state.covar[[0, 1]]);
    }

    #[test]
    fn test_tmsv_negativity() {
        for r in [0.1, 0.4, 0.5, 1.0] {
            for basis in [Basis::interleaved(2), Basis::block(2)] {
                let state = tmsv(r).change_basis(basis);
                assert_relative_eq!(
                    logarithmic_negativity(&state, &[1]).unwrap(),
                    2.0 * r,
                    epsilon = 1e-10
                );
                assert_relative_eq!(
                    logarithmic_negativity(&state, &[2]).unwrap(),
                    2.0 * r,
                    epsilon = 1e-10
                );
            }
        }
    }

    #[test]
    fn test_product_state_has_zero_negativity() {
        let a = GaussianState::new(Basis::interleaved(1), array![0.0, 0.0], Array2::eye(2) * 3.0)
            .unwrap();
        let b = GaussianState::new(
            Basis::interleaved(1),
            array![1.0, 0.0],
            array![[0.5, 0.0], [0.0, 2.0]],
        )
        .unwrap();
        let ab = a.directsum(&b).unwrap();
        assert_relative_eq!(logarithmic_negativity(&ab, &[1]).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_index_validation() {
        let state = tmsv(0.2);
        assert_eq!(
            logarithmic_negativity(&state, &[3]),
            Err(MeasureError::StateError(StateError::IndexOutOfBounds {
                index: 3,
                num_modes: 2
            }))
        );
        assert_eq!(
            logarithmic_negativity(&state, &[0]),
            Err(MeasureError::StateError(StateError::IndexOutOfBounds {
                index: 0,
                num_modes: 2
            }))
        );
    }
}
