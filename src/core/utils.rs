//! Utility functions for phase-space bookkeeping.
//!
//! This module contains helper functions for:
//! - Converting between `ndarray` containers and `nalgebra` matrices.
//! - Scattering sub-blocks along a list of phase-space indices.
//! - Validating 1-based mode indices.
//! - Congruence transforms $T M T^T$.

use nalgebra::{DMatrix, DVector, Schur};
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2};
use num_complex::Complex64;

use crate::core::basis::Basis;
use crate::core::errors::StateError;

/// Copies an `ndarray` matrix into a `nalgebra` matrix.
pub fn to_dmatrix(mat: &ArrayView2<f64>) -> DMatrix<f64> {
    let (rows, cols) = mat.dim();
    DMatrix::from_fn(rows, cols, |r, c| mat[[r, c]])
}

/// Copies an `ndarray` vector into a `nalgebra` vector.
pub fn to_dvector(vec: &ArrayView1<f64>) -> DVector<f64> {
    DVector::from_iterator(vec.len(), vec.iter().copied())
}

/// Copies a `nalgebra` matrix back into an `ndarray` matrix.
pub fn from_dmatrix(mat: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((mat.nrows(), mat.ncols()), |(r, c)| mat[(r, c)])
}

/// Eigenvalues of a real square matrix, computed through the real Schur form.
///
/// Returns `None` when the QR iteration has not converged after `max_niter`
/// steps. `max_niter` must be non-zero, nalgebra reads zero as "no limit".
pub fn complex_eigenvalues(mat: &ArrayView2<f64>, max_niter: usize) -> Option<Vec<Complex64>> {
    debug_assert!(max_niter > 0);
    Schur::try_new(to_dmatrix(mat), f64::EPSILON, max_niter)
        .map(|schur| schur.complex_eigenvalues().iter().copied().collect())
}

/// Computes the congruence $T M T^T$.
pub fn congruence(t: &Array2<f64>, m: &Array2<f64>) -> Array2<f64> {
    t.dot(m).dot(&t.t())
}

/// Find duplicate in a slice of usize
pub fn find_duplicate(indices: &[usize]) -> Option<usize> {
    let mut seen = std::collections::HashSet::new();
    indices.iter().find(|&&idx| !seen.insert(idx)).copied()
}

/// Checks that `hbar` is a usable scale.
pub fn valid_hbar(hbar: f64) -> bool {
    hbar.is_finite() && hbar > 0.0
}

/// Validates 1-based mode indices and returns them as sorted 0-based modes.
pub fn validate_modes(indices: &[usize], num_modes: usize) -> Result<Vec<usize>, StateError> {
    if indices.is_empty() {
        return Err(StateError::EmptyIndices);
    }

    for &index in indices {
        if index == 0 || index > num_modes {
            return Err(StateError::IndexOutOfBounds { index, num_modes });
        }
    }

    if let Some(dup) = find_duplicate(indices) {
        return Err(StateError::DuplicateMode(dup));
    }

    let mut modes: Vec<usize> = indices.iter().map(|&i| i - 1).collect();
    modes.sort_unstable();
    Ok(modes)
}

/// Writes `src[i]` into `dst[targets[i]]`.
pub fn scatter_vector(src: &ArrayView1<f64>, targets: &[usize], dst: &mut ArrayViewMut1<f64>) {
    for (i, &t) in targets.iter().enumerate() {
        dst[t] = src[i];
    }
}

/// Writes `src[[i, j]]` into `dst[[targets[i], targets[j]]]`.
pub fn scatter_matrix(src: &ArrayView2<f64>, targets: &[usize], dst: &mut ArrayViewMut2<f64>) {
    for (i, &ti) in targets.iter().enumerate() {
        for (j, &tj) in targets.iter().enumerate() {
            dst[[ti, tj]] = src[[i, j]];
        }
    }
}

/// Phase-space indices a block of `nmodes` modes occupies inside `target`
/// when its first mode lands on mode `offset`.
pub fn embedding_indices(target: &Basis, offset: usize, nmodes: usize) -> Vec<usize> {
    let modes: Vec<usize> = (offset..offset + nmodes).collect();
    target.quadrature_indices(&modes)
}

/// Position each index of `from` takes in `to`; both bases must have the
/// same number of modes.
pub fn basis_permutation(from: &Basis, to: &Basis) -> Vec<usize> {
    let mut perm = vec![0; from.dim()];
    for mode in 0..from.nmodes() {
        perm[from.q_index(mode)] = to.q_index(mode);
        perm[from.p_index(mode)] = to.p_index(mode);
    }
    perm
}

/// Checks the shape of a caller-provided output buffer pair.
pub fn output_fits(mean: &ArrayViewMut1<f64>, covar: &ArrayViewMut2<f64>, dim: usize) -> bool {
    mean.len() == dim && covar.dim() == (dim, dim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_validate_modes_sorts_and_shifts() {
        assert_eq!(validate_modes(&[3, 1], 3).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_validate_modes_rejects_bad_input() {
        assert_eq!(
            validate_modes(&[0], 2),
            Err(StateError::IndexOutOfBounds {
                index: 0,
                num_modes: 2
            })
        );
        assert_eq!(
            validate_modes(&[3], 2),
            Err(StateError::IndexOutOfBounds {
                index: 3,
                num_modes: 2
            })
        );
        assert_eq!(validate_modes(&[2, 2], 2), Err(StateError::DuplicateMode(2)));
        assert_eq!(validate_modes(&[], 2), Err(StateError::EmptyIndices));
    }

    #[test]
    fn test_scatter_matrix() {
        let src = array![[1.0, 2.0], [3.0, 4.0]];
        let mut dst = Array2::<f64>::zeros((4, 4));
        scatter_matrix(&src.view(), &[1, 3], &mut dst.view_mut());
        assert_eq!(dst[[1, 1]], 1.0);
        assert_eq!(dst[[1, 3]], 2.0);
        assert_eq!(dst[[3, 1]], 3.0);
        assert_eq!(dst[[3, 3]], 4.0);
        assert_eq!(dst.sum(), 10.0);
    }

    #[test]
    fn test_basis_permutation() {
        let perm = basis_permutation(&Basis::interleaved(2), &Basis::block(2));
        assert_eq!(perm, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_complex_eigenvalues_of_rotation_generator() {
        let omega = array![[0.0, 1.0], [-1.0, 0.0]];
        let mut eigs = complex_eigenvalues(&omega.view(), 100).unwrap();
        eigs.sort_by(|a, b| a.im.total_cmp(&b.im));

        assert!(eigs[0].re.abs() < 1e-12 && (eigs[0].im + 1.0).abs() < 1e-12);
        assert!(eigs[1].re.abs() < 1e-12 && (eigs[1].im - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_nalgebra_roundtrip() {
        let m = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        assert_eq!(from_dmatrix(&to_dmatrix(&m.view())), m);
    }
}
