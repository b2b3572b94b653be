use ndarray::{Array1, Array2};

use crate::DEFAULT_HBAR;
use crate::core::basis::Basis;
use crate::core::errors::UnitaryError;
use crate::core::operator::GaussianOperator;
use crate::core::utils;

/// Represents a Gaussian unitary.
///
/// A Gaussian unitary acts on phase space as the affine map
/// $x \mapsto S x + d$ where $S$ is symplectic ($S \Omega S^T = \Omega$).
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianUnitary {
    /// Quadrature layout and mode count.
    pub basis: Basis,
    /// Displacement vector $d$ (length $2N$).
    pub disp: Array1<f64>,
    /// Symplectic matrix $S$ ($2N \times 2N$).
    pub symplectic: Array2<f64>,
    /// Reduced Planck constant convention.
    pub hbar: f64,
}

impl GaussianUnitary {
    /// Creates a new `GaussianUnitary` with the default `hbar`.
    ///
    /// The symplectic condition is not checked here; see
    /// [`GaussianUnitary::is_symplectic`].
    ///
    /// # Errors
    ///
    /// Returns `UnitaryError::DimensionMismatch` if `disp` or `symplectic`
    /// do not match `basis.dim()`.
    pub fn new(
        basis: Basis,
        disp: Array1<f64>,
        symplectic: Array2<f64>,
    ) -> Result<Self, UnitaryError> {
        Self::with_hbar(basis, disp, symplectic, DEFAULT_HBAR)
    }

    /// Creates a new `GaussianUnitary` with an explicit `hbar`.
    pub fn with_hbar(
        basis: Basis,
        disp: Array1<f64>,
        symplectic: Array2<f64>,
        hbar: f64,
    ) -> Result<Self, UnitaryError> {
        let dim = basis.dim();
        let (rows, cols) = symplectic.dim();

        if disp.len() != dim || rows != dim || cols != dim {
            return Err(UnitaryError::DimensionMismatch {
                expected: dim,
                got_disp: disp.len(),
                got_rows: rows,
                got_cols: cols,
            });
        }

        if !utils::valid_hbar(hbar) {
            return Err(UnitaryError::InvalidHbar(hbar));
        }

        Ok(Self {
            basis,
            disp,
            symplectic,
            hbar,
        })
    }

    pub fn nmodes(&self) -> usize {
        self.basis.nmodes()
    }

    /// Checks $S \Omega S^T = \Omega$ entrywise within `tol`.
    pub fn is_symplectic(&self, tol: f64) -> bool {
        let omega = self.basis.symplectic_form();
        let lhs = utils::congruence(&self.symplectic, &omega);
        lhs.iter()
            .zip(omega.iter())
            .all(|(a, b)| (a - b).abs() < tol)
    }

    /// Returns the inverse unitary $(S^{-1}, -S^{-1} d)$.
    ///
    /// # Errors
    ///
    /// Returns `UnitaryError::Singular` if $S$ cannot be inverted.
    pub fn inverse(&self) -> Result<GaussianUnitary, UnitaryError> {
        let s_inv = utils::to_dmatrix(&self.symplectic.view())
            .try_inverse()
            .ok_or(UnitaryError::Singular)?;
        let s_inv = utils::from_dmatrix(&s_inv);
        let disp = -s_inv.dot(&self.disp);

        Ok(GaussianUnitary {
            basis: self.basis,
            disp,
            symplectic: s_inv,
            hbar: self.hbar,
        })
    }

    /// Composes the current unitary with another one: `self` acts first.
    pub fn compose(&self, other: &GaussianUnitary) -> Result<GaussianUnitary, UnitaryError> {
        self.check_compatible(other)?;
        if self.basis.dim() != other.basis.dim() {
            return Err(UnitaryError::DimensionMismatch {
                expected: self.basis.dim(),
                got_disp: other.disp.len(),
                got_rows: other.symplectic.nrows(),
                got_cols: other.symplectic.ncols(),
            });
        }

        let symplectic = other.symplectic.dot(&self.symplectic);
        let disp = other.symplectic.dot(&self.disp) + &other.disp;

        // Returns a different GaussianUnitary
        Ok(GaussianUnitary {
            basis: self.basis,
            disp,
            symplectic,
            hbar: self.hbar,
        })
    }

    /// Re-expresses the unitary in another quadrature layout.
    pub fn change_basis(&self, target: Basis) -> GaussianUnitary {
        let target = target.with_nmodes(self.nmodes());
        let perm = utils::basis_permutation(&self.basis, &target);

        let mut disp = Array1::<f64>::zeros(target.dim());
        let mut symplectic = Array2::<f64>::zeros((target.dim(), target.dim()));
        utils::scatter_vector(&self.disp.view(), &perm, &mut disp.view_mut());
        utils::scatter_matrix(&self.symplectic.view(), &perm, &mut symplectic.view_mut());

        GaussianUnitary {
            basis: target,
            disp,
            symplectic,
            hbar: self.hbar,
        }
    }

    pub(crate) fn check_compatible(&self, other: &GaussianUnitary) -> Result<(), UnitaryError> {
        if !self.basis.same_layout(&other.basis) {
            return Err(UnitaryError::BasisMismatch);
        }
        if self.hbar != other.hbar {
            return Err(UnitaryError::HbarMismatch {
                left: self.hbar,
                right: other.hbar,
            });
        }
        Ok(())
    }
}

impl GaussianOperator for GaussianUnitary {
    fn basis(&self) -> &Basis {
        &self.basis
    }

    fn hbar(&self) -> f64 {
        self.hbar
    }

    fn displacement(&self) -> &Array1<f64> {
        &self.disp
    }

    fn transform(&self) -> &Array2<f64> {
        &self.symplectic
    }

    fn noise(&self) -> Option<&Array2<f64>> {
        None
    }
}
