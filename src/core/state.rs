use std::ops::Mul;

use crate::DEFAULT_HBAR;
use crate::core::basis::Basis;
use crate::core::channels::GaussianChannel;
use crate::core::errors::StateError;
use crate::core::operator::GaussianOperator;
use crate::core::unitary::GaussianUnitary;
use crate::core::utils;
use ndarray::{Array1, Array2, ArrayViewMut1, ArrayViewMut2};

/// A Gaussian state described by its first and second moments.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianState {
    /// Quadrature layout and mode count.
    pub basis: Basis,
    /// Mean vector (length $2N$).
    pub mean: Array1<f64>,
    /// Covariance matrix ($2N \times 2N$, symmetric positive semi-definite).
    pub covar: Array2<f64>,
    /// Reduced Planck constant convention; the vacuum has `covar = hbar/2 · I`.
    pub hbar: f64,
}

impl GaussianState {
    /// Creates a state with the default `hbar`.
    ///
    /// # Errors
    ///
    /// Returns `StateError::DimensionMismatch` when `mean` or `covar` do not
    /// match `basis.dim()`.
    pub fn new(basis: Basis, mean: Array1<f64>, covar: Array2<f64>) -> Result<Self, StateError> {
        Self::with_hbar(basis, mean, covar, DEFAULT_HBAR)
    }

    /// Creates a state with an explicit `hbar`.
    pub fn with_hbar(
        basis: Basis,
        mean: Array1<f64>,
        covar: Array2<f64>,
        hbar: f64,
    ) -> Result<Self, StateError> {
        Self::check_moments(basis.dim(), &mean, &covar)?;

        if !utils::valid_hbar(hbar) {
            return Err(StateError::InvalidHbar(hbar));
        }

        Ok(Self {
            basis,
            mean,
            covar,
            hbar,
        })
    }

    /// Checks the shapes of the moments against the phase-space dimension.
    fn check_moments(
        dim: usize,
        mean: &Array1<f64>,
        covar: &Array2<f64>,
    ) -> Result<(), StateError> {
        let (rows, cols) = covar.dim();

        if mean.len() != dim || rows != dim || cols != dim {
            return Err(StateError::DimensionMismatch {
                expected: dim,
                got_mean: mean.len(),
                got_rows: rows,
                got_cols: cols,
            });
        }

        Ok(())
    }

    pub fn nmodes(&self) -> usize {
        self.basis.nmodes()
    }

    /// Checks that `op` can act on this state.
    fn check_operator<O: GaussianOperator>(&self, op: &O) -> Result<(), StateError> {
        if op.dim() != self.mean.len() {
            return Err(StateError::OperatorDimensionMismatch {
                expected: self.mean.len(),
                got: op.dim(),
            });
        }
        if !self.basis.same_layout(op.basis()) {
            return Err(StateError::BasisMismatch);
        }
        if op.hbar() != self.hbar {
            return Err(StateError::HbarMismatch {
                left: self.hbar,
                right: op.hbar(),
            });
        }
        Ok(())
    }

    /// Evolved moments `(T·mean + d, T·covar·Tᵀ + N)`.
    fn evolved_moments<O: GaussianOperator>(&self, op: &O) -> (Array1<f64>, Array2<f64>) {
        let t = op.transform();
        let mean = t.dot(&self.mean) + op.displacement();
        let mut covar = utils::congruence(t, &self.covar);
        if let Some(noise) = op.noise() {
            covar += noise;
        }
        (mean, covar)
    }

    /// Applies a unitary or channel and returns the evolved state.
    ///
    /// The receiver is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StateError::OperatorDimensionMismatch` if the operator acts on
    /// a different number of modes, and `BasisMismatch`/`HbarMismatch` if it
    /// uses another quadrature layout or `hbar`.
    pub fn apply<O: GaussianOperator>(&self, op: &O) -> Result<GaussianState, StateError> {
        self.check_operator(op)?;
        let (mean, covar) = self.evolved_moments(op);

        Ok(GaussianState {
            basis: self.basis,
            mean,
            covar,
            hbar: self.hbar,
        })
    }

    /// Applies a unitary or channel by overwriting this state's moments.
    ///
    /// Same arithmetic as [`GaussianState::apply`]. This is the only mutating
    /// operation on a state; the exclusive borrow rules out aliasing. On error
    /// the state is unchanged.
    pub fn apply_in_place<O: GaussianOperator>(&mut self, op: &O) -> Result<&mut Self, StateError> {
        self.check_operator(op)?;
        let (mean, covar) = self.evolved_moments(op);

        self.mean.assign(&mean);
        self.covar.assign(&covar);

        Ok(self)
    }

    /// Extracts the subsystem made of the given 1-based modes.
    ///
    /// The requested modes are the ones kept, so for
    /// `state = s1 ⊕ s2 ⊕ ... ⊕ sk` the call `ptrace(&[i])` returns `si` and
    /// `ptrace(&[i, j])` returns `si ⊕ sj`. The output follows ascending mode
    /// order whatever the order of `indices`.
    ///
    /// # Errors
    ///
    /// Returns `StateError::IndexOutOfBounds` for an index outside
    /// `1..=nmodes`, `DuplicateMode` for repeated indices and `EmptyIndices`
    /// when nothing is requested.
    pub fn ptrace(&self, indices: &[usize]) -> Result<GaussianState, StateError> {
        let dim = 2 * utils::validate_modes(indices, self.nmodes())?.len();
        let mut mean = Array1::<f64>::zeros(dim);
        let mut covar = Array2::<f64>::zeros((dim, dim));
        let basis = self.ptrace_into(indices, mean.view_mut(), covar.view_mut())?;

        Ok(GaussianState {
            basis,
            mean,
            covar,
            hbar: self.hbar,
        })
    }

    /// Single-mode form of [`GaussianState::ptrace`].
    pub fn ptrace_mode(&self, index: usize) -> Result<GaussianState, StateError> {
        self.ptrace(&[index])
    }

    /// [`GaussianState::ptrace`] writing into caller-provided buffers.
    ///
    /// `mean_out` and `covar_out` must have the reduced dimension
    /// `2 * indices.len()`. Returns the basis of the reduced state.
    pub fn ptrace_into(
        &self,
        indices: &[usize],
        mut mean_out: ArrayViewMut1<f64>,
        mut covar_out: ArrayViewMut2<f64>,
    ) -> Result<Basis, StateError> {
        let modes = utils::validate_modes(indices, self.nmodes())?;
        let basis = self.basis.with_nmodes(modes.len());

        if !utils::output_fits(&mean_out, &covar_out, basis.dim()) {
            return Err(StateError::DimensionMismatch {
                expected: basis.dim(),
                got_mean: mean_out.len(),
                got_rows: covar_out.nrows(),
                got_cols: covar_out.ncols(),
            });
        }

        let sources = self.basis.quadrature_indices(&modes);
        for (i, &si) in sources.iter().enumerate() {
            mean_out[i] = self.mean[si];
            for (j, &sj) in sources.iter().enumerate() {
                covar_out[[i, j]] = self.covar[[si, sj]];
            }
        }

        Ok(basis)
    }

    /// Re-expresses the state in another quadrature layout.
    pub fn change_basis(&self, target: Basis) -> GaussianState {
        let target = target.with_nmodes(self.nmodes());
        let perm = utils::basis_permutation(&self.basis, &target);

        let mut mean = Array1::<f64>::zeros(target.dim());
        let mut covar = Array2::<f64>::zeros((target.dim(), target.dim()));
        utils::scatter_vector(&self.mean.view(), &perm, &mut mean.view_mut());
        utils::scatter_matrix(&self.covar.view(), &perm, &mut covar.view_mut());

        GaussianState {
            basis: target,
            mean,
            covar,
            hbar: self.hbar,
        }
    }
}

impl Mul<&GaussianState> for &GaussianUnitary {
    type Output = Result<GaussianState, StateError>;

    fn mul(self, state: &GaussianState) -> Self::Output {
        state.apply(self)
    }
}

impl Mul<&GaussianState> for &GaussianChannel {
    type Output = Result<GaussianState, StateError>;

    fn mul(self, state: &GaussianState) -> Self::Output {
        state.apply(self)
    }
}
