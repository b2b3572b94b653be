//! Direct sum (block-diagonal composition) of independent subsystems.
//!
//! Given operands on `N1` and `N2` modes the result acts on `N1 + N2` modes,
//! with the modes of the left operand first. In the interleaved layout the
//! moment matrices are embedded block-diagonally; in the block layout each
//! operand's positions and momenta land in their own sections.

use ndarray::{Array1, Array2, ArrayViewMut1, ArrayViewMut2};
use tracing::debug;

use crate::core::basis::Basis;
use crate::core::channels::GaussianChannel;
use crate::core::errors::{ChannelError, StateError, UnitaryError};
use crate::core::state::GaussianState;
use crate::core::unitary::GaussianUnitary;
use crate::core::utils;

/// Block-diagonal composition of two entities of the same kind.
pub trait DirectSum: Sized {
    type Error;

    /// Returns `self ⊕ other`.
    fn directsum(&self, other: &Self) -> Result<Self, Self::Error>;
}

/// Folds [`DirectSum::directsum`] left to right over `items`.
///
/// Returns `None` for an empty slice.
pub fn directsum_all<T: DirectSum + Clone>(items: &[T]) -> Option<Result<T, T::Error>> {
    let (first, rest) = items.split_first()?;
    Some(
        rest.iter()
            .try_fold(first.clone(), |acc, item| acc.directsum(item)),
    )
}

/// Joint basis and the phase-space slots each operand occupies in it.
struct Embedding {
    basis: Basis,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// `None` when the operands use different quadrature layouts.
fn embedding(a: &Basis, b: &Basis) -> Option<Embedding> {
    if !a.same_layout(b) {
        return None;
    }
    let basis = a.with_nmodes(a.nmodes() + b.nmodes());
    Some(Embedding {
        basis,
        left: utils::embedding_indices(&basis, 0, a.nmodes()),
        right: utils::embedding_indices(&basis, a.nmodes(), b.nmodes()),
    })
}

impl GaussianState {
    /// [`DirectSum::directsum`] writing into caller-provided buffers.
    ///
    /// The buffers are overwritten entirely and must have the joint dimension.
    /// Returns the joint basis.
    pub fn directsum_into(
        &self,
        other: &GaussianState,
        mut mean_out: ArrayViewMut1<f64>,
        mut covar_out: ArrayViewMut2<f64>,
    ) -> Result<Basis, StateError> {
        let emb = embedding(&self.basis, &other.basis).ok_or(StateError::BasisMismatch)?;
        if self.hbar != other.hbar {
            return Err(StateError::HbarMismatch {
                left: self.hbar,
                right: other.hbar,
            });
        }
        if !utils::output_fits(&mean_out, &covar_out, emb.basis.dim()) {
            return Err(StateError::DimensionMismatch {
                expected: emb.basis.dim(),
                got_mean: mean_out.len(),
                got_rows: covar_out.nrows(),
                got_cols: covar_out.ncols(),
            });
        }

        mean_out.fill(0.0);
        covar_out.fill(0.0);
        utils::scatter_vector(&self.mean.view(), &emb.left, &mut mean_out);
        utils::scatter_vector(&other.mean.view(), &emb.right, &mut mean_out);
        utils::scatter_matrix(&self.covar.view(), &emb.left, &mut covar_out);
        utils::scatter_matrix(&other.covar.view(), &emb.right, &mut covar_out);

        Ok(emb.basis)
    }
}

impl DirectSum for GaussianState {
    type Error = StateError;

    fn directsum(&self, other: &Self) -> Result<Self, StateError> {
        debug!(
            left = self.nmodes(),
            right = other.nmodes(),
            "direct sum of gaussian states"
        );
        let dim = self.basis.dim() + other.basis.dim();
        let mut mean = Array1::<f64>::zeros(dim);
        let mut covar = Array2::<f64>::zeros((dim, dim));
        let basis = self.directsum_into(other, mean.view_mut(), covar.view_mut())?;

        Ok(GaussianState {
            basis,
            mean,
            covar,
            hbar: self.hbar,
        })
    }
}

impl GaussianUnitary {
    /// [`DirectSum::directsum`] writing into caller-provided buffers.
    pub fn directsum_into(
        &self,
        other: &GaussianUnitary,
        mut disp_out: ArrayViewMut1<f64>,
        mut symplectic_out: ArrayViewMut2<f64>,
    ) -> Result<Basis, UnitaryError> {
        self.check_compatible(other)?;
        let emb = embedding(&self.basis, &other.basis).ok_or(UnitaryError::BasisMismatch)?;
        if !utils::output_fits(&disp_out, &symplectic_out, emb.basis.dim()) {
            return Err(UnitaryError::DimensionMismatch {
                expected: emb.basis.dim(),
                got_disp: disp_out.len(),
                got_rows: symplectic_out.nrows(),
                got_cols: symplectic_out.ncols(),
            });
        }

        disp_out.fill(0.0);
        symplectic_out.fill(0.0);
        utils::scatter_vector(&self.disp.view(), &emb.left, &mut disp_out);
        utils::scatter_vector(&other.disp.view(), &emb.right, &mut disp_out);
        utils::scatter_matrix(&self.symplectic.view(), &emb.left, &mut symplectic_out);
        utils::scatter_matrix(&other.symplectic.view(), &emb.right, &mut symplectic_out);

        Ok(emb.basis)
    }
}

impl DirectSum for GaussianUnitary {
    type Error = UnitaryError;

    fn directsum(&self, other: &Self) -> Result<Self, UnitaryError> {
        debug!(
            left = self.nmodes(),
            right = other.nmodes(),
            "direct sum of gaussian unitaries"
        );
        let dim = self.basis.dim() + other.basis.dim();
        let mut disp = Array1::<f64>::zeros(dim);
        let mut symplectic = Array2::<f64>::zeros((dim, dim));
        let basis = self.directsum_into(other, disp.view_mut(), symplectic.view_mut())?;

        Ok(GaussianUnitary {
            basis,
            disp,
            symplectic,
            hbar: self.hbar,
        })
    }
}

impl GaussianChannel {
    /// [`DirectSum::directsum`] writing into caller-provided buffers.
    pub fn directsum_into(
        &self,
        other: &GaussianChannel,
        mut disp_out: ArrayViewMut1<f64>,
        mut transform_out: ArrayViewMut2<f64>,
        mut noise_out: ArrayViewMut2<f64>,
    ) -> Result<Basis, ChannelError> {
        let emb = embedding(&self.basis, &other.basis).ok_or(ChannelError::BasisMismatch)?;
        if self.hbar != other.hbar {
            return Err(ChannelError::HbarMismatch {
                left: self.hbar,
                right: other.hbar,
            });
        }
        let dim = emb.basis.dim();
        if !utils::output_fits(&disp_out, &transform_out, dim) || noise_out.dim() != (dim, dim) {
            return Err(ChannelError::DimensionMismatch {
                expected: dim,
                got_disp: disp_out.len(),
                transform: transform_out.dim(),
                noise: noise_out.dim(),
            });
        }

        disp_out.fill(0.0);
        transform_out.fill(0.0);
        noise_out.fill(0.0);
        utils::scatter_vector(&self.disp.view(), &emb.left, &mut disp_out);
        utils::scatter_vector(&other.disp.view(), &emb.right, &mut disp_out);
        utils::scatter_matrix(&self.transform.view(), &emb.left, &mut transform_out);
        utils::scatter_matrix(&other.transform.view(), &emb.right, &mut transform_out);
        utils::scatter_matrix(&self.noise.view(), &emb.left, &mut noise_out);
        utils::scatter_matrix(&other.noise.view(), &emb.right, &mut noise_out);

        Ok(emb.basis)
    }
}

impl DirectSum for GaussianChannel {
    type Error = ChannelError;

    fn directsum(&self, other: &Self) -> Result<Self, ChannelError> {
        debug!(
            left = self.nmodes(),
            right = other.nmodes(),
            "direct sum of gaussian channels"
        );
        let dim = self.basis.dim() + other.basis.dim();
        let mut disp = Array1::<f64>::zeros(dim);
        let mut transform = Array2::<f64>::zeros((dim, dim));
        let mut noise = Array2::<f64>::zeros((dim, dim));
        let basis = self.directsum_into(
            other,
            disp.view_mut(),
            transform.view_mut(),
            noise.view_mut(),
        )?;

        Ok(GaussianChannel {
            basis,
            disp,
            transform,
            noise,
            hbar: self.hbar,
        })
    }
}
