use crate::DEFAULT_HBAR;
use crate::core::basis::Basis;
use crate::core::errors::ChannelError;
use crate::core::operator::GaussianOperator;
use crate::core::unitary::GaussianUnitary;
use crate::core::utils;
use ndarray::{Array1, Array2};

/// Represents a Gaussian channel $x \mapsto T x + d$ with added noise $N$.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianChannel {
    pub basis: Basis,
    pub disp: Array1<f64>,
    pub transform: Array2<f64>,
    pub noise: Array2<f64>,
    pub hbar: f64,
}

impl GaussianChannel {
    pub fn new(
        basis: Basis,
        disp: Array1<f64>,
        transform: Array2<f64>,
        noise: Array2<f64>,
    ) -> Result<Self, ChannelError> {
        Self::with_hbar(basis, disp, transform, noise, DEFAULT_HBAR)
    }

    pub fn with_hbar(
        basis: Basis,
        disp: Array1<f64>,
        transform: Array2<f64>,
        noise: Array2<f64>,
        hbar: f64,
    ) -> Result<Self, ChannelError> {
        let dim = basis.dim();

        if disp.len() != dim || transform.dim() != (dim, dim) || noise.dim() != (dim, dim) {
            return Err(ChannelError::DimensionMismatch {
                expected: dim,
                got_disp: disp.len(),
                transform: transform.dim(),
                noise: noise.dim(),
            });
        }

        if !utils::valid_hbar(hbar) {
            return Err(ChannelError::InvalidHbar(hbar));
        }

        Ok(Self {
            basis,
            disp,
            transform,
            noise,
            hbar,
        })
    }

    pub fn nmodes(&self) -> usize {
        self.basis.nmodes()
    }

    /// Composes the current GaussianChannel with another one: `self` acts first.
    ///
    /// $T = T_2 T_1$, $N = T_2 N_1 T_2^T + N_2$, $d = T_2 d_1 + d_2$.
    pub fn compose(&self, other: &GaussianChannel) -> Result<GaussianChannel, ChannelError> {
        if !self.basis.same_layout(&other.basis) {
            return Err(ChannelError::BasisMismatch);
        }
        if self.hbar != other.hbar {
            return Err(ChannelError::HbarMismatch {
                left: self.hbar,
                right: other.hbar,
            });
        }
        if self.basis.dim() != other.basis.dim() {
            return Err(ChannelError::DimensionMismatch {
                expected: self.basis.dim(),
                got_disp: other.disp.len(),
                transform: other.transform.dim(),
                noise: other.noise.dim(),
            });
        }

        let transform = other.transform.dot(&self.transform);
        let noise = utils::congruence(&other.transform, &self.noise) + &other.noise;
        let disp = other.transform.dot(&self.disp) + &other.disp;

        // Returns a different GaussianChannel
        Ok(GaussianChannel {
            basis: self.basis,
            disp,
            transform,
            noise,
            hbar: self.hbar,
        })
    }

    /// Re-expresses the channel in another quadrature layout.
    pub fn change_basis(&self, target: Basis) -> GaussianChannel {
        let target = target.with_nmodes(self.nmodes());
        let perm = utils::basis_permutation(&self.basis, &target);
        let dim = target.dim();

        let mut disp = Array1::<f64>::zeros(dim);
        let mut transform = Array2::<f64>::zeros((dim, dim));
        let mut noise = Array2::<f64>::zeros((dim, dim));
        utils::scatter_vector(&self.disp.view(), &perm, &mut disp.view_mut());
        utils::scatter_matrix(&self.transform.view(), &perm, &mut transform.view_mut());
        utils::scatter_matrix(&self.noise.view(), &perm, &mut noise.view_mut());

        GaussianChannel {
            basis: target,
            disp,
            transform,
            noise,
            hbar: self.hbar,
        }
    }
}

/// A unitary is the noiseless channel with `transform = symplectic`.
impl From<GaussianUnitary> for GaussianChannel {
    fn from(unitary: GaussianUnitary) -> Self {
        let dim = unitary.basis.dim();
        GaussianChannel {
            basis: unitary.basis,
            disp: unitary.disp,
            transform: unitary.symplectic,
            noise: Array2::zeros((dim, dim)),
            hbar: unitary.hbar,
        }
    }
}

impl GaussianOperator for GaussianChannel {
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
        &self.transform
    }

    fn noise(&self) -> Option<&Array2<f64>> {
        Some(&self.noise)
    }
}
