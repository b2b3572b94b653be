use ndarray::{Array1, Array2};

use crate::core::basis::Basis;

/// An affine phase-space map $x \mapsto T x + d$ with optional added noise.
///
/// Implemented by [`GaussianUnitary`](crate::GaussianUnitary) (no noise) and
/// [`GaussianChannel`](crate::GaussianChannel). A state evolves as
/// `mean' = T·mean + d` and `covar' = T·covar·Tᵀ + N`.
pub trait GaussianOperator {
    fn basis(&self) -> &Basis;

    fn hbar(&self) -> f64;

    fn displacement(&self) -> &Array1<f64>;

    fn transform(&self) -> &Array2<f64>;

    /// Additive noise matrix, `None` for lossless operators.
    fn noise(&self) -> Option<&Array2<f64>>;

    fn dim(&self) -> usize {
        self.displacement().len()
    }
}
