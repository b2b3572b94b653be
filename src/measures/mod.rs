//! Scalar functionals of Gaussian states.
//!
//! Every measure reads `hbar` from the state(s) and divides the raw
//! symplectic spectrum by it, so that physical states satisfy `x >= 1/2`.
//! Spectrum values on the physical edge are dropped from sums and products.
//! The edge band is [`MeasureConfig::tol`] wide, widened to the rounding
//! noise of the eigenproblem when the covariance is ill conditioned. Values
//! below the band yield `NaN` and a `tracing` warning rather than being
//! clamped.

mod fidelity;
mod information;
mod negativity;
mod spectrum;

pub use fidelity::{fidelity, fidelity_with};
pub use information::{entropy_vn, entropy_vn_with, purity};
pub use negativity::{logarithmic_negativity, logarithmic_negativity_with, partial_transpose};
pub use spectrum::symplectic_spectrum;

/// Default threshold used to detect spectrum values on the physical edge.
pub const DEFAULT_TOL: f64 = 1e-15;

/// Numerical settings threaded through the measure functions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasureConfig {
    /// Width of the band around the physical edge treated as exactly on it.
    pub tol: f64,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self { tol: DEFAULT_TOL }
    }
}

impl MeasureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the edge tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Half-width of the edge band once `noise`, the absolute rounding error
    /// of the spectrum values, is accounted for.
    pub(crate) fn edge(&self, noise: f64) -> f64 {
        self.tol.max(noise)
    }
}
