//! Gaussian states, unitaries and channels of `N`-mode bosonic systems,
//! described by their first and second moments over a `2N`-dimensional
//! phase space.

mod core;
pub mod measures;

pub use crate::core::{
    Basis, DirectSum, GaussianChannel, GaussianOperator, GaussianState, GaussianUnitary,
    directsum_all, errors, utils,
};
pub use crate::measures::MeasureConfig;

/// Default reduced Planck constant. With this value the vacuum covariance is
/// the identity matrix.
pub const DEFAULT_HBAR: f64 = 2.0;
