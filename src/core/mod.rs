pub mod basis;
mod channels;
mod directsum;
pub mod errors;
mod operator;
mod state;
mod unitary;
pub mod utils;

pub use basis::Basis;
pub use channels::GaussianChannel;
pub use directsum::{DirectSum, directsum_all};
pub use operator::GaussianOperator;
pub use state::GaussianState;
pub use unitary::GaussianUnitary;
