use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitaryError {
    #[error(
        "Dimension mismatch: expected {expected}, got displacement {got_disp} \
         and {got_rows}x{got_cols} symplectic matrix"
    )]
    DimensionMismatch {
        expected: usize,
        got_disp: usize,
        got_rows: usize,
        got_cols: usize,
    },

    #[error("Invalid hbar: {0}. Must be finite and positive")]
    InvalidHbar(f64),

    #[error("Symplectic matrix is singular")]
    Singular,

    #[error("Operands are expressed in different quadrature layouts")]
    BasisMismatch,

    #[error("hbar mismatch: {left} vs {right}")]
    HbarMismatch { left: f64, right: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChannelError {
    #[error(
        "Dimension mismatch: expected {expected}, got displacement {got_disp}, \
         transform {transform:?} and noise {noise:?}"
    )]
    DimensionMismatch {
        expected: usize,
        got_disp: usize,
        transform: (usize, usize),
        noise: (usize, usize),
    },

    #[error("Invalid hbar: {0}. Must be finite and positive")]
    InvalidHbar(f64),

    #[error("Operands are expressed in different quadrature layouts")]
    BasisMismatch,

    #[error("hbar mismatch: {left} vs {right}")]
    HbarMismatch { left: f64, right: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error(
        "Dimension mismatch: expected {expected}, got mean {got_mean} \
         and {got_rows}x{got_cols} covariance"
    )]
    DimensionMismatch {
        expected: usize,
        got_mean: usize,
        got_rows: usize,
        got_cols: usize,
    },

    #[error("Operator of dimension {got} cannot act on a state of dimension {expected}")]
    OperatorDimensionMismatch { expected: usize, got: usize },

    #[error("Invalid hbar: {0}. Must be finite and positive")]
    InvalidHbar(f64),

    #[error("Operands are expressed in different quadrature layouts")]
    BasisMismatch,

    #[error("hbar mismatch: {left} vs {right}")]
    HbarMismatch { left: f64, right: f64 },

    #[error("Mode index {index} out of range 1..={num_modes}")]
    IndexOutOfBounds { index: usize, num_modes: usize },

    #[error("Duplicate mode index found: {0}")]
    DuplicateMode(usize),

    #[error("At least one mode index is required")]
    EmptyIndices,

    #[error("Unitary error: {0}")]
    UnitaryError(#[from] UnitaryError),

    #[error("Channel error: {0}")]
    ChannelError(#[from] ChannelError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("States are expressed in different bases")]
    BasisMismatch,

    #[error("hbar mismatch: {left} vs {right}")]
    HbarMismatch { left: f64, right: f64 },

    #[error("Sum of covariance matrices is singular")]
    SingularMatrix,

    #[error("Covariance matrix is not positive definite")]
    NotPositiveDefinite,

    #[error("Eigenvalue iteration did not converge within {0} steps")]
    NoConvergence(usize),

    #[error("State error: {0}")]
    StateError(#[from] StateError),
}
