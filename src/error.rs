use thiserror::Error;

/// Errors produced while building datasets or fitting models.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot fit to empty dataset")]
    EmptyDataset,
    #[error("feature matrix has {rows} rows but target has {targets} values")]
    ShapeMismatch { rows: usize, targets: usize },
    #[error("test_size must lie in (0, 1), got {0}")]
    InvalidTestSize(f64),
    #[error("invalid hyperparameter: {0}")]
    InvalidParameter(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
