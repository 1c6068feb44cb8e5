use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryCountError {
    /// Misuse of the emission counter, never raised on a normal stream path.
    #[error("{0}() not supported")]
    UnsupportedOperation(&'static str),

    #[error("LiveQuery closed")]
    Closed,
}

pub type Result<T, E = QueryCountError> = std::result::Result<T, E>;
