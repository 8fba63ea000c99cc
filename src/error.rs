use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiffError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("cannot grow scratch storage to {requested} slots")]
    AllocationFailure { requested: usize },
    #[error("no middle snake between {n} and {m} elements; compare is not an equivalence")]
    SearchExhausted { n: usize, m: usize },
}

impl DiffError {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
