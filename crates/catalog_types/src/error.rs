use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("unknown sort key '{0}'")]
    UnknownSortKey(String),
    #[error("unsupported page size {0}; expected one of 10, 20, 50, 100")]
    UnsupportedPageSize(u32),
    #[error("invalid page size '{0}'")]
    InvalidPageSize(String),
}
