//! Errors raised while building a run configuration.

/// Configuration errors shared by the finder crates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("At least one character type must be included")]
    EmptyCharset,

    #[error("Charset must be ASCII, found {0:?}")]
    NonAsciiCharset(char),
}
