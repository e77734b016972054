use thiserror::Error;

/// Errors produced by model constructors and validation routines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid media locator `{locator}`: {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("unsupported locator scheme: {0}")]
    UnsupportedScheme(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
