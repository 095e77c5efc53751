use fragment::FragmentError;
use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("fragment error: {0}")]
    Fragment(#[from] FragmentError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid script configuration: {0}")]
    InvalidConfig(String),

    #[error("script never declares `var {binding} = {{}}`")]
    MissingBinding { binding: String },

    #[error("unexpected input at byte {offset}: expected {expected}")]
    UnexpectedToken { offset: usize, expected: &'static str },

    #[error("unterminated string literal starting at byte {offset}")]
    UnterminatedString { offset: usize },

    #[error("invalid string literal starting at byte {offset}")]
    InvalidString { offset: usize },

    #[error("invalid trait path `{0}`")]
    InvalidTraitPath(String),
}

impl CodecError {
    pub fn config(msg: impl Into<String>) -> Self {
        CodecError::InvalidConfig(msg.into())
    }

    pub(crate) fn unexpected(offset: usize, expected: &'static str) -> Self {
        CodecError::UnexpectedToken { offset, expected }
    }
}
