use thiserror::Error;

pub type FragmentResult<T> = Result<T, FragmentError>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FragmentError {
    #[error("fragment group name must not be empty")]
    EmptyGroup,
}
