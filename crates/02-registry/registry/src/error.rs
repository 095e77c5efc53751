use thiserror::Error;

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a fragment consumer is already installed")]
    ConsumerAlreadyInstalled,

    #[error("fragment channel disconnected")]
    Disconnected,
}
