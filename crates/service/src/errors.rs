use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("corrupt store: {0}")]
    Corrupt(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}
