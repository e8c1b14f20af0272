use thiserror::Error;

#[derive(Error, Debug)]
pub enum AbsaError {
    #[error("Model unavailable error: {0}")]
    ModelUnavailable(String),

    #[error("Tagger error: {0}")]
    TaggerError(String),

    #[error("Classifier error: {0}")]
    ClassifierError(String),

    #[error("Malformed batch input error: {0}")]
    MalformedBatchInput(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Invalid configuration error: {0}")]
    InvalidConfigurationError(String),
}

impl From<std::io::Error> for AbsaError {
    fn from(error: std::io::Error) -> Self {
        AbsaError::IOError(error.to_string())
    }
}

impl From<csv::Error> for AbsaError {
    fn from(error: csv::Error) -> Self {
        AbsaError::MalformedBatchInput(error.to_string())
    }
}
