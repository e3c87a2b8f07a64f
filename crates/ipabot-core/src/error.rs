use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid dataset: {0}")]
    Dataset(String),

    /// Raised by answer engines; chat hosts show the processing-error text instead.
    #[error("Matching failed: {0}")]
    Matching(String),
}

pub type Result<T> = std::result::Result<T, Error>;
