use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid simulation setting: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
