use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid record {order_number}: {reason}")]
    InvalidRecord { order_number: String, reason: String },

    #[error("Invalid value '{value}' for dropdown '{field}'")]
    InvalidDropdownValue { field: &'static str, value: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DashResult<T> = Result<T, DashError>;
