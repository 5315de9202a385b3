use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("report serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
