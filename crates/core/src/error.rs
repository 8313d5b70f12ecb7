#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("client not found")]
    ClientNotFound,
    #[error("relation not found")]
    RelationNotFound,
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("failed to serialize document: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize document: {0}")]
    Deserialization(serde_json::Error),
    #[error("storage task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
