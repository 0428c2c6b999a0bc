use super::domain::{FeedbackEntry, Guard, GuardId, Incident, ShiftRecord};

/// Read-only view of the staff and shift store so the service can be exercised in isolation.
pub trait RosterRepository: Send + Sync {
    fn guards(&self) -> Result<Vec<Guard>, RepositoryError>;
    fn guard(&self, id: &GuardId) -> Result<Option<Guard>, RepositoryError>;
    fn shifts(&self) -> Result<Vec<ShiftRecord>, RepositoryError>;
    fn incidents(&self) -> Result<Vec<Incident>, RepositoryError>;
    fn feedback(&self) -> Result<Vec<FeedbackEntry>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
