use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    /// Memberships need at least one student and one organization.
    #[error("No students or organizations available to create memberships")]
    MissingPrerequisites,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

pub type SeedResult<T> = Result<T, SeedError>;
