use timetrack_core::error::CoreError;

/// Error type for use-case entry points.
///
/// Wraps [`CoreError`] for domain errors and `sqlx::Error` for
/// persistence failures; the host maps both onto its transport.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A domain-level error from `timetrack-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for use-case return values.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Core(CoreError::Validation(errors.to_string()))
    }
}
