use sqlx::Error as SqlxError;
use std::path::PathBuf;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum AccessError {
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    #[error("Schema error: {0}")]
    Schema(#[source] SqlxError),

    #[error("Query error: {0}")]
    Query(#[source] SqlxError),

    #[error("Credential source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Failed to load credential source {}: {source}", path.display())]
    SourceLoad {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl AccessError {
    /// Classify a dotenvy failure for `path`, keeping a missing file distinct.
    pub(crate) fn from_dotenv(path: impl Into<PathBuf>, err: dotenvy::Error) -> Self {
        let path = path.into();
        match err {
            dotenvy::Error::Io(ref io) if io.kind() == std::io::ErrorKind::NotFound => {
                AccessError::SourceNotFound { path }
            }
            source => AccessError::SourceLoad { path, source },
        }
    }
}

impl From<figment::Error> for AccessError {
    fn from(e: figment::Error) -> Self {
        AccessError::Config(Box::new(e))
    }
}

/// Whether an operation that failed with this error may succeed if attempted again.
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for SqlxError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            SqlxError::Io(_) | SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Tls(_)
        )
    }
}

impl IsRetryable for AccessError {
    fn is_retryable(&self) -> bool {
        match self {
            AccessError::Connection(e) | AccessError::Query(e) => e.is_retryable(),
            AccessError::Schema(_)
            | AccessError::SourceNotFound { .. }
            | AccessError::SourceLoad { .. }
            | AccessError::InvalidConfig(_)
            | AccessError::Config(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn missing_dotenv_file_maps_to_source_not_found() {
        let err = AccessError::from_dotenv(
            "/nowhere/.env",
            dotenvy::Error::Io(io::Error::new(io::ErrorKind::NotFound, "gone")),
        );
        assert!(matches!(err, AccessError::SourceNotFound { ref path } if path.ends_with(".env")));
        assert!(!err.is_retryable());
    }

    #[test]
    fn malformed_dotenv_file_maps_to_source_load() {
        let err = AccessError::from_dotenv(
            ".env",
            dotenvy::Error::LineParse("BROKEN LINE".to_string(), 6),
        );
        assert!(matches!(err, AccessError::SourceLoad { .. }));
    }

    #[test]
    fn transient_store_failures_are_retryable() {
        let io = SqlxError::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(AccessError::Connection(io).is_retryable());
        assert!(AccessError::Query(SqlxError::PoolTimedOut).is_retryable());
        assert!(!AccessError::Query(SqlxError::RowNotFound).is_retryable());
        assert!(!AccessError::Schema(SqlxError::PoolTimedOut).is_retryable());
    }
}
