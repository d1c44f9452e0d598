pub mod config;
pub mod db;
pub mod error;
pub mod service;

pub use config::Config;
pub use db::{AccessRecord, AccessTable, ConnectionHandle, ConnectionManager};
pub use error::{AccessError, IsRetryable};
pub use service::{ClassifiedCredentials, CredentialClassifier, CredentialSource, EnvFileSource};
