//! Credential loading and classification.

pub mod classifier;
pub mod credential_loader;

pub use classifier::{ClassifiedCredentials, CredentialClassifier, classify};
pub use credential_loader::{CredentialMapping, CredentialSource, EnvFileSource, StaticSource};
