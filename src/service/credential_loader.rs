use crate::error::AccessError;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Variable name to raw value, as read from a configuration source.
pub type CredentialMapping = HashMap<String, String>;

/// A flat key/value source of API identifiers and keys.
pub trait CredentialSource: Send + Sync {
    /// Read the whole source. Implementations must not cache between calls.
    fn load_mapping(&self) -> Result<CredentialMapping, AccessError>;
}

/// `NAME=VALUE` file parsed with dotenvy.
///
/// Reading never touches the process environment; the file is parsed afresh on every call.
#[derive(Debug, Clone)]
pub struct EnvFileSource {
    path: PathBuf,
}

impl EnvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up one variable. A value already present in the process
    /// environment wins over the file; the file must still be readable.
    pub fn get(&self, name: &str) -> Result<Option<String>, AccessError> {
        let mut mapping = self.load_mapping()?;
        if let Ok(value) = env::var(name) {
            return Ok(Some(value));
        }
        Ok(mapping.remove(name))
    }
}

impl CredentialSource for EnvFileSource {
    fn load_mapping(&self) -> Result<CredentialMapping, AccessError> {
        let iter = dotenvy::from_path_iter(&self.path)
            .map_err(|e| AccessError::from_dotenv(&self.path, e))?;

        let mapping = iter
            .collect::<Result<CredentialMapping, _>>()
            .map_err(|e| AccessError::from_dotenv(&self.path, e))?;

        debug!(path = %self.path.display(), entries = mapping.len(), "credential source loaded");
        Ok(mapping)
    }
}

/// Fixed in-memory mapping, handy for fixtures and for values assembled elsewhere.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    mapping: CredentialMapping,
}

impl StaticSource {
    pub fn new(mapping: CredentialMapping) -> Self {
        Self { mapping }
    }
}

impl<K, V> FromIterator<(K, V)> for StaticSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl CredentialSource for StaticSource {
    fn load_mapping(&self) -> Result<CredentialMapping, AccessError> {
        Ok(self.mapping.clone())
    }
}
