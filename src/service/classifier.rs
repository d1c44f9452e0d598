use crate::db::models::AccessRecord;
use crate::error::AccessError;
use crate::service::credential_loader::{CredentialMapping, CredentialSource};
use std::collections::BTreeMap;
use tracing::info;

/// Names containing this (exact case) are identifiers.
pub const ID_MARKER: &str = "ID";
/// Names containing this (exact case) are keys.
pub const KEY_MARKER: &str = "KEY";

/// Identifier and key entries picked out of a [`CredentialMapping`].
///
/// The groups may overlap: a name containing both markers is in each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedCredentials {
    pub identifiers: CredentialMapping,
    pub keys: CredentialMapping,
}

/// Copy every entry whose name contains [`ID_MARKER`] into `identifiers` and,
/// independently, every entry whose name contains [`KEY_MARKER`] into `keys`.
/// Entries matching neither are dropped.
pub fn classify(mapping: &CredentialMapping) -> ClassifiedCredentials {
    let mut out = ClassifiedCredentials::default();
    for (name, value) in mapping {
        if name.contains(ID_MARKER) {
            out.identifiers.insert(name.clone(), value.clone());
        }
        if name.contains(KEY_MARKER) {
            out.keys.insert(name.clone(), value.clone());
        }
    }
    out
}

/// `name` with the first `marker` removed and surrounding underscores trimmed.
fn stem(name: &str, marker: &str) -> String {
    name.replacen(marker, "", 1).trim_matches('_').to_string()
}

/// Stem to value for one group. Names are visited in order so the smallest wins ties.
fn stems<'a>(group: &'a CredentialMapping, marker: &str) -> BTreeMap<String, &'a str> {
    let mut names: Vec<&String> = group.keys().collect();
    names.sort();
    let mut out = BTreeMap::new();
    for name in names {
        let s = stem(name, marker);
        if !s.is_empty() {
            out.entry(s).or_insert(group[name].as_str());
        }
    }
    out
}

impl ClassifiedCredentials {
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty() && self.keys.is_empty()
    }

    /// Pair identifiers with keys sharing a stem (`BUOY1_ID` + `BUOY1_KEY` → `BUOY1`).
    ///
    /// Unpaired entries and empty stems are skipped. When several names reduce
    /// to the same stem the lexically smallest wins. Sorted by name.
    pub fn access_records(&self) -> Vec<AccessRecord> {
        let ids = stems(&self.identifiers, ID_MARKER);
        let keys = stems(&self.keys, KEY_MARKER);

        ids.into_iter()
            .filter_map(|(name, id)| {
                keys.get(&name)
                    .map(|key| AccessRecord::new(name.clone(), id, *key))
            })
            .collect()
    }
}

/// Loads a [`CredentialSource`] and classifies it.
pub struct CredentialClassifier<S> {
    source: S,
}

impl<S: CredentialSource> CredentialClassifier<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fresh read of the underlying source.
    pub fn load_mapping(&self) -> Result<CredentialMapping, AccessError> {
        self.source.load_mapping()
    }

    pub fn classify(&self) -> Result<ClassifiedCredentials, AccessError> {
        let mapping = self.load_mapping()?;
        let classified = classify(&mapping);
        info!(
            identifiers = classified.identifiers.len(),
            keys = classified.keys.len(),
            "credentials classified"
        );
        Ok(classified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::credential_loader::StaticSource;

    fn mapping(pairs: &[(&str, &str)]) -> CredentialMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn splits_ids_and_keys_with_overlap() {
        let input = mapping(&[
            ("API_ID", "x"),
            ("API_KEY", "y"),
            ("FOO", "z"),
            ("MYIDKEY", "w"),
        ]);
        let out = classify(&input);

        assert_eq!(out.identifiers, mapping(&[("API_ID", "x"), ("MYIDKEY", "w")]));
        assert_eq!(out.keys, mapping(&[("API_KEY", "y"), ("MYIDKEY", "w")]));
        assert!(!out.identifiers.contains_key("FOO"));
        assert!(!out.keys.contains_key("FOO"));
    }

    #[test]
    fn match_is_case_sensitive() {
        let out = classify(&mapping(&[("api_id", "x"), ("Api_Key", "y")]));
        assert!(out.identifiers.is_empty());
        assert!(out.keys.is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn marker_may_appear_anywhere_in_name() {
        let out = classify(&mapping(&[("IDENTITY", "a"), ("MONKEYS", "b")]));
        assert_eq!(out.identifiers.len(), 1);
        assert_eq!(out.keys.len(), 1);
    }

    #[test]
    fn pairs_ids_and_keys_by_stem() {
        let out = classify(&mapping(&[
            ("BUOY1_ID", "852912"),
            ("BUOY1_KEY", "VAHH1R8V29N77F5V"),
            ("BUOY2_ID", "882564"),
            ("BUOY2_KEY", "7V8N0R6RNXAM38AY"),
            ("LONELY_ID", "1"),
            ("MYIDKEY", "w"),
            ("ID", "no-stem"),
            ("KEY", "no-stem"),
        ]));

        assert_eq!(
            out.access_records(),
            vec![
                AccessRecord::new("BUOY1", "852912", "VAHH1R8V29N77F5V"),
                AccessRecord::new("BUOY2", "882564", "7V8N0R6RNXAM38AY"),
            ]
        );
    }

    #[test]
    fn classifier_reads_from_source() {
        let source: StaticSource = [("TS_ID", "1"), ("TS_KEY", "2"), ("PATH", "/bin")]
            .into_iter()
            .collect();
        let classifier = CredentialClassifier::new(source);

        let out = classifier.classify().expect("classify");
        assert_eq!(out.identifiers, mapping(&[("TS_ID", "1")]));
        assert_eq!(out.keys, mapping(&[("TS_KEY", "2")]));
        assert_eq!(classifier.load_mapping().expect("load").len(), 3);
    }
}
