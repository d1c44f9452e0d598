/// One row of the access table. Uniqueness is left to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct AccessRecord {
    pub name: String,
    pub access_id: String,
    pub access_key: String,
}

impl AccessRecord {
    pub fn new(
        name: impl Into<String>,
        access_id: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            access_id: access_id.into(),
            access_key: access_key.into(),
        }
    }
}
