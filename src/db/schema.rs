//! SQL text for the access table.
//! Kept to the subset shared by SQLite and MySQL so the same statements run on either driver.

/// Default table name for stored API identifiers and keys.
pub const ACCESS_TABLE: &str = "access";

/// True for plain identifiers: `[A-Za-z_][A-Za-z0-9_]*`.
///
/// Table names are interpolated into SQL, so nothing else is accepted.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `name`, `access_id`, `access_key`; no primary key, no indexes.
pub fn create_access_table(table: &str) -> String {
    format!("CREATE TABLE IF NOT EXISTS {table} (name TEXT, access_id TEXT, access_key TEXT)")
}

pub fn count_access_rows(table: &str) -> String {
    format!("SELECT COUNT(*) FROM {table}")
}

pub fn insert_access_record(table: &str) -> String {
    format!("INSERT INTO {table} (name, access_id, access_key) VALUES (?, ?, ?)")
}

pub fn select_access_records(table: &str) -> String {
    format!("SELECT name, access_id, access_key FROM {table}")
}
