use crate::db::models::AccessRecord;
use crate::db::pool::ConnectionHandle;
use crate::db::schema;
use crate::error::AccessError;
use sqlx::{AnyPool, Row};
use sqlx::any::AnyRow;
use tracing::{debug, info};

/// The access table on a pooled store.
#[derive(Debug, Clone)]
pub struct AccessTable {
    pool: AnyPool,
    table: String,
}

impl AccessTable {
    /// Bind `table` on the handle's pool. Rejects names that are not plain identifiers.
    pub fn new(handle: &ConnectionHandle, table: impl Into<String>) -> Result<Self, AccessError> {
        let table = table.into();
        if !schema::is_valid_identifier(&table) {
            return Err(AccessError::InvalidConfig(format!(
                "table name {table:?} is not a plain SQL identifier"
            )));
        }
        Ok(Self {
            pool: handle.pool().clone(),
            table,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the table if absent. Safe to repeat across calls and restarts.
    pub async fn ensure_access_table(&self) -> Result<(), AccessError> {
        sqlx::query(&schema::create_access_table(&self.table))
            .execute(&self.pool)
            .await
            .map_err(AccessError::Schema)?;
        info!(table = %self.table, "access table ensured");
        Ok(())
    }

    /// Current row count. Assumes the table exists.
    pub async fn count_access_rows(&self) -> Result<u64, AccessError> {
        let (count,): (i64,) = sqlx::query_as(&schema::count_access_rows(&self.table))
            .fetch_one(&self.pool)
            .await
            .map_err(AccessError::Query)?;
        let rows = u64::try_from(count).unwrap_or_default();
        debug!(table = %self.table, rows, "counted access rows");
        Ok(rows)
    }

    pub async fn insert(&self, record: &AccessRecord) -> Result<(), AccessError> {
        sqlx::query(&schema::insert_access_record(&self.table))
            .bind(record.name.clone())
            .bind(record.access_id.clone())
            .bind(record.access_key.clone())
            .execute(&self.pool)
            .await
            .map_err(AccessError::Query)?;
        Ok(())
    }

    /// Insert all records in a single transaction. Returns the number inserted.
    pub async fn insert_many(&self, records: Vec<AccessRecord>) -> Result<u64, AccessError> {
        let sql = schema::insert_access_record(&self.table);
        let mut tx = self.pool.begin().await.map_err(AccessError::Query)?;
        let mut inserted = 0u64;

        for record in records {
            let done = sqlx::query(&sql)
                .bind(record.name)
                .bind(record.access_id)
                .bind(record.access_key)
                .execute(&mut *tx)
                .await
                .map_err(AccessError::Query)?;
            inserted += done.rows_affected();
        }

        tx.commit().await.map_err(AccessError::Query)?;
        info!(table = %self.table, inserted, "access records inserted");
        Ok(inserted)
    }

    pub async fn list(&self) -> Result<Vec<AccessRecord>, AccessError> {
        let rows = sqlx::query(&schema::select_access_records(&self.table))
            .fetch_all(&self.pool)
            .await
            .map_err(AccessError::Query)?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    fn row_to_model(row: AnyRow) -> Result<AccessRecord, AccessError> {
        let name: Option<String> = row.try_get("name").map_err(AccessError::Query)?;
        let access_id: Option<String> = row.try_get("access_id").map_err(AccessError::Query)?;
        let access_key: Option<String> = row.try_get("access_key").map_err(AccessError::Query)?;

        Ok(AccessRecord {
            name: name.unwrap_or_default(),
            access_id: access_id.unwrap_or_default(),
            access_key: access_key.unwrap_or_default(),
        })
    }
}
