use crate::error::{PersistError, PersistResult};
use crate::store::{MetadataStore, Record, RecordKey};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};

/// Postgres metadata store
///
/// Each table has the shape `(key TEXT PRIMARY KEY, fields JSONB)`, where
/// `fields` holds the whole record.
#[derive(Clone)]
pub struct PostgresMetadataStore {
    pool: PgPool,
}

/// Table names are interpolated into SQL, so only plain identifiers are allowed.
fn validate_table(table: &str) -> PersistResult<()> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if !valid || table.len() > 63 {
        return Err(PersistError::Config(format!("Invalid table name: {}", table)));
    }
    Ok(())
}

impl PostgresMetadataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the given tables if they do not exist.
    #[tracing::instrument(skip(self))]
    pub async fn ensure_tables(&self, tables: &[&str]) -> PersistResult<()> {
        for table in tables {
            validate_table(table)?;
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {} (key TEXT PRIMARY KEY, fields JSONB NOT NULL)",
                table
            ))
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for PostgresMetadataStore {
    #[tracing::instrument(skip(self, record), fields(db.table = %table, db.operation = "upsert"))]
    async fn put_record(&self, table: &str, key: &RecordKey, record: Record) -> PersistResult<()> {
        validate_table(table)?;
        let mut record = record;
        record.insert(key.attribute.clone(), key.value.clone());

        sqlx::query::<Postgres>(&format!(
            r#"
            INSERT INTO {} (key, fields)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET fields = EXCLUDED.fields
            "#,
            table
        ))
        .bind(&key.value)
        .bind(Json(&record))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = %table, db.operation = "select"))]
    async fn get_record(&self, table: &str, key: &RecordKey) -> PersistResult<Option<Record>> {
        validate_table(table)?;
        let row: Option<(Json<Record>,)> = sqlx::query_as::<Postgres, (Json<Record>,)>(&format!(
            "SELECT fields FROM {} WHERE key = $1",
            table
        ))
        .bind(&key.value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(record),)| record))
    }

    #[tracing::instrument(skip(self, values), fields(db.table = %table, db.operation = "batch_select", count = values.len()))]
    async fn query_by_key_set(
        &self,
        table: &str,
        _attribute: &str,
        values: &[String],
    ) -> PersistResult<Vec<Record>> {
        validate_table(table)?;
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(Json<Record>,)> = sqlx::query_as::<Postgres, (Json<Record>,)>(&format!(
            "SELECT fields FROM {} WHERE key = ANY($1)",
            table
        ))
        .bind(values)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(Json(record),)| record).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = %table, db.operation = "delete"))]
    async fn delete_record(&self, table: &str, key: &RecordKey) -> PersistResult<()> {
        validate_table(table)?;
        sqlx::query::<Postgres>(&format!("DELETE FROM {} WHERE key = $1", table))
            .bind(&key.value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_validation() {
        assert!(validate_table("assets").is_ok());
        assert!(validate_table("_page_options2").is_ok());
        assert!(validate_table("").is_err());
        assert!(validate_table("1assets").is_err());
        assert!(validate_table("assets; DROP TABLE x").is_err());
        assert!(validate_table("public.assets").is_err());
    }
}
