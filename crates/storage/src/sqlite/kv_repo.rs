use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use super::SqliteStore;
use crate::repository::{Entry, KeyValueStore, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

const SELECT_VALUE: &str = "SELECT value FROM kv_entries WHERE key = ?1";

const UPSERT_VALUE: &str = r"
    INSERT INTO kv_entries (key, value, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
";

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let row = sqlx::query(SELECT_VALUE)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.map(|row| row.try_get::<Vec<u8>, _>("value").map_err(ser))
            .transpose()
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        sqlx::query(UPSERT_VALUE)
            .bind(key)
            .bind(value)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            let row = sqlx::query(SELECT_VALUE)
                .bind(*key)
                .fetch_optional(&mut *tx)
                .await
                .map_err(conn)?;
            values.push(
                row.map(|row| row.try_get::<Vec<u8>, _>("value").map_err(ser))
                    .transpose()?,
            );
        }
        tx.commit().await.map_err(conn)?;
        Ok(values)
    }

    async fn set_many(&self, entries: Vec<Entry>) -> Result<(), StorageError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(conn)?;
        for (key, value) in entries {
            sqlx::query(UPSERT_VALUE)
                .bind(key)
                .bind(value)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
        }
        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        for key in keys {
            sqlx::query("DELETE FROM kv_entries WHERE key = ?1")
                .bind(*key)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;
        }
        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
