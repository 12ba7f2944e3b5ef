//! Extraction config persistence — pluggable store behind a trait.
//!
//! Default: `PgConfigStore` (Postgres via sqlx).
//! `AppState` holds an `Arc<dyn ConfigStore>`, so tests swap in the
//! in-memory store without touching handlers.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::extraction_config::{ExtractionConfigRow, NewExtractionConfig};

#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn save(&self, record: NewExtractionConfig) -> Result<ExtractionConfigRow, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<ExtractionConfigRow>, AppError>;

    /// A user's configs, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<ExtractionConfigRow>, AppError>;

    /// Returns false when no record had that id.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgConfigStore {
    pool: PgPool,
}

impl PgConfigStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConfigStore for PgConfigStore {
    async fn save(&self, record: NewExtractionConfig) -> Result<ExtractionConfigRow, AppError> {
        let id = Uuid::new_v4();
        let row = sqlx::query_as::<_, ExtractionConfigRow>(
            r#"
            INSERT INTO extraction_configs (id, user_id, name, config, prompt)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(record.user_id)
        .bind(&record.name)
        .bind(&record.config)
        .bind(&record.prompt)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted extraction config {id} for user {}", record.user_id);
        Ok(row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ExtractionConfigRow>, AppError> {
        Ok(sqlx::query_as::<_, ExtractionConfigRow>(
            "SELECT * FROM extraction_configs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<ExtractionConfigRow>, AppError> {
        Ok(sqlx::query_as::<_, ExtractionConfigRow>(
            "SELECT * FROM extraction_configs WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM extraction_configs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}


#[cfg(test)]
mod tests {
    use super::memory::MemoryConfigStore;
    use super::*;
    use serde_json::json;

    fn new_record(user_id: Uuid, name: &str) -> NewExtractionConfig {
        NewExtractionConfig {
            user_id,
            name: name.to_string(),
            config: json!({"version": "v1", "fields": []}),
            prompt: "compiled".to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_store_save_get_delete() {
        let store = MemoryConfigStore::default();
        let user = Uuid::new_v4();
        let saved = store.save(new_record(user, "resumes")).await.unwrap();

        let fetched = store.get(saved.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "resumes");
        assert_eq!(fetched.prompt, "compiled");

        assert!(store.delete(saved.id).await.unwrap());
        assert!(!store.delete(saved.id).await.unwrap());
        assert!(store.get(saved.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_lists_per_user_newest_first() {
        let store = MemoryConfigStore::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.save(new_record(alice, "first")).await.unwrap();
        store.save(new_record(bob, "other")).await.unwrap();
        store.save(new_record(alice, "second")).await.unwrap();

        let names: Vec<_> = store
            .list(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }
}
