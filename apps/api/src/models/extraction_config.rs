use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A saved extraction config. `config` is stored as normalized (derived keys
/// and default name/description filled in, unknown properties dropped) and
/// `prompt` is the text compiled from it at creation time; neither is
/// rewritten later.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExtractionConfigRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub config: Value,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything the caller supplies; ids and timestamps come from the store.
#[derive(Debug, Clone)]
pub struct NewExtractionConfig {
    pub user_id: Uuid,
    pub name: String,
    pub config: Value,
    pub prompt: String,
}
