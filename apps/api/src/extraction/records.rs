use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::compiler::generate_extraction_prompt;
use crate::extraction::keys::{find_key_collisions, KeyCollision};
use crate::extraction::schema::ExtractionConfig;
use crate::extraction::store::ConfigStore;
use crate::extraction::validation::{derive_missing_keys, validate_config};
use crate::models::extraction_config::{ExtractionConfigRow, NewExtractionConfig};

/// Record names share the column width of the `name` column.
pub const MAX_RECORD_NAME_LEN: usize = 128;

#[derive(Debug, Deserialize)]
pub struct CreateConfigRequest {
    pub user_id: Uuid,
    pub name: String,
    /// Left untyped so an unknown `version` surfaces as an explicit error.
    pub config: Value,
}

#[derive(Debug, Serialize)]
pub struct CreateConfigResponse {
    pub record: ExtractionConfigRow,
    pub key_collisions: Vec<KeyCollision>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub config: Value,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub prompt: String,
    pub field_keys: Vec<String>,
    pub key_collisions: Vec<KeyCollision>,
}

#[derive(Debug, Serialize)]
pub struct ExtractionPromptResponse {
    pub prompt: String,
    pub field_keys: Vec<String>,
}

/// A config that passed submission checks, ready to compile.
struct PreparedConfig {
    config: ExtractionConfig,
    key_collisions: Vec<KeyCollision>,
}

fn prepare_config(value: Value) -> Result<PreparedConfig, AppError> {
    let mut config = ExtractionConfig::from_value(value)?;

    let derived = derive_missing_keys(&mut config);
    if derived > 0 {
        info!("Derived {derived} field keys from labels");
    }

    let report = validate_config(&config);
    if !report.passed {
        return Err(AppError::Validation(report.summary()));
    }

    let key_collisions = find_key_collisions(config.field_keys());
    for collision in &key_collisions {
        warn!(
            "Field key '{}' is shared by fields {:?}; the extractor returns one value for it",
            collision.key, collision.field_indices
        );
    }

    Ok(PreparedConfig {
        config,
        key_collisions,
    })
}

/// Validates, compiles once, and saves. The stored prompt is never recompiled.
pub async fn create_extraction_config(
    store: &dyn ConfigStore,
    request: CreateConfigRequest,
) -> Result<CreateConfigResponse, AppError> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    if name.chars().count() > MAX_RECORD_NAME_LEN {
        return Err(AppError::Validation(format!(
            "name cannot exceed {MAX_RECORD_NAME_LEN} characters"
        )));
    }

    let prepared = prepare_config(request.config)?;
    let prompt = generate_extraction_prompt(&prepared.config);
    let config = serde_json::to_value(&prepared.config)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("config serialization failed: {e}")))?;

    let record = store
        .save(NewExtractionConfig {
            user_id: request.user_id,
            name,
            config,
            prompt,
        })
        .await?;

    info!(
        "Created {} extraction config {} for user {}",
        prepared.config.version().as_str(),
        record.id,
        record.user_id
    );

    Ok(CreateConfigResponse {
        record,
        key_collisions: prepared.key_collisions,
    })
}

/// Compiles without saving, so a form can show the prompt before submit.
pub fn preview_extraction_config(request: PreviewRequest) -> Result<PreviewResponse, AppError> {
    let prepared = prepare_config(request.config)?;
    Ok(PreviewResponse {
        prompt: generate_extraction_prompt(&prepared.config),
        field_keys: owned_keys(&prepared.config),
        key_collisions: prepared.key_collisions,
    })
}

pub async fn get_extraction_config(
    store: &dyn ConfigStore,
    id: Uuid,
) -> Result<ExtractionConfigRow, AppError> {
    store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Extraction config {id} not found")))
}

/// The stored prompt plus the key set the extractor must return.
pub async fn get_extraction_prompt(
    store: &dyn ConfigStore,
    id: Uuid,
) -> Result<ExtractionPromptResponse, AppError> {
    let record = get_extraction_config(store, id).await?;
    Ok(ExtractionPromptResponse {
        field_keys: stored_field_keys(&record.config),
        prompt: record.prompt,
    })
}

pub async fn delete_extraction_config(store: &dyn ConfigStore, id: Uuid) -> Result<(), AppError> {
    if !store.delete(id).await? {
        return Err(AppError::NotFound(format!("Extraction config {id} not found")));
    }
    info!("Deleted extraction config {id}");
    Ok(())
}

fn owned_keys(config: &ExtractionConfig) -> Vec<String> {
    config.field_keys().into_iter().map(String::from).collect()
}

/// Reads keys straight from the stored JSON so records written by older
/// compilers stay readable.
fn stored_field_keys(config: &Value) -> Vec<String> {
    config
        .get("fields")
        .and_then(|v| v.as_array())
        .map(|fields| {
            fields
                .iter()
                .filter_map(|f| f.get("key").and_then(|k| k.as_str()).map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
