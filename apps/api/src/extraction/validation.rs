//! Submission-time checks for extraction configs.
//!
//! These run before compilation. The compiler itself assumes a valid
//! config and never re-checks any of this.

use serde::{Deserialize, Serialize};

use crate::extraction::keys::{is_valid_field_key, normalize_label_to_key};
use crate::extraction::schema::{
    ExtractionConfig, V0_CONFIG_DESCRIPTION, V0_CONFIG_NAME, V1_CONFIG_DESCRIPTION, V1_CONFIG_NAME,
};

/// A required field must carry a default of at least this many characters.
pub const MIN_REQUIRED_DEFAULT_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigIssue {
    /// Dotted path into the config, e.g. `fields.2.default_value`.
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValidationResult {
    pub passed: bool,
    pub issues: Vec<ConfigIssue>,
}

impl ConfigValidationResult {
    /// All issues on one line, for error bodies and logs.
    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|i| format!("{}: {}", i.path, i.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Fills every empty key from its field's label. Returns how many keys were
/// derived. Fields that already carry a key are left untouched.
pub fn derive_missing_keys(config: &mut ExtractionConfig) -> usize {
    fn derive(key: &mut String, label: Option<&str>) -> bool {
        match label {
            Some(label) if key.is_empty() => {
                *key = normalize_label_to_key(label);
                true
            }
            _ => false,
        }
    }

    match config {
        ExtractionConfig::V0(c) => c
            .fields
            .iter_mut()
            .map(|f| derive(&mut f.key, f.label.as_deref()))
            .filter(|derived| *derived)
            .count(),
        ExtractionConfig::V1(c) => c
            .fields
            .iter_mut()
            .map(|f| derive(&mut f.key, f.label.as_deref()))
            .filter(|derived| *derived)
            .count(),
    }
}

/// Collects every rule violation rather than stopping at the first.
pub fn validate_config(config: &ExtractionConfig) -> ConfigValidationResult {
    let mut issues = Vec::new();

    let (name, description, expected_name, expected_description) = match config {
        ExtractionConfig::V0(c) => (&c.name, &c.description, V0_CONFIG_NAME, V0_CONFIG_DESCRIPTION),
        ExtractionConfig::V1(c) => (&c.name, &c.description, V1_CONFIG_NAME, V1_CONFIG_DESCRIPTION),
    };
    if name != expected_name {
        issues.push(issue("name", format!("must be \"{expected_name}\"")));
    }
    if description != expected_description {
        issues.push(issue("description", format!("must be \"{expected_description}\"")));
    }

    for (index, key) in config.field_keys().into_iter().enumerate() {
        if key.is_empty() {
            issues.push(issue(
                &format!("fields.{index}.key"),
                "is empty and no label was given to derive it from".to_string(),
            ));
        } else if !is_valid_field_key(key) {
            issues.push(issue(
                &format!("fields.{index}.key"),
                format!("'{key}' must be lowercase letters, digits, and single inner underscores"),
            ));
        }
    }

    match config {
        ExtractionConfig::V0(c) => {
            if c.fields.is_empty() {
                issues.push(issue("fields", "config should have at least 1 field".to_string()));
            }
            for (index, field) in c.fields.iter().enumerate() {
                if field.prompt.trim().is_empty() {
                    issues.push(issue(
                        &format!("fields.{index}.prompt"),
                        "cannot be empty".to_string(),
                    ));
                }
            }
        }
        ExtractionConfig::V1(c) => {
            for (index, field) in c.fields.iter().enumerate() {
                if field.required && field.default_value.chars().count() < MIN_REQUIRED_DEFAULT_LEN {
                    issues.push(issue(
                        &format!("fields.{index}.default_value"),
                        format!(
                            "required fields need a default of at least {MIN_REQUIRED_DEFAULT_LEN} characters"
                        ),
                    ));
                }
            }
        }
    }

    ConfigValidationResult {
        passed: issues.is_empty(),
        issues,
    }
}

fn issue(path: &str, message: String) -> ConfigIssue {
    ConfigIssue {
        path: path.to_string(),
        message,
    }
}
