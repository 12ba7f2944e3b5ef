#![allow(dead_code)]

//! Extraction config schema — the versioned, declarative description of
//! which fields to pull out of a resume and how.
//!
//! Every union here is closed. Adding a rule variant or a config version is
//! the only way the schema evolves, and the renderers in `rules.rs` and the
//! compilers in `compiler.rs` match every variant without a wildcard arm,
//! so a new variant does not build until each of them handles it.
//!
//! Wire shape: configs are tagged by `version`; rules are
//! `{"type": "...", "rule": {...}}`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const V0_CONFIG_NAME: &str = "Simple Config";
pub const V0_CONFIG_DESCRIPTION: &str = "Basic resume extraction config";
pub const V1_CONFIG_NAME: &str = "Detailed Config";
pub const V1_CONFIG_DESCRIPTION: &str = "Detailed resume extraction config";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("extraction config has no version tag")]
    MissingVersion,

    #[error("unsupported extraction config version '{0}'")]
    UnsupportedVersion(String),

    #[error("malformed extraction config: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[serde(rename = "v0")]
    V0,
    #[serde(rename = "v1")]
    V1,
}

impl ConfigVersion {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "v0" => Some(ConfigVersion::V0),
            "v1" => Some(ConfigVersion::V1),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigVersion::V0 => "v0",
            ConfigVersion::V1 => "v1",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Configs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "version")]
pub enum ExtractionConfig {
    #[serde(rename = "v0")]
    V0(V0Config),
    #[serde(rename = "v1")]
    V1(V1Config),
}

impl ExtractionConfig {
    /// Parses an untyped config, failing loudly on an unknown `version` tag
    /// instead of letting it fall through to a generic serde error.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value.get("version") {
            None | Some(Value::Null) => return Err(ConfigError::MissingVersion),
            Some(Value::String(tag)) => {
                if ConfigVersion::from_tag(tag).is_none() {
                    return Err(ConfigError::UnsupportedVersion(tag.clone()));
                }
            }
            Some(other) => return Err(ConfigError::UnsupportedVersion(other.to_string())),
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn version(&self) -> ConfigVersion {
        match self {
            ExtractionConfig::V0(_) => ConfigVersion::V0,
            ExtractionConfig::V1(_) => ConfigVersion::V1,
        }
    }

    /// Field keys in declaration order — the key set of the output template.
    pub fn field_keys(&self) -> Vec<&str> {
        match self {
            ExtractionConfig::V0(c) => c.fields.iter().map(|f| f.key.as_str()).collect(),
            ExtractionConfig::V1(c) => c.fields.iter().map(|f| f.key.as_str()).collect(),
        }
    }

    pub fn field_count(&self) -> usize {
        match self {
            ExtractionConfig::V0(c) => c.fields.len(),
            ExtractionConfig::V1(c) => c.fields.len(),
        }
    }
}

/// Single free-text instruction per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V0Config {
    #[serde(default = "default_v0_name")]
    pub name: String,
    #[serde(default = "default_v0_description")]
    pub description: String,
    pub fields: Vec<V0Field>,
}

impl V0Config {
    pub fn new(fields: Vec<V0Field>) -> Self {
        Self {
            name: default_v0_name(),
            description: default_v0_description(),
            fields,
        }
    }
}

/// Rule-driven config: detection → validation → sanitization → normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Config {
    #[serde(default = "default_v1_name")]
    pub name: String,
    #[serde(default = "default_v1_description")]
    pub description: String,
    pub fields: Vec<V1Field>,
}

impl V1Config {
    pub fn new(fields: Vec<V1Field>) -> Self {
        Self {
            name: default_v1_name(),
            description: default_v1_description(),
            fields,
        }
    }
}

fn default_v0_name() -> String {
    V0_CONFIG_NAME.to_string()
}

fn default_v0_description() -> String {
    V0_CONFIG_DESCRIPTION.to_string()
}

fn default_v1_name() -> String {
    V1_CONFIG_NAME.to_string()
}

fn default_v1_description() -> String {
    V1_CONFIG_DESCRIPTION.to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Fields
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V0Field {
    /// Empty until derived from `label` at submission time.
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct V1Field {
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub required: bool,
    pub default_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_schema: Option<RuleSchema<DetectionRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_schema: Option<RuleSchema<ValidationRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanitization_schema: Option<RuleSchema<SanitizationRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,
}

impl V1Field {
    /// A field with no rule blocks and no output schema.
    pub fn new(key: impl Into<String>, required: bool, default_value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
            description: None,
            note: None,
            required,
            default_value: default_value.into(),
            detection_schema: None,
            validation_schema: None,
            sanitization_schema: None,
            output_schema: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSchema<R> {
    pub rules: Vec<R>,
}

impl<R> RuleSchema<R> {
    pub fn new(rules: Vec<R>) -> Self {
        Self { rules }
    }
}

/// Free-form instruction, shared by every rule family's `custom` variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRule {
    pub prompt: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Detection rules
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "rule", rename_all = "snake_case")]
pub enum DetectionRule {
    Regex(RegexDetection),
    Keyword(KeywordDetection),
    Section(SectionDetection),
    Custom(CustomRule),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexDetection {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<MatchTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTarget {
    #[default]
    All,
    First,
    Last,
}

impl MatchTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTarget::All => "all",
            MatchTarget::First => "first",
            MatchTarget::Last => "last",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDetection {
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<KeywordStrategy>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordStrategy {
    #[default]
    Proximity,
    Section,
}

impl KeywordStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordStrategy::Proximity => "proximity",
            KeywordStrategy::Section => "section",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDetection {
    pub section_headers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_strategy: Option<SectionStrategy>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStrategy {
    #[default]
    FirstOccurrence,
    MostRecent,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation rules
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "rule", rename_all = "snake_case")]
pub enum ValidationRule {
    Regex(RegexValidation),
    Length(LengthValidation),
    AllowedValues(AllowedValuesValidation),
    Custom(CustomRule),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexValidation {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthValidation {
    /// Any JSON number; fractional bounds are rendered as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowedValuesValidation {
    /// Any JSON scalar; rendered as the extractor would read it.
    pub values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
}

// ────────────────────────────────────────────────────────────────────────────
// Sanitization rules
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "rule", rename_all = "snake_case")]
pub enum SanitizationRule {
    RegexReplace(RegexReplaceSanitization),
    Trim(TrimSanitization),
    Format(FormatSanitization),
    Custom(CustomRule),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexReplaceSanitization {
    pub pattern: String,
    pub replacement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimSanitization {
    /// `None` means whitespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatSanitization {
    pub template: String,
    /// Insertion order is kept so the rendered object matches what was entered.
    pub components: IndexMap<String, String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Output schema
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSchema {
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<Cardinality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalization: Option<Normalization>,
}

impl OutputSchema {
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            format: None,
            cardinality: None,
            examples: None,
            normalization: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Number,
    Array,
    Object,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Array => "array",
            DataType::Object => "object",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Email,
    Phone,
    Url,
    Text,
    Custom,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Email => "email",
            OutputFormat::Phone => "phone",
            OutputFormat::Url => "url",
            OutputFormat::Text => "text",
            OutputFormat::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    Single,
    Multiple,
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::Single => "single",
            Cardinality::Multiple => "multiple",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "rule", rename_all = "snake_case")]
pub enum Normalization {
    Mapping(MappingRule),
}

/// Every value in `source` is rewritten to `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRule {
    pub source: Vec<Value>,
    #[serde(default)]
    pub target: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_v0_config_deserializes_with_constants() {
        let value = json!({
            "version": "v0",
            "name": "Simple Config",
            "description": "Basic resume extraction config",
            "fields": [
                {"key": "phone", "label": "Phone", "prompt": "Extract the phone number"}
            ]
        });
        let config = ExtractionConfig::from_value(value).unwrap();
        let ExtractionConfig::V0(v0) = config else {
            panic!("expected v0 config");
        };
        assert_eq!(v0.name, V0_CONFIG_NAME);
        assert_eq!(v0.fields[0].key, "phone");
        assert_eq!(v0.fields[0].example, None);
    }

    #[test]
    fn test_missing_name_and_description_take_constants() {
        let config: ExtractionConfig =
            serde_json::from_value(json!({"version": "v1", "fields": []})).unwrap();
        let ExtractionConfig::V1(v1) = config else {
            panic!("expected v1 config");
        };
        assert_eq!(v1.name, V1_CONFIG_NAME);
        assert_eq!(v1.description, V1_CONFIG_DESCRIPTION);
    }

    #[test]
    fn test_rules_use_type_and_rule_envelope() {
        let value = json!({
            "version": "v1",
            "fields": [{
                "key": "email",
                "required": true,
                "default_value": "none",
                "detection_schema": {"rules": [
                    {"type": "regex", "rule": {"pattern": "\\S+@\\S+", "target": "first"}},
                    {"type": "keyword", "rule": {"keywords": ["email"], "strategy": "section"}},
                    {"type": "section", "rule": {"section_headers": ["Contact"], "extraction_strategy": "most_recent"}},
                    {"type": "custom", "rule": {"prompt": "Prefer work email"}}
                ]},
                "validation_schema": {"rules": [
                    {"type": "allowed_values", "rule": {"values": ["a", 1, true]}}
                ]},
                "sanitization_schema": {"rules": [
                    {"type": "regex_replace", "rule": {"pattern": "\\s", "replacement": ""}},
                    {"type": "format", "rule": {"template": "{u}@{d}", "components": {"u": "user", "d": "domain"}}}
                ]},
                "output_schema": {
                    "data_type": "string",
                    "format": "email",
                    "normalization": {"type": "mapping", "rule": {"source": ["N/A"], "target": null}}
                }
            }]
        });
        let config = ExtractionConfig::from_value(value).unwrap();
        let ExtractionConfig::V1(v1) = &config else {
            panic!("expected v1 config");
        };
        let field = &v1.fields[0];
        let detection = &field.detection_schema.as_ref().unwrap().rules;
        assert_eq!(detection.len(), 4);
        assert!(matches!(
            &detection[0],
            DetectionRule::Regex(RegexDetection { target: Some(MatchTarget::First), group: None, .. })
        ));
        assert!(matches!(
            &detection[2],
            DetectionRule::Section(SectionDetection {
                extraction_strategy: Some(SectionStrategy::MostRecent),
                ..
            })
        ));
        let output = field.output_schema.as_ref().unwrap();
        assert_eq!(output.format, Some(OutputFormat::Email));
        assert!(matches!(output.normalization, Some(Normalization::Mapping(_))));

        // Stored form round-trips unchanged.
        let stored = serde_json::to_value(&config).unwrap();
        assert_eq!(ExtractionConfig::from_value(stored).unwrap(), config);
    }

    #[test]
    fn test_unknown_version_is_named_in_error() {
        let err = ExtractionConfig::from_value(json!({"version": "v2", "fields": []})).unwrap_err();
        assert!(matches!(&err, ConfigError::UnsupportedVersion(tag) if tag == "v2"));
        assert!(err.to_string().contains("'v2'"));
    }

    #[test]
    fn test_non_string_version_is_unsupported() {
        let err = ExtractionConfig::from_value(json!({"version": 1, "fields": []})).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion(tag) if tag == "1"));
    }

    #[test]
    fn test_missing_version() {
        let err = ExtractionConfig::from_value(json!({"fields": []})).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVersion));
    }

    #[test]
    fn test_numeric_rule_parameters_accept_any_json_number() {
        let detection: DetectionRule = serde_json::from_value(json!({
            "type": "regex",
            "rule": {"pattern": "x", "group": -1}
        }))
        .unwrap();
        assert!(matches!(detection, DetectionRule::Regex(RegexDetection { group: Some(-1), .. })));

        let length: ValidationRule = serde_json::from_value(json!({
            "type": "length",
            "rule": {"min": 2.5, "max": 10}
        }))
        .unwrap();
        let ValidationRule::Length(length) = length else {
            panic!("expected length rule");
        };
        assert_eq!(length.min, Some(2.5));
        assert_eq!(length.max, Some(10.0));
    }

    #[test]
    fn test_fractional_keyword_window_is_malformed() {
        let value = json!({
            "version": "v1",
            "fields": [{
                "key": "x",
                "required": false,
                "default_value": "",
                "detection_schema": {"rules": [
                    {"type": "keyword", "rule": {"keywords": ["a"], "context_window": 1.5}}
                ]}
            }]
        });
        assert!(matches!(
            ExtractionConfig::from_value(value),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn test_unknown_rule_type_is_malformed() {
        let value = json!({
            "version": "v1",
            "fields": [{
                "key": "x",
                "required": false,
                "default_value": "",
                "detection_schema": {"rules": [{"type": "fuzzy", "rule": {}}]}
            }]
        });
        let err = ExtractionConfig::from_value(value).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn test_field_keys_follow_declaration_order() {
        let config = ExtractionConfig::V1(V1Config::new(vec![
            V1Field::new("zeta", false, ""),
            V1Field::new("alpha", false, ""),
        ]));
        assert_eq!(config.field_keys(), vec!["zeta", "alpha"]);
        assert_eq!(config.version().as_str(), "v1");
    }
}
