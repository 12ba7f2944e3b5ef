#![allow(dead_code)]

//! Extraction prompt compiler — turns a config into the instruction document
//! handed to the external extraction engine.
//!
//! Pure and deterministic: the same config (same field order) always yields
//! byte-identical output. Prompts are compiled once when a config is created
//! and stored; nothing here is re-run on read.

use serde_json::{Map, Value};
use tracing::debug;

use crate::extraction::prompts::{
    RESUME_CONTENT_PLACEHOLDER, V0_ACTION, V0_CONTEXT, V0_ROLE, V0_RULES, V1_ACTION, V1_CONTEXT,
    V1_INSTRUCTIONS, V1_ROLE,
};
use crate::extraction::rules::{
    render_detection_rule, render_mapping, render_sanitization_rule, render_validation_rule,
};
use crate::extraction::schema::{
    ConfigError, ExtractionConfig, Normalization, OutputSchema, V0Config, V0Field, V1Config,
    V1Field,
};

/// Compiles any config version into its prompt.
pub fn generate_extraction_prompt(config: &ExtractionConfig) -> String {
    debug!(
        "Compiling {} extraction prompt for {} fields",
        config.version().as_str(),
        config.field_count()
    );
    match config {
        ExtractionConfig::V0(c) => compile_v0(c),
        ExtractionConfig::V1(c) => compile_v1(c),
    }
}

/// Compiles an untyped config. An unknown `version` tag is an error naming
/// the tag, never an empty prompt.
pub fn compile_config_value(value: Value) -> Result<String, ConfigError> {
    let config = ExtractionConfig::from_value(value)?;
    Ok(generate_extraction_prompt(&config))
}

/// Substitutes the resume text into a compiled prompt.
pub fn fill_resume_content(prompt: &str, resume_text: &str) -> String {
    prompt.replace(RESUME_CONTENT_PLACEHOLDER, resume_text)
}

// ────────────────────────────────────────────────────────────────────────────
// v0
// ────────────────────────────────────────────────────────────────────────────

pub fn compile_v0(config: &V0Config) -> String {
    let field_instructions = config
        .fields
        .iter()
        .map(v0_field_instruction)
        .collect::<Vec<_>>()
        .join("\n\n");

    let template: Map<String, Value> = config
        .fields
        .iter()
        .map(|f| (f.key.clone(), Value::String(String::new())))
        .collect();

    let mut prompt = String::new();
    prompt.push_str(&format!("Role: {V0_ROLE}\n\n"));
    prompt.push_str(&format!("Context: {V0_CONTEXT}\n\n"));
    prompt.push_str(&format!("Action: {V0_ACTION}\n\n"));
    prompt.push_str("INSTRUCTIONS:\n\n");
    prompt.push_str(&format!("EXTRACT THESE FIELDS:\n{field_instructions}\n\n"));
    prompt.push_str(&format!("RULES:\n{}\n\n", V0_RULES.join("\n")));
    prompt.push_str(&format!(
        "STRICT OUTPUT FORMAT:\n{:#}\n\n",
        Value::Object(template)
    ));
    prompt.push_str("RESUME TEXT:\n");
    prompt.push_str(RESUME_CONTENT_PLACEHOLDER);
    prompt.push('\n');
    prompt
}

fn v0_field_instruction(field: &V0Field) -> String {
    let label = field.label.as_deref().unwrap_or(&field.key);
    format!(
        "• {label}:\n   - {}\n   - Example: {}",
        field.prompt,
        field.example.as_deref().unwrap_or("null")
    )
}

// ────────────────────────────────────────────────────────────────────────────
// v1
// ────────────────────────────────────────────────────────────────────────────

pub fn compile_v1(config: &V1Config) -> String {
    let field_instructions = config
        .fields
        .iter()
        .map(v1_field_block)
        .collect::<Vec<_>>()
        .join("\n\n");

    let template: Map<String, Value> = config
        .fields
        .iter()
        .map(|f| {
            let value = if f.default_value.is_empty() {
                Value::Null
            } else {
                Value::String(f.default_value.clone())
            };
            (f.key.clone(), value)
        })
        .collect();

    [
        format!("Role:\n{V1_ROLE}"),
        format!("Context:\n{V1_CONTEXT}"),
        format!("Action:\n{V1_ACTION}"),
        format!("Instructions:\n{V1_INSTRUCTIONS}\n\nFields to extract:\n{field_instructions}"),
        format!(
            "Strict output format:\n```json\n{:#}\n```",
            Value::Object(template)
        ),
        format!("Resume text:\n{RESUME_CONTENT_PLACEHOLDER}"),
    ]
    .join("\n\n")
}

fn v1_field_block(field: &V1Field) -> String {
    let mut lines = Vec::new();

    let label = field.label.as_deref().unwrap_or(&field.key);
    lines.push(format!("• **{label}** (`{}`)", field.key));
    // form clients send "" for untouched description/note
    if let Some(description) = non_empty(&field.description) {
        lines.push(format!("  – Description: {description}"));
    }
    if let Some(note) = non_empty(&field.note) {
        lines.push(format!("  – Note: {note}"));
    }

    if let Some(schema) = &field.detection_schema {
        lines.push("  – Detection rules:".to_string());
        lines.extend(
            schema
                .rules
                .iter()
                .map(|r| format!("    – {}", render_detection_rule(r))),
        );
    }
    if let Some(schema) = &field.validation_schema {
        lines.push("  – Validation rules:".to_string());
        lines.extend(
            schema
                .rules
                .iter()
                .map(|r| format!("    – {}", render_validation_rule(r))),
        );
    }
    if let Some(schema) = &field.sanitization_schema {
        lines.push("  – Sanitization rules:".to_string());
        lines.extend(
            schema
                .rules
                .iter()
                .map(|r| format!("    – {}", render_sanitization_rule(r))),
        );
    }

    lines.push(format!("  – Required: {}", field.required));
    lines.push(format!("  – Default: {}", field.default_value));

    if let Some(output) = &field.output_schema {
        push_output_schema(&mut lines, output);
    }

    lines.join("\n")
}

fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.is_empty())
}

fn push_output_schema(lines: &mut Vec<String>, output: &OutputSchema) {
    lines.push("  – Output schema:".to_string());
    lines.push(format!("    • Type: {}", output.data_type.as_str()));
    if let Some(format) = output.format {
        lines.push(format!("    • Format: {}", format.as_str()));
    }
    if let Some(cardinality) = output.cardinality {
        lines.push(format!("    • Cardinality: {}", cardinality.as_str()));
    }
    if let Some(examples) = &output.examples {
        lines.push(format!("    • Examples: {}", examples.join(", ")));
    }
    match &output.normalization {
        Some(Normalization::Mapping(rule)) => {
            lines.push(format!("    • Normalization: {}", render_mapping(rule)));
        }
        None => {}
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::extraction::schema::V1Field;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn v0_compilation_is_deterministic(
            prompts in prop::collection::vec("[A-Za-z ]{1,30}", 1..6)
        ) {
            let fields = prompts
                .iter()
                .enumerate()
                .map(|(i, p)| V0Field {
                    key: format!("field_{i}"),
                    label: None,
                    prompt: p.clone(),
                    example: None,
                })
                .collect();
            let config = ExtractionConfig::V0(V0Config::new(fields));
            prop_assert_eq!(generate_extraction_prompt(&config), generate_extraction_prompt(&config));
        }

        #[test]
        fn v1_template_holds_every_key(
            defaults in prop::collection::vec("[a-z]{0,6}", 1..6)
        ) {
            let fields: Vec<V1Field> = defaults
                .iter()
                .enumerate()
                .map(|(i, d)| V1Field::new(format!("key_{i}"), false, d.clone()))
                .collect();
            let prompt = compile_v1(&V1Config::new(fields));
            for (i, d) in defaults.iter().enumerate() {
                let expected = if d.is_empty() {
                    format!("\"key_{i}\": null")
                } else {
                    format!("\"key_{i}\": \"{d}\"")
                };
                prop_assert!(prompt.contains(&expected));
            }
        }
    }
}
