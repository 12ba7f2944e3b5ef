//! Rule renderers — one line of instruction prose per rule.
//!
//! Optional parameters are rendered only when present. Display defaults
//! (`all`, group `0`, `proximity`, `first_occurrence`, whitespace) are
//! applied here and never written back into the stored rule.

use serde_json::Value;

use crate::extraction::schema::{
    DetectionRule, MappingRule, MatchTarget, SanitizationRule, SectionStrategy, ValidationRule,
};

/// Marker shown for a `trim` rule with no explicit character set.
pub const WHITESPACE_MARKER: &str = "\\s";

pub fn render_detection_rule(rule: &DetectionRule) -> String {
    match rule {
        DetectionRule::Regex(r) => {
            let target = r.target.unwrap_or_default();
            let plural = if target == MatchTarget::All { "es" } else { "" };
            format!(
                "Use regex `{}`{} to extract {} match{plural} (group {}).",
                r.pattern,
                flags_suffix(r.flags.as_deref()),
                target.as_str(),
                r.group.unwrap_or(0),
            )
        }
        DetectionRule::Keyword(k) => format!(
            "Look for keywords [{}] using {} within ±{} words.",
            k.keywords.join(", "),
            k.strategy.unwrap_or_default().as_str(),
            k.context_window.unwrap_or(0),
        ),
        DetectionRule::Section(s) => {
            let take = match s.extraction_strategy.unwrap_or_default() {
                SectionStrategy::FirstOccurrence => "first occurrence",
                SectionStrategy::MostRecent => "most recent",
            };
            format!(
                "In sections titled [{}], take the {take}.",
                s.section_headers.join(", ")
            )
        }
        DetectionRule::Custom(c) => c.prompt.clone(),
    }
}

pub fn render_validation_rule(rule: &ValidationRule) -> String {
    match rule {
        ValidationRule::Regex(r) => format!(
            "Must match regex `{}`{}.",
            r.pattern,
            else_suffix(r.error_message.as_deref())
        ),
        ValidationRule::Length(l) => {
            let mut line = String::from("Length must be");
            if let Some(min) = l.min {
                line.push_str(&format!(" ≥ {min}"));
            }
            if let Some(max) = l.max {
                line.push_str(&format!(" and ≤ {max}"));
            }
            line.push_str(&else_suffix(l.error_message.as_deref()));
            line.push('.');
            line
        }
        ValidationRule::AllowedValues(a) => format!(
            "Value must be one of [{}]{}.",
            join_values(&a.values),
            if a.case_sensitive == Some(true) {
                " (case-sensitive)"
            } else {
                ""
            }
        ),
        ValidationRule::Custom(c) => c.prompt.clone(),
    }
}

pub fn render_sanitization_rule(rule: &SanitizationRule) -> String {
    match rule {
        SanitizationRule::RegexReplace(r) => format!(
            "Replace `{}` → `{}`{}.",
            r.pattern,
            r.replacement,
            flags_suffix(r.flags.as_deref())
        ),
        SanitizationRule::Trim(t) => format!(
            "Trim characters [{}].",
            t.characters.as_deref().unwrap_or(WHITESPACE_MARKER)
        ),
        SanitizationRule::Format(f) => {
            let components: serde_json::Map<String, Value> = f
                .components
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            format!(
                "Format with template \"{}\", components {}.",
                f.template,
                Value::Object(components)
            )
        }
        SanitizationRule::Custom(c) => c.prompt.clone(),
    }
}

/// `map [<sources>] → <target as JSON>`
pub fn render_mapping(rule: &MappingRule) -> String {
    format!("map [{}] → {}", join_values(&rule.source), rule.target)
}

fn flags_suffix(flags: Option<&str>) -> String {
    match flags {
        Some(f) if !f.is_empty() => format!(" with flags `{f}`"),
        _ => String::new(),
    }
}

fn else_suffix(message: Option<&str>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!("; else: \"{m}\""),
        _ => String::new(),
    }
}

/// Strings render bare, null renders empty, everything else as JSON.
fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
