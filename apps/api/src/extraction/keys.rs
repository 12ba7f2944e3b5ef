//! Field key derivation — turns a human-entered label into the JSON property
//! name the extraction engine must return.
//!
//! Keys match `^[a-z0-9_]*$` with no leading, trailing, or doubled `_`.
//! Normalization is deterministic and idempotent. It is NOT injective:
//! `find_key_collisions` reports keys shared by more than one field.

use serde::{Deserialize, Serialize};

/// Normalizes a label into a field key.
///
/// Steps, in this order:
/// 1. trim surrounding whitespace (`\s` set, see `is_label_whitespace`), lowercase
/// 2. replace each whitespace run with a single `_`
/// 3. drop every character outside `[a-z0-9_]`
/// 4. collapse `_` runs
/// 5. collapse `-` runs (no-op while step 3 drops `-`)
/// 6. strip leading and trailing `_`
pub fn normalize_label_to_key(label: &str) -> String {
    let lowered = label.trim_matches(is_label_whitespace).to_lowercase();

    let mut underscored = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if is_label_whitespace(c) {
            if !in_whitespace {
                underscored.push('_');
            }
            in_whitespace = true;
        } else {
            underscored.push(c);
            in_whitespace = false;
        }
    }

    let kept: String = underscored.chars().filter(|c| is_key_char(*c)).collect();
    let collapsed = collapse_runs(&collapse_runs(&kept, '_'), '-');

    collapsed.trim_matches('_').to_string()
}

/// Whitespace as form clients' regex `\s` sees it: Unicode White_Space
/// minus NEL (U+0085), plus the BOM (U+FEFF).
fn is_label_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// True when `key` is already in normalized form.
pub fn is_valid_field_key(key: &str) -> bool {
    key.chars().all(is_key_char)
        && !key.starts_with('_')
        && !key.ends_with('_')
        && !key.contains("__")
}

fn is_key_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_')
}

fn collapse_runs(input: &str, target: char) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous = None;
    for c in input.chars() {
        if c == target && previous == Some(target) {
            continue;
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

/// A key used by more than one field in the same config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCollision {
    pub key: String,
    /// Positions of the colliding fields, ascending.
    pub field_indices: Vec<usize>,
}

/// Reports every key that appears more than once, ordered by first use.
/// Advisory only: duplicate keys collapse into one property of the output
/// template, so the extractor returns a single value for them.
pub fn find_key_collisions<'a, I>(keys: I) -> Vec<KeyCollision>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut collisions: Vec<KeyCollision> = Vec::new();
    let mut seen: Vec<(&'a str, usize)> = Vec::new();

    for (index, key) in keys.into_iter().enumerate() {
        let first_use = seen.iter().find(|(k, _)| *k == key).map(|(_, i)| *i);
        let Some(first) = first_use else {
            seen.push((key, index));
            continue;
        };
        if let Some(existing) = collisions.iter_mut().find(|c| c.key == key) {
            existing.field_indices.push(index);
        } else {
            collisions.push(KeyCollision {
                key: key.to_string(),
                field_indices: vec![first, index],
            });
        }
    }

    collisions
}
