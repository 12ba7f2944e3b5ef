// Fixed prose for the extraction prompt compilers.
// Each config version owns its own wording; changing a constant changes the
// compiler's output for new configs only, persisted prompts keep their text.

/// Token the caller swaps for the resume text before sending the prompt.
pub const RESUME_CONTENT_PLACEHOLDER: &str = "{{resume_content}}";

// ────────────────────────────────────────────────────────────────────────────
// v0 — one free-text instruction per field
// ────────────────────────────────────────────────────────────────────────────

pub const V0_ROLE: &str = "You are an expert resume data extractor with deep expertise in \
    structured information parsing and data normalization.";

pub const V0_CONTEXT: &str = "You will be provided with a resume text that needs precise \
    information extraction according to strict formatting rules. \
    The extracted data must maintain professional terminology standards and comply with \
    technical validation requirements.";

pub const V0_ACTION: &str = "Analyze the resume text with maximum attention to detail and \
    extract specified fields in exact required formats. \
    Return ONLY a strictly valid JSON object following all rules and without any explanatory text.";

pub const V0_RULES: [&str; 6] = [
    "1. Output MUST be STRICTLY a valid JSON with exact field names from specification with no extra text",
    "2. Validate and normalize ALL values before inclusion",
    "3. Handle ambiguous cases using priority: explicit mentions > contextual inference > null",
    "4. Clean data: Remove special characters, formatting artifacts, and non-printable characters",
    "5. Maintain case sensitivity as specified in field examples",
    "6. Return null for: Missing data, unparseable values, or failed validation",
];

// ────────────────────────────────────────────────────────────────────────────
// v1 — rule pipeline per field
// ────────────────────────────────────────────────────────────────────────────

pub const V1_ROLE: &str = "You are an expert resume parser and data-extraction engine, with \
    deep experience in information extraction, data normalization, and schema-driven validation.";

pub const V1_CONTEXT: &str = "You will receive a plain-text resume. Your goal is to extract \
    every field defined below, applying detection, then validation, then sanitization, so that \
    the final output is a strictly valid JSON object conforming exactly to the specified output schema.";

pub const V1_ACTION: &str = "Analyze the resume with maximum precision. For each field, run all \
    detection rules in order, validate each candidate value, apply sanitization rules, then \
    normalization mappings. Finally, return ONLY the JSON object with no additional text or commentary.";

pub const V1_INSTRUCTIONS: &str = "Extract and process each field in this exact sequence: \
    detection → validation → sanitization → normalization. \
    Return exactly the JSON object below with no extra text.";
