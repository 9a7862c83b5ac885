// Shared prompt fragments sent with every model call.
// Task-specific templates live in skills/prompts.rs.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured career assistant. \
    You MUST respond with valid JSON only (a single JSON object or array). \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
