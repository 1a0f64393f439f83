// Prompt constants for the LLM match-narrative backend.

/// System prompt for match narrative — enforces JSON-only output.
pub const MATCH_NARRATIVE_SYSTEM: &str = "You are a precise profile-match analyst. \
    Given a deterministic keyword partition, write the narrative assessment. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT change the matched/missing classification you are given.";

/// Match narrative prompt template.
/// Replace `{requirements_json}`, `{profile_json}`, `{partition_json}`.
pub const MATCH_NARRATIVE_PROMPT_TEMPLATE: &str = r#"Assess how this candidate fits the role.

The keyword partition below was computed deterministically and is the source
of truth for what matched. Base every claim on it and on the profile.

JOB REQUIREMENTS:
{requirements_json}

CANDIDATE PROFILE:
{profile_json}

KEYWORD PARTITION (authoritative):
{partition_json}

Return a JSON object with this EXACT schema:
{
  "key_strengths": ["one sentence per strength, grounded in matched keywords"],
  "areas_for_improvement": ["one sentence per gap, grounded in missing keywords"],
  "recommendations": ["concrete, actionable suggestions for this application"]
}

Rules:
- 3-5 entries per list.
- Reference only skills and experience present in the profile.
- Acknowledge gaps professionally; never suggest fabricating experience."#;
