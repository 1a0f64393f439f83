#![allow(dead_code)]

// Cross-cutting prompt fragments. Each agent defines its own prompts.rs
// alongside it; this file holds only the pieces shared by every contract.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every content-producing prompt.
pub const TRUTHFULNESS_INSTRUCTION: &str = "\
    CRITICAL: Only reference skills, achievements, and experience explicitly \
    present in the candidate profile. Do NOT infer, interpolate, or invent \
    details. Be precise about the candidate's actual level of involvement. \
    If the profile does not support a claim, omit it entirely.";
