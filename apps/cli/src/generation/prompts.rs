// Prompt constants for the generation agents.
// Cross-cutting fragments live in llm_client::prompts.

/// System prompt for experience rewriting — enforces JSON-only output.
pub const ENHANCE_SYSTEM: &str = "You are an expert resume writer rewriting work-experience \
    bullets toward a specific job while maintaining strict truthfulness. \
    You MUST respond with valid JSON only — a JSON array, one object per input entry. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences. \
    Do NOT invent facts not present in the original entries.";

/// Experience rewriting prompt template.
/// Replace `{truthfulness}`, `{experiences_json}`, `{requirements_json}`,
/// `{keywords_json}`.
pub const ENHANCE_PROMPT_TEMPLATE: &str = r#"{truthfulness}

Rewrite these work-experience entries toward the target job.

ORIGINAL ENTRIES (source of truth — ONLY use facts from these):
{experiences_json}

TARGET JOB REQUIREMENTS:
{requirements_json}

ATS KEYWORDS to incorporate naturally where the original facts support them
(do NOT keyword-stuff):
{keywords_json}

Return a JSON ARRAY with EXACTLY one object per input entry, in the same
order:
[
  {
    "responsibilities": ["Rewritten bullet with quantified impact"],
    "skills_acquired": ["Rust", "Kubernetes"]
  }
]

HARD RULES:
1. One output object per input entry — never merge, drop, or add entries
2. Only highlight skills and achievements explicitly mentioned in the entry
3. Use precise language that reflects the actual level of involvement
4. Keep quantified results from the originals; never invent numbers
5. Current role: present tense. Past roles: past tense
6. Incorporate ATS keywords only where the original facts support them"#;

/// System prompt for the resume summary pass.
pub const SUMMARY_SYSTEM: &str = "You are an expert resume writer. \
    Generate a concise first-person professional summary, 3-4 sentences maximum. \
    You MUST respond with valid JSON only: {\"summary\": \"...\"}. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Summary prompt template.
/// Replace `{resume_json}`, `{requirements_json}`, `{strengths_json}`.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Write a concise first-person summary (3-4 sentences) that honestly represents this candidate for the target role.

RESUME:
{resume_json}

TARGET JOB REQUIREMENTS:
{requirements_json}

MATCH STRENGTHS to lead with:
{strengths_json}

Rules:
1. First-person perspective ("I have", "my experience")
2. Be honest about experience levels; never overstate
3. Lead with the strengths listed above
4. No buzzword padding

Return a JSON object with a single field "summary"."#;

/// System prompt for cover letter generation — enforces JSON-only output.
pub const COVER_LETTER_SYSTEM: &str = "You are a professional cover letter writer. \
    Write based on the candidate's actual experience only. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Cover letter prompt template.
/// Replace `{company}`, `{job_title}`, `{gaps}`, `{profile_json}`,
/// `{requirements_json}`, `{match_json}`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a cover letter for this application.

Company: {company}
Role: {job_title}

CANDIDATE PROFILE:
{profile_json}

JOB REQUIREMENTS:
{requirements_json}

MATCH REPORT (score, matched and missing keywords, strengths, gaps):
{match_json}

GAP AREAS TO ADDRESS PROFESSIONALLY: {gaps}

Return a JSON object with this EXACT schema:
{
  "greeting": "Dear Hiring Team,",
  "opening_paragraph": "...",
  "body_paragraphs": ["...", "..."],
  "closing_paragraph": "...",
  "signature": "Sincerely,\nFull Name",
  "keywords_used": ["..."]
}

Rules:
1. First-person perspective
2. Only reference skills and experience explicitly shown in the profile
3. Be clear about experience levels ("developing", "experienced in")
4. Address the key job requirements directly
5. Acknowledge the gap areas professionally — position them as growth areas
   with transferable foundations, never deny or hide them
6. 2-3 body paragraphs, each tight and specific
7. List every ATS keyword you used in keywords_used"#;
