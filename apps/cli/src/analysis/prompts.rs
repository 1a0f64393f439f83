// Prompt constants for the analysis agents.

/// System prompt for job analysis — enforces JSON-only output.
pub const JOB_ANALYSIS_SYSTEM: &str =
    "You are an expert job description analyst. \
    Extract ONLY explicit requirements from job postings — never infer. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Job analysis prompt template.
/// Replace `{job_title}`, `{job_company}`, `{job_text}` before sending.
pub const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze this job posting and extract its explicit requirements.

Return a JSON object with this EXACT schema (no extra fields):
{
  "required_qualifications": {"Education / Experience": ["5+ years backend development"]},
  "key_responsibilities": {"Platform": ["Operate the internal platform"]},
  "technical_requirements": {
    "technical": ["Rust"],
    "management": [],
    "tools": ["Kubernetes"]
  },
  "soft_skills": {
    "interpersonal": ["Cross-team communication"],
    "organizational": [],
    "leadership": []
  },
  "preferences": {"Nice to have": ["Kafka"]}
}

Rules:
- required_qualifications and key_responsibilities group phrases under the
  section headings used in the posting.
- technical_requirements splits into technical (languages, concepts),
  management (people/process), and tools (named software).
- preferences holds nice-to-haves ("preferred", "bonus", "a plus") and may be
  omitted when the posting lists none.
- Copy phrases from the posting; do not paraphrase beyond trimming.

JOB POSTING:
Title: {job_title}
Company: {job_company}
Description:
{job_text}"#;

/// System prompt for ATS keyword extraction — enforces JSON-only output.
pub const ATS_SYSTEM: &str = "You are an ATS optimization analyst. \
    Extract and weight the keywords an applicant tracking system would filter on. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// ATS keyword prompt template. Replace `{job_title}`, `{job_text}`.
pub const ATS_PROMPT_TEMPLATE: &str = r#"Extract ATS keywords from this job posting.

Return a JSON object with this EXACT schema:
{
  "technical_keywords": [{"name": "Rust", "weight": 5}],
  "soft_skills": [{"name": "communication", "weight": 2}],
  "industry_terms": [{"name": "fintech", "weight": 1}],
  "certifications": [{"name": "CKA", "weight": 2}],
  "tools_and_technologies": [{"name": "Kubernetes", "weight": 3}]
}

Weights are integers 1-5:
- 5: appears in the title or is listed as required
- 3-4: appears in requirements or repeatedly in responsibilities
- 1-2: mentioned once, or only in the company/about section

Include every distinct keyword an ATS could filter on. A keyword belongs to
exactly one category.

JOB POSTING:
Title: {job_title}
{job_text}"#;
