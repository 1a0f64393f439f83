//! Profile matching — compares the candidate profile against the analyzer
//! output and produces the match report consumed by both generators.

pub mod prompts;
pub mod scorer;

use serde::{Deserialize, Serialize};

/// A keyword from the ATS inventory covered by the profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedKeyword {
    pub keyword: String,
    /// Which part of the profile covers it.
    pub evidence: String,
    /// 1.0 exact skill/certification match, 0.6 experience-text match.
    pub strength: f32,
    pub weight: u32,
}

/// A keyword from the ATS inventory the profile does not cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingKeyword {
    pub keyword: String,
    pub weight: u32,
}

/// Full match report. `matched` and `missing` together partition the
/// flattened ATS keyword inventory — the scorer guarantees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// 0-100 weighted keyword coverage.
    pub score: u32,
    pub matched: Vec<MatchedKeyword>,
    pub missing: Vec<MissingKeyword>,
    pub key_strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommendations: Vec<String>,
    /// "keyword" | "llm" — which backend produced the narrative fields.
    pub scorer_backend: String,
}

impl MatchResult {
    /// Missing keywords ordered by descending weight — the gap list the
    /// cover letter addresses.
    pub fn top_gaps(&self, n: usize) -> Vec<&MissingKeyword> {
        let mut gaps: Vec<&MissingKeyword> = self.missing.iter().collect();
        gaps.sort_by(|a, b| b.weight.cmp(&a.weight));
        gaps.truncate(n);
        gaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_gaps_orders_by_weight() {
        let result = MatchResult {
            score: 50,
            matched: vec![],
            missing: vec![
                MissingKeyword {
                    keyword: "kafka".to_string(),
                    weight: 2,
                },
                MissingKeyword {
                    keyword: "rust".to_string(),
                    weight: 5,
                },
                MissingKeyword {
                    keyword: "grpc".to_string(),
                    weight: 3,
                },
            ],
            key_strengths: vec![],
            areas_for_improvement: vec![],
            recommendations: vec![],
            scorer_backend: "keyword".to_string(),
        };

        let gaps = result.top_gaps(2);
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].keyword, "rust");
        assert_eq!(gaps[1].keyword, "grpc");
    }
}
