//! Candidate profile — the structured `about_me.yaml` document.
//!
//! Immutable once loaded. Every downstream stage borrows it; nothing in the
//! pipeline mutates a loaded profile.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalInformation {
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub contact: BTreeMap<String, String>,
    #[serde(default)]
    pub online_presence: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub employment_period: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub skills_acquired: Vec<String>,
}

/// Skills grouped the way the profile document groups them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillSet {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub management: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub date_obtained: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub year: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub language: String,
    #[serde(default)]
    pub level: String,
}

/// The full candidate profile document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub personal_information: PersonalInformation,
    #[serde(default)]
    pub professional_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub skills: SkillSet,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub languages: Vec<LanguageEntry>,
    #[serde(default)]
    pub work_preferences: BTreeMap<String, String>,
}

impl CandidateProfile {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.personal_information.name, self.personal_information.surname
        )
        .trim()
        .to_string()
    }

    /// All skills across categories, lowercased, for keyword matching.
    pub fn skill_index(&self) -> Vec<String> {
        self.skills
            .technical
            .iter()
            .chain(self.skills.management.iter())
            .chain(self.skills.soft.iter())
            .map(|s| s.to_lowercase())
            .collect()
    }

    /// Lowercased free text of every experience entry, one string per entry.
    /// Used for substring keyword matching with per-entry evidence.
    pub fn experience_texts(&self) -> Vec<(String, String)> {
        self.professional_experience
            .iter()
            .map(|exp| {
                let mut text = String::new();
                text.push_str(&exp.position);
                text.push(' ');
                text.push_str(&exp.industry);
                for r in &exp.responsibilities {
                    text.push(' ');
                    text.push_str(r);
                }
                for s in &exp.skills_acquired {
                    text.push(' ');
                    text.push_str(s);
                }
                (exp.company.clone(), text.to_lowercase())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_YAML: &str = r#"
personal_information:
  name: Ada
  surname: Lovelace
  contact:
    email: ada@example.com
    phone: "555-0100"
  online_presence:
    github: https://github.com/ada
professional_experience:
  - company: Analytical Engines Ltd
    position: Senior Engineer
    employment_period: "2020/01 - present"
    location: London
    industry: Computing
    responsibilities:
      - Designed the distributed job scheduler
      - Reduced batch latency by 40%
    skills_acquired:
      - Rust
      - Kubernetes
skills:
  technical:
    - Rust
    - PostgreSQL
  management:
    - Roadmap planning
  soft:
    - Mentoring
certifications:
  - name: CKA
    description: Certified Kubernetes Administrator
    date_obtained: "2023-04"
"#;

    #[test]
    fn test_profile_deserializes_from_yaml() {
        let profile: CandidateProfile = serde_yaml::from_str(PROFILE_YAML).unwrap();
        assert_eq!(profile.personal_information.name, "Ada");
        assert_eq!(profile.professional_experience.len(), 1);
        assert_eq!(profile.skills.technical.len(), 2);
        assert_eq!(profile.certifications[0].name, "CKA");
    }

    #[test]
    fn test_full_name_joins_name_and_surname() {
        let profile: CandidateProfile = serde_yaml::from_str(PROFILE_YAML).unwrap();
        assert_eq!(profile.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_missing_optional_sections_default_to_empty() {
        let minimal = r#"
personal_information:
  name: Grace
professional_experience:
  - company: Navy
    position: Programmer
"#;
        let profile: CandidateProfile = serde_yaml::from_str(minimal).unwrap();
        assert!(profile.skills.technical.is_empty());
        assert!(profile.certifications.is_empty());
        assert_eq!(profile.full_name(), "Grace");
    }

    #[test]
    fn test_skill_index_is_lowercased_across_categories() {
        let profile: CandidateProfile = serde_yaml::from_str(PROFILE_YAML).unwrap();
        let index = profile.skill_index();
        assert!(index.contains(&"rust".to_string()));
        assert!(index.contains(&"roadmap planning".to_string()));
        assert!(index.contains(&"mentoring".to_string()));
    }

    #[test]
    fn test_experience_texts_carry_company_evidence() {
        let profile: CandidateProfile = serde_yaml::from_str(PROFILE_YAML).unwrap();
        let texts = profile.experience_texts();
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].0, "Analytical Engines Ltd");
        assert!(texts[0].1.contains("distributed job scheduler"));
        assert!(texts[0].1.contains("kubernetes"));
    }
}
