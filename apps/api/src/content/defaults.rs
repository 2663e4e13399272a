//! Bundled default documents, used to seed storage on first load.

use serde_json::Value;

use crate::domain::Domain;

const PORTFOLIO_DEFAULT: &str = include_str!("../../data/portfolio-default.json");
const RESUME_DEFAULT: &str = include_str!("../../data/resume-default.json");

pub fn default_document(domain: Domain) -> Value {
    let raw = match domain {
        Domain::Portfolio => PORTFOLIO_DEFAULT,
        Domain::Resume => RESUME_DEFAULT,
    };
    serde_json::from_str(raw).expect("bundled default document is valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portfolio_default_has_expected_sections() {
        let doc = default_document(Domain::Portfolio);
        for section in ["personalInfo", "about", "projects", "skills", "experience", "education"] {
            assert!(doc.get(section).is_some(), "missing section {section}");
        }
    }

    #[test]
    fn test_resume_default_has_expected_sections() {
        let doc = default_document(Domain::Resume);
        for section in [
            "name",
            "title",
            "summary",
            "contact",
            "experience",
            "projects",
            "skills",
            "education",
            "additionalInfo",
        ] {
            assert!(doc.get(section).is_some(), "missing section {section}");
        }
    }

    #[test]
    fn test_resume_default_experience_has_achievements() {
        let doc = default_document(Domain::Resume);
        let first = &doc["experience"][0];
        assert!(first["achievements"].is_array());
    }
}
