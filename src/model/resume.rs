//! Structured resume fields.

use serde::{Deserialize, Serialize};

/// Best-effort structured view of a resume.
///
/// Every field except `raw` may be absent or empty. `raw` is always the
/// exact text handed to the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResume {
    /// Candidate name (first line, when it looks like one)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// First e-mail address found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// First phone number found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Skills from the first skills line
    pub skills: Vec<String>,

    /// Work experience entries, in document order
    pub experience: Vec<ExperienceEntry>,

    /// Education entries, in document order
    pub education: Vec<EducationEntry>,

    /// Input text, unmodified
    pub raw: String,
}

impl ParsedResume {
    /// Create an empty record around the given raw text.
    pub fn empty(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            ..Default::default()
        }
    }

    /// Check whether any structured field was found.
    pub fn has_structure(&self) -> bool {
        self.name.is_some()
            || self.email.is_some()
            || self.phone.is_some()
            || !self.skills.is_empty()
            || !self.experience.is_empty()
            || !self.education.is_empty()
    }
}

/// One line of work history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    /// Job title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Employer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Date range as written (e.g. "2019-2022")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,

    /// Free text following the date range on the same line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One line of education history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    /// Degree or qualification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,

    /// School or university
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,

    /// Date range as written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_resume() {
        let resume = ParsedResume::empty("text");
        assert_eq!(resume.raw, "text");
        assert!(!resume.has_structure());
    }

    #[test]
    fn test_resume_json_shape() {
        let resume = ParsedResume {
            email: Some("a@b.io".to_string()),
            experience: vec![ExperienceEntry {
                title: Some("Engineer".to_string()),
                date_range: Some("2020".to_string()),
                ..Default::default()
            }],
            ..ParsedResume::empty("raw")
        };

        let json = serde_json::to_string(&resume).unwrap();
        assert!(json.contains("\"dateRange\":\"2020\""));
        assert!(!json.contains("\"name\""));
        assert!(json.contains("\"skills\":[]"));
        assert!(resume.has_structure());
    }
}
