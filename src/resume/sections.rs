//! Experience/education section state machine.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{EducationEntry, ExperienceEntry};

static EXPERIENCE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:work\s+)?experience").unwrap());

static EDUCATION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^education|degree|university|bachelor|master").unwrap());

// <field-A> <dash> <field-B> (<year>...)<rest>
static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+[-–—@]\s+(.+?)\s*\((\d{4}[^)]*)\)(.*)$").unwrap()
});

/// Which section the parser is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    /// Before any recognized header
    #[default]
    None,
    /// Work experience
    Experience,
    /// Education
    Education,
}

/// The parts of one `A - B (date)` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLine<'a> {
    /// Text before the dash (title or degree)
    pub primary: &'a str,
    /// Text between the dash and the date (company or institution)
    pub secondary: &'a str,
    /// Text inside the date parentheses, starting with a year
    pub date_range: &'a str,
    /// Anything after the closing parenthesis
    pub trailing: &'a str,
}

/// Classify a line as a section header.
///
/// Experience headers are tested first.
pub fn classify_header(line: &str) -> Option<Section> {
    if EXPERIENCE_HEADER.is_match(line) {
        Some(Section::Experience)
    } else if EDUCATION_HEADER.is_match(line) {
        Some(Section::Education)
    } else {
        None
    }
}

/// Split a line of the form `A - B (2019-2022)`.
///
/// The dash may be `-`, `–`, `—` or `@` and must have whitespace on both
/// sides, so hyphenated words stay intact.
pub fn parse_entry_line(line: &str) -> Option<EntryLine<'_>> {
    let caps = ENTRY.captures(line)?;
    let field = |i| caps.get(i).map(|m| m.as_str().trim()).unwrap_or_default();

    Some(EntryLine {
        primary: field(1),
        secondary: field(2),
        date_range: field(3),
        trailing: field(4),
    })
}

/// Entries collected by [`parse_sections`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
}

/// Run the section state machine over the cleaned lines.
///
/// Header lines switch the state and are discarded. Inside a section,
/// lines matching the entry pattern become records; other lines are
/// skipped. State persists until the next header.
pub fn parse_sections(lines: &[&str]) -> Sections {
    let mut sections = Sections::default();
    let mut state = Section::None;

    for line in lines {
        if let Some(next) = classify_header(line) {
            state = next;
            continue;
        }

        let Some(entry) = parse_entry_line(line) else {
            continue;
        };

        match state {
            Section::None => {}
            Section::Experience => sections.experience.push(ExperienceEntry {
                title: non_empty(entry.primary),
                company: non_empty(entry.secondary),
                date_range: non_empty(entry.date_range),
                description: non_empty(trim_separators(entry.trailing)),
            }),
            Section::Education => sections.education.push(EducationEntry {
                degree: non_empty(entry.primary),
                institution: non_empty(entry.secondary),
                date_range: non_empty(entry.date_range),
            }),
        }
    }

    sections
}

fn trim_separators(s: &str) -> &str {
    s.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ':' | '-' | '–' | '—' | ','))
        .trim_end()
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_header() {
        assert_eq!(classify_header("Experience"), Some(Section::Experience));
        assert_eq!(classify_header("WORK EXPERIENCE"), Some(Section::Experience));
        assert_eq!(classify_header("Education"), Some(Section::Education));
        assert_eq!(classify_header("Bachelor of Arts"), Some(Section::Education));
        assert_eq!(classify_header("Harvard University - Boston"), Some(Section::Education));
        assert_eq!(classify_header("Professional Experience"), None);
        assert_eq!(classify_header("Senior Engineer - Acme Corp (2019-2022)"), None);
    }

    #[test]
    fn test_experience_header_wins() {
        assert_eq!(
            classify_header("Experience teaching at university"),
            Some(Section::Experience)
        );
    }

    #[test]
    fn test_parse_entry_line() {
        let entry = parse_entry_line("Senior Engineer - Acme Corp (2019-2022)").unwrap();
        assert_eq!(entry.primary, "Senior Engineer");
        assert_eq!(entry.secondary, "Acme Corp");
        assert_eq!(entry.date_range, "2019-2022");
        assert_eq!(entry.trailing, "");
    }

    #[test]
    fn test_parse_entry_line_variants() {
        let entry = parse_entry_line("Engineer @ Google (2020 – present)").unwrap();
        assert_eq!(entry.secondary, "Google");
        assert_eq!(entry.date_range, "2020 – present");

        let entry = parse_entry_line("Co-founder — Acme (Europe) Ltd (2018)").unwrap();
        assert_eq!(entry.primary, "Co-founder");
        assert_eq!(entry.secondary, "Acme (Europe) Ltd");

        let entry = parse_entry_line("Dev - Initech (2015-2017): built TPS reports").unwrap();
        assert_eq!(entry.trailing, ": built TPS reports");
    }

    #[test]
    fn test_parse_entry_line_rejects() {
        assert!(parse_entry_line("Senior Engineer at Acme (2019)").is_none());
        assert!(parse_entry_line("Engineer - Acme (present)").is_none());
        assert!(parse_entry_line("Engineer-Acme (2019)").is_none());
        assert!(parse_entry_line("Engineer - Acme").is_none());
    }

    #[test]
    fn test_state_machine() {
        let lines = [
            "Jane Doe - Portfolio (2024)",
            "Experience",
            "Senior Engineer - Acme Corp (2019-2022)",
            "Led the platform team",
            "Engineer - Initech (2016-2019): payments",
            "Education",
            "BSc Computer Science - MIT (2015)",
        ];
        let sections = parse_sections(&lines);

        assert_eq!(sections.experience.len(), 2);
        assert_eq!(
            sections.experience[0],
            ExperienceEntry {
                title: Some("Senior Engineer".to_string()),
                company: Some("Acme Corp".to_string()),
                date_range: Some("2019-2022".to_string()),
                description: None,
            }
        );
        assert_eq!(sections.experience[1].description.as_deref(), Some("payments"));
        assert_eq!(
            sections.education,
            vec![EducationEntry {
                degree: Some("BSc Computer Science".to_string()),
                institution: Some("MIT".to_string()),
                date_range: Some("2015".to_string()),
            }]
        );
    }

    #[test]
    fn test_header_inside_section_switches_state() {
        let lines = [
            "Education",
            "Master of Science - Stanford (2012)",
            "PhD Physics - ETH Zurich (2016)",
        ];
        let sections = parse_sections(&lines);
        // The "Master" line reads as a header and is dropped.
        assert_eq!(sections.education.len(), 1);
        assert_eq!(sections.education[0].degree.as_deref(), Some("PhD Physics"));
        assert!(sections.experience.is_empty());
    }
}
