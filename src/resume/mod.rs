//! Heuristic resume parsing.
//!
//! Turns free-form resume text into a [`ParsedResume`]. Parsing never
//! fails: fields that no rule recognizes are simply left empty.
//!
//! # Example
//!
//! ```
//! let resume = resume_ingest::resume::parse(
//!     "Jane Doe\njane@example.com\nSkills: Rust, SQL\n\nExperience\nEngineer - Acme (2020-2023)",
//! );
//! assert_eq!(resume.name.as_deref(), Some("Jane Doe"));
//! assert_eq!(resume.skills, vec!["Rust", "SQL"]);
//! assert_eq!(resume.experience.len(), 1);
//! ```

mod rules;
mod sections;

pub use rules::{
    extract_email, extract_name, extract_phone, extract_skills, is_name_like, SKILLS_SCAN_LIMIT,
};
pub use sections::{classify_header, parse_entry_line, parse_sections, EntryLine, Section, Sections};

use crate::model::ParsedResume;

/// Split text into trimmed, non-blank lines.
pub fn lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Parse resume text into structured fields.
///
/// The input is kept verbatim in [`ParsedResume::raw`].
pub fn parse(text: &str) -> ParsedResume {
    let lines = lines(text);
    let Sections {
        experience,
        education,
    } = parse_sections(&lines);

    let resume = ParsedResume {
        name: extract_name(&lines),
        email: extract_email(&lines),
        phone: extract_phone(&lines),
        skills: extract_skills(&lines),
        experience,
        education,
        raw: text.to_string(),
    };

    log::debug!(
        "Parsed resume: {} lines, {} skills, {} experience, {} education",
        lines.len(),
        resume.skills.len(),
        resume.experience.len(),
        resume.education.len()
    );

    resume
}
