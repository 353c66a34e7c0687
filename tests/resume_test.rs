//! Integration tests for the heuristic resume parser.

use resume_ingest::render::{self, JsonFormat};
use resume_ingest::{parse, EducationEntry, ExperienceEntry, ParsedResume};

const SAMPLE: &str = "\
Maria Garcia
Berlin, Germany
maria.garcia@example.org   +491701234567
Core Skills: Rust | Kubernetes | PostgreSQL | gRPC

Work Experience
Staff Engineer - Ferrous Systems (2021-present): compiler tooling
Backend Developer – Zalando SE (2017 – 2021)
Mentored two interns

Education
MSc Informatics - TU Munich (2015-2017)
";

#[test]
fn test_empty_text() {
    let resume = parse("");
    assert_eq!(resume.name, None);
    assert_eq!(resume.email, None);
    assert_eq!(resume.phone, None);
    assert!(resume.skills.is_empty());
    assert!(resume.experience.is_empty());
    assert!(resume.education.is_empty());
    assert_eq!(resume.raw, "");
}

#[test]
fn test_whitespace_only_text() {
    let text = " \n\t\n  ";
    let resume = parse(text);
    assert!(!resume.has_structure());
    assert_eq!(resume.raw, text);
}

#[test]
fn test_raw_is_preserved() {
    for text in [SAMPLE, "x", "  padded  \r\n", "naïve façade"] {
        assert_eq!(parse(text).raw, text);
    }
}

#[test]
fn test_email_anywhere() {
    let resume = parse("Resume 2024\nreach me at dev+cv@mail.example.io today");
    assert_eq!(resume.email.as_deref(), Some("dev+cv@mail.example.io"));
    assert_eq!(resume.name, None);
}

#[test]
fn test_two_line_resume() {
    let resume = parse("John Smith\njohn@x.com");
    assert_eq!(resume.name.as_deref(), Some("John Smith"));
    assert_eq!(resume.email.as_deref(), Some("john@x.com"));
}

#[test]
fn test_experience_and_education_sections() {
    let resume =
        parse("Experience\nSenior Engineer - Acme Corp (2019-2022)\nEducation\nBSc Computer Science - MIT (2015)");

    assert_eq!(
        resume.experience,
        vec![ExperienceEntry {
            title: Some("Senior Engineer".into()),
            company: Some("Acme Corp".into()),
            date_range: Some("2019-2022".into()),
            description: None,
        }]
    );
    assert_eq!(
        resume.education,
        vec![EducationEntry {
            degree: Some("BSc Computer Science".into()),
            institution: Some("MIT".into()),
            date_range: Some("2015".into()),
        }]
    );
}

#[test]
fn test_entries_before_any_header_are_ignored() {
    let resume = parse("Engineer - Acme (2019-2022)\nDesigner - Globex (2015)");
    assert!(resume.experience.is_empty());
    assert!(resume.education.is_empty());
}

#[test]
fn test_full_sample() {
    let resume = parse(SAMPLE);

    assert_eq!(resume.name.as_deref(), Some("Maria Garcia"));
    assert_eq!(resume.email.as_deref(), Some("maria.garcia@example.org"));
    assert_eq!(resume.phone.as_deref(), Some("+491701234567"));
    assert_eq!(
        resume.skills,
        vec!["Rust", "Kubernetes", "PostgreSQL", "gRPC"]
    );

    assert_eq!(resume.experience.len(), 2);
    assert_eq!(resume.experience[0].title.as_deref(), Some("Staff Engineer"));
    assert_eq!(resume.experience[0].date_range.as_deref(), Some("2021-present"));
    assert_eq!(
        resume.experience[0].description.as_deref(),
        Some("compiler tooling")
    );
    assert_eq!(resume.experience[1].company.as_deref(), Some("Zalando SE"));
    assert_eq!(resume.experience[1].date_range.as_deref(), Some("2017 – 2021"));

    assert_eq!(resume.education.len(), 1);
    assert_eq!(resume.education[0].institution.as_deref(), Some("TU Munich"));
}

#[test]
fn test_parse_is_idempotent() {
    let first = parse(SAMPLE);
    let second = parse(&first.raw);
    assert_eq!(first, second);
}

#[test]
fn test_json_shape() {
    let resume = parse("Jane Doe\njane@example.com");
    let json = render::to_json(&resume, JsonFormat::Compact).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["name"], "Jane Doe");
    assert_eq!(value["email"], "jane@example.com");
    assert!(value.get("phone").is_none());
    assert_eq!(value["skills"], serde_json::json!([]));
    assert_eq!(value["raw"], "Jane Doe\njane@example.com");

    let back: ParsedResume = serde_json::from_str(&json).unwrap();
    assert_eq!(back, resume);
}

#[test]
fn test_phone_from_overlong_digit_run() {
    let resume = parse("Jane Doe\nTel 00441234567890123");
    assert_eq!(resume.phone.as_deref(), Some("004412345678901"));
}

#[test]
fn test_skills_line_needs_the_word() {
    let resume = parse("Jane Doe\nSkillful leader: teams, budgets");
    assert!(resume.skills.is_empty());
}
