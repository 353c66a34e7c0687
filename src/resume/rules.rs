//! Field rules. Each rule is a pure function over the cleaned line
//! sequence and knows nothing about the others.

use std::sync::LazyLock;

use regex::Regex;

/// Lines scanned when looking for the skills line.
pub const SKILLS_SCAN_LIMIT: usize = 30;

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 80;
const NAME_MAX_TOKENS: usize = 5;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap()
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+?\d{7,15}").unwrap());

static SKILL_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bskills?\b").unwrap());

static NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\p{L}\s,.'\-]+$").unwrap());

/// First e-mail address on any line.
pub fn extract_email(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find_map(|line| EMAIL.find(line))
        .map(|m| m.as_str().to_string())
}

/// First phone number: an optional `+` and 7 to 15 digits.
///
/// Longer digit runs are not rejected; their first 15 digits match.
pub fn extract_phone(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find_map(|line| PHONE.find(line))
        .map(|m| m.as_str().to_string())
}

/// The first line, if it looks like a person's name.
///
/// Accepted lines hold only letters, whitespace and `,.'-`, are 2 to 80
/// characters long, and split into at most 5 whitespace-separated tokens.
pub fn extract_name(lines: &[&str]) -> Option<String> {
    let candidate = lines.first()?.trim();
    is_name_like(candidate).then(|| candidate.to_string())
}

/// Check the name rule against a single trimmed line.
pub fn is_name_like(line: &str) -> bool {
    let chars = line.chars().count();
    (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&chars)
        && line.split_whitespace().count() <= NAME_MAX_TOKENS
        && NAME.is_match(line)
}

/// Skills from the first line (within the first 30) holding the word
/// "skill" or "skills".
///
/// Everything after the first `:`, `-`, `–` or `—` is split on `;`, `,`,
/// `|`, `•` or `·`. Only one line is consulted; a matching line with no
/// separator yields no skills.
pub fn extract_skills(lines: &[&str]) -> Vec<String> {
    let Some(line) = lines
        .iter()
        .take(SKILLS_SCAN_LIMIT)
        .find(|line| SKILL_TOKEN.is_match(line))
    else {
        return Vec::new();
    };

    let list = line
        .char_indices()
        .find(|(_, c)| matches!(c, ':' | '-' | '–' | '—'))
        .map(|(i, c)| &line[i + c.len_utf8()..])
        .unwrap_or_default();

    split_skill_list(list)
}

fn split_skill_list(list: &str) -> Vec<String> {
    list.split(|c: char| matches!(c, ';' | ',' | '|' | '•' | '·'))
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert_eq!(
            extract_email(&["Contact: jane.doe@example.com please"]).as_deref(),
            Some("jane.doe@example.com")
        );
        assert_eq!(
            extract_email(&["no mail here", "a_b+tag@mail.co.uk", "x@y.org"]).as_deref(),
            Some("a_b+tag@mail.co.uk")
        );
        assert_eq!(extract_email(&["user@localhost", "@example.com"]), None);
    }

    #[test]
    fn test_phone() {
        assert_eq!(extract_phone(&["Tel: +4915112345678"]).as_deref(), Some("+4915112345678"));
        assert_eq!(extract_phone(&["5551234"]).as_deref(), Some("5551234"));
        assert_eq!(extract_phone(&["555-1234", "2019-2022"]), None);
    }

    #[test]
    fn test_phone_long_digit_run() {
        assert_eq!(
            extract_phone(&["id 1234567890123456"]).as_deref(),
            Some("123456789012345")
        );
        assert_eq!(
            extract_phone(&["Tel 00441234567890123"]).as_deref(),
            Some("004412345678901")
        );
    }

    #[test]
    fn test_name_accepted() {
        assert_eq!(extract_name(&["John Smith", "Engineer"]).as_deref(), Some("John Smith"));
        assert_eq!(extract_name(&["Mary-Jane O'Neil"]).as_deref(), Some("Mary-Jane O'Neil"));
        assert_eq!(extract_name(&["José Álvarez"]).as_deref(), Some("José Álvarez"));
    }

    #[test]
    fn test_name_tokens_are_whitespace_split() {
        // Three tokens: "Jane,", "Q.", "Smith"
        assert!(is_name_like("Jane, Q. Smith"));
        assert!(is_name_like("A B C D E"));
        assert!(!is_name_like("A B C D E F"));
    }

    #[test]
    fn test_name_rejected() {
        assert_eq!(extract_name(&["Curriculum Vitae 2024"]), None);
        assert_eq!(extract_name(&["jane@example.com"]), None);
        assert_eq!(extract_name(&["J"]), None);
        assert_eq!(extract_name(&[]), None);
        assert!(!is_name_like(&"a".repeat(81)));
    }

    #[test]
    fn test_skills_after_colon() {
        let lines = ["Jane Doe", "Skills: Rust, Go; SQL | Docker • K8s · AWS"];
        assert_eq!(
            extract_skills(&lines),
            vec!["Rust", "Go", "SQL", "Docker", "K8s", "AWS"]
        );
    }

    #[test]
    fn test_skills_keep_later_dashes() {
        let lines = ["Technical skills - C++, Objective-C, ,"];
        assert_eq!(extract_skills(&lines), vec!["C++", "Objective-C"]);
    }

    #[test]
    fn test_skills_needs_whole_word() {
        let lines = ["Skillful leader: teams, budgets", "Skills: Rust | Go"];
        assert_eq!(extract_skills(&lines), vec!["Rust", "Go"]);
        assert_eq!(extract_skills(&["Skill(s): Python"]), vec!["Python"]);
    }

    #[test]
    fn test_skills_only_first_matching_line() {
        let lines = ["SKILLS", "Skills: Rust"];
        assert!(extract_skills(&lines).is_empty());
    }

    #[test]
    fn test_skills_scan_limit() {
        let mut lines = vec!["filler"; SKILLS_SCAN_LIMIT];
        lines.push("Skills: Rust");
        assert!(extract_skills(&lines).is_empty());

        lines.remove(0);
        assert_eq!(extract_skills(&lines), vec!["Rust"]);
    }
}
