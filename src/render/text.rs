//! Plain text summary of a parsed resume.

use std::fmt::{self, Write};

use crate::model::ParsedResume;

/// Render a human-readable summary of a parsed resume.
///
/// Absent fields are omitted. The raw text is not included.
pub fn to_text(resume: &ParsedResume) -> String {
    let mut output = String::new();
    // Writing to a String cannot fail.
    let _ = write_text(&mut output, resume);
    output.trim_end().to_string()
}

/// Write the summary produced by [`to_text`] into any writer.
pub fn write_text<W: Write>(out: &mut W, resume: &ParsedResume) -> fmt::Result {
    let contact = [
        ("Name", &resume.name),
        ("Email", &resume.email),
        ("Phone", &resume.phone),
    ];
    for (label, value) in contact {
        if let Some(value) = value {
            writeln!(out, "{}: {}", label, value)?;
        }
    }

    if !resume.skills.is_empty() {
        writeln!(out, "Skills: {}", resume.skills.join(", "))?;
    }

    if !resume.experience.is_empty() {
        writeln!(out)?;
        writeln!(out, "Experience")?;
        for entry in &resume.experience {
            let line = entry_line(&entry.title, &entry.company, &entry.date_range);
            match &entry.description {
                Some(description) => writeln!(out, "  {}: {}", line, description)?,
                None => writeln!(out, "  {}", line)?,
            }
        }
    }

    if !resume.education.is_empty() {
        writeln!(out)?;
        writeln!(out, "Education")?;
        for entry in &resume.education {
            let line = entry_line(&entry.degree, &entry.institution, &entry.date_range);
            writeln!(out, "  {}", line)?;
        }
    }

    Ok(())
}

fn entry_line(primary: &Option<String>, secondary: &Option<String>, dates: &Option<String>) -> String {
    let mut line = match (primary, secondary) {
        (Some(p), Some(s)) => format!("{} - {}", p, s),
        (Some(p), None) => p.clone(),
        (None, Some(s)) => s.clone(),
        (None, None) => String::new(),
    };
    if let Some(dates) = dates {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&format!("({})", dates));
    }
    line
}
