//! Word document (OOXML) text extraction.
//!
//! A `.docx` file is a zip container; the body lives in
//! `word/document.xml`. Text runs (`w:t`) are concatenated, tabs and
//! breaks are kept, and every paragraph ends with a newline.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use crate::error::NativeTextError;

use super::{NativeText, TextExtractor};

const DOCUMENT_PART: &str = "word/document.xml";

/// [`TextExtractor`] for Word documents.
///
/// Any container or XML failure is an error; there is no fallback for
/// this format.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxTextExtractor;

impl DocxTextExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for DocxTextExtractor {
    fn name(&self) -> &'static str {
        "docx"
    }

    fn extract(&self, data: &[u8]) -> Result<NativeText, NativeTextError> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let mut xml = String::new();
        {
            let mut part = archive.by_name(DOCUMENT_PART)?;
            part.read_to_string(&mut xml)?;
        }

        let text = document_text(&xml)?;
        log::debug!("Word extraction produced {} characters", text.len());

        Ok(NativeText {
            text,
            page_count: None,
        })
    }
}

/// Collect the visible text of a WordprocessingML body.
fn document_text(xml: &str) -> Result<String, NativeTextError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                b"tab" => out.push('\t'),
                b"br" | b"cr" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" | b"p" => out.push('\n'),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_text => {
                let text = e.unescape()?;
                out.push_str(&text);
            }
            Event::CData(e) if in_text => {
                out.push_str(&String::from_utf8_lossy(&e));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Skills: </w:t></w:r><w:r><w:t>Rust &amp; Go</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t><w:br/><w:t>C</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_document_text() {
        let text = document_text(BODY).unwrap();
        assert_eq!(text, "Jane Doe\nSkills: Rust & Go\n\nA\tB\nC\n");
    }

    #[test]
    fn test_whitespace_outside_runs_is_ignored() {
        let text = document_text("<w:body>\n  <w:p>\n    <w:r><w:t>x</w:t></w:r>\n  </w:p>\n</w:body>")
            .unwrap();
        assert_eq!(text, "x\n");
    }

    #[test]
    fn test_not_a_zip() {
        let result = DocxTextExtractor::new().extract(b"\xD0\xCF\x11\xE0 legacy binary doc");
        assert!(matches!(result, Err(NativeTextError::Zip(_)) | Err(NativeTextError::Io(_))));
    }

    #[test]
    fn test_invalid_xml() {
        let result = document_text("<w:p><w:t>unterminated</w:x></w:p>");
        assert!(matches!(result, Err(NativeTextError::Xml(_))));
    }
}
