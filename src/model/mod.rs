//! Data model shared by the extraction pipeline and the resume parser.

mod document;
mod resume;

pub use document::{Document, ExtractionResult, PageImage, SourceStrategy, MIME_UNKNOWN};
pub use resume::{EducationEntry, ExperienceEntry, ParsedResume};
