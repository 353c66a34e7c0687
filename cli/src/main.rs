//! resume-ingest CLI - resume text extraction and parsing tool

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use resume_ingest::{
    render, Document, DocumentFormat, ExtractOptions, Ingestor, JsonFormat, ParsedResume,
};

#[derive(Parser)]
#[command(name = "resume-ingest")]
#[command(version)]
#[command(about = "Extract text from resumes (PDF, Word, images) and parse it", long_about = None)]
struct Cli {
    #[command(flatten)]
    ocr: OcrArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OcrArgs {
    /// OCR language hint (tesseract language code)
    #[arg(long, global = true, env = "RESUME_INGEST_OCR_LANG", value_name = "LANG")]
    lang: Option<String>,

    /// Disable OCR entirely
    #[arg(long, global = true)]
    no_ocr: bool,

    /// Path of the tesseract binary
    #[arg(long, global = true, env = "RESUME_INGEST_TESSERACT", value_name = "PATH")]
    tesseract: Option<PathBuf>,

    /// Path of the pdftoppm binary
    #[arg(long, global = true, env = "RESUME_INGEST_PDFTOPPM", value_name = "PATH")]
    pdftoppm: Option<PathBuf>,

    /// Native text length below which a PDF is OCRed
    #[arg(
        long,
        global = true,
        env = "RESUME_INGEST_FALLBACK_THRESHOLD",
        value_name = "CHARS"
    )]
    threshold: Option<usize>,
}

impl OcrArgs {
    fn options(&self) -> ExtractOptions {
        let mut options = ExtractOptions::from_env();
        if let Some(ref lang) = self.lang {
            options = options.with_language(lang.clone());
        }
        if let Some(ref path) = self.tesseract {
            options = options.with_tesseract_path(path.clone());
        }
        if let Some(ref path) = self.pdftoppm {
            options = options.with_pdftoppm_path(path.clone());
        }
        if let Some(threshold) = self.threshold {
            options = options.with_fallback_threshold(threshold);
        }
        if self.no_ocr {
            options = options.without_ocr();
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract plain text from a document
    Extract {
        /// Input file (PDF, Word or image)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Declared MIME type (guessed from the file if not specified)
        #[arg(long, value_name = "MIME")]
        mime: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Parse plain resume text without extraction
    Parse {
        /// Text file, or "-" for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Extract a document and parse the resume fields
    Ingest {
        /// Input file (PDF, Word or image)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Declared MIME type (guessed from the file if not specified)
        #[arg(long, value_name = "MIME")]
        mime: Option<String>,

        /// Output JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Recognize text in a single image
    Ocr {
        /// Input image
        #[arg(value_name = "IMAGE")]
        input: PathBuf,
    },

    /// Show document information
    Info {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Declared MIME type (guessed from the file if not specified)
        #[arg(long, value_name = "MIME")]
        mime: Option<String>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = cli.ocr.options();
    log::debug!(
        "OCR backend {:?}, language {}, fallback below {} chars",
        options.ocr_backend,
        options.ocr_language,
        options.fallback_threshold
    );

    let result = match cli.command {
        Commands::Extract {
            input,
            mime,
            output,
        } => cmd_extract(&input, mime.as_deref(), output.as_deref(), options),
        Commands::Parse {
            input,
            json,
            compact,
        } => cmd_parse(&input, output_format(json, compact)),
        Commands::Ingest {
            input,
            mime,
            json,
            compact,
            output,
        } => cmd_ingest(
            &input,
            mime.as_deref(),
            output_format(json, compact),
            output.as_deref(),
            options,
        ),
        Commands::Ocr { input } => cmd_ocr(&input, options),
        Commands::Info { input, mime, json } => cmd_info(&input, mime.as_deref(), json, options),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// `None` means a human-readable summary.
fn output_format(json: bool, compact: bool) -> Option<JsonFormat> {
    match (json, compact) {
        (_, true) => Some(JsonFormat::Compact),
        (true, false) => Some(JsonFormat::Pretty),
        (false, false) => None,
    }
}

fn load_document(input: &Path, mime: Option<&str>) -> io::Result<Document> {
    let doc = Document::from_path(input)?;
    Ok(match mime {
        Some(mime) => doc.with_mime_type(mime),
        None => doc,
    })
}

fn read_text(input: &Path) -> io::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(input)
    }
}

fn spinner(message: &str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn write_output(output: Option<&Path>, content: &str) -> io::Result<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn render_resume(
    resume: &ParsedResume,
    format: Option<JsonFormat>,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        Some(format) => render::to_json(resume, format)?,
        None => render::to_text(resume),
    })
}

fn cmd_extract(
    input: &Path,
    mime: Option<&str>,
    output: Option<&Path>,
    options: ExtractOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_document(input, mime)?;
    let ingestor = Ingestor::from_options(options);

    let pb = spinner("Extracting text...")?;
    let result = ingestor.extract(&doc);
    pb.finish_and_clear();
    let result = result?;

    eprint!("{}: {}", "Strategy".bold(), result.source_strategy);
    if let Some(pages) = result.page_count {
        eprint!(", {}: {}", "Pages".bold(), pages);
    }
    eprintln!();

    write_output(output, &result.text)?;
    Ok(())
}

fn cmd_parse(input: &Path, format: Option<JsonFormat>) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_text(input)?;
    let resume = resume_ingest::parse(&text);
    println!("{}", render_resume(&resume, format)?);
    Ok(())
}

fn cmd_ingest(
    input: &Path,
    mime: Option<&str>,
    format: Option<JsonFormat>,
    output: Option<&Path>,
    options: ExtractOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_document(input, mime)?;
    let ingestor = Ingestor::from_options(options);

    let pb = spinner("Reading resume...")?;
    let resume = ingestor.ingest(&doc);
    pb.finish_and_clear();
    let resume = resume?;

    if format.is_none() && !resume.has_structure() {
        eprintln!("{}", "No resume fields recognized".yellow());
    }

    write_output(output, &render_resume(&resume, format)?)?;
    Ok(())
}

fn cmd_ocr(input: &Path, options: ExtractOptions) -> Result<(), Box<dyn std::error::Error>> {
    let image = fs::read(input)?;
    let ingestor = Ingestor::from_options(options);

    let pb = spinner("Recognizing...")?;
    let text = ingestor.recognize_image(&image);
    pb.finish_and_clear();

    if text.trim().is_empty() {
        eprintln!(
            "{} (backend: {})",
            "No text recognized".yellow(),
            ingestor.recognizer_name()
        );
    } else {
        println!("{}", text);
    }
    Ok(())
}

fn cmd_info(
    input: &Path,
    mime: Option<&str>,
    json: bool,
    options: ExtractOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_document(input, mime)?;
    let format = DocumentFormat::from_mime(doc.mime_type())?;
    let ingestor = Ingestor::from_options(options);

    let pb = spinner("Analyzing...")?;
    let result = ingestor.extract(&doc);
    pb.finish_and_clear();

    if json {
        let mut info = serde_json::json!({
            "file": input.display().to_string(),
            "mime": doc.mime_type(),
            "format": format.name(),
            "size": doc.len(),
            "ocr": ingestor.recognizer_name(),
        });
        match result {
            Ok(result) => {
                let resume = resume_ingest::parse(&result.text);
                info["strategy"] = result.source_strategy.as_str().into();
                info["pages"] = result.page_count.into();
                info["words"] = result.word_count().into();
                info["characters"] = result.text.chars().count().into();
                info["skills"] = resume.skills.len().into();
                info["experience"] = resume.experience.len().into();
                info["education"] = resume.education.len().into();
            }
            Err(e) => info["error"] = e.to_string().into(),
        }
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "MIME".bold(), doc.mime_type());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {} bytes", "Size".bold(), doc.len());
    println!("{}: {}", "OCR".bold(), ingestor.recognizer_name());

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    match result {
        Ok(result) => {
            let resume = resume_ingest::parse(&result.text);

            println!("{}: {}", "Strategy".bold(), result.source_strategy);
            if let Some(pages) = result.page_count {
                println!("{}: {}", "Pages".bold(), pages);
            }
            println!("{}: {}", "Words".bold(), result.word_count());
            println!("{}: {}", "Characters".bold(), result.text.chars().count());
            println!("{}: {}", "Skills".bold(), resume.skills.len());
            println!("{}: {}", "Experience".bold(), resume.experience.len());
            println!("{}: {}", "Education".bold(), resume.education.len());
        }
        Err(e) => println!("{}: {}", "Text".bold(), e.to_string().yellow()),
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "resume-ingest".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Resume text extraction and parsing tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_output_format() {
        assert_eq!(output_format(false, false), None);
        assert_eq!(output_format(true, false), Some(JsonFormat::Pretty));
        assert_eq!(output_format(false, true), Some(JsonFormat::Compact));
    }

    #[test]
    fn test_load_document_mime_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.bin");
        fs::write(&path, b"%PDF-1.4\n").unwrap();

        let doc = load_document(&path, None).unwrap();
        assert_eq!(doc.mime_type(), "application/pdf");

        let doc = load_document(&path, Some("image/png")).unwrap();
        assert_eq!(doc.mime_type(), "image/png");
    }

    #[test]
    fn test_read_text_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        fs::write(&path, "Jane Doe\n").unwrap();

        assert_eq!(read_text(&path).unwrap(), "Jane Doe\n");
    }

    #[test]
    fn test_info_json_flag() {
        let cli = Cli::try_parse_from(["resume-ingest", "info", "cv.pdf", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Info { json: true, .. }));
    }

    #[test]
    fn test_flags_override_options() {
        let cli = Cli::try_parse_from([
            "resume-ingest",
            "--no-ocr",
            "--threshold",
            "5",
            "extract",
            "cv.pdf",
        ])
        .unwrap();
        let options = cli.ocr.options();
        assert_eq!(options.ocr_backend, resume_ingest::OcrBackend::Disabled);
        assert_eq!(options.fallback_threshold, 5);
    }
}
