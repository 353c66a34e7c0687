//! Benchmarks for resume-ingest.
//!
//! Run with: cargo bench
//!
//! These benchmarks cover the heuristic parser, format detection and
//! native PDF text extraction on synthetic input.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use resume_ingest::extract::PdfTextExtractor;
use resume_ingest::{sniff_mime, DocumentFormat, TextExtractor};

/// Creates a synthetic resume with the given number of experience entries.
fn create_test_resume(entries: usize) -> String {
    let mut text = String::from(
        "Jane Doe\njane.doe@example.com | +15551234567\nSkills: Rust, Go, SQL, Kafka, AWS\n\nExperience\n",
    );
    for i in 0..entries {
        let year = 2000 + (i % 20);
        text.push_str(&format!(
            "Engineer {} - Company {} ({}-{}): shipped things\n",
            i,
            i,
            year,
            year + 1
        ));
        text.push_str("Worked on distributed systems and on-call rotations.\n");
    }
    text.push_str("\nEducation\nBSc Computer Science - MIT (1999)\n");
    text
}

/// Creates a PDF with one line of text per page.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for i in 0..page_count {
        let line = format!("Page {} - Senior Engineer - Acme Corp (2019-2022)", i + 1);
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// Benchmark MIME resolution and magic-byte sniffing.
fn bench_format_detection(c: &mut Criterion) {
    let pdf_data = create_test_pdf(1);

    c.bench_function("from_mime", |b| {
        b.iter(|| DocumentFormat::from_mime(black_box("Application/PDF; charset=binary")).unwrap());
    });

    c.bench_function("sniff_pdf", |b| {
        b.iter(|| sniff_mime(black_box(&pdf_data)));
    });
}

/// Benchmark the resume parser at various sizes.
fn bench_resume_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("resume_parsing");

    for entries in [1, 10, 100].iter() {
        let text = create_test_resume(*entries);

        group.bench_function(format!("{}_entries", entries), |b| {
            b.iter(|| resume_ingest::parse(black_box(&text)));
        });
    }

    group.finish();
}

/// Benchmark native PDF text extraction.
fn bench_pdf_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("pdf_text");
    let extractor = PdfTextExtractor::new();

    for page_count in [1, 5, 10].iter() {
        let data = create_test_pdf(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| extractor.extract(black_box(&data)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_resume_parsing,
    bench_pdf_text,
);
criterion_main!(benches);
