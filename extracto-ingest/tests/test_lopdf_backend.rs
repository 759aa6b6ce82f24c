use std::fs;
use std::path::Path;

use extracto_ingest::{parse_nequi_text, DecryptOutcome, IngestError, LopdfBackend, PdfBackend};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tempfile::TempDir;

/// Write a one-page, unencrypted PDF with one text line per entry.
fn write_statement_pdf(path: &Path, lines: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
        Operation::new("Td", vec![50.into(), 750.into()]),
    ];
    for line in lines {
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("Td", vec![0.into(), (-14).into()]));
    }
    operations.push(Operation::new("ET", vec![]));

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[test]
fn test_unencrypted_file_short_circuits_decryption() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("statement.pdf");
    write_statement_pdf(&path, &["Periodo 2024/03/01 a 2024/03/31"]);
    let before = fs::read(&path).unwrap();

    let outcome = LopdfBackend::new()
        .decrypt_in_place(&path, Some("secret"))
        .unwrap();

    assert_eq!(outcome, DecryptOutcome::NotEncrypted);
    assert_eq!(fs::read(&path).unwrap(), before, "file must not be rewritten");
}

#[test]
fn test_first_page_text_feeds_parser() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("statement.pdf");
    write_statement_pdf(
        &path,
        &[
            "Periodo 2024/03/01 a 2024/03/31",
            "Total abonos $1,250,000.00",
        ],
    );

    let text = LopdfBackend::new().first_page_text(&path, None).unwrap();
    assert!(text.contains("Total abonos"), "unexpected text: {text:?}");

    let summary = parse_nequi_text(&text).unwrap();
    assert_eq!(summary.period.year, 2024);
    assert_eq!(summary.period.month, 3);
    assert_eq!(summary.totals.credits, "1250000,00");
}

#[test]
fn test_not_a_pdf() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.pdf");
    fs::write(&path, b"this is not a pdf").unwrap();

    let err = LopdfBackend::new().decrypt_in_place(&path, None).unwrap_err();
    assert!(matches!(err, IngestError::Pdf { .. }));
}
