//! Integration tests for the Folio export pipeline.
//!
//! These tests exercise the full path from JSON or model input to output.
//! They verify:
//! - JSON deserialization of briefs and styles
//! - Page numbering, headers and footers on every page
//! - Nothing is lost or duplicated across page breaks
//! - PDF output is structurally valid, with links and metadata
//! - Errors are reported instead of producing output

use chrono::{DateTime, Duration, TimeZone, Utc};

use folio::model::*;
use folio::render::{DrawOp, Recording, RecordingRenderer};
use folio::style::*;
use folio::{DocumentExporter, FolioError};

// ─── Helpers ────────────────────────────────────────────────────

fn export_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 20, 14, 0, 0).unwrap()
}

fn brief(sections: Vec<Section>) -> Document {
    Document::new(
        Metadata::new(
            "Harbor Bridge",
            "North approach retrofit",
            export_time() - Duration::days(2),
        ),
        sections,
    )
}

fn record(doc: &Document, style: &StyleConfig) -> (Recording, folio::ExportSummary) {
    DocumentExporter::with_clock(style, export_time())
        .export(doc, RecordingRenderer::new())
        .unwrap()
}

fn long_paragraph(words: usize) -> String {
    (0..words)
        .map(|i| format!("word{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(bytes.windows(5).any(|w| w == b"%%EOF"), "Missing %%EOF marker");
    assert!(bytes.windows(4).any(|w| w == b"xref"), "Missing xref table");
    assert!(bytes.windows(7).any(|w| w == b"trailer"), "Missing trailer");
}

fn pdf_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Inflate all FlateDecode streams that decode as text.
fn pdf_streams(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut rest = bytes;
    while let Some(start) = rest.windows(7).position(|w| w == b"stream\n") {
        let body = &rest[start + 7..];
        let Some(end) = body.windows(10).position(|w| w == b"\nendstream") else {
            break;
        };
        if let Ok(data) = miniz_oxide::inflate::decompress_to_vec_zlib(&body[..end]) {
            out.push_str(&String::from_utf8_lossy(&data));
        }
        rest = &body[end + 10..];
    }
    out
}

const MINIMAL_JSON: &str = r#"{
  "metadata": {
    "subjectName": "Harbor Bridge",
    "generatedAt": "2026-05-20T13:00:00Z"
  },
  "sections": [
    {
      "title": "Overview",
      "blocks": [
        { "type": "LabelValue", "label": "Status", "value": "Active" },
        { "type": "TextBlock", "text": "Survey of all four spans." },
        { "type": "BulletList", "items": ["Bearings", "Piers"] },
        { "type": "SectionTitle", "text": "Notes" }
      ]
    }
  ]
}"#;

// ─── JSON Pipeline Tests ────────────────────────────────────────

#[test]
fn test_minimal_json() {
    let bytes = folio::export_json(MINIMAL_JSON, &StyleConfig::default()).unwrap();
    assert_valid_pdf(&bytes);
    assert!(pdf_text(&bytes).contains("/Count 1"));
}

#[test]
fn test_json_block_tags() {
    let doc: Document = serde_json::from_str(MINIMAL_JSON).unwrap();
    let blocks = &doc.sections[0].blocks;
    assert_eq!(blocks[0], ContentBlock::label_value("Status", "Active"));
    assert_eq!(blocks[2], ContentBlock::bullets(["Bearings", "Piers"]));
    assert_eq!(blocks[3], ContentBlock::title("Notes"));
    assert_eq!(doc.metadata.subtitle, "");
}

#[test]
fn test_malformed_json_is_parse_error_with_hint() {
    let err = folio::export_json("{\"metadata\": {", &StyleConfig::default()).unwrap_err();
    assert!(matches!(err, FolioError::ParseError { .. }));
    assert!(err.to_string().contains("Hint"));
}

#[test]
fn test_unknown_block_type_is_parse_error() {
    let json = r#"{
      "metadata": { "subjectName": "X", "generatedAt": "2026-05-20T13:00:00Z" },
      "sections": [{ "title": "A", "blocks": [{ "type": "Table", "rows": [] }] }]
    }"#;
    let err = folio::export_json(json, &StyleConfig::default()).unwrap_err();
    assert!(err.to_string().contains("brief schema"), "got: {err}");
}

#[test]
fn test_partial_style_json() {
    let style = StyleConfig::from_json(r#"{ "pageSize": "Letter", "margin": 50 }"#).unwrap();
    assert_eq!(style.margin, 50.0);
    assert_eq!(style.font_size, StyleConfig::default().font_size);

    let bytes = folio::export_json(MINIMAL_JSON, &style).unwrap();
    assert!(pdf_text(&bytes).contains("/MediaBox [0 0 612.00 792.00]"));
}

// ─── Pagination Tests ───────────────────────────────────────────

#[test]
fn test_short_brief_fits_one_page() {
    let doc = brief(vec![Section::new(
        "Overview",
        vec![ContentBlock::label_value("Status", "Active")],
    )]);
    let (rec, summary) = record(&doc, &StyleConfig::default());
    assert_eq!(summary.page_count, 1);
    assert_eq!(summary.page_breaks, 0);
    assert_eq!(rec.page_count, 1);
}

#[test]
fn test_long_text_overflows_onto_more_pages() {
    let doc = brief(vec![Section::new(
        "Narrative",
        vec![ContentBlock::text(&long_paragraph(3000))],
    )]);
    let (rec, summary) = record(&doc, &StyleConfig::default());
    assert!(summary.page_count >= 3, "got {} pages", summary.page_count);
    assert_eq!(summary.page_breaks, summary.page_count - 1);
    assert_eq!(rec.page_count, summary.page_count);
}

#[test]
fn test_page_numbers_and_chrome_on_every_page() {
    let doc = brief(vec![Section::new(
        "Narrative",
        vec![ContentBlock::text(&long_paragraph(2500))],
    )]);
    let style = StyleConfig::default();
    let (rec, summary) = record(&doc, &style);
    assert!(summary.page_count > 1);

    for page in 1..=summary.page_count {
        let label = format!("Page {page}");
        assert_eq!(rec.count_text(&label), 1, "{label} drawn once");
        assert_eq!(rec.page_of(&label), Some(page));

        let texts = rec.texts_on_page(page);
        assert_eq!(texts.iter().filter(|t| **t == "FOLIO").count(), 1);
        assert_eq!(
            texts.iter().filter(|t| **t == "Generated 2 days ago").count(),
            1
        );
        let links_here = rec
            .links()
            .filter(|op| matches!(op, DrawOp::Link { page: p, url, .. } if *p == page && *url == style.footer.reference_url))
            .count();
        assert_eq!(links_here, 1);
    }
}

#[test]
fn test_words_conserved_across_breaks() {
    let paragraph = long_paragraph(1800);
    let doc = brief(vec![Section::new(
        "Narrative",
        vec![ContentBlock::text(&paragraph)],
    )]);
    let (rec, summary) = record(&doc, &StyleConfig::default());
    assert!(summary.page_breaks >= 1);

    let drawn: Vec<&str> = rec
        .texts()
        .map(|(_, t)| t)
        .filter(|t| t.starts_with("word"))
        .flat_map(|t| t.split(' '))
        .collect();
    let expected: Vec<&str> = paragraph.split(' ').collect();
    assert_eq!(drawn, expected);
}

#[test]
fn test_every_bullet_drawn_once() {
    let items: Vec<String> = (0..240).map(|i| format!("Action item {i}")).collect();
    let doc = brief(vec![Section::new(
        "Actions",
        vec![ContentBlock::BulletList {
            items: items.clone(),
        }],
    )]);
    let (rec, summary) = record(&doc, &StyleConfig::default());
    assert!(summary.page_count >= 4);
    assert_eq!(rec.count_text("\u{2022}"), items.len());
    for item in &items {
        assert_eq!(rec.count_text(item), 1, "{item}");
    }
}

#[test]
fn test_sections_keep_order() {
    let doc = brief(vec![
        Section::new("First", vec![ContentBlock::text(&long_paragraph(900))]),
        Section::new("Second", vec![ContentBlock::label_value("Key", "Value")]),
        Section::new("Third", vec![]),
    ]);
    let (rec, _) = record(&doc, &StyleConfig::default());
    let first = rec.page_of("First").unwrap();
    let second = rec.page_of("Second").unwrap();
    let third = rec.page_of("Third").unwrap();
    assert!(first <= second && second <= third);

    let texts: Vec<&str> = rec.texts().map(|(_, t)| t).collect();
    let pos = |s: &str| texts.iter().position(|t| *t == s).unwrap();
    assert!(pos("First") < pos("Second"));
    assert!(pos("Second") < pos("Third"));
}

#[test]
fn test_empty_blocks_draw_nothing() {
    let with_empty = brief(vec![Section::new(
        "Overview",
        vec![
            ContentBlock::text(""),
            ContentBlock::BulletList { items: vec![] },
        ],
    )]);
    let without = brief(vec![Section::new("Overview", vec![])]);
    let style = StyleConfig::default();
    let (a, _) = record(&with_empty, &style);
    let (b, _) = record(&without, &style);
    assert_eq!(a.ops, b.ops);
}

#[test]
fn test_small_page_still_paginates() {
    let style = StyleConfig::from_json(
        r#"{ "pageSize": { "Custom": { "width": 300, "height": 240 } }, "margin": 20 }"#,
    )
    .unwrap();
    let doc = brief(vec![Section::new(
        "Narrative",
        vec![ContentBlock::text(&long_paragraph(400))],
    )]);
    let (rec, summary) = record(&doc, &style);
    assert!(summary.page_count > 3);
    // Nothing is drawn below the bottom margin except the footer
    for op in &rec.ops {
        if let DrawOp::Text { text, y, .. } = op {
            if text.starts_with("word") {
                assert!(*y <= 240.0 - 20.0 + 1e-6, "{text} at y={y}");
            }
        }
    }
}

#[test]
fn test_oversized_style_is_layout_error() {
    let style = StyleConfig {
        font_size: 600.0,
        ..StyleConfig::default()
    };
    let doc = brief(vec![]);
    let err = DocumentExporter::with_clock(&style, export_time())
        .export(&doc, RecordingRenderer::new())
        .unwrap_err();
    assert!(matches!(err, FolioError::LayoutError(_)));
}

// ─── Header Asset Tests ─────────────────────────────────────────

#[test]
fn test_broken_logo_still_exports() {
    let mut style = StyleConfig::default();
    style.header.logo = Some("data:image/png;base64,!!!not-base64!!!".to_string());
    let doc = brief(vec![Section::new(
        "Overview",
        vec![ContentBlock::label_value("Status", "Active")],
    )]);
    let bytes = folio::export_pdf(&doc, &style).unwrap();
    assert_valid_pdf(&bytes);
    assert!(!pdf_text(&bytes).contains("/Subtype /Image"));
    assert!(pdf_streams(&bytes).contains("(FOLIO) Tj"));
}

#[test]
fn test_logo_embedded_as_image() {
    let img = image::RgbImage::from_pixel(8, 4, image::Rgb([10, 20, 200]));
    let mut png = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png);
    image::ImageEncoder::write_image(encoder, img.as_raw(), 8, 4, image::ColorType::Rgb8).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logo.png");
    std::fs::write(&path, &png).unwrap();

    let mut style = StyleConfig::default();
    style.header.logo = Some(path.to_string_lossy().into_owned());
    let doc = brief(vec![Section::new(
        "Narrative",
        vec![ContentBlock::text(&long_paragraph(1500))],
    )]);
    let bytes = folio::export_pdf(&doc, &style).unwrap();
    let text = pdf_text(&bytes);
    assert_eq!(text.matches("/Subtype /Image").count(), 1, "one shared XObject");
    assert!(text.contains("/XObject << /Im0"));
}

// ─── PDF Output Tests ───────────────────────────────────────────

#[test]
fn test_pdf_page_count_matches_layout() {
    let doc = brief(vec![Section::new(
        "Narrative",
        vec![ContentBlock::text(&long_paragraph(2000))],
    )]);
    let style = StyleConfig::default();
    let (bytes, summary) = folio::export_pdf_with_summary(&doc, &style).unwrap();
    assert_valid_pdf(&bytes);
    assert!(pdf_text(&bytes).contains(&format!("/Count {}", summary.page_count)));
}

#[test]
fn test_pdf_has_footer_links() {
    let doc = brief(vec![Section::new(
        "Links",
        vec![ContentBlock::label_value("Site", "https://example.com/site")],
    )]);
    let bytes = folio::export_pdf(&doc, &StyleConfig::default()).unwrap();
    let text = pdf_text(&bytes);
    assert!(text.contains("/Annots ["));
    assert!(text.contains("/S /URI"));
    assert!(text.contains("/URI (https://folio.example.com/briefs)"));
    assert!(text.contains("/URI (https://example.com/site)"));
}

#[test]
fn test_metadata_in_output() {
    let mut doc = brief(vec![]);
    doc.metadata.author = Some("Survey Team".to_string());
    let bytes = folio::export_pdf(&doc, &StyleConfig::default()).unwrap();
    let text = pdf_text(&bytes);
    assert!(text.contains("/Title (Harbor Bridge)"));
    assert!(text.contains("/Author (Survey Team)"));
    assert!(text.contains("/Subject (North approach retrofit)"));
}

#[test]
fn test_total_pages_in_footer() {
    let mut style = StyleConfig::default();
    style.footer.page_label = "Page {{pageNumber}} of {{totalPages}}".to_string();
    let doc = brief(vec![Section::new(
        "Narrative",
        vec![ContentBlock::text(&long_paragraph(2000))],
    )]);
    let (bytes, summary) = folio::export_pdf_with_summary(&doc, &style).unwrap();
    let streams = pdf_streams(&bytes);
    let n = summary.page_count;
    assert!(n > 1);
    for page in 1..=n {
        assert!(streams.contains(&format!("(Page {page} of {n}) Tj")));
    }
    assert!(!streams.contains("totalPages"));
}

#[test]
fn test_total_pages_literal_in_brief_text_is_kept() {
    let mut style = StyleConfig::default();
    style.footer.page_label = "Page {{pageNumber}} of {{totalPages}}".to_string();
    let doc = brief(vec![Section::new(
        "Templates",
        vec![ContentBlock::text("Footers use {{totalPages}} for the count")],
    )]);
    let streams = pdf_streams(&folio::export_pdf(&doc, &style).unwrap());
    assert!(streams.contains("(Footers use {{totalPages}} for the count) Tj"));
    assert!(streams.contains("(Page 1 of 1) Tj"));
}

#[test]
fn test_bullet_glyph_encoded_as_winansi() {
    let doc = brief(vec![Section::new(
        "List",
        vec![ContentBlock::bullets(["one"])],
    )]);
    let streams = pdf_streams(&folio::export_pdf(&doc, &StyleConfig::default()).unwrap());
    assert!(streams.contains("(\\225) Tj"));
}

#[test]
fn test_write_to_conventional_file_name() {
    let doc = brief(vec![Section::new(
        "Overview",
        vec![ContentBlock::label_value("Status", "Active")],
    )]);
    let (bytes, summary) = folio::export_pdf_with_summary(&doc, &StyleConfig::default()).unwrap();
    assert!(summary.file_name.starts_with("Brief_Harbor_Bridge_"));
    assert!(summary.file_name.ends_with(".pdf"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(&summary.file_name);
    std::fs::write(&path, &bytes).unwrap();
    assert_valid_pdf(&std::fs::read(&path).unwrap());
}
