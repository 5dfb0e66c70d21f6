//! # Folio
//!
//! A paginating PDF exporter for structured project briefs.
//!
//! A brief is an ordered list of sections made of typed content blocks:
//! label/value fields, paragraphs, bullet lists and headings. Folio flows
//! them *into* fixed-size pages. Before anything is placed, the layout asks
//! whether it fits on the current page; if not, the page is closed (footer),
//! a new one is opened (header) and the content continues there. Nothing is
//! laid out on a tall canvas and sliced afterwards.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    Document: metadata, sections, content blocks
//!       ↓
//!   [export]   Drives one export: laying out, then finalizing
//!       ↓
//!   [layout]   PageFlow (cursor + page breaks), chrome, block rendering
//!       ↓      [text] wraps and measures with [font] metrics
//!   [render]   Renderer trait
//!       ↓
//!   [pdf]      PDF bytes          (or RecordingRenderer for tests)
//! ```
//!
//! Styling is a single immutable [`style::StyleConfig`] passed in at call
//! time.

pub mod error;
pub mod export;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod render;
pub mod style;
pub mod text;

pub use error::{FolioError, Result};
pub use export::{suggested_file_name, DocumentExporter, ExportSummary};
pub use model::{ContentBlock, Document, Metadata, Section};
pub use style::StyleConfig;

use chrono::Utc;
use pdf::{PdfInfo, PdfRenderer};

/// Export a document to PDF bytes.
///
/// This is the primary entry point. Use [`DocumentExporter`] directly to
/// pick another renderer or to get the [`ExportSummary`].
pub fn export_pdf(document: &Document, style: &StyleConfig) -> Result<Vec<u8>> {
    export_pdf_with_summary(document, style).map(|(bytes, _)| bytes)
}

/// Export a document to PDF bytes, with page count and file name.
pub fn export_pdf_with_summary(
    document: &Document,
    style: &StyleConfig,
) -> Result<(Vec<u8>, ExportSummary)> {
    let now = Utc::now();
    let (width, height) = style.page_size.dimensions();
    let renderer = PdfRenderer::new(width, height, PdfInfo::from_metadata(&document.metadata, now));
    DocumentExporter::with_clock(style, now).export(document, renderer)
}

/// Export a document given as JSON to PDF bytes.
pub fn export_json(json: &str, style: &StyleConfig) -> Result<Vec<u8>> {
    let document: Document = serde_json::from_str(json)?;
    export_pdf(&document, style)
}
