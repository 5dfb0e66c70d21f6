//! # Document Export
//!
//! Drives one export from start to finish:
//!
//! 1. **Laying out**: open page 1, draw the title block, then every section
//!    and block in order through the [`PageFlow`].
//! 2. **Finalizing**: draw the last footer, tell the renderer the total page
//!    count, and save.
//!
//! The optional header logo is loaded before layout begins. If it cannot be
//! loaded the export carries on with the text brand.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::image_loader::{self, LoadedImage};
use crate::layout::chrome::relative_time;
use crate::layout::{BlockRenderer, BrandChrome, PageFlow};
use crate::model::Document;
use crate::render::Renderer;
use crate::style::StyleConfig;
use crate::text::TextMeasurer;

/// What an export produced besides the output itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub page_count: usize,
    pub page_breaks: usize,
    /// Conventional file name for the output.
    pub file_name: String,
}

/// Exports documents with one style.
pub struct DocumentExporter<'a> {
    style: &'a StyleConfig,
    measurer: TextMeasurer,
    now: DateTime<Utc>,
}

impl<'a> DocumentExporter<'a> {
    pub fn new(style: &'a StyleConfig) -> Self {
        Self::with_clock(style, Utc::now())
    }

    /// An exporter that treats `now` as the export time.
    pub fn with_clock(style: &'a StyleConfig, now: DateTime<Utc>) -> Self {
        Self {
            style,
            measurer: TextMeasurer::new(),
            now,
        }
    }

    /// Lay out `document` through `renderer` and save it.
    pub fn export<R: Renderer>(
        &self,
        document: &Document,
        mut renderer: R,
    ) -> Result<(R::Output, ExportSummary)> {
        let style = self.style;
        let (page_width, page_height) = style.page_size.dimensions();
        log::debug!(
            "exporting '{}': {} sections, {} blocks",
            document.metadata.subject_name,
            document.sections.len(),
            document.block_count()
        );

        let generated_label = format!(
            "Generated {}",
            relative_time(document.metadata.generated_at, self.now)
        );
        let chrome = BrandChrome::new(style, &self.measurer, self.load_logo(), generated_label);
        let blocks = BlockRenderer::new(style, &self.measurer);

        let mut flow = PageFlow::start(&mut renderer, &chrome, page_width, page_height, style.margin)?;
        blocks.render_document_title(&mut flow, &document.metadata)?;
        for section in &document.sections {
            blocks.render_section_title(&mut flow, &section.title)?;
            for block in &section.blocks {
                blocks.render(&mut flow, block)?;
            }
        }

        let flow_summary = flow.finish()?;
        renderer.set_page_count(flow_summary.pages)?;
        let output = renderer.save()?;

        let summary = ExportSummary {
            page_count: flow_summary.pages,
            page_breaks: flow_summary.breaks,
            file_name: suggested_file_name(
                &style.filename_prefix,
                &document.metadata.subject_name,
                self.now.date_naive(),
            ),
        };
        log::info!(
            "exported '{}' to {} page(s) ({} break(s))",
            document.metadata.subject_name,
            summary.page_count,
            summary.page_breaks
        );
        Ok((output, summary))
    }

    fn load_logo(&self) -> Option<LoadedImage> {
        let src = self.style.header.logo.as_deref()?;
        match image_loader::load_image(src) {
            Ok(image) => Some(image),
            Err(e) => {
                log::warn!("header logo unavailable, using text brand: {e}");
                None
            }
        }
    }
}

/// `<prefix>_<subject>_<YYYY-MM-DD>.pdf`, safe to use as a file name.
pub fn suggested_file_name(prefix: &str, subject_name: &str, date: NaiveDate) -> String {
    let cleaned: String = subject_name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect();
    let mut subject = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    if subject.is_empty() {
        subject = "Untitled".to_string();
    }
    format!("{}_{}_{}.pdf", prefix, subject, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentBlock, Metadata, Section};
    use crate::render::{DrawOp, RecordingRenderer};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    fn brief() -> Document {
        Document::new(
            Metadata::new("Harbor Bridge", "Structural survey", now() - Duration::hours(3)),
            vec![
                Section::new(
                    "Overview",
                    vec![
                        ContentBlock::label_value("Status", "Active"),
                        ContentBlock::text("The survey covers all four spans."),
                    ],
                ),
                Section::new("Risks", vec![ContentBlock::bullets(["Corrosion", "Traffic"])]),
            ],
        )
    }

    #[test]
    fn exports_in_order_with_chrome() {
        let style = StyleConfig::default();
        let exporter = DocumentExporter::with_clock(&style, now());
        let (rec, summary) = exporter.export(&brief(), RecordingRenderer::new()).unwrap();

        assert_eq!(summary.page_count, 1);
        assert_eq!(summary.page_breaks, 0);
        assert_eq!(rec.stamped_total, Some(1));

        let texts: Vec<&str> = rec.texts().map(|(_, t)| t).collect();
        let pos = |s: &str| texts.iter().position(|t| *t == s).unwrap();
        assert!(pos("FOLIO") < pos("Harbor Bridge"));
        assert!(pos("Harbor Bridge") < pos("Overview"));
        assert!(pos("Overview") < pos("Status"));
        assert!(pos("Status") < pos("Risks"));
        assert!(pos("Corrosion") < pos("Traffic"));
        assert_eq!(texts.last(), Some(&"Page 1"));
        assert!(texts.contains(&"Generated 3 hours ago"));
    }

    #[test]
    fn summary_carries_file_name() {
        let style = StyleConfig::default();
        let exporter = DocumentExporter::with_clock(&style, now());
        let (_, summary) = exporter.export(&brief(), RecordingRenderer::new()).unwrap();
        assert_eq!(summary.file_name, "Brief_Harbor_Bridge_2026-10-16.pdf");
    }

    #[test]
    fn broken_logo_falls_back_to_text() {
        let mut style = StyleConfig::default();
        style.header.logo = Some("/no/such/logo.png".to_string());
        let exporter = DocumentExporter::with_clock(&style, now());
        let (rec, summary) = exporter.export(&brief(), RecordingRenderer::new()).unwrap();
        assert_eq!(summary.page_count, 1);
        assert_eq!(rec.count_text("FOLIO"), 1);
        assert!(!rec.ops.iter().any(|op| matches!(op, DrawOp::Image { .. })));
    }

    #[test]
    fn failed_image_draw_falls_back_to_text() {
        let png = {
            let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([0, 0, 255, 255]));
            let mut buf = Vec::new();
            let encoder = image::codecs::png::PngEncoder::new(&mut buf);
            image::ImageEncoder::write_image(encoder, img.as_raw(), 4, 2, image::ColorType::Rgba8)
                .unwrap();
            buf
        };
        use base64::Engine;
        let mut style = StyleConfig::default();
        style.header.logo = Some(base64::engine::general_purpose::STANDARD.encode(png));

        let exporter = DocumentExporter::with_clock(&style, now());
        let (rec, _) = exporter
            .export(&brief(), RecordingRenderer::failing_images())
            .unwrap();
        assert_eq!(rec.count_text("FOLIO"), 1);

        // With a working renderer the logo is drawn instead of the text
        let (rec, _) = exporter.export(&brief(), RecordingRenderer::new()).unwrap();
        assert_eq!(rec.count_text("FOLIO"), 0);
        assert_eq!(
            rec.ops.iter().filter(|op| matches!(op, DrawOp::Image { .. })).count(),
            1
        );
    }

    #[test]
    fn file_name_convention() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
        assert_eq!(
            suggested_file_name("Brief", "  Harbor   Bridge\tNorth ", date),
            "Brief_Harbor_Bridge_North_2026-01-09.pdf"
        );
        assert_eq!(
            suggested_file_name("Brief", "a/b\\c: d?", date),
            "Brief_abc_d_2026-01-09.pdf"
        );
        assert_eq!(
            suggested_file_name("Brief", "   ", date),
            "Brief_Untitled_2026-01-09.pdf"
        );
    }
}
