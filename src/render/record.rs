//! An in-memory [`Renderer`] that records every call.
//!
//! Used by the test suites to assert on what the layout core drew, and handy
//! for dumping a layout as JSON when debugging pagination.

use serde::Serialize;

use super::Renderer;
use crate::error::{FolioError, Result};
use crate::font::FontKey;
use crate::image_loader::LoadedImage;
use crate::style::Color;

/// One recorded drawing call. `page` is the 1-based page it landed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    NewPage {
        page: usize,
    },
    Text {
        page: usize,
        text: String,
        x: f64,
        y: f64,
        bold: bool,
        size: f64,
    },
    Line {
        page: usize,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Image {
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Link {
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        url: String,
    },
}

/// The output of a [`RecordingRenderer`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    pub ops: Vec<DrawOp>,
    pub page_count: usize,
    /// The total stamped during finalization, if any.
    pub stamped_total: Option<usize>,
}

impl Recording {
    /// All text runs in draw order, with their page.
    pub fn texts(&self) -> impl Iterator<Item = (usize, &str)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { page, text, .. } => Some((*page, text.as_str())),
            _ => None,
        })
    }

    /// Text runs drawn on `page`.
    pub fn texts_on_page(&self, page: usize) -> Vec<&str> {
        self.texts()
            .filter(|(p, _)| *p == page)
            .map(|(_, t)| t)
            .collect()
    }

    /// Number of text runs exactly equal to `needle`.
    pub fn count_text(&self, needle: &str) -> usize {
        self.texts().filter(|(_, t)| *t == needle).count()
    }

    /// Page on which `needle` was drawn first.
    pub fn page_of(&self, needle: &str) -> Option<usize> {
        self.texts().find(|(_, t)| *t == needle).map(|(p, _)| p)
    }

    pub fn links(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Link { .. }))
    }
}

/// Records calls instead of drawing them.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    recording: Recording,
    fail_images: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose `draw_image` always fails, for exercising fallbacks.
    pub fn failing_images() -> Self {
        Self {
            fail_images: true,
            ..Self::default()
        }
    }

    fn current_page(&self) -> Result<usize> {
        match self.recording.page_count {
            0 => Err(FolioError::RenderError(
                "drawing before the first page was opened".to_string(),
            )),
            n => Ok(n),
        }
    }
}

impl Renderer for RecordingRenderer {
    type Output = Recording;

    fn new_page(&mut self) -> Result<()> {
        self.recording.page_count += 1;
        self.recording.ops.push(DrawOp::NewPage {
            page: self.recording.page_count,
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font: &FontKey,
        size: f64,
        _color: Color,
    ) -> Result<()> {
        let page = self.current_page()?;
        self.recording.ops.push(DrawOp::Text {
            page,
            text: text.to_string(),
            x,
            y,
            bold: font.is_bold(),
            size,
        });
        Ok(())
    }

    fn draw_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        _color: Color,
        _width: f64,
    ) -> Result<()> {
        let page = self.current_page()?;
        self.recording.ops.push(DrawOp::Line { page, x1, y1, x2, y2 });
        Ok(())
    }

    fn draw_image(
        &mut self,
        _image: &LoadedImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let page = self.current_page()?;
        if self.fail_images {
            return Err(FolioError::RenderError("image drawing disabled".to_string()));
        }
        self.recording.ops.push(DrawOp::Image {
            page,
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn add_link(&mut self, x: f64, y: f64, width: f64, height: f64, url: &str) -> Result<()> {
        let page = self.current_page()?;
        self.recording.ops.push(DrawOp::Link {
            page,
            x,
            y,
            width,
            height,
            url: url.to_string(),
        });
        Ok(())
    }

    fn set_page_count(&mut self, total: usize) -> Result<()> {
        self.recording.stamped_total = Some(total);
        Ok(())
    }

    fn save(self) -> Result<Recording> {
        Ok(self.recording)
    }
}
