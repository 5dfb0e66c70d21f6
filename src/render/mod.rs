//! # Renderer Boundary
//!
//! The layout core never encodes output itself. It calls outward through the
//! [`Renderer`] trait with absolute, top-left based coordinates (y grows
//! down the page) and never reads anything back.
//!
//! Two implementations ship with the crate: [`crate::pdf::PdfRenderer`]
//! writes a PDF file, and [`RecordingRenderer`] keeps an in-memory log of
//! every call for tests and layout debugging.

pub mod record;

pub use record::{DrawOp, Recording, RecordingRenderer};

use crate::error::Result;
use crate::font::FontKey;
use crate::image_loader::LoadedImage;
use crate::style::Color;

/// Drawing capability consumed by the page flow, chrome and block renderer.
pub trait Renderer {
    /// What [`Renderer::save`] produces.
    type Output;

    /// Open a new, empty page. Every drawing call targets the most recently
    /// opened page.
    fn new_page(&mut self) -> Result<()>;

    /// Draw a single line of text with its baseline at `y`.
    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font: &FontKey,
        size: f64,
        color: Color,
    ) -> Result<()>;

    /// Stroke a straight line.
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, width: f64)
        -> Result<()>;

    /// Place an image in the box whose top-left corner is `(x, y)`.
    fn draw_image(&mut self, image: &LoadedImage, x: f64, y: f64, width: f64, height: f64)
        -> Result<()>;

    /// Make the box whose top-left corner is `(x, y)` a clickable link.
    fn add_link(&mut self, x: f64, y: f64, width: f64, height: f64, url: &str) -> Result<()>;

    /// Draw the footer's page label. `{{totalPages}}` in `text` stands for
    /// the final page count; renderers that know it at save time resolve it
    /// there. Plain [`Renderer::draw_text`] never substitutes anything.
    fn draw_page_label(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font: &FontKey,
        size: f64,
        color: Color,
    ) -> Result<()> {
        self.draw_text(text, x, y, font, size, color)
    }

    /// Tell the renderer the final page count before saving, so it can
    /// resolve page-label totals.
    fn set_page_count(&mut self, _total: usize) -> Result<()> {
        Ok(())
    }

    /// Finish the document and produce the output.
    fn save(self) -> Result<Self::Output>
    where
        Self: Sized;
}
