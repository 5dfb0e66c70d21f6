//! # Page Flow
//!
//! The layout state machine for one export. There is exactly one mutable
//! layout position, the [`Cursor`], and it is owned by [`PageFlow`]. Block
//! code reads the position and moves it only through the flow, so there is
//! no hidden coupling between helpers.
//!
//! The flow works *into* pages rather than onto a tall canvas:
//!
//! 1. Open a page: ask the renderer for it, draw the header, start below it.
//! 2. Before placing content, ask: "does this fit?" (`ensure_space`).
//! 3. If not, close the page (draw its footer), open the next, continue.
//! 4. When the document ends, draw the last footer.
//!
//! Footers are deferred: the footer of a page is drawn when the page is
//! left, stamped with that page's index and the running break count.

pub mod blocks;
pub mod chrome;
pub mod page_break;

pub use blocks::BlockRenderer;
pub use chrome::{BrandChrome, PageChrome};

use crate::error::{FolioError, Result};
use crate::render::Renderer;

/// Slack for comparisons against the bottom limit.
const EPSILON: f64 = 1e-6;

/// Where we are on the current page.
///
/// `y` grows downward from the top edge. After every render call
/// `margin <= y <= page_height - margin` holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub page_index: usize,
    pub y: f64,
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
}

impl Cursor {
    fn new(page_width: f64, page_height: f64, margin: f64) -> Self {
        Self {
            page_index: 1,
            y: margin,
            page_width,
            page_height,
            margin,
        }
    }

    /// Left edge of the content area.
    pub fn content_left(&self) -> f64 {
        self.margin
    }

    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Lowest y content may reach.
    pub fn bottom(&self) -> f64 {
        self.page_height - self.margin
    }

    /// Vertical space left on this page.
    pub fn remaining(&self) -> f64 {
        (self.bottom() - self.y).max(0.0)
    }

    /// Would `height` more points still end above the bottom limit?
    pub fn fits(&self, height: f64) -> bool {
        self.y + height <= self.bottom() + EPSILON
    }

    pub fn is_within_bounds(&self) -> bool {
        self.y >= self.margin - EPSILON && self.y <= self.bottom() + EPSILON
    }
}

/// Snapshot of a page handed to the chrome hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFrame {
    /// 1-based page index.
    pub page_index: usize,
    /// Page breaks taken before this page was opened.
    pub breaks: usize,
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
}

/// Totals reported when the flow finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSummary {
    pub pages: usize,
    pub breaks: usize,
}

/// Owns the cursor and performs page breaks, header and footer included.
pub struct PageFlow<'a, R: Renderer, C: PageChrome> {
    renderer: &'a mut R,
    chrome: &'a C,
    cursor: Cursor,
    header_height: f64,
    pending_footer: Option<PageFrame>,
    breaks: usize,
}

impl<'a, R: Renderer, C: PageChrome> PageFlow<'a, R, C> {
    /// Open page 1 and draw its header.
    pub fn start(
        renderer: &'a mut R,
        chrome: &'a C,
        page_width: f64,
        page_height: f64,
        margin: f64,
    ) -> Result<Self> {
        if margin < 0.0 || page_width - 2.0 * margin <= 0.0 || page_height - 2.0 * margin <= 0.0 {
            return Err(FolioError::LayoutError(format!(
                "margin {margin} leaves no content area on a {page_width}x{page_height} page"
            )));
        }

        let mut flow = Self {
            renderer,
            chrome,
            cursor: Cursor::new(page_width, page_height, margin),
            header_height: 0.0,
            pending_footer: None,
            breaks: 0,
        };
        flow.renderer.new_page()?;
        flow.open_page()?;
        Ok(flow)
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// The renderer, for drawing at the current position.
    pub fn renderer(&mut self) -> &mut R {
        &mut *self.renderer
    }

    /// Page breaks taken so far.
    pub fn breaks(&self) -> usize {
        self.breaks
    }

    /// y at which content starts on a freshly opened page.
    pub fn content_top(&self) -> f64 {
        self.cursor.margin + self.header_height
    }

    /// Usable height of an empty page.
    pub fn fresh_page_capacity(&self) -> f64 {
        self.cursor.bottom() - self.content_top()
    }

    /// Is nothing placed on this page yet?
    pub fn at_page_top(&self) -> bool {
        (self.cursor.y - self.content_top()).abs() < EPSILON
    }

    /// Whole lines of `line_height` that still fit on this page.
    pub fn lines_that_fit(&self, line_height: f64) -> usize {
        page_break::lines_that_fit(self.cursor.remaining(), line_height, usize::MAX)
    }

    /// Break to a new page unless `height` fits below the cursor. Returns
    /// whether a break happened.
    pub fn ensure_space(&mut self, height: f64) -> Result<bool> {
        if self.cursor.fits(height) {
            return Ok(false);
        }
        if self.at_page_top() {
            return Err(FolioError::LayoutError(format!(
                "{height:.2}pt of content cannot fit on an empty page ({:.2}pt available)",
                self.fresh_page_capacity()
            )));
        }
        self.new_page()?;
        if !self.cursor.fits(height) {
            return Err(FolioError::LayoutError(format!(
                "{height:.2}pt of content cannot fit on an empty page ({:.2}pt available)",
                self.fresh_page_capacity()
            )));
        }
        Ok(true)
    }

    /// Close the current page and open the next one.
    pub fn new_page(&mut self) -> Result<()> {
        self.flush_footer()?;
        self.renderer.new_page()?;
        self.cursor.page_index += 1;
        self.cursor.y = self.cursor.margin;
        self.breaks += 1;
        log::debug!(
            "page break #{} -> page {}",
            self.breaks,
            self.cursor.page_index
        );
        self.open_page()
    }

    /// Move down by `dy` of content. Content never crosses the bottom limit;
    /// doing so is a layout bug.
    pub fn advance(&mut self, dy: f64) {
        self.cursor.y += dy;
        debug_assert!(
            self.cursor.is_within_bounds(),
            "cursor left the content area: y={} bottom={}",
            self.cursor.y,
            self.cursor.bottom()
        );
    }

    /// Move down by `dy` of blank spacing, stopping at the bottom limit.
    pub fn advance_gap(&mut self, dy: f64) {
        self.cursor.y = (self.cursor.y + dy).min(self.cursor.bottom());
    }

    /// Draw the last footer and report totals.
    pub fn finish(mut self) -> Result<FlowSummary> {
        self.flush_footer()?;
        Ok(FlowSummary {
            pages: self.cursor.page_index,
            breaks: self.breaks,
        })
    }

    fn frame(&self) -> PageFrame {
        PageFrame {
            page_index: self.cursor.page_index,
            breaks: self.breaks,
            page_width: self.cursor.page_width,
            page_height: self.cursor.page_height,
            margin: self.cursor.margin,
        }
    }

    fn open_page(&mut self) -> Result<()> {
        let frame = self.frame();
        let header_height = self.chrome.header(&mut *self.renderer, &frame)?;
        if !self.cursor.fits(header_height) {
            return Err(FolioError::LayoutError(format!(
                "header of {header_height:.2}pt leaves no room for content"
            )));
        }
        self.header_height = header_height;
        self.cursor.y = self.cursor.margin + header_height;
        self.pending_footer = Some(frame);
        Ok(())
    }

    fn flush_footer(&mut self) -> Result<()> {
        if let Some(frame) = self.pending_footer.take() {
            self.chrome.footer(&mut *self.renderer, &frame)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::render::{Recording, RecordingRenderer};

    /// Chrome that draws a marker text in the header and footer.
    pub(crate) struct MarkerChrome {
        pub header_height: f64,
    }

    impl PageChrome for MarkerChrome {
        fn header<R: Renderer>(&self, renderer: &mut R, frame: &PageFrame) -> Result<f64> {
            renderer.draw_text(
                &format!("header {}", frame.page_index),
                frame.margin,
                frame.margin,
                &crate::font::FontKey::regular("Helvetica"),
                4.0,
                crate::style::Color::BLACK,
            )?;
            Ok(self.header_height)
        }

        fn footer<R: Renderer>(&self, renderer: &mut R, frame: &PageFrame) -> Result<()> {
            renderer.draw_text(
                &format!("footer {} after {} breaks", frame.page_index, frame.breaks),
                frame.margin,
                frame.page_height - frame.margin / 2.0,
                &crate::font::FontKey::regular("Helvetica"),
                4.0,
                crate::style::Color::BLACK,
            )
        }
    }

    fn run<F>(f: F) -> Recording
    where
        F: FnOnce(&mut PageFlow<RecordingRenderer, MarkerChrome>),
    {
        let mut renderer = RecordingRenderer::new();
        let chrome = MarkerChrome {
            header_height: 20.0,
        };
        let mut flow = PageFlow::start(&mut renderer, &chrome, 100.0, 100.0, 10.0).unwrap();
        f(&mut flow);
        flow.finish().unwrap();
        renderer.save().unwrap()
    }

    #[test]
    fn start_opens_first_page_below_header() {
        let mut renderer = RecordingRenderer::new();
        let chrome = MarkerChrome {
            header_height: 20.0,
        };
        let flow = PageFlow::start(&mut renderer, &chrome, 100.0, 100.0, 10.0).unwrap();
        assert_eq!(flow.cursor().page_index, 1);
        assert_eq!(flow.cursor().y, 30.0);
        assert_eq!(flow.fresh_page_capacity(), 60.0);
        assert!(flow.at_page_top());
    }

    #[test]
    fn ensure_space_breaks_only_when_needed() {
        let rec = run(|flow| {
            assert!(!flow.ensure_space(60.0).unwrap());
            flow.advance(50.0);
            assert!(!flow.ensure_space(10.0).unwrap());
            assert_eq!(flow.breaks(), 0);
            assert!(flow.ensure_space(10.5).unwrap());
            assert_eq!(flow.breaks(), 1);
            assert_eq!(flow.cursor().page_index, 2);
            assert_eq!(flow.cursor().y, 30.0);
        });
        assert_eq!(rec.page_count, 2);
    }

    #[test]
    fn ensure_space_rejects_content_taller_than_a_page() {
        let mut renderer = RecordingRenderer::new();
        let chrome = MarkerChrome {
            header_height: 20.0,
        };
        let mut flow = PageFlow::start(&mut renderer, &chrome, 100.0, 100.0, 10.0).unwrap();
        let err = flow.ensure_space(61.0).unwrap_err();
        assert!(matches!(err, FolioError::LayoutError(_)));
    }

    #[test]
    fn header_then_footer_once_per_page_in_order() {
        let rec = run(|flow| {
            flow.new_page().unwrap();
            flow.new_page().unwrap();
        });
        let texts: Vec<&str> = rec.texts().map(|(_, t)| t).collect();
        assert_eq!(
            texts,
            [
                "header 1",
                "footer 1 after 0 breaks",
                "header 2",
                "footer 2 after 1 breaks",
                "header 3",
                "footer 3 after 2 breaks",
            ]
        );
        assert_eq!(rec.page_of("footer 2 after 1 breaks"), Some(2));
    }

    #[test]
    fn gap_is_clamped_to_bottom() {
        run(|flow| {
            flow.advance(55.0);
            flow.advance_gap(20.0);
            assert_eq!(flow.cursor().y, 90.0);
            assert!(flow.cursor().is_within_bounds());
        });
    }

    #[test]
    fn rejects_margin_without_content_area() {
        let mut renderer = RecordingRenderer::new();
        let chrome = MarkerChrome { header_height: 0.0 };
        let result = PageFlow::start(&mut renderer, &chrome, 100.0, 100.0, 50.0);
        assert!(matches!(result, Err(FolioError::LayoutError(_))));
    }
}
