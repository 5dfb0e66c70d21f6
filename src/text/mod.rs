//! # Text Measurement
//!
//! String widths and greedy word wrapping, using the standard font metrics
//! from the [`FontContext`]. Both operations are pure: identical inputs
//! always give identical outputs.

use crate::font::{FontContext, FontKey};

/// Slack allowed when comparing accumulated widths against a limit.
const WIDTH_EPSILON: f64 = 1e-9;

/// Measures and wraps text.
#[derive(Default)]
pub struct TextMeasurer {
    fonts: FontContext,
}

impl TextMeasurer {
    pub fn new() -> Self {
        Self {
            fonts: FontContext::new(),
        }
    }

    /// Rendered width of `text` in points.
    pub fn width_of(&self, text: &str, font: &FontKey, size: f64) -> f64 {
        self.fonts.measure_string(text, font, size)
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// Tokens are whitespace-delimited and joined with single spaces. A token
    /// wider than `max_width` sits alone on its own line rather than being
    /// cut. Explicit newlines start a new paragraph; a blank line between
    /// paragraphs is kept as an empty line, but leading and trailing blank
    /// lines are dropped, so empty input gives no lines at all.
    pub fn wrap(&self, text: &str, max_width: f64, font: &FontKey, size: f64) -> Vec<String> {
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            if paragraph.trim().is_empty() {
                lines.push(String::new());
            } else {
                self.wrap_paragraph(paragraph, max_width, font, size, &mut lines);
            }
        }

        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        let first_content = lines
            .iter()
            .position(|line| !line.is_empty())
            .unwrap_or(lines.len());
        lines.drain(..first_content);

        lines
    }

    fn wrap_paragraph(
        &self,
        paragraph: &str,
        max_width: f64,
        font: &FontKey,
        size: f64,
        lines: &mut Vec<String>,
    ) {
        let space_width = self.width_of(" ", font, size);
        let mut line = String::new();
        let mut line_width = 0.0;

        for token in paragraph.split_whitespace() {
            let token_width = self.width_of(token, font, size);

            if line.is_empty() {
                line.push_str(token);
                line_width = token_width;
                continue;
            }

            if line_width + space_width + token_width <= max_width + WIDTH_EPSILON {
                line.push(' ');
                line.push_str(token);
                line_width += space_width + token_width;
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(token);
                line_width = token_width;
            }
        }

        if !line.is_empty() {
            lines.push(line);
        }
    }
}
