//! # Page Chrome
//!
//! Headers and footers. These are not content blocks: they are applied
//! identically to every page, page 1 included, by the [`super::PageFlow`].

use chrono::{DateTime, Utc};

use super::PageFrame;
use crate::error::Result;
use crate::font::FontKey;
use crate::image_loader::LoadedImage;
use crate::render::Renderer;
use crate::style::StyleConfig;
use crate::text::TextMeasurer;

/// Hooks the page flow calls around every page.
pub trait PageChrome {
    /// Draw the header of a freshly opened page. Returns the height it
    /// consumed below the top margin.
    fn header<R: Renderer>(&self, renderer: &mut R, frame: &PageFrame) -> Result<f64>;

    /// Draw the footer of a page that is being closed.
    fn footer<R: Renderer>(&self, renderer: &mut R, frame: &PageFrame) -> Result<()>;
}

/// The standard chrome: a centered brand mark over a rule at the top, and a
/// footer with the generation time, a reference link and the page label.
pub struct BrandChrome<'a> {
    style: &'a StyleConfig,
    measurer: &'a TextMeasurer,
    logo: Option<LoadedImage>,
    generated_label: String,
}

impl<'a> BrandChrome<'a> {
    /// `logo` is the already-loaded header image, if any. `generated_label`
    /// is the left footer text, computed once per export.
    pub fn new(
        style: &'a StyleConfig,
        measurer: &'a TextMeasurer,
        logo: Option<LoadedImage>,
        generated_label: String,
    ) -> Self {
        Self {
            style,
            measurer,
            logo,
            generated_label,
        }
    }

    /// Try the logo. Returns false when the text brand must be drawn instead.
    fn draw_logo<R: Renderer>(&self, renderer: &mut R, frame: &PageFrame) -> bool {
        let Some(logo) = &self.logo else {
            return false;
        };
        if logo.width_px == 0 || logo.height_px == 0 {
            return false;
        }

        let box_height = self.style.header.brand_height;
        let max_width = frame.page_width - 2.0 * frame.margin;
        let scale = (max_width / logo.width_px as f64).min(box_height / logo.height_px as f64);
        let width = logo.width_px as f64 * scale;
        let height = logo.height_px as f64 * scale;
        let x = (frame.page_width - width) / 2.0;
        let y = frame.margin + (box_height - height) / 2.0;

        match renderer.draw_image(logo, x, y, width, height) {
            Ok(()) => true,
            Err(e) => {
                log::warn!(
                    "header logo could not be drawn on page {}, using text brand: {}",
                    frame.page_index,
                    e
                );
                false
            }
        }
    }

    fn draw_text_brand<R: Renderer>(&self, renderer: &mut R, frame: &PageFrame) -> Result<()> {
        let style = self.style;
        let font = FontKey::bold(&style.font_family);
        let size = style.title_font_size.min(style.header.brand_height);
        let width = self.measurer.width_of(&style.header.brand_text, &font, size);
        let x = (frame.page_width - width) / 2.0;
        // Cap height of Helvetica is roughly 0.72 em
        let baseline = frame.margin + (style.header.brand_height + size * 0.72) / 2.0;
        renderer.draw_text(
            &style.header.brand_text,
            x,
            baseline,
            &font,
            size,
            style.colors.accent,
        )
    }
}

impl PageChrome for BrandChrome<'_> {
    fn header<R: Renderer>(&self, renderer: &mut R, frame: &PageFrame) -> Result<f64> {
        if !self.draw_logo(renderer, frame) {
            self.draw_text_brand(renderer, frame)?;
        }

        let header = &self.style.header;
        let rule_y = frame.margin + header.brand_height + header.spacing;
        renderer.draw_line(
            frame.margin,
            rule_y,
            frame.page_width - frame.margin,
            rule_y,
            self.style.colors.rule,
            self.style.rule_width,
        )?;

        Ok(header.height())
    }

    fn footer<R: Renderer>(&self, renderer: &mut R, frame: &PageFrame) -> Result<()> {
        let style = self.style;
        let footer = &style.footer;
        let font = FontKey::regular(&style.font_family);
        let size = footer.font_size;
        let baseline = frame.page_height - frame.margin + footer.offset;
        let left = frame.margin;
        let right = frame.page_width - frame.margin;

        renderer.draw_text(
            &self.generated_label,
            left,
            baseline,
            &font,
            size,
            style.colors.muted,
        )?;

        let url = &footer.reference_url;
        if !url.is_empty() {
            let url_width = self.measurer.width_of(url, &font, size);
            let url_x = (frame.page_width - url_width) / 2.0;
            renderer.draw_text(url, url_x, baseline, &font, size, style.colors.link)?;
            renderer.add_link(url_x, baseline - size, url_width, size * 1.25, url)?;
        }

        let page_number = frame.page_index.to_string();
        let label = footer.page_label.replace("{{pageNumber}}", &page_number);
        // The total is only known at save time; measure with a same-order stand-in
        let measured = label.replace("{{totalPages}}", &page_number);
        let label_width = self.measurer.width_of(&measured, &font, size);
        renderer.draw_page_label(
            &label,
            right - label_width,
            baseline,
            &font,
            size,
            style.colors.muted,
        )
    }
}

/// Human-readable age of `then` as seen at `now`, e.g. "3 hours ago".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 30 {
        format!("{days} days ago")
    } else {
        format!("on {}", then.format("%Y-%m-%d"))
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}
