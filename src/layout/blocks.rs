//! # Block Rendering
//!
//! Draws each content-block variant at the flow's cursor, breaking pages as
//! needed. The heart of it is [`BlockRenderer::flow_lines`], the overflow
//! continuation loop: commit the lines that fit, break the page, continue
//! with the rest. Lines are wrapped exactly once up front, so a line never
//! changes its words when it moves to a later page, and nothing is drawn
//! twice or skipped.

use super::page_break::{self, BreakDecision};
use super::{PageChrome, PageFlow};
use crate::error::{FolioError, Result};
use crate::font::FontKey;
use crate::model::{ContentBlock, Metadata};
use crate::render::Renderer;
use crate::style::{Color, StyleConfig};
use crate::text::TextMeasurer;

/// Typography for one run of wrapped lines.
struct LineStyle<'s> {
    font: FontKey,
    size: f64,
    line_height: f64,
    color: Color,
    href: Option<&'s str>,
}

/// Renders content blocks through a [`PageFlow`].
pub struct BlockRenderer<'a> {
    style: &'a StyleConfig,
    measurer: &'a TextMeasurer,
}

impl<'a> BlockRenderer<'a> {
    pub fn new(style: &'a StyleConfig, measurer: &'a TextMeasurer) -> Self {
        Self { style, measurer }
    }

    /// Render one block at the cursor.
    pub fn render<R: Renderer, C: PageChrome>(
        &self,
        flow: &mut PageFlow<'_, R, C>,
        block: &ContentBlock,
    ) -> Result<()> {
        log::debug!(
            "{} at page {} y={:.2}",
            block.kind_name(),
            flow.cursor().page_index,
            flow.cursor().y
        );
        match block {
            ContentBlock::LabelValue { label, value } => self.render_label_value(flow, label, value),
            ContentBlock::TextBlock { text } => self.render_text_block(flow, text),
            ContentBlock::BulletList { items } => self.render_bullet_list(flow, items),
            ContentBlock::SectionTitle { text } => self.render_section_title(flow, text),
        }
    }

    /// The subject name and subtitle printed before the first section.
    pub fn render_document_title<R: Renderer, C: PageChrome>(
        &self,
        flow: &mut PageFlow<'_, R, C>,
        metadata: &Metadata,
    ) -> Result<()> {
        let style = self.style;
        let x = flow.cursor().content_left();
        let width = flow.cursor().content_width();

        let title = LineStyle {
            font: FontKey::bold(&style.font_family),
            size: style.document_title_size,
            line_height: style.document_title_size * style.line_height,
            color: style.colors.text,
            href: None,
        };
        let lines = self
            .measurer
            .wrap(&metadata.subject_name, width, &title.font, title.size);
        self.flow_lines(flow, &lines, x, &title)?;

        let subtitle = self.body_style(style.colors.muted, None);
        let lines = self
            .measurer
            .wrap(&metadata.subtitle, width, &subtitle.font, subtitle.size);
        self.flow_lines(flow, &lines, x, &subtitle)?;

        flow.advance_gap(style.block_spacing);
        Ok(())
    }

    /// A wrapped paragraph. Empty text draws nothing and adds no spacing.
    pub fn render_text_block<R: Renderer, C: PageChrome>(
        &self,
        flow: &mut PageFlow<'_, R, C>,
        text: &str,
    ) -> Result<()> {
        let line_style = self.body_style(self.style.colors.text, None);
        let lines = self.measurer.wrap(
            text,
            flow.cursor().content_width(),
            &line_style.font,
            line_style.size,
        );
        if lines.is_empty() {
            return Ok(());
        }

        let x = flow.cursor().content_left();
        self.flow_lines(flow, &lines, x, &line_style)?;
        flow.advance_gap(self.style.block_spacing);
        Ok(())
    }

    /// Bold label and value on one line when they fit, otherwise the value
    /// wraps below the label starting at the label's x. A label wider than
    /// the content area wraps too.
    pub fn render_label_value<R: Renderer, C: PageChrome>(
        &self,
        flow: &mut PageFlow<'_, R, C>,
        label: &str,
        value: &str,
    ) -> Result<()> {
        let style = self.style;
        let value = value.trim();
        let (value, color, href) = if value.is_empty() {
            (style.empty_value.as_str(), style.colors.muted, None)
        } else if is_url(value) {
            (value, style.colors.link, Some(value))
        } else {
            (value, style.colors.text, None)
        };

        let label_font = FontKey::bold(&style.font_family);
        let value_style = self.body_style(color, href);
        let size = value_style.size;
        let line_height = value_style.line_height;
        let x = flow.cursor().content_left();
        let content_width = flow.cursor().content_width();

        let label_width = self.measurer.width_of(label, &label_font, size);
        let value_width = self.measurer.width_of(value, &value_style.font, size);

        if label_width > content_width {
            let label_style = LineStyle {
                font: label_font,
                size,
                line_height,
                color: style.colors.text,
                href: None,
            };
            let label_lines = self
                .measurer
                .wrap(label, content_width, &label_style.font, size);
            self.flow_lines(flow, &label_lines, x, &label_style)?;
            let lines = self
                .measurer
                .wrap(value, content_width, &value_style.font, size);
            return self.flow_lines(flow, &lines, x, &value_style);
        }

        let same_line = !value.contains('\n')
            && label_width + style.label_gap + value_width <= content_width;

        flow.ensure_space(line_height)?;
        let baseline = flow.cursor().y + size;
        flow.renderer()
            .draw_text(label, x, baseline, &label_font, size, style.colors.text)?;

        if same_line {
            let value_x = x + label_width + style.label_gap;
            self.draw_line_text(flow, value, value_x, &value_style)?;
            flow.advance(line_height);
            return Ok(());
        }

        flow.advance(line_height);
        let lines = self
            .measurer
            .wrap(value, content_width, &value_style.font, size);
        self.flow_lines(flow, &lines, x, &value_style)
    }

    /// Bulleted items with a hanging indent, each kept together when it fits
    /// on a page.
    pub fn render_bullet_list<R: Renderer, C: PageChrome>(
        &self,
        flow: &mut PageFlow<'_, R, C>,
        items: &[String],
    ) -> Result<()> {
        let style = self.style;
        let item_style = self.body_style(style.colors.text, None);
        let size = item_style.size;
        let line_height = item_style.line_height;
        let x = flow.cursor().content_left();
        let indent = self
            .measurer
            .width_of(&format!("{} ", style.bullet), &item_style.font, size);
        let text_width = flow.cursor().content_width() - indent;

        let mut drawn_any = false;
        for item in items {
            let lines = self.measurer.wrap(item, text_width, &item_style.font, size);
            if lines.is_empty() {
                continue;
            }
            if drawn_any {
                flow.advance_gap(style.bullet_item_spacing);
            }

            let decision = page_break::decide_break(
                flow.cursor().remaining(),
                line_height,
                lines.len(),
                flow.fresh_page_capacity(),
                flow.at_page_top(),
            );
            match decision {
                BreakDecision::Place => {}
                BreakDecision::MoveToNextPage => flow.new_page()?,
                BreakDecision::Split {
                    lines_on_current_page: 0,
                } => flow.new_page()?,
                BreakDecision::Split { .. } => {
                    log::debug!(
                        "bullet item of {} lines is taller than a page, splitting",
                        lines.len()
                    );
                }
            }

            // The bullet rides with the item's first line, which fits here now
            let baseline = flow.cursor().y + size;
            flow.renderer().draw_text(
                &style.bullet,
                x,
                baseline,
                &item_style.font,
                size,
                style.colors.accent,
            )?;
            self.flow_lines(flow, &lines, x + indent, &item_style)?;
            drawn_any = true;
        }

        if drawn_any {
            flow.advance_gap(style.block_spacing);
        }
        Ok(())
    }

    /// A heading with a rule `rule_gap` below it.
    pub fn render_section_title<R: Renderer, C: PageChrome>(
        &self,
        flow: &mut PageFlow<'_, R, C>,
        text: &str,
    ) -> Result<()> {
        let style = self.style;
        let font = FontKey::bold(&style.font_family);
        let size = style.title_font_size;
        let title_height = style.title_line_height();
        let x = flow.cursor().content_left();
        let width = flow.cursor().content_width();

        let mut lines = self.measurer.wrap(text, width, &font, size);
        if lines.is_empty() {
            lines.push(String::new());
        }
        let block_height = title_height * lines.len() as f64 + style.rule_gap;
        flow.ensure_space(block_height)?;

        for line in &lines {
            let baseline = flow.cursor().y + size;
            if !line.is_empty() {
                flow.renderer()
                    .draw_text(line, x, baseline, &font, size, style.colors.accent)?;
            }
            flow.advance(title_height);
        }

        let rule_y = flow.cursor().y + style.rule_gap;
        flow.renderer().draw_line(
            x,
            rule_y,
            x + width,
            rule_y,
            style.colors.rule,
            style.rule_width,
        )?;
        flow.advance(style.rule_gap);
        flow.advance_gap(style.rule_gap);
        Ok(())
    }

    fn body_style<'s>(&self, color: Color, href: Option<&'s str>) -> LineStyle<'s> {
        LineStyle {
            font: FontKey::regular(&self.style.font_family),
            size: self.style.font_size,
            line_height: self.style.body_line_height(),
            color,
            href,
        }
    }

    /// Overflow continuation: draw pre-wrapped `lines` starting at the
    /// cursor, breaking pages as often as needed.
    ///
    /// Each pass draws the `k` lines that fit, then breaks. A fresh page
    /// always holds at least one line (checked below), so every pass makes
    /// progress and the loop ends.
    fn flow_lines<R: Renderer, C: PageChrome>(
        &self,
        flow: &mut PageFlow<'_, R, C>,
        lines: &[String],
        x: f64,
        line_style: &LineStyle<'_>,
    ) -> Result<()> {
        let mut rest = lines;

        while !rest.is_empty() {
            let fit = flow.lines_that_fit(line_style.line_height).min(rest.len());
            if fit == 0 {
                if flow.at_page_top() {
                    return Err(FolioError::LayoutError(format!(
                        "a {:.2}pt line cannot fit on an empty page ({:.2}pt available)",
                        line_style.line_height,
                        flow.fresh_page_capacity()
                    )));
                }
                flow.new_page()?;
                continue;
            }

            let (now, later) = rest.split_at(fit);
            for line in now {
                if !line.is_empty() {
                    self.draw_line_text(flow, line, x, line_style)?;
                }
                flow.advance(line_style.line_height);
            }

            rest = later;
            if !rest.is_empty() {
                flow.new_page()?;
            }
        }

        Ok(())
    }

    /// Draw one line at the cursor, linking it when the style carries a URL.
    fn draw_line_text<R: Renderer, C: PageChrome>(
        &self,
        flow: &mut PageFlow<'_, R, C>,
        text: &str,
        x: f64,
        line_style: &LineStyle<'_>,
    ) -> Result<()> {
        let top = flow.cursor().y;
        flow.renderer().draw_text(
            text,
            x,
            top + line_style.size,
            &line_style.font,
            line_style.size,
            line_style.color,
        )?;
        if let Some(url) = line_style.href {
            let width = self
                .measurer
                .width_of(text, &line_style.font, line_style.size);
            flow.renderer()
                .add_link(x, top, width, line_style.line_height, url)?;
        }
        Ok(())
    }
}

fn is_url(value: &str) -> bool {
    (value.starts_with("https://") || value.starts_with("http://"))
        && !value.contains(char::is_whitespace)
}
