//! # Style Configuration
//!
//! Every visual constant the exporter uses (page size, margins, fonts,
//! colors, spacing, header and footer chrome) lives in one immutable
//! [`StyleConfig`] passed in at call time. Layout code never reaches for a
//! module-level constant.
//!
//! The config deserializes from camelCase JSON; any field left out takes the
//! default documented on it.

use serde::{Deserialize, Serialize};

/// Immutable presentation settings for one export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    /// Page size. Defaults to A4.
    pub page_size: PageSize,
    /// Uniform page margin in points. Defaults to 40.
    pub margin: f64,
    /// Font family for all text. Defaults to Helvetica.
    pub font_family: String,
    /// Body text size in points. Defaults to 10.
    pub font_size: f64,
    /// Line height as a multiple of the font size. Defaults to 1.4.
    pub line_height: f64,
    /// Section title size in points. Defaults to 14.
    pub title_font_size: f64,
    /// Size of the subject name in the document title block. Defaults to 18.
    pub document_title_size: f64,
    /// Colors used by blocks and chrome.
    pub colors: Palette,
    /// Vertical space after each block. Defaults to 8.
    pub block_spacing: f64,
    /// Glyph printed before bullet items. Defaults to "•".
    pub bullet: String,
    /// Vertical space between bullet items. Defaults to 2.
    pub bullet_item_spacing: f64,
    /// Horizontal space between a label and its value. Defaults to 6.
    pub label_gap: f64,
    /// Distance between a section title and its rule. Defaults to 4.
    pub rule_gap: f64,
    /// Stroke width of horizontal rules. Defaults to 0.75.
    pub rule_width: f64,
    /// Printed in place of an empty LabelValue value.
    pub empty_value: String,
    /// Header chrome.
    pub header: HeaderConfig,
    /// Footer chrome.
    pub footer: FooterConfig,
    /// First component of the suggested output file name. Defaults to "Brief".
    pub filename_prefix: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin: 40.0,
            font_family: "Helvetica".to_string(),
            font_size: 10.0,
            line_height: 1.4,
            title_font_size: 14.0,
            document_title_size: 18.0,
            colors: Palette::default(),
            block_spacing: 8.0,
            bullet: "\u{2022}".to_string(),
            bullet_item_spacing: 2.0,
            label_gap: 6.0,
            rule_gap: 4.0,
            rule_width: 0.75,
            empty_value: "Not specified".to_string(),
            header: HeaderConfig::default(),
            footer: FooterConfig::default(),
            filename_prefix: "Brief".to_string(),
        }
    }
}

impl StyleConfig {
    /// Height of one body text line.
    pub fn body_line_height(&self) -> f64 {
        self.font_size * self.line_height
    }

    /// Height of one section title line.
    pub fn title_line_height(&self) -> f64 {
        self.title_font_size * self.line_height
    }

    /// Parse a style from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Header drawn at the top of every page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderConfig {
    /// Text brand mark, also the fallback when the logo can't be used.
    pub brand_text: String,
    /// Optional logo: a data URI, raw base64, or a file path.
    pub logo: Option<String>,
    /// Height of the box the brand mark is centered in. Defaults to 24.
    pub brand_height: f64,
    /// Space above and below the header rule. Defaults to 8.
    pub spacing: f64,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            brand_text: "FOLIO".to_string(),
            logo: None,
            brand_height: 24.0,
            spacing: 8.0,
        }
    }
}

impl HeaderConfig {
    /// Vertical space the header consumes below the top margin.
    pub fn height(&self) -> f64 {
        self.brand_height + 2.0 * self.spacing
    }
}

/// Footer drawn in the bottom margin of every page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterConfig {
    /// The reference URL printed (and linked) in the center of every footer.
    pub reference_url: String,
    /// Right-aligned page label. `{{pageNumber}}` and `{{totalPages}}` are
    /// substituted. Defaults to "Page {{pageNumber}}".
    pub page_label: String,
    /// Footer text size. Defaults to 8.
    pub font_size: f64,
    /// Distance from the bottom content limit to the footer baseline.
    /// Defaults to 20.
    pub offset: f64,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            reference_url: "https://folio.example.com/briefs".to_string(),
            page_label: "Page {{pageNumber}}".to_string(),
            font_size: 8.0,
            offset: 20.0,
        }
    }
}

/// Colors used when drawing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Palette {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub rule: Color,
    pub link: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            text: Color::hex("#1a1a24"),
            muted: Color::hex("#6b6b78"),
            accent: Color::hex("#1f3a5f"),
            rule: Color::hex("#c8c8d0"),
            link: Color::hex("#1d5fbf"),
        }
    }
}

/// An RGB color with components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}
