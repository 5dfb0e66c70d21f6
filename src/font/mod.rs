//! # Font Management
//!
//! Resolves font descriptors to the standard PDF fonts and provides their
//! metrics for measurement. Standard fonts need no embedding, so the PDF
//! renderer and the measurer agree on widths by construction.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use std::collections::HashMap;

/// A font descriptor: family, weight, and slant.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
}

impl FontKey {
    pub fn new(family: &str, weight: u32, italic: bool) -> Self {
        Self {
            family: family.to_string(),
            weight,
            italic,
        }
    }

    pub fn regular(family: &str) -> Self {
        Self::new(family, 400, false)
    }

    pub fn bold(family: &str) -> Self {
        Self::new(family, 700, false)
    }

    pub fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

/// The standard PDF fonts Folio prints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    /// The PDF BaseFont name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    /// Width metrics. Obliques share the widths of their upright face.
    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => &metrics::HELVETICA,
            Self::HelveticaBold | Self::HelveticaBoldOblique => &metrics::HELVETICA_BOLD,
            Self::Courier
            | Self::CourierBold
            | Self::CourierOblique
            | Self::CourierBoldOblique => &metrics::COURIER,
        }
    }
}

/// Maps font descriptors to standard fonts.
pub struct FontRegistry {
    fonts: HashMap<FontKey, StandardFont>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let standard_mappings = [
            (("Helvetica", 400, false), StandardFont::Helvetica),
            (("Helvetica", 700, false), StandardFont::HelveticaBold),
            (("Helvetica", 400, true), StandardFont::HelveticaOblique),
            (("Helvetica", 700, true), StandardFont::HelveticaBoldOblique),
            (("Courier", 400, false), StandardFont::Courier),
            (("Courier", 700, false), StandardFont::CourierBold),
            (("Courier", 400, true), StandardFont::CourierOblique),
            (("Courier", 700, true), StandardFont::CourierBoldOblique),
        ];

        let fonts = standard_mappings
            .into_iter()
            .map(|((family, weight, italic), font)| (FontKey::new(family, weight, italic), font))
            .collect();

        Self { fonts }
    }

    /// Look up a font, snapping the weight to regular/bold and falling back
    /// to Helvetica for unknown families.
    pub fn resolve(&self, key: &FontKey) -> StandardFont {
        let snapped_weight = if key.is_bold() { 700 } else { 400 };
        let snapped = FontKey::new(&key.family, snapped_weight, key.italic);
        if let Some(font) = self.fonts.get(&snapped) {
            return *font;
        }

        match (snapped_weight, key.italic) {
            (700, true) => StandardFont::HelveticaBoldOblique,
            (700, false) => StandardFont::HelveticaBold,
            (_, true) => StandardFont::HelveticaOblique,
            _ => StandardFont::Helvetica,
        }
    }
}

/// Shared font context used by measurement and PDF serialization.
#[derive(Default)]
pub struct FontContext {
    registry: FontRegistry,
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, font: &FontKey, font_size: f64) -> f64 {
        self.registry.resolve(font).metrics().char_width(ch, font_size)
    }

    /// Measure the width of a string in points.
    pub fn measure_string(&self, text: &str, font: &FontKey, font_size: f64) -> f64 {
        self.registry
            .resolve(font)
            .metrics()
            .measure_string(text, font_size)
    }

    /// Resolve a descriptor to the standard font that will be printed.
    pub fn resolve(&self, font: &FontKey) -> StandardFont {
        self.registry.resolve(font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_context_helvetica() {
        let ctx = FontContext::new();
        let w = ctx.char_width(' ', &FontKey::regular("Helvetica"), 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn test_font_context_bold_wider() {
        let ctx = FontContext::new();
        let regular = ctx.measure_string("brief", &FontKey::regular("Helvetica"), 12.0);
        let bold = ctx.measure_string("brief", &FontKey::bold("Helvetica"), 12.0);
        assert!(bold > regular, "Bold should be wider than regular");
    }

    #[test]
    fn test_font_context_fallback() {
        let ctx = FontContext::new();
        let w1 = ctx.char_width('A', &FontKey::regular("Helvetica"), 12.0);
        let w2 = ctx.char_width('A', &FontKey::regular("UnknownFont"), 12.0);
        assert!((w1 - w2).abs() < 0.001);
        assert_eq!(
            ctx.resolve(&FontKey::bold("UnknownFont")),
            StandardFont::HelveticaBold
        );
    }

    #[test]
    fn test_font_context_weight_resolution() {
        let ctx = FontContext::new();
        assert_eq!(
            ctx.resolve(&FontKey::new("Helvetica", 800, false)),
            StandardFont::HelveticaBold
        );
        assert_eq!(
            ctx.resolve(&FontKey::new("Courier", 300, false)),
            StandardFont::Courier
        );
    }
}
