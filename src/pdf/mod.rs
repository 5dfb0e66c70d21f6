//! # PDF Writer
//!
//! A [`Renderer`] that writes a PDF 1.7 file from scratch. Drawing calls are
//! turned into content-stream operators as they arrive; the object graph is
//! only assembled in [`PdfRenderer::save`], once the page count is final.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree, fonts, images, pages, ...
//! ...
//! xref                <- byte offsets of each object
//! trailer             <- points to the catalog and info dictionary
//! %%EOF
//! ```
//!
//! Text uses the standard Type1 fonts with WinAnsiEncoding, so nothing is
//! embedded. Coordinates arrive top-left based and are flipped here.

use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use chrono::{DateTime, Utc};
use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::{FolioError, Result};
use crate::font::{FontKey, FontRegistry, StandardFont};
use crate::image_loader::{ImagePixelData, JpegColorSpace, LoadedImage};
use crate::model::Metadata;
use crate::render::Renderer;
use crate::style::Color;

const TOTAL_PAGES_PLACEHOLDER: &str = "{{totalPages}}";

/// Entries for the PDF Info dictionary.
#[derive(Debug, Clone)]
pub struct PdfInfo {
    pub title: String,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creation_date: DateTime<Utc>,
}

impl PdfInfo {
    pub fn from_metadata(metadata: &Metadata, exported_at: DateTime<Utc>) -> Self {
        Self {
            title: metadata.subject_name.clone(),
            author: metadata.author.clone(),
            subject: Some(metadata.subtitle.clone()).filter(|s| !s.trim().is_empty()),
            creation_date: exported_at,
        }
    }
}

struct LinkAnnotation {
    /// PDF user-space rectangle: x1 y1 x2 y2.
    rect: [f64; 4],
    url: String,
}

#[derive(Default)]
struct PdfPage {
    content: String,
    links: Vec<LinkAnnotation>,
    /// Indices into `PdfRenderer::images` used on this page.
    images: Vec<usize>,
    /// Byte offsets in `content` where the page total goes, ascending.
    total_slots: Vec<usize>,
}

impl PdfPage {
    /// The content stream with the page total written into its slots.
    fn resolved_content(&self, total: &str) -> String {
        let mut out =
            String::with_capacity(self.content.len() + total.len() * self.total_slots.len());
        let mut last = 0;
        for &slot in &self.total_slots {
            out.push_str(&self.content[last..slot]);
            out.push_str(total);
            last = slot;
        }
        out.push_str(&self.content[last..]);
        out
    }
}

struct PdfObject {
    data: Vec<u8>,
}

/// Writes pages into a PDF byte vector.
pub struct PdfRenderer {
    page_width: f64,
    page_height: f64,
    info: PdfInfo,
    registry: FontRegistry,
    pages: Vec<PdfPage>,
    /// Fonts in first-use order; index `i` is resource `/F{i}`.
    fonts: Vec<StandardFont>,
    /// Distinct images; index `i` is resource `/Im{i}`.
    images: Vec<LoadedImage>,
    total_pages: Option<usize>,
}

impl PdfRenderer {
    pub fn new(page_width: f64, page_height: f64, info: PdfInfo) -> Self {
        Self {
            page_width,
            page_height,
            info,
            registry: FontRegistry::new(),
            pages: Vec::new(),
            fonts: Vec::new(),
            images: Vec::new(),
            total_pages: None,
        }
    }

    fn current_page(&mut self) -> Result<&mut PdfPage> {
        self.pages.last_mut().ok_or_else(|| {
            FolioError::RenderError("drawing before the first page was opened".to_string())
        })
    }

    fn font_index(&mut self, key: &FontKey) -> usize {
        let font = self.registry.resolve(key);
        match self.fonts.iter().position(|f| *f == font) {
            Some(i) => i,
            None => {
                self.fonts.push(font);
                self.fonts.len() - 1
            }
        }
    }

    fn image_index(&mut self, image: &LoadedImage) -> usize {
        match self.images.iter().position(|i| i == image) {
            Some(i) => i,
            None => {
                self.images.push(image.clone());
                self.images.len() - 1
            }
        }
    }

    /// Flip a top-left based y to PDF user space.
    fn flip(&self, y: f64) -> f64 {
        self.page_height - y
    }

    /// Escape special characters in a PDF string literal.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Encode text as a WinAnsi string literal body. Characters outside the
    /// encoding become `?`.
    fn encode_winansi(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            let b = Self::unicode_to_winansi(ch).unwrap_or(b'?');
            match b {
                b'\\' => out.push_str("\\\\"),
                b'(' => out.push_str("\\("),
                b')' => out.push_str("\\)"),
                0x20..=0x7E => out.push(b as char),
                _ => {
                    let _ = write!(out, "\\{:03o}", b);
                }
            }
        }
        out
    }

    /// Map a Unicode codepoint to its Windows-1252 byte.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82), // Single low-9 quotation mark
            0x0192 => Some(0x83), // Latin small letter f with hook
            0x201E => Some(0x84), // Double low-9 quotation mark
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86), // Dagger
            0x2021 => Some(0x87), // Double dagger
            0x02C6 => Some(0x88), // Modifier letter circumflex accent
            0x2030 => Some(0x89), // Per mille sign
            0x0160 => Some(0x8A), // Latin capital letter S with caron
            0x2039 => Some(0x8B), // Single left-pointing angle quotation
            0x0152 => Some(0x8C), // Latin capital ligature OE
            0x017D => Some(0x8E), // Latin capital letter Z with caron
            0x2018 => Some(0x91), // Left single quotation mark
            0x2019 => Some(0x92), // Right single quotation mark
            0x201C => Some(0x93), // Left double quotation mark
            0x201D => Some(0x94), // Right double quotation mark
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96), // En dash
            0x2014 => Some(0x97), // Em dash
            0x02DC => Some(0x98), // Small tilde
            0x2122 => Some(0x99), // Trade mark sign
            0x0161 => Some(0x9A), // Latin small letter s with caron
            0x203A => Some(0x9B), // Single right-pointing angle quotation
            0x0153 => Some(0x9C), // Latin small ligature oe
            0x017E => Some(0x9E), // Latin small letter z with caron
            0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
            _ => None,
        }
    }

    fn pdf_date(date: &DateTime<Utc>) -> String {
        date.format("D:%Y%m%d%H%M%SZ").to_string()
    }

    fn push_stream(objects: &mut Vec<PdfObject>, dict_entries: &str, payload: &[u8]) -> usize {
        let id = objects.len();
        let mut data: Vec<u8> = Vec::new();
        let _ = write!(
            data,
            "<< {} /Length {} >>\nstream\n",
            dict_entries,
            payload.len()
        );
        data.extend_from_slice(payload);
        data.extend_from_slice(b"\nendstream");
        objects.push(PdfObject { data });
        id
    }

    fn push_object(objects: &mut Vec<PdfObject>, data: String) -> usize {
        let id = objects.len();
        objects.push(PdfObject {
            data: data.into_bytes(),
        });
        id
    }

    /// Write one image as an XObject, preceded by its SMask if it has one.
    fn write_image_xobject(objects: &mut Vec<PdfObject>, image: &LoadedImage) -> usize {
        match &image.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                let color_space = match color_space {
                    JpegColorSpace::DeviceRGB => "/DeviceRGB",
                    JpegColorSpace::DeviceGray => "/DeviceGray",
                    JpegColorSpace::DeviceCMYK { inverted: false } => "/DeviceCMYK",
                    JpegColorSpace::DeviceCMYK { inverted: true } => {
                        "/DeviceCMYK /Decode [1 0 1 0 1 0 1 0]"
                    }
                };
                let dict = format!(
                    "/Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace {} /BitsPerComponent 8 /Filter /DCTDecode",
                    image.width_px, image.height_px, color_space
                );
                Self::push_stream(objects, &dict, data)
            }
            ImagePixelData::Decoded { rgb, alpha } => {
                let smask_ref = alpha
                    .as_ref()
                    .map(|alpha| {
                        let dict = format!(
                            "/Type /XObject /Subtype /Image /Width {} /Height {} \
                             /ColorSpace /DeviceGray /BitsPerComponent 8 /Filter /FlateDecode",
                            image.width_px, image.height_px
                        );
                        let id = Self::push_stream(objects, &dict, &compress_to_vec_zlib(alpha, 6));
                        format!(" /SMask {} 0 R", id)
                    })
                    .unwrap_or_default();

                let dict = format!(
                    "/Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode{}",
                    image.width_px, image.height_px, smask_ref
                );
                Self::push_stream(objects, &dict, &compress_to_vec_zlib(rgb, 6))
            }
        }
    }

    fn write_info(&self, objects: &mut Vec<PdfObject>) -> usize {
        let mut info = String::from("<< ");
        let _ = write!(info, "/Title ({}) ", Self::encode_winansi(&self.info.title));
        if let Some(author) = &self.info.author {
            let _ = write!(info, "/Author ({}) ", Self::encode_winansi(author));
        }
        if let Some(subject) = &self.info.subject {
            let _ = write!(info, "/Subject ({}) ", Self::encode_winansi(subject));
        }
        let _ = write!(
            info,
            "/CreationDate ({}) /Producer (Folio {}) /Creator (Folio) >>",
            Self::pdf_date(&self.info.creation_date),
            env!("CARGO_PKG_VERSION")
        );
        Self::push_object(objects, info)
    }

    /// Serialize objects with the xref table and trailer.
    fn serialize(objects: &[PdfObject], info_obj_id: usize) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(
            output,
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len(),
            info_obj_id,
            xref_offset
        );
        output
    }
}

impl Renderer for PdfRenderer {
    type Output = Vec<u8>;

    fn new_page(&mut self) -> Result<()> {
        self.pages.push(PdfPage::default());
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font: &FontKey,
        size: f64,
        color: Color,
    ) -> Result<()> {
        let font_idx = self.font_index(font);
        let pdf_y = self.flip(y);
        let encoded = Self::encode_winansi(text);
        let page = self.current_page()?;
        let _ = write!(
            page.content,
            "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            color.r, color.g, color.b, font_idx, size, x, pdf_y, encoded
        );
        Ok(())
    }

    fn draw_page_label(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font: &FontKey,
        size: f64,
        color: Color,
    ) -> Result<()> {
        let font_idx = self.font_index(font);
        let pdf_y = self.flip(y);
        let page = self.current_page()?;
        let _ = write!(
            page.content,
            "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n(",
            color.r, color.g, color.b, font_idx, size, x, pdf_y
        );
        for (i, part) in text.split(TOTAL_PAGES_PLACEHOLDER).enumerate() {
            if i > 0 {
                page.total_slots.push(page.content.len());
            }
            page.content.push_str(&Self::encode_winansi(part));
        }
        page.content.push_str(") Tj\nET\n");
        Ok(())
    }

    fn draw_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        width: f64,
    ) -> Result<()> {
        let (py1, py2) = (self.flip(y1), self.flip(y2));
        let page = self.current_page()?;
        let _ = write!(
            page.content,
            "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
            color.r, color.g, color.b, width, x1, py1, x2, py2
        );
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &LoadedImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        if width <= 0.0 || height <= 0.0 {
            return Err(FolioError::RenderError(format!(
                "image box {width}x{height} has no area"
            )));
        }
        self.current_page()?;
        let img_idx = self.image_index(image);
        let pdf_y = self.flip(y + height);
        let page = self.current_page()?;
        let _ = write!(
            page.content,
            "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
            width, height, x, pdf_y, img_idx
        );
        if !page.images.contains(&img_idx) {
            page.images.push(img_idx);
        }
        Ok(())
    }

    fn add_link(&mut self, x: f64, y: f64, width: f64, height: f64, url: &str) -> Result<()> {
        let rect = [x, self.flip(y + height), x + width, self.flip(y)];
        self.current_page()?.links.push(LinkAnnotation {
            rect,
            url: url.to_string(),
        });
        Ok(())
    }

    fn set_page_count(&mut self, total: usize) -> Result<()> {
        self.total_pages = Some(total);
        Ok(())
    }

    fn save(self) -> Result<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(FolioError::RenderError("document has no pages".to_string()));
        }
        let total = self.total_pages.unwrap_or(self.pages.len()).to_string();

        // 0 = placeholder (objects are 1-indexed), 1 = Catalog, 2 = Pages
        let mut objects: Vec<PdfObject> = (0..3).map(|_| PdfObject { data: vec![] }).collect();

        let mut fonts = self.fonts.clone();
        if fonts.is_empty() {
            fonts.push(StandardFont::Helvetica);
        }
        let font_resources = fonts
            .iter()
            .enumerate()
            .map(|(i, font)| {
                let id = Self::push_object(
                    &mut objects,
                    format!(
                        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                        font.pdf_name()
                    ),
                );
                format!("/F{} {} 0 R", i, id)
            })
            .collect::<Vec<_>>()
            .join(" ");

        let image_ids: Vec<usize> = self
            .images
            .iter()
            .map(|image| Self::write_image_xobject(&mut objects, image))
            .collect();

        let mut page_obj_ids: Vec<usize> = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let annot_ids: Vec<usize> = page
                .links
                .iter()
                .map(|link| {
                    let [x1, y1, x2, y2] = link.rect;
                    Self::push_object(
                        &mut objects,
                        format!(
                            "<< /Type /Annot /Subtype /Link /Rect [{:.2} {:.2} {:.2} {:.2}] \
                             /Border [0 0 0] /A << /S /URI /URI ({}) >> >>",
                            x1,
                            y1,
                            x2,
                            y2,
                            Self::escape_pdf_string(&link.url)
                        ),
                    )
                })
                .collect();

            let content = page.resolved_content(&total);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);
            let content_id = Self::push_stream(&mut objects, "/Filter /FlateDecode", &compressed);

            let mut resources = format!("/Font << {} >>", font_resources);
            if !page.images.is_empty() {
                let xobjects = page
                    .images
                    .iter()
                    .map(|&i| format!("/Im{} {} 0 R", i, image_ids[i]))
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = write!(resources, " /XObject << {} >>", xobjects);
            }
            let annots = if annot_ids.is_empty() {
                String::new()
            } else {
                let refs = annot_ids
                    .iter()
                    .map(|id| format!("{} 0 R", id))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!(" /Annots [{}]", refs)
            };

            let page_id = Self::push_object(
                &mut objects,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                     /Contents {} 0 R /Resources << {} >>{} >>",
                    self.page_width, self.page_height, content_id, resources, annots
                ),
            );
            page_obj_ids.push(page_id);
        }

        objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();
        let kids = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_id = self.write_info(&mut objects);
        log::debug!(
            "serialized {} pages, {} fonts, {} images into {} objects",
            page_obj_ids.len(),
            fonts.len(),
            image_ids.len(),
            objects.len()
        );
        Ok(Self::serialize(&objects, info_id))
    }
}
