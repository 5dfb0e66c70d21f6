//! # Header Asset Loading
//!
//! Loads the header logo from a file path, a data URI, or a raw base64
//! string and prepares it for embedding. JPEG bytes pass through untouched
//! (PDF decodes them with DCTDecode). PNG is decoded to RGB with a separate
//! alpha channel for an SMask.
//!
//! Loading happens once per export, before layout starts. A failure here is
//! never fatal: the caller logs it and draws the text brand instead.

use std::io::Cursor;

use base64::Engine;

use crate::error::AssetError;

/// A decoded image ready to hand to a [`crate::render::Renderer`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

/// Pixel data in a form the PDF writer embeds directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ImagePixelData {
    /// Raw JPEG bytes.
    Jpeg {
        data: Vec<u8>,
        color_space: JpegColorSpace,
    },
    /// Decoded pixels.
    Decoded {
        /// width * height * 3 bytes
        rgb: Vec<u8>,
        /// width * height bytes, None when fully opaque
        alpha: Option<Vec<u8>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegColorSpace {
    DeviceRGB,
    DeviceGray,
    /// Four components. Adobe-written files store the inks inverted.
    DeviceCMYK { inverted: bool },
}

/// Load an image from `src`.
///
/// Accepted forms:
/// - `data:image/...;base64,...`
/// - a path starting with `/`, `./` or `../`
/// - raw base64-encoded image bytes
pub fn load_image(src: &str) -> Result<LoadedImage, AssetError> {
    let raw = read_source_bytes(src)?;
    let image = decode_image_bytes(&raw)?;
    log::debug!(
        "loaded header image {}x{} ({} bytes)",
        image.width_px,
        image.height_px,
        raw.len()
    );
    Ok(image)
}

fn read_source_bytes(src: &str) -> Result<Vec<u8>, AssetError> {
    let src = src.trim();
    if let Some(rest) = src.strip_prefix("data:") {
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| AssetError::DataUri("missing comma".to_string()))?;
        if !header.starts_with("image/") {
            return Err(AssetError::DataUri(format!("not an image: '{header}'")));
        }
        if !header.ends_with(";base64") {
            return Err(AssetError::DataUri("only base64 payloads are supported".to_string()));
        }
        return Ok(base64::engine::general_purpose::STANDARD.decode(payload)?);
    }

    // Explicit prefixes only: base64 text may itself contain '/'
    if src.starts_with('/') || src.starts_with("./") || src.starts_with("../") {
        return std::fs::read(src).map_err(|source| AssetError::Read {
            path: src.to_string(),
            source,
        });
    }

    Ok(base64::engine::general_purpose::STANDARD.decode(src)?)
}

fn decode_image_bytes(data: &[u8]) -> Result<LoadedImage, AssetError> {
    if is_jpeg(data) {
        decode_jpeg(data)
    } else if is_png(data) {
        decode_png(data)
    } else {
        Err(AssetError::Unsupported)
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.starts_with(&[0xFF, 0xD8])
}

fn is_png(data: &[u8]) -> bool {
    data.starts_with(&[0x89, b'P', b'N', b'G'])
}

/// Read dimensions without decoding pixels; the bytes are embedded as-is.
fn decode_jpeg(data: &[u8]) -> Result<LoadedImage, AssetError> {
    let (width, height) = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| AssetError::Decode(image::ImageError::IoError(e)))?
        .into_dimensions()?;

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: data.to_vec(),
            color_space: jpeg_color_space(data),
        },
        width_px: width,
        height_px: height,
    })
}

/// Walk the JPEG markers to the start-of-frame segment and read its
/// component count. An APP14 "Adobe" segment before it marks CMYK data as
/// inverted.
fn jpeg_color_space(data: &[u8]) -> JpegColorSpace {
    let mut adobe = false;
    let mut i = 2;
    while i + 3 < data.len() && data[i] == 0xFF {
        let marker = data[i + 1];
        if marker == 0xEE && data.get(i + 4..i + 9) == Some(&b"Adobe"[..]) {
            adobe = true;
        }
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_sof && i + 9 < data.len() {
            return match data[i + 9] {
                1 => JpegColorSpace::DeviceGray,
                4 => JpegColorSpace::DeviceCMYK { inverted: adobe },
                _ => JpegColorSpace::DeviceRGB,
            };
        }
        let segment_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + segment_len;
    }
    JpegColorSpace::DeviceRGB
}

fn decode_png(data: &[u8]) -> Result<LoadedImage, AssetError> {
    let img = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| AssetError::Decode(image::ImageError::IoError(e)))?
        .decode()?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixel_count = width as usize * height as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);

    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }
    let opaque = alpha.iter().all(|&a| a == 255);

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: if opaque { None } else { Some(alpha) },
        },
        width_px: width,
        height_px: height,
    })
}
