//! Structured error types for the Folio exporter.
//!
//! Everything that can abort an export funnels into [`FolioError`]. Header
//! asset problems use [`AssetError`] instead: they are never fatal and are
//! swallowed by the exporter after logging.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FolioError>;

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// JSON input failed to parse as a valid brief or style.
    #[error("Failed to parse document: {source}{}", format_hint(.hint))]
    ParseError {
        source: serde_json::Error,
        hint: String,
    },
    /// A draw primitive or the output serialization failed.
    #[error("Render error: {0}")]
    RenderError(String),
    /// Layout reached a state that cannot make progress.
    #[error("Layout error: {0}")]
    LayoutError(String),
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the brief schema. Check block \"type\" tags and field names.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::ParseError { source: e, hint }
    }
}

/// Why a decorative asset (the header logo) could not be used.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid data URI: {0}")]
    DataUri(String),
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("unsupported image format (expected JPEG or PNG)")]
    Unsupported,
}
