//! # Document Model
//!
//! The input representation for the exporter. A brief is an ordered list of
//! sections, each holding an ordered list of typed content blocks. Order is
//! significant and is preserved in the output.
//!
//! The model is deliberately flat: there is no tree to walk, no styling on
//! individual blocks. Presentation lives entirely in [`crate::style::StyleConfig`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A complete brief ready for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Title-page metadata.
    pub metadata: Metadata,

    /// The sections in print order.
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Document-level metadata printed in the title block and footers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// The project (or person) the brief is about.
    pub subject_name: String,
    /// A free-text line printed under the subject name.
    #[serde(default)]
    pub subtitle: String,
    /// When the brief content was generated. Footers print it relative to
    /// the export time.
    pub generated_at: DateTime<Utc>,
    /// Optional author, written to the PDF Info dictionary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// A titled group of content blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
}

/// One typed unit of document content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// A short bold label with its value, on one line when it fits.
    LabelValue { label: String, value: String },

    /// A paragraph that wraps and may span pages.
    TextBlock { text: String },

    /// Bulleted items, each kept together when possible.
    BulletList { items: Vec<String> },

    /// A heading with a rule beneath it.
    SectionTitle { text: String },
}

impl ContentBlock {
    /// Create a LabelValue block.
    pub fn label_value(label: &str, value: &str) -> Self {
        ContentBlock::LabelValue {
            label: label.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a TextBlock.
    pub fn text(text: &str) -> Self {
        ContentBlock::TextBlock {
            text: text.to_string(),
        }
    }

    /// Create a BulletList from anything yielding string slices.
    pub fn bullets<'a>(items: impl IntoIterator<Item = &'a str>) -> Self {
        ContentBlock::BulletList {
            items: items.into_iter().map(str::to_string).collect(),
        }
    }

    /// Create a SectionTitle block.
    pub fn title(text: &str) -> Self {
        ContentBlock::SectionTitle {
            text: text.to_string(),
        }
    }

    /// Name of the variant, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ContentBlock::LabelValue { .. } => "LabelValue",
            ContentBlock::TextBlock { .. } => "TextBlock",
            ContentBlock::BulletList { .. } => "BulletList",
            ContentBlock::SectionTitle { .. } => "SectionTitle",
        }
    }
}

impl Section {
    pub fn new(title: &str, blocks: Vec<ContentBlock>) -> Self {
        Self {
            title: title.to_string(),
            blocks,
        }
    }
}

impl Document {
    pub fn new(metadata: Metadata, sections: Vec<Section>) -> Self {
        Self { metadata, sections }
    }

    /// Total number of content blocks across all sections.
    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.blocks.len()).sum()
    }
}

impl Metadata {
    pub fn new(subject_name: &str, subtitle: &str, generated_at: DateTime<Utc>) -> Self {
        Self {
            subject_name: subject_name.to_string(),
            subtitle: subtitle.to_string(),
            generated_at,
            author: None,
        }
    }
}
