//! Post document model, as delivered by the CMS

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// A blog post document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique human-readable identifier (slug)
    pub uid: String,

    /// CMS document type
    #[serde(rename = "type", default)]
    pub doc_type: String,

    /// First publication date, absent for never-published documents
    #[serde(
        rename = "first_publication_date",
        default,
        deserialize_with = "deserialize_publication_date"
    )]
    pub publication_date: Option<DateTime<FixedOffset>>,

    pub data: PostData,
}

impl Post {
    pub fn title(&self) -> &str {
        &self.data.title
    }

    pub fn content(&self) -> &[ContentBlock] {
        &self.data.content
    }
}

/// The CMS emits offsets without a colon (`+0000`), which RFC 3339 rejects
fn deserialize_publication_date<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| {
        DateTime::parse_from_rfc3339(&s)
            .or_else(|_| DateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%z"))
            .map_err(serde::de::Error::custom)
    })
    .transpose()
}

/// Custom fields of a post document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostData {
    pub title: String,
    #[serde(default)]
    pub banner: Banner,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// Banner image; the URL is passed through untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// A section of a post: a heading followed by rich text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub body: Vec<RichTextSpan>,
}

/// One structured text node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextSpan {
    #[serde(rename = "type", default = "default_node_type")]
    pub kind: String,

    #[serde(default)]
    pub text: String,

    /// Inline formatting over `text`
    #[serde(default)]
    pub spans: Vec<InlineSpan>,

    /// Image source (image nodes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    /// oEmbed payload (embed nodes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oembed: Option<Embed>,
}

fn default_node_type() -> String {
    "paragraph".to_string()
}

impl RichTextSpan {
    /// A plain paragraph node
    pub fn paragraph(text: &str) -> Self {
        Self {
            kind: default_node_type(),
            text: text.to_string(),
            spans: Vec::new(),
            url: None,
            alt: None,
            oembed: None,
        }
    }
}

/// Inline formatting range. Offsets count UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineSpan {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SpanData>,
}

/// Extra payload of hyperlink and label spans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub embed_url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}
