//! Readwise highlight payload and the GoodLinks → Readwise field mapping.
//!
//! The mapping is driven by [`FIELD_MAP`], an ordered table of
//! `(SourceField, TargetField)` pairs. Both sides are enums, so adding a field
//! on one side without handling it on the other fails to compile.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::error::Result;
use crate::model::Highlight;

/// `source_type` sent with every highlight; identifies this integration.
pub const SOURCE_TYPE: &str = "goodlinks";

/// Readwise category for GoodLinks content.
pub const CATEGORY: &str = "articles";

/// Fields readable from a GoodLinks highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceField {
    Content,
    LinkTitle,
    LinkAuthor,
    LinkUrl,
    Note,
    Time,
}

/// Fields of a Readwise highlight that are filled from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetField {
    Text,
    Title,
    Author,
    SourceUrl,
    Note,
    HighlightedAt,
}

impl TargetField {
    /// JSON field name in the Readwise API.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Title => "title",
            Self::Author => "author",
            Self::SourceUrl => "source_url",
            Self::Note => "note",
            Self::HighlightedAt => "highlighted_at",
        }
    }

    /// Maximum length Readwise accepts, in characters.
    #[must_use]
    pub const fn max_chars(self) -> Option<usize> {
        match self {
            Self::Text | Self::Note => Some(8191),
            Self::Title => Some(511),
            Self::Author => Some(1024),
            Self::SourceUrl | Self::HighlightedAt => None,
        }
    }
}

/// GoodLinks → Readwise field mapping, in payload order.
pub const FIELD_MAP: &[(SourceField, TargetField)] = &[
    (SourceField::Content, TargetField::Text),
    (SourceField::LinkTitle, TargetField::Title),
    (SourceField::LinkAuthor, TargetField::Author),
    (SourceField::LinkUrl, TargetField::SourceUrl),
    (SourceField::Note, TargetField::Note),
    (SourceField::Time, TargetField::HighlightedAt),
];

/// One highlight as accepted by `POST /api/v2/highlights/`.
///
/// Optional fields are omitted rather than sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadwiseHighlight {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub source_type: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted_at: Option<String>,
}

impl ReadwiseHighlight {
    fn empty() -> Self {
        Self {
            text: String::new(),
            title: None,
            author: None,
            source_url: None,
            source_type: SOURCE_TYPE.to_string(),
            category: CATEGORY.to_string(),
            note: None,
            highlighted_at: None,
        }
    }

    fn set(&mut self, field: TargetField, value: String) {
        match field {
            TargetField::Text => self.text = value,
            TargetField::Title => self.title = Some(value),
            TargetField::Author => self.author = Some(value),
            TargetField::SourceUrl => self.source_url = Some(value),
            TargetField::Note => self.note = Some(value),
            TargetField::HighlightedAt => self.highlighted_at = Some(value),
        }
    }
}

/// Request body: the API wraps the list in a `highlights` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateHighlightsRequest {
    pub highlights: Vec<ReadwiseHighlight>,
}

impl CreateHighlightsRequest {
    #[must_use]
    pub fn len(&self) -> usize {
        self.highlights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }
}

fn source_value(highlight: &Highlight, field: SourceField) -> Option<String> {
    match field {
        SourceField::Content => Some(highlight.text.clone()),
        SourceField::LinkTitle => highlight.source_title.clone(),
        SourceField::LinkAuthor => highlight.source_author.clone(),
        SourceField::LinkUrl => highlight.source_url.clone(),
        SourceField::Note => highlight.note.clone(),
        SourceField::Time => highlight
            .highlighted_at
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
    }
}

/// Cut `value` to at most `max` characters without splitting a code point.
fn clamp_chars(mut value: String, max: usize) -> String {
    if let Some((byte_idx, _)) = value.char_indices().nth(max) {
        value.truncate(byte_idx);
    }
    value
}

/// Map a GoodLinks highlight to its Readwise form.
///
/// Returns `None` for highlights without visible text.
#[must_use]
pub fn map_highlight(highlight: &Highlight) -> Option<ReadwiseHighlight> {
    if !highlight.is_eligible() {
        return None;
    }

    let mut target = ReadwiseHighlight::empty();
    for &(source, field) in FIELD_MAP {
        if let Some(value) = source_value(highlight, source) {
            let value = match field.max_chars() {
                Some(max) => clamp_chars(value, max),
                None => value,
            };
            target.set(field, value);
        }
    }
    Some(target)
}

/// Pretty-printed JSON of exactly what would be posted.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_preview(request: &CreateHighlightsRequest) -> Result<String> {
    Ok(serde_json::to_string_pretty(request)?)
}
