//! Highlight model.
//!
//! A highlight is one saved excerpt read from the GoodLinks export, together
//! with the metadata of the link it was taken from. Highlights are immutable
//! once read and only live for a single run.

use chrono::{DateTime, Utc};

/// A highlight exported from GoodLinks.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    /// GoodLinks highlight id
    pub id: String,

    /// Id of the saved link this highlight belongs to
    pub link_id: String,

    /// The highlighted text
    pub text: String,

    /// Optional note attached to the highlight
    pub note: Option<String>,

    /// When the highlight was made
    pub highlighted_at: Option<DateTime<Utc>>,

    /// Title of the source article
    pub source_title: Option<String>,

    /// URL of the source article
    pub source_url: Option<String>,

    /// Author of the source article
    pub source_author: Option<String>,
}

impl Highlight {
    /// Create a highlight with only an id and text; metadata is empty.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            link_id: String::new(),
            text: text.into(),
            note: None,
            highlighted_at: None,
            source_title: None,
            source_url: None,
            source_author: None,
        }
    }

    /// Attach source title and URL.
    #[must_use]
    pub fn with_source(mut self, title: impl Into<String>, url: impl Into<String>) -> Self {
        self.source_title = non_empty(Some(title.into()));
        self.source_url = non_empty(Some(url.into()));
        self
    }

    /// Attach a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = non_empty(Some(note.into()));
        self
    }

    /// Only highlights with visible text are worth sending.
    pub fn is_eligible(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Convert a GoodLinks `time` value (Unix seconds, fractional) to UTC.
///
/// Returns `None` for NaN, infinities and values chrono cannot represent.
#[must_use]
pub fn timestamp_from_unix_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    #[allow(clippy::cast_possible_truncation)]
    let secs = whole as i64;
    DateTime::from_timestamp(secs, nanos)
}

/// Normalize empty or whitespace-only strings to `None`.
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
