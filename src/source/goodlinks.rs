//! GoodLinks SQLite export reader.
//!
//! GoodLinks keeps its library in a SQLite database inside its macOS group
//! container. Highlights live in the `highlight` table and point at a row of
//! the `link` table through `linkId`:
//!
//! ```text
//! highlight(id, linkId, content, note, time, color)
//! link(id, url, title, author, ...)
//! ```
//!
//! `time` is a Unix timestamp in (fractional) seconds. The database is only
//! ever opened read-only.

use crate::error::{Error, Result};
use crate::model::{non_empty, timestamp_from_unix_seconds, Highlight};

use chrono::{DateTime, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};
use std::path::Path;
use std::time::Duration;

const SELECT_HIGHLIGHTS: &str = "
    SELECT h.id, h.linkId, h.content, h.note, h.time, l.url, l.title, l.author
    FROM highlight h
    JOIN link l ON h.linkId = l.id
    WHERE ?1 IS NULL OR h.time > ?1
    ORDER BY h.time ASC
";

/// Read-only handle on a GoodLinks database.
#[derive(Debug)]
pub struct GoodLinksSource {
    conn: Connection,
}

/// One joined row before validation.
struct RawHighlight {
    id: Option<String>,
    link_id: Option<String>,
    content: Option<String>,
    note: Option<String>,
    time: Option<f64>,
    url: Option<String>,
    title: Option<String>,
    author: Option<String>,
}

impl GoodLinksSource {
    /// Open the GoodLinks database at `path` read-only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] if the file does not exist, or a
    /// database error if it cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::SourceNotFound {
                path: path.to_path_buf(),
            });
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        // GoodLinks may be writing while we read
        conn.busy_timeout(Duration::from_secs(5))?;

        tracing::debug!(path = %path.display(), "opened GoodLinks database");
        Ok(Self { conn })
    }

    /// Wrap an existing connection (for testing).
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Read highlights joined with their link, oldest first.
    ///
    /// With `since`, only highlights made strictly after that instant are
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails (for example when the file
    /// is not a GoodLinks database), or [`Error::MalformedRecord`] for a row
    /// without a usable id.
    pub fn fetch_highlights(&self, since: Option<DateTime<Utc>>) -> Result<Vec<Highlight>> {
        #[allow(clippy::cast_precision_loss)]
        let since_secs = since.map(|ts| ts.timestamp_micros() as f64 / 1_000_000.0);

        let mut stmt = self.conn.prepare(SELECT_HIGHLIGHTS)?;
        let rows = stmt.query_map([since_secs], |row| {
            Ok(RawHighlight {
                id: text_column(row, 0)?,
                link_id: text_column(row, 1)?,
                content: row.get(2)?,
                note: row.get(3)?,
                time: row.get(4)?,
                url: row.get(5)?,
                title: row.get(6)?,
                author: row.get(7)?,
            })
        })?;

        let mut highlights = Vec::new();
        for (index, row) in rows.enumerate() {
            highlights.push(row?.into_highlight(index)?);
        }

        tracing::debug!(count = highlights.len(), "read GoodLinks highlights");
        Ok(highlights)
    }
}

impl RawHighlight {
    fn into_highlight(self, index: usize) -> Result<Highlight> {
        let id = self.id.ok_or_else(|| Error::MalformedRecord {
            id: format!("row {}", index + 1),
            message: "highlight has no id".to_string(),
        })?;

        let highlighted_at = match self.time {
            Some(secs) => {
                let ts = timestamp_from_unix_seconds(secs);
                if ts.is_none() {
                    tracing::warn!(%id, time = secs, "ignoring unrepresentable highlight time");
                }
                ts
            }
            None => None,
        };

        Ok(Highlight {
            link_id: self.link_id.unwrap_or_default(),
            text: self.content.unwrap_or_default(),
            note: non_empty(self.note),
            highlighted_at,
            source_title: non_empty(self.title),
            source_url: non_empty(self.url),
            source_author: non_empty(self.author),
            id,
        })
    }
}

/// Read an id column that GoodLinks may store as text or as an integer.
fn text_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
    })
}
