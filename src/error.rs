//! Error types for the GoodLinks → Readwise sync.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=config, 3=data read, 4=submission, etc.)
//! - Retryability flags so cron wrappers know whether a re-run can help
//! - Context-aware recovery hints
//! - Structured JSON output for `--json` consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the exit code, JSON consumers on the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Configuration (exit 2)
    MissingToken,
    ConfigError,

    // Data read (exit 3)
    SourceNotFound,
    DatabaseError,
    MalformedRecord,

    // Submission (exit 4)
    SubmissionFailed,
    SubmissionRejected,

    // Validation (exit 5)
    InvalidArgument,

    // Local I/O (exit 6)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::MissingToken => "MISSING_TOKEN",
            Self::ConfigError => "CONFIG_ERROR",
            Self::SourceNotFound => "SOURCE_NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::MalformedRecord => "MALFORMED_RECORD",
            Self::SubmissionFailed => "SUBMISSION_FAILED",
            Self::SubmissionRejected => "SUBMISSION_REJECTED",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-6).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::MissingToken | Self::ConfigError => 2,
            Self::SourceNotFound | Self::DatabaseError | Self::MalformedRecord => 3,
            Self::SubmissionFailed | Self::SubmissionRejected => 4,
            Self::InvalidArgument => 5,
            Self::IoError | Self::JsonError => 6,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur while syncing highlights.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing API token: {var} is not set")]
    MissingToken { var: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GoodLinks database not found at {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Malformed highlight {id}: {message}")]
    MalformedRecord { id: String, message: String },

    #[error("Readwise request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Readwise rejected the submission (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingToken { .. } => ErrorCode::MissingToken,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::SourceNotFound { .. } => ErrorCode::SourceNotFound,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::MalformedRecord { .. } => ErrorCode::MalformedRecord,
            Self::Http(_) => ErrorCode::SubmissionFailed,
            Self::Rejected { .. } => ErrorCode::SubmissionRejected,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Whether re-running later could succeed without changing anything.
    ///
    /// True for transport failures, rate limiting and server-side errors.
    /// The tool never retries on its own; this is advice for the operator.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Rejected { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingToken { var } => Some(format!(
                "Get a token from https://readwise.io/access_token and export {var}=<token>.\n  \
                 Use --dry-run to preview without a token."
            )),

            Self::SourceNotFound { path } => Some(format!(
                "Is GoodLinks installed? Expected its database at {}.\n  \
                 Pass --db <path> or set GOODLINKS_DB to read another copy.",
                path.display()
            )),

            Self::Rejected { status: 401 | 403, .. } => Some(
                "The token was refused. Check READWISE_API_TOKEN against \
                 https://readwise.io/access_token"
                    .to_string(),
            ),
            Self::Rejected { status: 429, .. } => {
                Some("Readwise is rate limiting requests. Try again later.".to_string())
            }

            Self::InvalidArgument(msg) if msg.contains("since") => Some(
                "Use an RFC 3339 timestamp (2024-05-01T09:30:00Z) or a date (2024-05-01)"
                    .to_string(),
            ),

            Self::Config(_)
            | Self::Database(_)
            | Self::MalformedRecord { .. }
            | Self::Http(_)
            | Self::Rejected { .. }
            | Self::InvalidArgument(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": self.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(Error::MissingToken { var: "X" }.exit_code(), 2);
        assert_eq!(Error::Config("bad".into()).exit_code(), 2);
        assert_eq!(
            Error::SourceNotFound {
                path: PathBuf::from("/nope")
            }
            .exit_code(),
            3
        );
        assert_eq!(
            Error::Rejected {
                status: 400,
                body: String::new()
            }
            .exit_code(),
            4
        );
        assert_eq!(Error::InvalidArgument("x".into()).exit_code(), 5);
        assert_eq!(Error::Other("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_rejected_retryable_only_for_server_side() {
        let rejected = |status| Error::Rejected {
            status,
            body: String::new(),
        };
        assert!(rejected(429).is_retryable());
        assert!(rejected(503).is_retryable());
        assert!(!rejected(400).is_retryable());
        assert!(!rejected(401).is_retryable());
        assert!(!Error::MissingToken { var: "X" }.is_retryable());
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let err = Error::MissingToken {
            var: "READWISE_API_TOKEN",
        };
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "MISSING_TOKEN");
        assert_eq!(json["error"]["exit_code"], 2);
        assert_eq!(json["error"]["retryable"], false);
        assert!(
            json["error"]["hint"]
                .as_str()
                .unwrap()
                .contains("READWISE_API_TOKEN")
        );
    }

    #[test]
    fn test_structured_json_without_hint() {
        let json = Error::Other("boom".into()).to_structured_json();
        assert_eq!(json["error"]["message"], "boom");
        assert!(json["error"].get("hint").is_none());
    }
}
