//! Configuration management.
//!
//! This module builds the [`SyncConfig`] for a run from the environment and
//! command-line flags, and resolves the GoodLinks database location.
//!
//! # Sources
//!
//! - `READWISE_API_TOKEN`: Readwise access token (required unless dry-run)
//! - `READWISE_API_URL`: highlights endpoint override
//! - `READWISE_TIMEOUT_SECS`: HTTP timeout override
//! - `--db` / `GOODLINKS_DB`: GoodLinks database path
//!
//! The config is built once at startup and passed by reference afterwards;
//! nothing else in the crate reads the environment.

use crate::error::{Error, Result};

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the Readwise access token.
pub const TOKEN_ENV: &str = "READWISE_API_TOKEN";

/// Environment variable overriding the highlights endpoint.
pub const API_URL_ENV: &str = "READWISE_API_URL";

/// Environment variable overriding the HTTP timeout, in seconds.
pub const TIMEOUT_ENV: &str = "READWISE_TIMEOUT_SECS";

/// Environment variable overriding the GoodLinks database path.
pub const DB_ENV: &str = "GOODLINKS_DB";

/// Readwise v2 highlight creation endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://readwise.io/api/v2/highlights/";

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A Readwise access token.
///
/// Never printed: `Debug` is redacted so configs can be logged safely.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Parse a raw token, trimming whitespace. Empty tokens are rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The token value, for building the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

/// Settings for one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Readwise token; always present for live runs.
    pub token: Option<ApiToken>,
    /// Preview only, never touch the network.
    pub dry_run: bool,
    /// Highlights endpoint.
    pub endpoint: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// GoodLinks database path.
    pub db_path: PathBuf,
    /// Only read highlights made strictly after this instant.
    pub since: Option<DateTime<Utc>>,
}

impl SyncConfig {
    /// Build the config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingToken`] for a live run without a usable token,
    /// or [`Error::Config`] if an override cannot be parsed.
    pub fn from_env(
        dry_run: bool,
        db_path: Option<&Path>,
        since: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok(), dry_run, db_path, since)
    }

    /// Build the config using `lookup` to read environment variables.
    ///
    /// # Errors
    ///
    /// See [`SyncConfig::from_env`].
    pub fn from_lookup<F>(
        lookup: F,
        dry_run: bool,
        db_path: Option<&Path>,
        since: Option<DateTime<Utc>>,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_ENV).as_deref().and_then(ApiToken::parse);
        if token.is_none() && !dry_run {
            return Err(Error::MissingToken { var: TOKEN_ENV });
        }

        let endpoint = match lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            Some(raw) => parse_endpoint(&raw)?,
            None => DEFAULT_ENDPOINT.to_string(),
        };

        let timeout = match lookup(TIMEOUT_ENV) {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let db_path = resolve_db_path(db_path).ok_or_else(|| {
            Error::Config(format!(
                "Could not determine home directory; pass --db or set {DB_ENV}"
            ))
        })?;

        Ok(Self {
            token,
            dry_run,
            endpoint,
            timeout,
            db_path,
            since,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<String> {
    let url = reqwest::Url::parse(raw.trim())
        .map_err(|e| Error::Config(format!("{API_URL_ENV} is not a valid URL ('{raw}'): {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "{API_URL_ENV} must be an http or https URL, got '{raw}'"
        )));
    }
    Ok(url.into())
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::Config(format!(
            "{TIMEOUT_ENV} must be a positive number of seconds, got '{raw}'"
        ))),
    }
}

/// Default location of the GoodLinks database on macOS.
///
/// `~/Library/Group Containers/group.com.ngocluu.goodlinks/Data/data.sqlite`
#[must_use]
pub fn default_goodlinks_db_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| {
        b.home_dir()
            .join("Library")
            .join("Group Containers")
            .join("group.com.ngocluu.goodlinks")
            .join("Data")
            .join("data.sqlite")
    })
}

/// Resolve the GoodLinks database path.
///
/// Priority:
/// 1. `explicit_path` (from `--db` or `GOODLINKS_DB`, both handled by clap)
/// 2. The default GoodLinks group container
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }
    default_goodlinks_db_path()
}

/// Parse a `--since` value: RFC 3339 timestamp or a plain `YYYY-MM-DD` date
/// (midnight UTC).
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if neither format matches.
pub fn parse_since(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::InvalidArgument(format!("cannot parse --since value '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn db() -> Option<&'static Path> {
        Some(Path::new("/tmp/goodlinks.sqlite"))
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let err = SyncConfig::from_lookup(env(&[]), false, db(), None).unwrap_err();
        assert!(matches!(err, Error::MissingToken { var: TOKEN_ENV }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_blank_token_is_rejected() {
        let err =
            SyncConfig::from_lookup(env(&[(TOKEN_ENV, "   ")]), false, db(), None).unwrap_err();
        assert!(matches!(err, Error::MissingToken { .. }));
    }

    #[test]
    fn test_dry_run_does_not_need_token() {
        let config = SyncConfig::from_lookup(env(&[]), true, db(), None).unwrap();
        assert!(config.dry_run);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_defaults() {
        let config =
            SyncConfig::from_lookup(env(&[(TOKEN_ENV, " abc123 ")]), false, db(), None).unwrap();
        assert_eq!(config.token.as_ref().map(ApiToken::expose), Some("abc123"));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.db_path, PathBuf::from("/tmp/goodlinks.sqlite"));
    }

    #[test]
    fn test_overrides() {
        let config = SyncConfig::from_lookup(
            env(&[
                (TOKEN_ENV, "abc"),
                (API_URL_ENV, "http://127.0.0.1:9/highlights/"),
                (TIMEOUT_ENV, "5"),
            ]),
            false,
            db(),
            None,
        )
        .unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:9/highlights/");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_bad_endpoint_is_config_error() {
        for raw in ["not a url", "ftp://example.com/highlights/", "readwise.io/api"] {
            for dry_run in [false, true] {
                let err = SyncConfig::from_lookup(
                    env(&[(TOKEN_ENV, "abc"), (API_URL_ENV, raw)]),
                    dry_run,
                    db(),
                    None,
                )
                .unwrap_err();
                assert!(matches!(err, Error::Config(_)), "{raw} should be rejected");
                assert_eq!(err.exit_code(), 2);
            }
        }
    }

    #[test]
    fn test_bad_timeout() {
        for raw in ["0", "-1", "soon"] {
            let err = SyncConfig::from_lookup(
                env(&[(TOKEN_ENV, "abc"), (TIMEOUT_ENV, raw)]),
                false,
                db(),
                None,
            )
            .unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = ApiToken::parse("supersecret").unwrap();
        assert_eq!(format!("{token:?}"), "ApiToken(***)");

        let config =
            SyncConfig::from_lookup(env(&[(TOKEN_ENV, "supersecret")]), false, db(), None)
                .unwrap();
        assert!(!format!("{config:?}").contains("supersecret"));
    }

    #[test]
    fn test_resolve_db_path_with_explicit() {
        let explicit = PathBuf::from("/custom/path/data.sqlite");
        assert_eq!(resolve_db_path(Some(&explicit)), Some(explicit));
    }

    #[test]
    fn test_default_db_path_is_goodlinks_container() {
        let path = default_goodlinks_db_path().unwrap();
        assert!(path.ends_with("group.com.ngocluu.goodlinks/Data/data.sqlite"));
    }

    #[test]
    fn test_parse_since() {
        let ts = parse_since("2024-05-01T09:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T07:30:00+00:00");

        let day = parse_since("2024-05-01").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-05-01T00:00:00+00:00");

        assert!(matches!(
            parse_since("last tuesday"),
            Err(Error::InvalidArgument(_))
        ));
    }
}
