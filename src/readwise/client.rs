//! Readwise HTTP transport.
//!
//! [`HighlightTransport`] is the seam between the sync runner and the
//! network; [`ReadwiseClient`] is the real implementation on top of reqwest.

use crate::config::{ApiToken, SyncConfig};
use crate::error::{Error, Result};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;

use super::payload::CreateHighlightsRequest;

/// Longest response body kept in a rejection error.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// What the service told us about an accepted submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitResponse {
    /// Highlight ids Readwise created or modified, when the body was readable.
    pub accepted: Option<usize>,
}

/// Something that can deliver a batch of highlights.
pub trait HighlightTransport: Send + Sync {
    /// Post one batch. Called at most once per run.
    fn post_highlights(
        &self,
        request: &CreateHighlightsRequest,
    ) -> impl std::future::Future<Output = Result<SubmitResponse>> + Send;
}

/// Readwise API response: one entry per book the highlights landed in.
#[derive(Debug, Deserialize)]
struct BookSummary {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    modified_highlights: Vec<u64>,
}

/// Client for `POST /api/v2/highlights/`.
pub struct ReadwiseClient {
    client: reqwest::Client,
    endpoint: String,
    token: Option<ApiToken>,
}

impl ReadwiseClient {
    /// Create a client from the run configuration.
    ///
    /// Building the client performs no network I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("glr/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        })
    }

    /// Build the authenticated request without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingToken`] if the client has no token, or an HTTP
    /// error if the endpoint is not a valid URL.
    pub fn build_request(&self, request: &CreateHighlightsRequest) -> Result<reqwest::Request> {
        let token = self.token.as_ref().ok_or(Error::MissingToken {
            var: crate::config::TOKEN_ENV,
        })?;

        Ok(self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Token {}", token.expose()))
            .json(request)
            .build()?)
    }
}

impl HighlightTransport for ReadwiseClient {
    async fn post_highlights(&self, request: &CreateHighlightsRequest) -> Result<SubmitResponse> {
        let http_request = self.build_request(request)?;
        tracing::debug!(endpoint = %self.endpoint, count = request.len(), "posting highlights");

        let response = self.client.execute(http_request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                tracing::warn!(status = status.as_u16(), "could not read rejection body: {e}");
                String::new()
            });
            return Err(Error::Rejected {
                status: status.as_u16(),
                body: clamp_body(&body),
            });
        }

        let body = response.text().await?;
        let accepted = match serde_json::from_str::<Vec<BookSummary>>(&body) {
            Ok(books) => {
                for book in &books {
                    tracing::debug!(
                        title = book.title.as_deref().unwrap_or("<untitled>"),
                        modified = book.modified_highlights.len(),
                        "readwise book updated"
                    );
                }
                Some(books.iter().map(|b| b.modified_highlights.len()).sum())
            }
            Err(e) => {
                tracing::warn!("could not read Readwise response body: {e}");
                None
            }
        };

        Ok(SubmitResponse { accepted })
    }
}

fn clamp_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SyncConfig, TOKEN_ENV};
    use crate::model::Highlight;
    use crate::readwise::payload::map_highlight;
    use std::path::Path;

    fn config(token: Option<&str>) -> SyncConfig {
        let token = token.map(str::to_string);
        SyncConfig::from_lookup(
            move |name| if name == TOKEN_ENV { token.clone() } else { None },
            true,
            Some(Path::new("/tmp/goodlinks.sqlite")),
            None,
        )
        .unwrap()
    }

    fn request() -> CreateHighlightsRequest {
        let highlight = Highlight::new("h1", "Design is a series of choices")
            .with_source("Essay A", "http://x/1");
        CreateHighlightsRequest {
            highlights: vec![map_highlight(&highlight).unwrap()],
        }
    }

    #[test]
    fn test_request_carries_token_and_json_body() {
        let client = ReadwiseClient::new(&config(Some("abc123"))).unwrap();
        let built = client.build_request(&request()).unwrap();

        assert_eq!(built.method(), reqwest::Method::POST);
        assert_eq!(built.url().as_str(), crate::config::DEFAULT_ENDPOINT);
        assert_eq!(built.headers()[AUTHORIZATION], "Token abc123");
        assert_eq!(
            built.headers()[reqwest::header::CONTENT_TYPE],
            "application/json"
        );

        let body = built.body().and_then(reqwest::Body::as_bytes).unwrap();
        let sent: serde_json::Value = serde_json::from_slice(body).unwrap();
        let first = &sent["highlights"][0];
        assert_eq!(first["text"], "Design is a series of choices");
        assert_eq!(first["title"], "Essay A");
        assert_eq!(first["source_url"], "http://x/1");
    }

    #[test]
    fn test_request_without_token_is_refused() {
        let client = ReadwiseClient::new(&config(None)).unwrap();
        let err = client.build_request(&request()).unwrap_err();
        assert!(matches!(err, Error::MissingToken { .. }));
    }

    #[test]
    fn test_identical_requests_have_identical_bodies() {
        let client = ReadwiseClient::new(&config(Some("abc123"))).unwrap();
        let first = client.build_request(&request()).unwrap();
        let second = client.build_request(&request()).unwrap();
        assert_eq!(
            first.body().and_then(reqwest::Body::as_bytes),
            second.body().and_then(reqwest::Body::as_bytes)
        );
    }

    #[test]
    fn test_clamp_body() {
        assert_eq!(clamp_body("  short  "), "short");
        let long = "x".repeat(MAX_ERROR_BODY_CHARS + 10);
        assert_eq!(clamp_body(&long).chars().count(), MAX_ERROR_BODY_CHARS + 1);
    }

    #[test]
    fn test_book_summary_tolerates_missing_fields() {
        let books: Vec<BookSummary> =
            serde_json::from_str(r#"[{"id": 1, "modified_highlights": [1, 2]}, {"id": 2}]"#)
                .unwrap();
        assert_eq!(books[0].modified_highlights.len(), 2);
        assert!(books[1].modified_highlights.is_empty());
    }
}
