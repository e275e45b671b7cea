//! Page fetching
//!
//! This module defines the fetch capability the pagination engine depends on
//! and its HTTP implementation, including:
//! - Building an HTTP client that presents itself like a desktop browser
//! - Classifying every outcome into success or a `FailureKind`
//! - Reading `Retry-After` hints on rate-limited responses

use crate::config::ScraperConfig;
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use std::fmt;
use std::time::Duration;
use url::Url;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Classified reason a page could not be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// HTTP 429
    RateLimited,

    /// HTTP 403, usually an anti-bot block
    Forbidden,

    /// HTTP 404: the topic or page does not exist
    NotFound,

    /// Timeouts, connection errors, 5xx and other unexpected statuses
    TransientNetwork,

    /// The page arrived but did not look like a topic page
    Malformed,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::TransientNetwork => "transient_network",
            Self::Malformed => "malformed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFetchResult {
    /// Successfully fetched the page
    Success {
        /// Page body content
        body: String,
    },

    /// The page could not be fetched
    Failure {
        kind: FailureKind,
        /// Server-suggested wait before trying again
        retry_after_hint: Option<Duration>,
        /// Human-readable description, e.g. "HTTP 503"
        detail: String,
    },
}

impl PageFetchResult {
    pub fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            retry_after_hint: None,
            detail: detail.into(),
        }
    }
}

/// Capability to fetch the raw content of a page
///
/// Implementations classify failures; callers never see status codes.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> PageFetchResult;
}

/// Fetches pages over HTTP with reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from the scraper configuration
    pub fn new(config: &ScraperConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> PageFetchResult {
        match self.client.get(url.clone()).send().await {
            Ok(response) => {
                let status = response.status();

                if !status.is_success() {
                    let hint = retry_after(&response);
                    return classify_status(status, hint);
                }

                match response.text().await {
                    Ok(body) => PageFetchResult::Success { body },
                    Err(e) => PageFetchResult::failure(
                        FailureKind::TransientNetwork,
                        format!("Failed to read body: {}", e),
                    ),
                }
            }
            Err(e) => {
                let detail = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    "Connection refused".to_string()
                } else {
                    e.to_string()
                };
                PageFetchResult::failure(FailureKind::TransientNetwork, detail)
            }
        }
    }
}

/// Builds an HTTP client that sends a browser-like header set
///
/// # Example
///
/// ```no_run
/// use sozluk_ripple::config::ScraperConfig;
/// use sozluk_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&ScraperConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("tr-TR,tr;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
    headers.insert("sec-fetch-user", HeaderValue::from_static("?1"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers.insert(header::DNT, HeaderValue::from_static("1"));

    Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(headers)
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps a non-success HTTP status to a failure
///
/// | Status | Kind |
/// |--------|------|
/// | 429 | RateLimited (keeps the `Retry-After` hint) |
/// | 403 | Forbidden |
/// | 404 | NotFound |
/// | anything else | TransientNetwork |
pub fn classify_status(status: StatusCode, retry_after_hint: Option<Duration>) -> PageFetchResult {
    let detail = format!("HTTP {}", status.as_u16());

    match status {
        StatusCode::TOO_MANY_REQUESTS => PageFetchResult::Failure {
            kind: FailureKind::RateLimited,
            retry_after_hint,
            detail,
        },
        StatusCode::FORBIDDEN => PageFetchResult::failure(FailureKind::Forbidden, detail),
        StatusCode::NOT_FOUND => PageFetchResult::failure(FailureKind::NotFound, detail),
        _ => PageFetchResult::failure(FailureKind::TransientNetwork, detail),
    }
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after)
}

/// Parses a `Retry-After` value given in seconds
///
/// The HTTP-date form is not supported and yields `None`.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
