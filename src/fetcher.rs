use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::FetchConfig;
use crate::error::{AppError, FetchError, Result};

/// Raw result of a successful page fetch.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// URL the user asked for.
    pub requested_url: Url,
    /// URL the document was served from, after redirects.
    pub url: Url,
    pub raw_html: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub elapsed: Duration,
}

impl PageContent {
    /// Wrap an in-memory document, e.g. one loaded from a fixture.
    pub fn from_html(url: Url, raw_html: impl Into<String>) -> Self {
        Self {
            requested_url: url.clone(),
            url,
            raw_html: raw_html.into(),
            status: 200,
            content_type: Some("text/html".to_string()),
            elapsed: Duration::ZERO,
        }
    }

    pub fn summary(&self) -> FetchSummary {
        FetchSummary {
            requested_url: self.requested_url.to_string(),
            final_url: self.url.to_string(),
            status_code: self.status,
            content_type: self.content_type.clone(),
            content_length: self.raw_html.len(),
            response_time_ms: self.elapsed.as_millis() as u64,
            is_https: self.url.scheme() == "https",
        }
    }
}

/// Fetch details kept in the analysis once the raw HTML has been consumed.
#[derive(Debug, Clone, Serialize)]
pub struct FetchSummary {
    pub requested_url: String,
    pub final_url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub content_length: usize,
    pub response_time_ms: u64,
    pub is_https: bool,
}

/// Validate user input as an absolute `http`/`https` URL with a host.
pub fn parse_url(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidUrl("URL is empty".to_string()));
    }

    let url = Url::parse(trimmed)?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::InvalidUrl(format!(
                "unsupported scheme '{}', expected http or https",
                other
            )));
        }
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AppError::InvalidUrl(format!("{} has no host", trimmed)));
    }

    Ok(url)
}

/// Issues the single outbound GET of an analysis.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(10)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub async fn fetch(&self, input: &str) -> Result<PageContent> {
        let requested_url = parse_url(input)?;
        let started = Instant::now();
        debug!(url = %requested_url, "fetching page");

        let mut response = self
            .client
            .get(requested_url.clone())
            .send()
            .await
            .map_err(|e| self.classify(&requested_url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %requested_url, status = status.as_u16(), "non-success status");
            return Err(FetchError::Status {
                url: requested_url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if let Some(mime) = content_type.as_deref() {
            if !is_textual(mime) {
                return Err(AppError::ParseError(format!(
                    "{} is not an HTML document (content type {})",
                    url, mime
                )));
            }
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.config.max_body_bytes as u64)
        {
            return Err(self.too_large(&url));
        }

        // Content-Length may be absent (chunked), so the limit is enforced while reading.
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.classify(&requested_url, e))?
        {
            if body.len() + chunk.len() > self.config.max_body_bytes {
                warn!(url = %url, limit = self.config.max_body_bytes, "body exceeds limit");
                return Err(self.too_large(&url));
            }
            body.extend_from_slice(&chunk);
        }

        let raw_html = String::from_utf8_lossy(&body).into_owned();
        if raw_html.trim().is_empty() {
            return Err(AppError::ParseError(format!("{} returned an empty document", url)));
        }

        let elapsed = started.elapsed();
        info!(
            url = %url,
            status = status.as_u16(),
            bytes = raw_html.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "page fetched"
        );

        Ok(PageContent {
            requested_url,
            url,
            raw_html,
            status: status.as_u16(),
            content_type,
            elapsed,
        })
    }

    fn classify(&self, url: &Url, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            warn!(url = %url, "fetch timed out");
            FetchError::Timeout {
                url: url.to_string(),
                timeout: self.config.timeout,
            }
            .into()
        } else {
            warn!(url = %url, error = %err, "fetch failed");
            FetchError::Network(err.to_string()).into()
        }
    }

    fn too_large(&self, url: &Url) -> AppError {
        FetchError::TooLarge {
            url: url.to_string(),
            limit: self.config.max_body_bytes,
        }
        .into()
    }
}

fn is_textual(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime.starts_with("text/") || mime.contains("html") || mime.contains("xml")
}
