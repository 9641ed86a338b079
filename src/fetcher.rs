use crate::http_client::build_http_client;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Raw page handed to the analysis engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub html: String,
    /// URL after redirects; links on the page resolve against it
    pub final_url: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server responded with HTTP {0}")]
    Status(u16),
    #[error("audit cancelled before the page was fetched")]
    Cancelled,
    #[error("{0}")]
    Other(String),
}

/// Supplies page HTML for a URL, or an explicit failure
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Plain HTTP fetcher built on the shared reqwest client
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = validate_url(url)?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            let ct_lower = content_type.to_lowercase();
            if !ct_lower.contains("text/html") && !ct_lower.contains("application/xhtml") {
                tracing::warn!(
                    url = %url,
                    content_type = %content_type,
                    "Non-HTML content type detected, analysis may be meaningless"
                );
            }
        }

        let final_url = response.url().to_string();
        let html = response.text().await?;

        Ok(FetchedPage { html, final_url })
    }
}

/// Parses `url` and rejects anything but http and https
pub fn validate_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("only http and https are supported, got '{}'", scheme),
        }),
    }
}
