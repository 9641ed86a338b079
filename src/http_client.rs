use anyhow::Result;
use reqwest::{Client, ClientBuilder, header};
use std::time::Duration;

/// Browser-like headers sent with page fetches and link probes
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Maximum redirects followed before a request is treated as failed
const MAX_REDIRECTS: usize = 10;

/// Creates the shared reqwest client with browser-like headers and a request timeout
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static(ACCEPT_LANGUAGE),
    );

    let client = ClientBuilder::new()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()?;

    Ok(client)
}
