use crate::http_client::build_http_client;
use crate::models::{LinkCounts, LinkKind, LinkStatus, ProbeOutcome};
use anyhow::Result;
use futures::stream::{self, StreamExt};
use governor::{
    Quota, RateLimiter, clock::DefaultClock, state::InMemoryState, state::direct::NotKeyed,
};
use std::collections::HashSet;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Configuration for the reachability checker
#[derive(Debug, Clone)]
pub struct LinkCheckerConfig {
    /// Maximum number of probes in flight at once
    pub concurrency: usize,
    /// Per-probe timeout
    pub timeout: Duration,
    pub requests_per_second: Option<f64>,
}

impl Default for LinkCheckerConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            timeout: Duration::from_secs(5),
            requests_per_second: None,
        }
    }
}

/// Classifies `link` relative to the page at `page_url`.
///
/// Links without an authority (relative paths, `mailto:` and the like) are
/// internal, as are links sharing the page's origin (scheme, host and port).
pub fn classify(link: &str, page_url: &str) -> LinkKind {
    classify_against(link, Url::parse(page_url).ok().as_ref())
}

fn classify_against(link: &str, page_url: Option<&Url>) -> LinkKind {
    let Ok(url) = Url::parse(link) else {
        return LinkKind::Internal;
    };

    match url.host_str() {
        None => LinkKind::Internal,
        Some(_) => {
            let same_origin = page_url.is_some_and(|page| page.origin() == url.origin());
            if same_origin {
                LinkKind::Internal
            } else {
                LinkKind::External
            }
        }
    }
}

/// Counts internal and external links over the full, non-deduplicated list
pub fn count_links(links: &[String], page_url: &str) -> LinkCounts {
    let page = Url::parse(page_url).ok();

    links
        .iter()
        .fold(LinkCounts::default(), |mut counts, link| {
            match classify_against(link, page.as_ref()) {
                LinkKind::Internal => counts.internal += 1,
                LinkKind::External => counts.external += 1,
            }
            counts
        })
}

/// Unique non-empty links in first-seen order
pub fn dedup_links(links: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    links
        .iter()
        .map(String::as_str)
        .filter(|link| !link.is_empty() && seen.insert(*link))
        .collect()
}

pub struct LinkChecker {
    client: reqwest::Client,
    concurrency: usize,
    timeout: Duration,
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    cancel: CancellationToken,
}

impl LinkChecker {
    pub fn new(config: LinkCheckerConfig) -> Result<Self> {
        let rate_limiter = config
            .requests_per_second
            .and_then(|rps| NonZeroU32::new(rps.ceil() as u32))
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Ok(Self {
            client: build_http_client(config.timeout)?,
            concurrency: config.concurrency.max(1),
            timeout: config.timeout,
            rate_limiter,
            cancel: CancellationToken::new(),
        })
    }

    /// Ties every probe to `token`: once it is cancelled, probes resolve as unreachable
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Probes every unique link and returns one status per link, in first-seen order
    pub async fn check_links(&self, links: &[String]) -> Vec<LinkStatus> {
        let unique = dedup_links(links);
        let mut slots: Vec<Option<ProbeOutcome>> = vec![None; unique.len()];

        {
            let mut probes = stream::iter(unique.iter().enumerate())
                .map(|(idx, url)| async move { (idx, self.probe(url).await) })
                .buffer_unordered(self.concurrency);

            while let Some((idx, outcome)) = probes.next().await {
                slots[idx] = Some(outcome);
            }
        }

        unique
            .into_iter()
            .zip(slots)
            .map(|(url, outcome)| LinkStatus {
                url: url.to_string(),
                outcome: outcome.unwrap_or(ProbeOutcome::Unreachable),
            })
            .collect()
    }

    /// Only the links that answered with status >= 400 or could not be reached
    pub async fn broken_links(&self, links: &[String]) -> Vec<LinkStatus> {
        let broken: Vec<LinkStatus> = self
            .check_links(links)
            .await
            .into_iter()
            .filter(|status| status.outcome.is_broken())
            .collect();

        if !broken.is_empty() {
            tracing::info!(count = broken.len(), "Broken links detected");
        }

        broken
    }

    /// Issues a single HEAD request for `url`
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        let attempt = async {
            if let Some(limiter) = &self.rate_limiter {
                limiter.until_ready().await;
            }
            tokio::time::timeout(self.timeout, self.client.head(url).send()).await
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!(url = %url, "Link probe cancelled");
                ProbeOutcome::Unreachable
            }
            result = attempt => match result {
                Ok(Ok(response)) => ProbeOutcome::Status(response.status().as_u16()),
                Ok(Err(e)) => {
                    tracing::debug!(url = %url, error = %e, "Link probe failed");
                    ProbeOutcome::Unreachable
                }
                Err(_) => {
                    tracing::debug!(url = %url, timeout = ?self.timeout, "Link probe timed out");
                    ProbeOutcome::Unreachable
                }
            },
        }
    }
}
