use crate::fetcher::{FetchError, Fetcher};
use crate::link_checker::LinkChecker;
use crate::models::{AuditEvent, AuditOutcome, FailedPage, SeoReport};
use crate::parser;
use crate::seo_analyzer::SeoAnalyzer;
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Configuration for a batch audit
#[derive(Debug, Clone)]
pub struct AuditorConfig {
    /// Pages audited at the same time
    pub parallel_pages: usize,
    pub check_links: bool,
    /// Deadline for the whole batch; pending work resolves as failed once it passes
    pub audit_timeout: Option<Duration>,
}

impl Default for AuditorConfig {
    fn default() -> Self {
        Self {
            parallel_pages: 1,
            check_links: true,
            audit_timeout: None,
        }
    }
}

/// One URL per line; surrounding whitespace trimmed, blank lines ignored
pub fn parse_url_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL file: {}", path.display()))?;
    Ok(parse_url_list(&contents))
}

pub struct Auditor<F: Fetcher> {
    fetcher: F,
    link_checker: LinkChecker,
    config: AuditorConfig,
    events: Option<mpsc::UnboundedSender<AuditEvent>>,
    cancel: CancellationToken,
    progress_bar: Option<ProgressBar>,
}

impl<F: Fetcher> Auditor<F> {
    /// The auditor shares the link checker's cancellation token
    pub fn new(fetcher: F, link_checker: LinkChecker, config: AuditorConfig) -> Self {
        let cancel = link_checker.cancellation_token();
        Self {
            fetcher,
            link_checker,
            config,
            events: None,
            cancel,
            progress_bar: None,
        }
    }

    /// Creates the event channel; the caller drains the returned receiver
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<AuditEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.events = Some(sender);
        receiver
    }

    /// Enable a progress bar sized to `total` pages
    pub fn enable_progress_bar(&mut self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} pages {msg}")
                .expect("Progress bar template should be valid"),
        );
        self.progress_bar = Some(pb);
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn emit(&self, event: AuditEvent) {
        if let Some(sender) = &self.events {
            // A closed receiver only means nobody is listening anymore
            let _ = sender.send(event);
        }
    }

    fn progress(&self, message: String) {
        tracing::debug!("{}", message);
        self.emit(AuditEvent::Progress(message));
    }

    /// Fetches, parses and analyzes a single page
    pub async fn audit_page(&self, url: &str) -> Result<SeoReport, FetchError> {
        self.progress(format!("Processing {} ...", url));

        let page = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(FetchError::Cancelled),
            page = self.fetcher.fetch(url) => page?,
        };

        let document = parser::parse(&page.html, &page.final_url);
        let report = SeoAnalyzer::analyze(&document);

        if !self.config.check_links {
            return Ok(report);
        }

        self.progress(format!(
            "Checking {} links on {}",
            document.links.len(),
            page.final_url
        ));
        let broken = self.link_checker.broken_links(&document.links).await;

        Ok(report.with_broken_links(broken))
    }

    /// Audits every URL. Failed pages are recorded and skipped; the batch always completes.
    pub async fn run(&self, urls: &[String]) -> AuditOutcome {
        let deadline = self.config.audit_timeout.map(|timeout| {
            let token = self.cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(timeout) => {
                        tracing::warn!(timeout = ?timeout, "Audit timed out, cancelling pending work");
                        token.cancel();
                    }
                    _ = token.cancelled() => {}
                }
            })
        });

        let mut outcome = AuditOutcome::default();

        {
            let mut pages = stream::iter(urls)
                .map(|url| async move { (url, self.audit_page(url).await) })
                .buffered(self.config.parallel_pages.max(1));

            while let Some((url, result)) = pages.next().await {
                match result {
                    Ok(report) => {
                        self.progress(format!(
                            "Report for {}: {} broken link(s), {} issue(s)",
                            url,
                            report.broken_links.len(),
                            report.issues.len()
                        ));
                        self.emit(AuditEvent::PageAnalyzed(Box::new(report.clone())));
                        outcome.reports.push(report);
                    }
                    Err(e) => {
                        tracing::warn!(url = %url, error = %e, "Failed to fetch page");
                        self.emit(AuditEvent::PageFailed {
                            url: url.clone(),
                            error: e.to_string(),
                        });
                        outcome.failures.push(FailedPage {
                            url: url.clone(),
                            error: e.to_string(),
                        });
                    }
                }

                if let Some(ref pb) = self.progress_bar {
                    pb.inc(1);
                }
            }
        }

        if let Some(handle) = deadline {
            handle.abort();
        }

        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(format!(
                "{} analyzed, {} failed",
                outcome.reports.len(),
                outcome.failures.len()
            ));
        }

        outcome
    }
}
