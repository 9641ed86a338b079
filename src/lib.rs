pub mod auditor;
pub mod cli;
pub mod config;
pub mod fetcher;
pub mod http_client;
pub mod keywords;
pub mod link_checker;
pub mod models;
pub mod parser;
pub mod reporter;
pub mod seo_analyzer;
pub mod tokenizer;

use anyhow::{Context, Result};
use auditor::{Auditor, AuditorConfig, read_url_file};
use cli::Cli;
use colored::*;
use config::Config;
use fetcher::HttpFetcher;
use link_checker::{LinkChecker, LinkCheckerConfig};
use models::AuditEvent;
use reporter::Reporter;
use std::path::Path;
use std::time::Duration;
use tokenizer::TokenizerKind;

pub async fn run(args: Cli) -> Result<()> {
    let args = match Config::load(&args)? {
        Some(config) => config.merge_with_cli(&args),
        None => args,
    };
    let json_output = args.output == "json";

    if !json_output {
        println!(
            "{}",
            "pagescout - On-Page SEO Auditor".bright_cyan().bold()
        );
        println!("{}", "=".repeat(50).bright_blue());
        println!();
    }

    let urls = if let Some(file) = &args.file {
        let urls = read_url_file(Path::new(file))?;
        if urls.is_empty() {
            anyhow::bail!("No URLs found in {}", file);
        }
        urls
    } else if let Some(url) = &args.url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("URL must start with http:// or https://");
        }
        vec![url.clone()]
    } else {
        anyhow::bail!("No URL provided: pass a URL or --file <FILE>");
    };

    let kind: TokenizerKind = args.tokenizer.parse()?;

    if !json_output {
        println!("{} {}", "URLs to audit:".bright_white().bold(), urls.len());
        println!(
            "{} {}",
            "Link checks:".bright_white().bold(),
            if args.skip_link_check {
                "skipped".to_string()
            } else {
                format!("{} concurrent, {}s timeout", args.concurrency, args.timeout)
            }
        );
        println!();
    }

    let link_checker = LinkChecker::new(LinkCheckerConfig {
        concurrency: args.concurrency,
        timeout: Duration::from_secs(args.timeout),
        requests_per_second: args.rate_limit,
    })?;
    let fetcher = HttpFetcher::new(Duration::from_secs(args.fetch_timeout))?;

    let mut auditor = Auditor::new(
        fetcher,
        link_checker,
        AuditorConfig {
            parallel_pages: args.parallel_pages,
            check_links: !args.skip_link_check,
            audit_timeout: args.audit_timeout.map(Duration::from_secs),
        },
    );

    if !json_output && !args.verbose && urls.len() > 1 {
        auditor.enable_progress_bar(urls.len());
    }

    let mut events = auditor.subscribe();
    let verbose = args.verbose;
    let drain = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                AuditEvent::Progress(message) => {
                    if verbose {
                        eprintln!("{}", message.bright_yellow());
                    }
                }
                AuditEvent::PageAnalyzed(report) => {
                    if verbose {
                        eprintln!("{} {}", "Analyzed:".bright_green().bold(), report.url);
                    }
                }
                AuditEvent::PageFailed { url, error } => {
                    if verbose {
                        eprintln!("{} {} ({})", "Failed:".bright_red().bold(), url, error);
                    }
                }
            }
        }
    });

    // Installed only once nothing fallible remains before teardown
    tokenizer::init(kind).context("Failed to initialize tokenizer")?;
    let outcome = auditor.run(&urls).await;

    // Dropping the auditor closes the event channel so the drain task can finish
    drop(auditor);
    drain.await.ok();
    tokenizer::teardown();

    let report = Reporter::generate_report(&outcome);

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        _ => {
            Reporter::print_text_report(&report);
        }
    }

    if let Some(filename) = args.save {
        Reporter::save_json_report(&report, &filename)?;
    }

    Ok(())
}
