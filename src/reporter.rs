use crate::models::{
    AuditOutcome, AuditReport, AuditSummary, IssueSeverity, LinkStatus, ReportRow, SeoReport,
    TopKeyword,
};
use anyhow::{Context, Result};
use colored::*;
use std::fs::File;
use std::io::Write;

pub struct Reporter;

impl Reporter {
    pub fn generate_report(outcome: &AuditOutcome) -> AuditReport {
        let summary = Self::calculate_summary(outcome);
        let timestamp = chrono::Utc::now().to_rfc3339();

        AuditReport {
            pages: outcome.reports.clone(),
            failures: outcome.failures.clone(),
            summary,
            timestamp,
        }
    }

    fn calculate_summary(outcome: &AuditOutcome) -> AuditSummary {
        let mut errors = 0;
        let mut warnings = 0;
        let mut infos = 0;
        let mut total_links = 0;
        let mut broken_links = 0;

        for page in &outcome.reports {
            total_links += page.internal_links + page.external_links;
            broken_links += page.broken_links.len();

            for issue in &page.issues {
                match issue.severity {
                    IssueSeverity::Error => errors += 1,
                    IssueSeverity::Warning => warnings += 1,
                    IssueSeverity::Info => infos += 1,
                }
            }
        }

        AuditSummary {
            total_urls: outcome.reports.len() + outcome.failures.len(),
            analyzed: outcome.reports.len(),
            failed: outcome.failures.len(),
            total_links,
            broken_links,
            errors,
            warnings,
            infos,
        }
    }

    /// `token:pct%` pairs joined with commas
    pub fn format_top_keywords(top: &[TopKeyword]) -> String {
        top.iter()
            .map(|kw| format!("{}:{}%", kw.token, format_percentage(kw.percentage)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `url(outcome)` entries joined with commas
    pub fn format_broken_links(links: &[LinkStatus]) -> String {
        links
            .iter()
            .map(|link| format!("{}({})", link.url, link.outcome))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Flattens a report into plain columns for spreadsheet or PDF exporters
    pub fn flatten(report: &SeoReport) -> ReportRow {
        let counts = report.heading_counts;
        ReportRow {
            url: report.url.clone(),
            title: report.title.clone(),
            meta_description: report.meta_description.clone(),
            h1_count: counts.level(1),
            h2_count: counts.level(2),
            h3_count: counts.level(3),
            h4_count: counts.level(4),
            h5_count: counts.level(5),
            h6_count: counts.level(6),
            internal_links: report.internal_links,
            external_links: report.external_links,
            top_keywords: Self::format_top_keywords(&report.top_keywords),
            broken_links: Self::format_broken_links(&report.broken_links),
            broken_link_count: report.broken_links.len(),
        }
    }

    pub fn print_text_report(report: &AuditReport) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "pagescout - SEO Audit Report".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!(
            "{}: {}",
            "Timestamp".bright_white().bold(),
            report.timestamp
        );
        println!();

        println!("{}", "Summary".bright_yellow().bold().underline());
        println!(
            "  URLs Requested:   {}",
            report.summary.total_urls.to_string().bright_green()
        );
        println!(
            "  Pages Analyzed:   {}",
            report.summary.analyzed.to_string().bright_green()
        );
        println!(
            "  Pages Failed:     {}",
            if report.summary.failed > 0 {
                report.summary.failed.to_string().bright_red()
            } else {
                report.summary.failed.to_string().bright_green()
            }
        );
        println!(
            "  Links Found:      {}",
            report.summary.total_links.to_string().bright_green()
        );
        println!(
            "  Broken Links:     {}",
            if report.summary.broken_links > 0 {
                report.summary.broken_links.to_string().bright_red()
            } else {
                report.summary.broken_links.to_string().bright_green()
            }
        );
        println!(
            "  Errors:           {}",
            if report.summary.errors > 0 {
                report.summary.errors.to_string().bright_red()
            } else {
                report.summary.errors.to_string().bright_green()
            }
        );
        println!(
            "  Warnings:         {}",
            if report.summary.warnings > 0 {
                report.summary.warnings.to_string().yellow()
            } else {
                report.summary.warnings.to_string().bright_green()
            }
        );
        println!();

        for page in &report.pages {
            Self::print_page(page);
        }

        if !report.failures.is_empty() {
            println!("{}", "Failed Pages".bright_yellow().bold().underline());
            for failure in &report.failures {
                println!("  {} {}", failure.url.bright_white(), failure.error.bright_red());
            }
            println!();
        }

        println!("{}", "=".repeat(80).bright_blue());
    }

    fn print_page(page: &SeoReport) {
        let counts = page.heading_counts;

        println!("{} {}", "URL:".bright_white().bold(), page.url);
        println!(
            "  Title:            {}",
            if page.title.is_empty() {
                "(missing)".dimmed()
            } else {
                page.title.bright_white()
            }
        );
        println!(
            "  Meta Description: {}",
            if page.meta_description.is_empty() {
                "(missing)".dimmed()
            } else {
                page.meta_description.normal()
            }
        );
        println!(
            "  Headings:         H1:{} H2:{} H3:{} H4:{} H5:{} H6:{}",
            counts.level(1),
            counts.level(2),
            counts.level(3),
            counts.level(4),
            counts.level(5),
            counts.level(6)
        );
        println!(
            "  Links:            internal {} / external {}",
            page.internal_links, page.external_links
        );
        println!(
            "  Top Keywords:     {}",
            Self::format_top_keywords(&page.top_keywords)
        );

        if !page.broken_links.is_empty() {
            println!("  Broken Links:");
            for link in &page.broken_links {
                println!("    {} ({})", link.url, link.outcome.to_string().bright_red());
            }
        }

        if !page.issues.is_empty() {
            println!("  Issues:");
            for issue in &page.issues {
                let severity_str = match issue.severity {
                    IssueSeverity::Error => "ERROR".bright_red(),
                    IssueSeverity::Warning => "WARN ".yellow(),
                    IssueSeverity::Info => "INFO ".bright_cyan(),
                };
                println!("    [{}] {}", severity_str, issue.message);
            }
        }

        println!();
    }

    pub fn save_json_report(report: &AuditReport, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(filename)
            .with_context(|| format!("Failed to create report file: {}", filename))?;
        file.write_all(json.as_bytes())?;
        println!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}

/// Renders a percentage the way it reads in exports: `66.67`, `50.0`
fn format_percentage(value: f64) -> String {
    format!("{:?}", value)
}
