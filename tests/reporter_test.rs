use pagescout::models::{
    AuditOutcome, FailedPage, HeadingCounts, IssueSeverity, IssueType, KeywordDensity, LinkStatus,
    ProbeOutcome, SeoIssue, SeoReport, TopKeyword,
};
use pagescout::reporter::Reporter;
use std::fs;
use tempfile::tempdir;

fn create_test_report(url: &str, issues: Vec<SeoIssue>, broken_links: Vec<LinkStatus>) -> SeoReport {
    SeoReport {
        url: url.to_string(),
        title: "Test Page".to_string(),
        meta_description: "A page for tests".to_string(),
        heading_counts: HeadingCounts([1, 2, 0, 0, 0, 1]),
        internal_links: 4,
        external_links: 2,
        keyword_density: KeywordDensity::default(),
        top_keywords: vec![
            TopKeyword {
                token: "cat".to_string(),
                percentage: 66.67,
            },
            TopKeyword {
                token: "dog".to_string(),
                percentage: 33.33,
            },
        ],
        broken_links,
        issues,
    }
}

fn create_test_issue(severity: IssueSeverity, message: &str) -> SeoIssue {
    let issue_type = match severity {
        IssueSeverity::Error => IssueType::MissingTitle,
        IssueSeverity::Warning => IssueType::MissingImageAlt,
        IssueSeverity::Info => IssueType::MultipleH1,
    };

    SeoIssue {
        severity,
        issue_type,
        message: message.to_string(),
    }
}

fn broken(url: &str, outcome: ProbeOutcome) -> LinkStatus {
    LinkStatus {
        url: url.to_string(),
        outcome,
    }
}

#[test]
fn test_generate_report_empty_outcome() {
    let report = Reporter::generate_report(&AuditOutcome::default());

    assert!(report.pages.is_empty());
    assert!(report.failures.is_empty());
    assert_eq!(report.summary.total_urls, 0);
    assert_eq!(report.summary.analyzed, 0);
    assert_eq!(report.summary.failed, 0);
    assert_eq!(report.summary.total_links, 0);
    assert_eq!(report.summary.broken_links, 0);
    assert!(!report.timestamp.is_empty());
}

#[test]
fn test_generate_report_summary_counts() {
    let outcome = AuditOutcome {
        reports: vec![
            create_test_report(
                "https://example.com/a",
                vec![
                    create_test_issue(IssueSeverity::Error, "e1"),
                    create_test_issue(IssueSeverity::Warning, "w1"),
                ],
                vec![broken("https://example.com/x", ProbeOutcome::Status(404))],
            ),
            create_test_report(
                "https://example.com/b",
                vec![
                    create_test_issue(IssueSeverity::Warning, "w2"),
                    create_test_issue(IssueSeverity::Info, "i1"),
                ],
                vec![
                    broken("https://example.com/y", ProbeOutcome::Status(500)),
                    broken("https://down.example/", ProbeOutcome::Unreachable),
                ],
            ),
        ],
        failures: vec![FailedPage {
            url: "https://example.com/c".to_string(),
            error: "server responded with HTTP 404".to_string(),
        }],
    };

    let report = Reporter::generate_report(&outcome);

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.pages[0].url, "https://example.com/a");
    assert_eq!(report.summary.total_urls, 3);
    assert_eq!(report.summary.analyzed, 2);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.summary.total_links, 12);
    assert_eq!(report.summary.broken_links, 3);
    assert_eq!(report.summary.errors, 1);
    assert_eq!(report.summary.warnings, 2);
    assert_eq!(report.summary.infos, 1);
}

#[test]
fn test_format_top_keywords() {
    let top = vec![
        TopKeyword {
            token: "cat".to_string(),
            percentage: 66.67,
        },
        TopKeyword {
            token: "dog".to_string(),
            percentage: 33.33,
        },
        TopKeyword {
            token: "fish".to_string(),
            percentage: 50.0,
        },
    ];

    assert_eq!(
        Reporter::format_top_keywords(&top),
        "cat:66.67%, dog:33.33%, fish:50.0%"
    );
    assert_eq!(Reporter::format_top_keywords(&[]), "");
}

#[test]
fn test_format_broken_links() {
    let links = vec![
        broken("https://example.com/gone", ProbeOutcome::Status(404)),
        broken("https://down.example/", ProbeOutcome::Unreachable),
    ];

    assert_eq!(
        Reporter::format_broken_links(&links),
        "https://example.com/gone(404), https://down.example/(error)"
    );
    assert_eq!(Reporter::format_broken_links(&[]), "");
}

#[test]
fn test_flatten_report_row() {
    let report = create_test_report(
        "https://example.com/",
        vec![],
        vec![broken("https://example.com/gone", ProbeOutcome::Status(410))],
    );

    let row = Reporter::flatten(&report);

    assert_eq!(row.url, "https://example.com/");
    assert_eq!(row.title, "Test Page");
    assert_eq!(row.meta_description, "A page for tests");
    assert_eq!(
        [
            row.h1_count,
            row.h2_count,
            row.h3_count,
            row.h4_count,
            row.h5_count,
            row.h6_count
        ],
        [1, 2, 0, 0, 0, 1]
    );
    assert_eq!(row.internal_links, 4);
    assert_eq!(row.external_links, 2);
    assert_eq!(row.top_keywords, "cat:66.67%, dog:33.33%");
    assert_eq!(row.broken_links, "https://example.com/gone(410)");
    assert_eq!(row.broken_link_count, 1);
}

#[test]
fn test_save_json_report() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    let outcome = AuditOutcome {
        reports: vec![create_test_report(
            "https://example.com/",
            vec![create_test_issue(IssueSeverity::Error, "Missing title")],
            vec![broken("https://down.example/", ProbeOutcome::Unreachable)],
        )],
        failures: vec![],
    };
    let report = Reporter::generate_report(&outcome);

    Reporter::save_json_report(&report, path.to_str().unwrap()).expect("Should save report");

    let content = fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["summary"]["analyzed"], 1);
    assert_eq!(json["pages"][0]["url"], "https://example.com/");
    assert_eq!(json["pages"][0]["broken_links"][0]["outcome"], "error");
    assert_eq!(json["pages"][0]["heading_counts"][1], 2);
}

#[test]
fn test_save_json_report_to_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("report.json");
    let report = Reporter::generate_report(&AuditOutcome::default());

    let result = Reporter::save_json_report(&report, path.to_str().unwrap());

    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to create report file")
    );
}

#[test]
fn test_print_text_report_does_not_panic() {
    let outcome = AuditOutcome {
        reports: vec![create_test_report(
            "https://example.com/",
            vec![create_test_issue(IssueSeverity::Warning, "warn")],
            vec![],
        )],
        failures: vec![FailedPage {
            url: "https://example.com/down".to_string(),
            error: "request failed".to_string(),
        }],
    };

    Reporter::print_text_report(&Reporter::generate_report(&outcome));
}
