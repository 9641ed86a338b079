use pagescout::keywords::{density, top_keywords};
use pagescout::models::{IssueSeverity, IssueType, LinkStatus, ProbeOutcome, SeoReport};
use pagescout::parser::parse;
use pagescout::seo_analyzer::SeoAnalyzer;

fn issue_types(report: &SeoReport) -> Vec<IssueType> {
    report.issues.iter().map(|i| i.issue_type.clone()).collect()
}

#[test]
fn test_analyze_end_to_end_scenario() {
    let html = r#"<title>Home</title><h1>Hi</h1><a href="/about">x</a><a href="https://ext.com">y</a>"#;
    let doc = parse(html, "https://site.com");

    let report = SeoAnalyzer::analyze(&doc);

    assert_eq!(report.url, "https://site.com");
    assert_eq!(report.title, "Home");
    assert_eq!(report.internal_links, 1);
    assert_eq!(report.external_links, 1);
    assert_eq!(report.heading_counts.level(1), 1);
    for level in 2..=6 {
        assert_eq!(report.heading_counts.level(level), 0, "H{} count", level);
    }
    assert!(report.broken_links.is_empty());
}

#[test]
fn test_analyze_computes_density_over_combined_text() {
    let html = r#"<html><head>
        <title>Cat</title>
        <meta name="description" content="dog">
    </head><body><img alt="cat"></body></html>"#;
    let doc = parse(html, "https://site.com/");

    let report = SeoAnalyzer::analyze(&doc);

    // body "Cat" + title "Cat" + meta "dog" + alt "cat"
    assert_eq!(report.keyword_density.get("cat"), Some(75.0));
    assert_eq!(report.keyword_density.get("dog"), Some(25.0));
    assert_eq!(report.top_keywords[0].token, "cat");
    assert_eq!(report.top_keywords[1].token, "dog");
    assert_eq!(report.meta_description, "dog");
}

#[test]
fn test_build_is_pure_composition() {
    let doc = parse(
        "<title>T</title><h2>a</h2><h2>b</h2><h6>c</h6>",
        "https://site.com/",
    );
    let density = density("cat cat dog");
    let top = top_keywords(&density);

    let report = SeoAnalyzer::build(&doc, density.clone(), top.clone(), 7, 3);

    assert_eq!(report.title, "T");
    assert_eq!(report.internal_links, 7);
    assert_eq!(report.external_links, 3);
    assert_eq!(report.keyword_density, density);
    assert_eq!(report.top_keywords, top);
    assert_eq!(report.heading_counts.as_array(), [0, 2, 0, 0, 0, 1]);
    assert!(report.broken_links.is_empty());
}

#[test]
fn test_issues_for_bare_page() {
    let doc = parse("<img src='a.png'><p>nothing else</p>", "https://site.com/");

    let report = SeoAnalyzer::analyze(&doc);
    let types = issue_types(&report);

    assert!(types.contains(&IssueType::MissingTitle));
    assert!(types.contains(&IssueType::MissingMetaDescription));
    assert!(types.contains(&IssueType::MissingH1));
    assert!(types.contains(&IssueType::MissingImageAlt));

    let missing_title = report
        .issues
        .iter()
        .find(|i| i.issue_type == IssueType::MissingTitle)
        .unwrap();
    assert_eq!(missing_title.severity, IssueSeverity::Error);
}

#[test]
fn test_issues_for_long_fields_and_multiple_h1() {
    let long_title = "t".repeat(61);
    let long_desc = "d".repeat(161);
    let html = format!(
        r#"<title>{}</title><meta name="description" content="{}"><h1>a</h1><h1>b</h1>"#,
        long_title, long_desc
    );
    let doc = parse(&html, "https://site.com/");

    let types = issue_types(&SeoAnalyzer::analyze(&doc));

    assert!(types.contains(&IssueType::TitleTooLong));
    assert!(types.contains(&IssueType::MetaDescriptionTooLong));
    assert!(types.contains(&IssueType::MultipleH1));
    assert!(!types.contains(&IssueType::MissingTitle));
}

#[test]
fn test_well_formed_page_has_no_issues() {
    let html = r#"<title>Widgets</title>
        <meta name="description" content="All about widgets">
        <h1>Widgets</h1><img src="w.png" alt="A widget">"#;
    let doc = parse(html, "https://site.com/");

    assert!(SeoAnalyzer::analyze(&doc).issues.is_empty());
}

#[test]
fn test_with_broken_links_returns_new_report() {
    let doc = parse(
        r#"<title>Home</title><h1>Hi</h1><a href="/gone">x</a>"#,
        "https://site.com/",
    );
    let report = SeoAnalyzer::analyze(&doc);
    let original = report.clone();

    let broken = vec![
        LinkStatus {
            url: "https://site.com/gone".to_string(),
            outcome: ProbeOutcome::Status(404),
        },
        LinkStatus {
            url: "https://down.example/".to_string(),
            outcome: ProbeOutcome::Unreachable,
        },
    ];
    let merged = report.with_broken_links(broken.clone());

    assert_eq!(merged.broken_links, broken);
    assert_eq!(merged.title, original.title);
    assert_eq!(merged.internal_links, original.internal_links);
    assert_eq!(merged.issues.len(), original.issues.len() + 2);

    let messages: Vec<&str> = merged
        .issues
        .iter()
        .filter(|i| i.issue_type == IssueType::BrokenLink)
        .map(|i| i.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Broken link: https://site.com/gone (404)",
            "Broken link: https://down.example/ (error)",
        ]
    );
}

#[test]
fn test_chart_series() {
    let doc = parse(
        "<title>t</title><h1>a</h1><h3>b</h3><p>cat cat dog</p>",
        "https://site.com/",
    );
    let report = SeoAnalyzer::analyze(&doc);

    let series = report.chart_series();

    assert_eq!(series.heading_counts, [1, 0, 1, 0, 0, 0]);
    assert_eq!(series.keywords.len(), report.top_keywords.len());
    assert_eq!(series.keywords[0].0, report.top_keywords[0].token);
}
