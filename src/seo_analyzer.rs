use crate::keywords;
use crate::link_checker::count_links;
use crate::models::{
    Document, IssueSeverity, IssueType, KeywordDensity, SeoIssue, SeoReport, TopKeywords,
};

const TITLE_MAX_CHARS: usize = 60;
const META_DESCRIPTION_MAX_CHARS: usize = 160;

pub struct SeoAnalyzer;

impl SeoAnalyzer {
    /// Runs keyword analysis and link classification, then builds the report
    pub fn analyze(document: &Document) -> SeoReport {
        let density = keywords::density(&keywords::keyword_text(document));
        let top = keywords::top_keywords(&density);
        let counts = count_links(&document.links, &document.url);

        Self::build(document, density, top, counts.internal, counts.external)
    }

    /// Composes a report from already computed parts. Performs no I/O.
    pub fn build(
        document: &Document,
        density: KeywordDensity,
        top: TopKeywords,
        internal_count: usize,
        external_count: usize,
    ) -> SeoReport {
        SeoReport {
            url: document.url.clone(),
            title: document.title.clone(),
            meta_description: document.meta_description().to_string(),
            heading_counts: document.headings.counts(),
            internal_links: internal_count,
            external_links: external_count,
            keyword_density: density,
            top_keywords: top,
            broken_links: vec![],
            issues: Self::detect_issues(document),
        }
    }

    fn detect_issues(document: &Document) -> Vec<SeoIssue> {
        let mut issues = Vec::new();

        let title_len = document.title.chars().count();
        if title_len == 0 {
            issues.push(SeoIssue {
                severity: IssueSeverity::Error,
                issue_type: IssueType::MissingTitle,
                message: "Page is missing a title tag".to_string(),
            });
        } else if title_len > TITLE_MAX_CHARS {
            issues.push(SeoIssue {
                severity: IssueSeverity::Warning,
                issue_type: IssueType::TitleTooLong,
                message: format!(
                    "Title is too long ({} chars, recommended: at most {})",
                    title_len, TITLE_MAX_CHARS
                ),
            });
        }

        let desc_len = document.meta_description().chars().count();
        if desc_len == 0 {
            issues.push(SeoIssue {
                severity: IssueSeverity::Error,
                issue_type: IssueType::MissingMetaDescription,
                message: "Page is missing a meta description".to_string(),
            });
        } else if desc_len > META_DESCRIPTION_MAX_CHARS {
            issues.push(SeoIssue {
                severity: IssueSeverity::Warning,
                issue_type: IssueType::MetaDescriptionTooLong,
                message: format!(
                    "Meta description is too long ({} chars, recommended: at most {})",
                    desc_len, META_DESCRIPTION_MAX_CHARS
                ),
            });
        }

        match document.headings.count(1) {
            0 => issues.push(SeoIssue {
                severity: IssueSeverity::Warning,
                issue_type: IssueType::MissingH1,
                message: "Page is missing an H1 tag".to_string(),
            }),
            1 => {}
            n => issues.push(SeoIssue {
                severity: IssueSeverity::Warning,
                issue_type: IssueType::MultipleH1,
                message: format!("Page has multiple H1 tags ({})", n),
            }),
        }

        let missing_alt = document
            .image_alt_texts
            .iter()
            .filter(|alt| alt.trim().is_empty())
            .count();
        if missing_alt > 0 {
            issues.push(SeoIssue {
                severity: IssueSeverity::Warning,
                issue_type: IssueType::MissingImageAlt,
                message: format!("{} image(s) missing alt text", missing_alt),
            });
        }

        issues
    }
}
