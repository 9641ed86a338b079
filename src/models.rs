use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Number of heading levels tracked per page (h1 through h6)
pub const HEADING_LEVELS: usize = 6;

/// Structured view of a single HTML page, produced by the parser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub title: String,
    pub meta_tags: BTreeMap<String, String>,
    pub headings: Headings,
    pub body_text: String,
    pub links: Vec<String>,
    pub image_alt_texts: Vec<String>,
}

impl Document {
    /// Content of `<meta name="description">`, or an empty string
    pub fn meta_description(&self) -> &str {
        self.meta_tags
            .get("description")
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Heading texts grouped by level. Always holds exactly six levels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headings([Vec<String>; HEADING_LEVELS]);

impl Headings {
    pub fn new(levels: [Vec<String>; HEADING_LEVELS]) -> Self {
        Self(levels)
    }

    /// Headings for `level` (1-based), or `None` outside 1..=6
    pub fn get(&self, level: usize) -> Option<&[String]> {
        level
            .checked_sub(1)
            .and_then(|idx| self.0.get(idx))
            .map(Vec::as_slice)
    }

    pub fn count(&self, level: usize) -> usize {
        self.get(level).map_or(0, <[String]>::len)
    }

    pub fn counts(&self) -> HeadingCounts {
        HeadingCounts(std::array::from_fn(|idx| self.0[idx].len()))
    }

    /// Iterates `(level, headings)` pairs from h1 to h6
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, texts)| (idx + 1, texts.as_slice()))
    }
}

/// Heading counts for levels 1..=6
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingCounts(pub [usize; HEADING_LEVELS]);

impl HeadingCounts {
    pub fn level(&self, level: usize) -> usize {
        level
            .checked_sub(1)
            .and_then(|idx| self.0.get(idx))
            .copied()
            .unwrap_or(0)
    }

    pub fn as_array(&self) -> [usize; HEADING_LEVELS] {
        self.0
    }
}

/// Frequency of a single token in the analyzed text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordEntry {
    pub token: String,
    pub count: usize,
    pub percentage: f64,
    /// Position of the token's first occurrence in the token stream
    pub first_index: usize,
}

/// Keyword density of a text, in first-occurrence order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordDensity {
    pub(crate) entries: Vec<KeywordEntry>,
    pub(crate) total_tokens: usize,
}

impl KeywordDensity {
    pub fn get(&self, token: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.token == token)
            .map(|entry| entry.percentage)
    }

    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|entry| (entry.token.as_str(), entry.percentage))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of alphabetic tokens the percentages were computed over
    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }
}

// Serialized as a plain `token -> percentage` object, keeping entry order.
impl Serialize for KeywordDensity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.token, &entry.percentage)?;
        }
        map.end()
    }
}

/// A ranked keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopKeyword {
    pub token: String,
    pub percentage: f64,
}

/// At most ten keywords, highest density first
pub type TopKeywords = Vec<TopKeyword>;

/// Result of a single reachability probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RawOutcome", try_from = "RawOutcome")]
pub enum ProbeOutcome {
    Status(u16),
    /// Transport, timeout, DNS or cancellation failure
    Unreachable,
}

impl ProbeOutcome {
    pub fn is_broken(&self) -> bool {
        match self {
            ProbeOutcome::Status(code) => *code >= 400,
            ProbeOutcome::Unreachable => true,
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Status(code) => write!(f, "{}", code),
            ProbeOutcome::Unreachable => f.write_str("error"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawOutcome {
    Status(u16),
    Marker(String),
}

impl From<ProbeOutcome> for RawOutcome {
    fn from(outcome: ProbeOutcome) -> Self {
        match outcome {
            ProbeOutcome::Status(code) => RawOutcome::Status(code),
            ProbeOutcome::Unreachable => RawOutcome::Marker("error".to_string()),
        }
    }
}

impl TryFrom<RawOutcome> for ProbeOutcome {
    type Error = String;

    fn try_from(raw: RawOutcome) -> Result<Self, String> {
        match raw {
            RawOutcome::Status(code) => Ok(ProbeOutcome::Status(code)),
            RawOutcome::Marker(marker) if marker == "error" => Ok(ProbeOutcome::Unreachable),
            RawOutcome::Marker(other) => Err(format!("unknown probe outcome: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatus {
    pub url: String,
    pub outcome: ProbeOutcome,
}

/// Internal/external split of a page's links
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoIssue {
    pub severity: IssueSeverity,
    pub issue_type: IssueType,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    MissingTitle,
    TitleTooLong,
    MissingMetaDescription,
    MetaDescriptionTooLong,
    MissingH1,
    MultipleH1,
    MissingImageAlt,
    BrokenLink,
}

/// SEO report for one analyzed page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoReport {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub heading_counts: HeadingCounts,
    pub internal_links: usize,
    pub external_links: usize,
    pub keyword_density: KeywordDensity,
    pub top_keywords: TopKeywords,
    pub broken_links: Vec<LinkStatus>,
    pub issues: Vec<SeoIssue>,
}

impl SeoReport {
    /// Returns a new report carrying `broken_links` and one issue per broken link
    pub fn with_broken_links(mut self, broken_links: Vec<LinkStatus>) -> Self {
        self.issues.extend(broken_links.iter().map(|link| SeoIssue {
            severity: IssueSeverity::Error,
            issue_type: IssueType::BrokenLink,
            message: format!("Broken link: {} ({})", link.url, link.outcome),
        }));
        self.broken_links = broken_links;
        self
    }

    pub fn chart_series(&self) -> ChartSeries {
        ChartSeries {
            heading_counts: self.heading_counts.as_array(),
            keywords: self
                .top_keywords
                .iter()
                .map(|kw| (kw.token.clone(), kw.percentage))
                .collect(),
        }
    }
}

/// Numeric series a chart renderer needs: heading bars and a keyword line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub heading_counts: [usize; HEADING_LEVELS],
    pub keywords: Vec<(String, f64)>,
}

/// A URL whose page could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedPage {
    pub url: String,
    pub error: String,
}

/// Events emitted while a batch is being audited
#[derive(Debug, Clone)]
pub enum AuditEvent {
    Progress(String),
    PageAnalyzed(Box<SeoReport>),
    PageFailed { url: String, error: String },
}

/// Reports and failures of one batch, both in input order
#[derive(Debug, Clone, Default)]
pub struct AuditOutcome {
    pub reports: Vec<SeoReport>,
    pub failures: Vec<FailedPage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub pages: Vec<SeoReport>,
    pub failures: Vec<FailedPage>,
    pub summary: AuditSummary,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_urls: usize,
    pub analyzed: usize,
    pub failed: usize,
    pub total_links: usize,
    pub broken_links: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

/// One report flattened to plain values for spreadsheet or PDF exporters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,
    pub h4_count: usize,
    pub h5_count: usize,
    pub h6_count: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub top_keywords: String,
    pub broken_links: String,
    pub broken_link_count: usize,
}
