use clap::Parser;

pub const DEFAULT_OUTPUT: &str = "text";
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PARALLEL_PAGES: usize = 1;
pub const DEFAULT_TOKENIZER: &str = "standard";

#[derive(Parser, Debug, Clone)]
#[command(name = "pagescout")]
#[command(about = "A CLI on-page SEO auditor", long_about = None)]
pub struct Cli {
    /// The URL of the page to audit
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// File with one URL per line (blank lines are ignored)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Output format: text or json
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Save report to file
    #[arg(short, long)]
    pub save: Option<String>,

    /// Maximum number of simultaneous link probes (default: 8)
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Timeout for each link probe, in seconds (default: 5)
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Timeout for fetching each page, in seconds (default: 30)
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout: u64,

    /// Deadline for the whole audit, in seconds; unfinished work is reported as failed
    #[arg(long)]
    pub audit_timeout: Option<u64>,

    /// Number of pages audited in parallel (default: 1)
    #[arg(short = 'p', long, default_value_t = DEFAULT_PARALLEL_PAGES)]
    pub parallel_pages: usize,

    /// Rate limit for link probes per second (optional, e.g., 2.0 for 2 req/s)
    #[arg(short = 'r', long)]
    pub rate_limit: Option<f64>,

    /// Skip link reachability checks
    #[arg(long)]
    pub skip_link_check: bool,

    /// Keyword tokenizer: standard or fallback
    #[arg(long, default_value = DEFAULT_TOKENIZER)]
    pub tokenizer: String,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long)]
    pub config: Option<String>,
}
