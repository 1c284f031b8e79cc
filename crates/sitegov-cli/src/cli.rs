use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sitegov",
    about = "sitegov: index governance and sitemap engine for programmatic sites",
    version
)]
pub struct Cli {
    /// Path to sitegov.toml (defaults apply when the default path is absent)
    #[arg(long, global = true, default_value = "sitegov.toml")]
    pub config: String,

    /// Log filter for stderr, e.g. `info` or `sitegov_kernel=debug`
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a path into a route descriptor
    Classify {
        /// Site path or absolute URL
        path: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decide index/canonical/sitemap directives for one URL
    Decide(DecideArgs),

    /// Resolve the canonical target of a city-industry hub
    HubCanonical {
        /// City slug
        #[arg(long)]
        city: String,

        /// Industry slug
        #[arg(long)]
        industry: String,

        /// Downstream service page, `URL` or `URL:noindex` (repeatable)
        #[arg(long = "downstream")]
        downstream: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build or validate sitemap artifacts
    Sitemap {
        #[command(subcommand)]
        command: SitemapCommands,
    },

    /// Decide every catalog route and report governance violations
    Audit {
        /// Only list violations of this severity (low, medium, high, critical)
        #[arg(long)]
        severity: Option<String>,

        /// Only list violations of this type, e.g. MISSING_REQUIRED_BLOCKS
        #[arg(long = "type")]
        kind: Option<String>,

        /// Pin "now" (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        now: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct DecideArgs {
    /// Site path or absolute URL
    pub url: String,

    /// JSON file with a block set; overrides the configured supplier
    #[arg(long)]
    pub blocks: Option<String>,

    /// Page has externally supplied CMS content
    #[arg(long)]
    pub cms_content: bool,

    /// Page has unique content matching search intent
    #[arg(long)]
    pub unique_content: bool,

    /// Page is flagged as duplicate content
    #[arg(long)]
    pub duplicate_content: bool,

    /// Manual noindex override
    #[arg(long)]
    pub manual_noindex: bool,

    /// Manual index override
    #[arg(long)]
    pub manual_index: bool,

    /// Featured page
    #[arg(long)]
    pub featured: bool,

    /// Word count of the rendered page
    #[arg(long)]
    pub word_count: Option<u32>,

    /// Engagement score in [0, 1]
    #[arg(long)]
    pub engagement: Option<f64>,

    /// Number of external citations
    #[arg(long)]
    pub citations: Option<u32>,

    /// Pin "now" (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub now: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum SitemapCommands {
    /// Generate, validate and write the sitemap index and child sitemaps
    Build {
        /// Output directory
        #[arg(long, default_value = "public")]
        out: String,

        /// Pin "now" (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        now: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate and validate without writing; non-zero exit when invalid
    Validate {
        /// Pin "now" (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        now: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
