pub mod cli;
pub mod settings;
pub mod toml_config;

pub use settings::{ApiSettings, Settings};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Local JSON fixture
    File,
    /// Paginated landing pages API
    Api,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Api => write!(f, "api"),
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Clone, Default, clap::Parser)]
#[command(name = "generate-product-pages")]
#[command(about = "Generate static product landing pages, catalog, sitemap and robots.txt")]
pub struct CliArgs {
    /// JSON fixture to read products from
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, env = "SITE_URL")]
    pub site_url: Option<String>,

    /// Output root; pages go to <output>/products
    #[arg(long)]
    pub output: Option<String>,

    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,

    #[arg(long, env = "LANDING_PAGE_API_BASE_URL")]
    pub api_base_url: Option<String>,

    #[arg(long, env = "LANDING_PAGE_API_PATH")]
    pub api_path: Option<String>,

    #[arg(long, env = "LANDING_PAGE_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Prefix for relative image paths
    #[arg(long, env = "LANDING_PAGE_IMAGE_BASE_URL")]
    pub image_base_url: Option<String>,

    /// API page size; in file mode, cap on generated products
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long)]
    pub max_pages: Option<usize>,

    #[arg(long)]
    pub retries: Option<u32>,

    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Per-request timeout
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Product page HTML template
    #[arg(long)]
    pub template: Option<String>,

    #[arg(long)]
    pub site_name: Option<String>,

    /// TOML file with defaults for any of the above
    #[arg(long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}
