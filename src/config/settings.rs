use crate::config::toml_config::FileConfig;
use crate::config::SourceKind;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GeneratorError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_required_field,
    validate_url, Validate,
};
use std::path::Path;

pub const DEFAULT_SITE_URL: &str = "https://example.com";
pub const DEFAULT_SITE_NAME: &str = "Catálogo";
pub const DEFAULT_OUTPUT: &str = ".";
pub const DEFAULT_TEMPLATE: &str = "templates/product-template.html";
pub const DEFAULT_INPUT: &str = "data/products.sample.json";
pub const DEFAULT_API_PATH: &str = "/api/products/landing/pages";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fully resolved run configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: SourceKind,
    /// Only set when given explicitly; see [`Settings::input_path`].
    pub input: Option<String>,
    pub site_url: String,
    pub site_name: String,
    pub output: String,
    pub template: String,
    pub image_base_url: Option<String>,
    /// API page size, and a product cap in file mode.
    pub limit: Option<usize>,
    pub api: ApiSettings,
}

#[derive(Clone)]
pub struct ApiSettings {
    pub base_url: Option<String>,
    pub path: String,
    pub token: Option<String>,
    pub max_pages: Option<usize>,
    pub retries: u32,
    pub retry_delay_ms: u64,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("base_url", &self.base_url)
            .field("path", &self.path)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("max_pages", &self.max_pages)
            .field("retries", &self.retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            path: DEFAULT_API_PATH.to_string(),
            token: None,
            max_pages: None,
            retries: DEFAULT_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: SourceKind::File,
            input: None,
            site_url: DEFAULT_SITE_URL.to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
            image_base_url: None,
            limit: None,
            api: ApiSettings::default(),
        }
    }
}

impl Settings {
    #[cfg(feature = "cli")]
    pub fn from_args(args: crate::config::CliArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => {
                crate::utils::validation::validate_file_exists("config", Path::new(path))?;
                tracing::info!("Loading configuration from {}", path);
                FileConfig::from_file(path)?
            }
            None => FileConfig::default(),
        };
        Ok(Self::merge(args, file))
    }

    /// Flags (and env vars, which clap folds into flags) win over the file.
    #[cfg(feature = "cli")]
    pub fn merge(args: crate::config::CliArgs, file: FileConfig) -> Self {
        let api_file = file.api();
        let input = args.input.or(file.input);
        let base_url = non_empty(args.api_base_url.or(api_file.base_url));

        let source = args.source.or(file.source).unwrap_or_else(|| {
            if base_url.is_some() && input.is_none() {
                SourceKind::Api
            } else {
                SourceKind::File
            }
        });

        Self {
            source,
            input,
            site_url: normalize_site_url(
                &args
                    .site_url
                    .or(file.site_url)
                    .unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            ),
            site_name: args
                .site_name
                .or(file.site_name)
                .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            output: args
                .output
                .or(file.output)
                .unwrap_or_else(|| DEFAULT_OUTPUT.to_string()),
            template: args
                .template
                .or(file.template)
                .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
            image_base_url: non_empty(args.image_base_url.or(api_file.image_base_url)),
            limit: args.limit.or(api_file.limit),
            api: ApiSettings {
                base_url,
                path: args
                    .api_path
                    .or(api_file.path)
                    .unwrap_or_else(|| DEFAULT_API_PATH.to_string()),
                token: non_empty(args.api_token.or(api_file.token)),
                max_pages: args.max_pages.or(api_file.max_pages),
                retries: args.retries.or(api_file.retries).unwrap_or(DEFAULT_RETRIES),
                retry_delay_ms: args
                    .retry_delay_ms
                    .or(api_file.retry_delay_ms)
                    .unwrap_or(DEFAULT_RETRY_DELAY_MS),
                timeout_secs: args
                    .timeout_secs
                    .or(api_file.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
        }
    }

    pub fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or(DEFAULT_INPUT)
    }

    pub fn page_size(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// `<base>/<path>` with exactly one slash between them.
    pub fn api_url(&self) -> Option<String> {
        let base = self.api.base_url.as_deref()?;
        let path = self.api.path.trim();
        Some(format!(
            "{}/{}",
            base.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn normalize_site_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("site_url", &self.site_url)?;
        validate_non_empty_string("site_name", &self.site_name)?;
        validate_path("output", &self.output)?;

        if let Some(limit) = self.limit {
            validate_positive_number("limit", limit, 1)?;
        }
        if let Some(max_pages) = self.api.max_pages {
            validate_positive_number("max_pages", max_pages, 1)?;
        }
        validate_positive_number("timeout_secs", self.api.timeout_secs as usize, 1)?;

        if let Some(image_base_url) = &self.image_base_url {
            validate_url("image_base_url", image_base_url)?;
        }

        if !Path::new(&self.template).is_file() {
            return Err(GeneratorError::TemplateNotFound {
                path: self.template.clone(),
            });
        }

        match self.source {
            SourceKind::File => {
                if !Path::new(self.input_path()).is_file() {
                    return Err(GeneratorError::InputNotFound {
                        path: self.input_path().to_string(),
                    });
                }
            }
            SourceKind::Api => {
                if self.input.is_some() {
                    return Err(GeneratorError::config(
                        "--input cannot be combined with --source api",
                    ));
                }
                let base_url = validate_required_field("api_base_url", &self.api.base_url)?;
                validate_url("api_base_url", base_url)?;
                validate_non_empty_string("api_path", &self.api.path)?;
                validate_required_field("api_token", &self.api.token)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn site_url(&self) -> &str {
        &self.site_url
    }

    fn site_name(&self) -> &str {
        &self.site_name
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn template_path(&self) -> &str {
        &self.template
    }

    fn image_base_url(&self) -> Option<&str> {
        self.image_base_url.as_deref()
    }

    fn product_limit(&self) -> Option<usize> {
        match self.source {
            SourceKind::File => self.limit,
            // The API limit is a page size, not a total.
            SourceKind::Api => None,
        }
    }
}
