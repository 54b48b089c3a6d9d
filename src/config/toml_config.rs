use crate::config::SourceKind;
use crate::utils::error::{GeneratorError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional config file. Flags and environment variables override it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub site_url: Option<String>,
    pub site_name: Option<String>,
    pub output: Option<String>,
    pub template: Option<String>,
    pub source: Option<SourceKind>,
    pub input: Option<String>,
    pub api: Option<ApiFileConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiFileConfig {
    pub base_url: Option<String>,
    pub path: Option<String>,
    pub token: Option<String>,
    pub image_base_url: Option<String>,
    pub limit: Option<usize>,
    pub max_pages: Option<usize>,
    pub retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GeneratorError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GeneratorError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// `${VAR}` → value of `VAR`; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn api(&self) -> ApiFileConfig {
        self.api.clone().unwrap_or_default()
    }
}
