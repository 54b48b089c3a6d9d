use crate::core::normalize::extract_product_list;
use crate::domain::ports::ProductSource;
use crate::utils::error::{GeneratorError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

/// Local JSON fixture standing in for the API.
pub struct FixtureSource {
    path: PathBuf,
}

impl FixtureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProductSource for FixtureSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<Value>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GeneratorError::InputNotFound {
                    path: self.describe(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        let value: Value = serde_json::from_str(&content)?;
        let records = extract_product_list(value);
        tracing::debug!("Read {} records from {}", records.len(), self.describe());
        Ok(records)
    }
}
