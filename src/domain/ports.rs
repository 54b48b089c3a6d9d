use crate::domain::model::{GenerationResult, Product};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Destination for generated artifacts, addressed by output-relative path.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Absolute site URL without a trailing slash.
    fn site_url(&self) -> &str;
    fn site_name(&self) -> &str;
    fn output_path(&self) -> &str;
    fn template_path(&self) -> &str;
    fn image_base_url(&self) -> Option<&str>;
    /// Cap on generated products, if any.
    fn product_limit(&self) -> Option<usize>;
}

/// Where raw product records come from: a fixture file or the API.
#[async_trait]
pub trait ProductSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch(&self) -> Result<Vec<serde_json::Value>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Product>>;
    async fn transform(&self, products: Vec<Product>) -> Result<GenerationResult>;
    async fn load(&self, result: GenerationResult) -> Result<Vec<String>>;
}
