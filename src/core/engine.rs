use crate::core::Pipeline;
use crate::domain::model::GenerationReport;
use crate::utils::error::Result;
use std::time::Instant;

pub struct GenerationEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> GenerationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<GenerationReport> {
        let started = Instant::now();
        tracing::info!("Starting product page generation");

        let products = self.pipeline.extract().await?;
        let product_count = products.len();
        tracing::info!("Loaded {} products", product_count);

        let result = self.pipeline.transform(products).await?;
        let pages_written = result.pages.len();

        let files = self.pipeline.load(result).await?;

        tracing::info!(
            "Generated {} pages in {:.2?}",
            pages_written,
            started.elapsed()
        );

        Ok(GenerationReport {
            products: product_count,
            pages_written,
            files,
        })
    }
}
