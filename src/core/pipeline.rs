use crate::core::normalize::normalize_products;
use crate::core::seo::{base_slug, derive_seo, FilenameAllocator, SeoContext};
use crate::core::{ConfigProvider, GenerationResult, Pipeline, Product, Storage};
use crate::domain::model::RenderedPage;
use crate::domain::ports::ProductSource;
use crate::render::catalog::render_catalog;
use crate::render::page::page_vars;
use crate::render::robots::render_robots;
use crate::render::search_index::render_search_index;
use crate::render::sitemap::render_sitemap;
use crate::render::template::Template;
use crate::render::RenderContext;
use crate::utils::error::{GeneratorError, Result};
use chrono::NaiveDate;
use std::path::Path;

pub const PRODUCTS_DIR: &str = "products";
pub const CATALOG_FILE: &str = "products/index.html";
pub const SEARCH_INDEX_FILE: &str = "products/search-index.json";
pub const SITEMAP_FILE: &str = "sitemap.xml";
pub const ROBOTS_FILE: &str = "robots.txt";

/// Fetch → normalize → render → write, for one output root.
pub struct LandingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    source: Box<dyn ProductSource>,
    build_date: NaiveDate,
}

impl<S: Storage, C: ConfigProvider> LandingPipeline<S, C> {
    pub fn new(storage: S, config: C, source: Box<dyn ProductSource>) -> Self {
        Self {
            storage,
            config,
            source,
            build_date: chrono::Local::now().date_naive(),
        }
    }

    /// Pins the date used for `Actualizado el`, `year` and sitemap fallbacks.
    pub fn with_build_date(mut self, build_date: NaiveDate) -> Self {
        self.build_date = build_date;
        self
    }

    fn render_context(&self) -> RenderContext {
        RenderContext {
            site_url: self.config.site_url().to_string(),
            site_name: self.config.site_name().to_string(),
            build_date: self.build_date,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for LandingPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Product>> {
        tracing::info!("Loading products from {}", self.source.describe());
        let raw = self.source.fetch().await?;
        let raw_count = raw.len();

        let mut products = normalize_products(raw, self.config.image_base_url());
        if raw_count != products.len() {
            tracing::info!(
                "{} of {} records kept after normalization and deduplication",
                products.len(),
                raw_count
            );
        }

        if let Some(limit) = self.config.product_limit() {
            products.truncate(limit);
        }

        if products.is_empty() {
            return Err(GeneratorError::NoProducts {
                source_name: self.source.describe(),
            });
        }

        Ok(products)
    }

    async fn transform(&self, products: Vec<Product>) -> Result<GenerationResult> {
        let template = Template::load(Path::new(self.config.template_path())).await?;
        let ctx = self.render_context();
        let seo_ctx = SeoContext {
            site_url: self.config.site_url(),
            site_name: self.config.site_name(),
        };

        let mut allocator = FilenameAllocator::new();
        let mut pages = Vec::with_capacity(products.len());

        for product in products {
            let base = base_slug(&product);
            let slug = allocator.allocate(&base);
            if slug != base {
                tracing::debug!("Slug '{}' taken, using '{}'", base, slug);
            }

            let filename = format!("{}.html", slug);
            let seo = derive_seo(&product, &filename, &seo_ctx);
            let vars = page_vars(&product, &seo, &ctx);

            if pages.is_empty() {
                let unknown = template.unknown_keys(&vars);
                if !unknown.is_empty() {
                    tracing::warn!(
                        "Template placeholders with no value (rendered empty): {}",
                        unknown.join(", ")
                    );
                }
            }

            pages.push(RenderedPage {
                html: template.render(&vars),
                url_path: format!("/{}/{}", PRODUCTS_DIR, filename),
                filename,
                seo,
                product,
            });
        }

        tracing::info!("Rendered {} product pages", pages.len());

        Ok(GenerationResult {
            catalog_html: render_catalog(&pages, &ctx),
            sitemap_xml: render_sitemap(&pages, &ctx),
            robots_txt: render_robots(&ctx),
            search_index_json: render_search_index(&pages)?,
            pages,
        })
    }

    async fn load(&self, result: GenerationResult) -> Result<Vec<String>> {
        let mut written = Vec::with_capacity(result.pages.len() + 4);

        for page in &result.pages {
            let path = format!("{}/{}", PRODUCTS_DIR, page.filename);
            self.storage.write_file(&path, page.html.as_bytes()).await?;
            written.push(path);
        }

        let artifacts = [
            (CATALOG_FILE, &result.catalog_html),
            (SEARCH_INDEX_FILE, &result.search_index_json),
            (SITEMAP_FILE, &result.sitemap_xml),
            (ROBOTS_FILE, &result.robots_txt),
        ];
        for (path, content) in artifacts {
            self.storage.write_file(path, content.as_bytes()).await?;
            written.push(path.to_string());
        }

        tracing::info!(
            "Wrote {} files under {}",
            written.len(),
            self.config.output_path()
        );
        Ok(written)
    }
}
