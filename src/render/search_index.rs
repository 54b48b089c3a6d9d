use crate::domain::model::RenderedPage;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// One entry of `products/search-index.json`, consumed by the site's client-side search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub name: String,
    pub url: String,
    pub sku: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub description: String,
    pub keywords: Vec<String>,
}

impl From<&RenderedPage> for SearchEntry {
    fn from(page: &RenderedPage) -> Self {
        Self {
            name: page.product.name.clone(),
            url: page.url_path.clone(),
            sku: page.product.sku.clone(),
            brand: page.product.brand.clone(),
            category: page.product.category.clone(),
            description: page.seo.description.clone(),
            keywords: page.seo.keywords.clone(),
        }
    }
}

/// Pretty JSON array in generation order.
pub fn render_search_index(pages: &[RenderedPage]) -> Result<String> {
    let entries: Vec<SearchEntry> = pages.iter().map(SearchEntry::from).collect();
    let mut json = serde_json::to_string_pretty(&entries)?;
    json.push('\n');
    Ok(json)
}
