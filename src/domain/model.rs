use serde::{Deserialize, Serialize};

/// A vehicle fitment for a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compatibility {
    pub make: Option<String>,
    pub model: Option<String>,
    pub generation: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub location: Option<String>,
}

impl Compatibility {
    /// `Toyota Corolla E210 (2019–2023) · Delantero`
    pub fn label(&self) -> String {
        let mut parts: Vec<String> = [&self.make, &self.model, &self.generation]
            .into_iter()
            .flatten()
            .cloned()
            .collect();

        match (self.year_from, self.year_to) {
            (Some(from), Some(to)) if from == to => parts.push(format!("({})", from)),
            (Some(from), Some(to)) => parts.push(format!("({}–{})", from, to)),
            (Some(from), None) => parts.push(format!("({}+)", from)),
            (None, Some(to)) => parts.push(format!("(–{})", to)),
            (None, None) => {}
        }

        let mut label = parts.join(" ");
        if let Some(location) = &self.location {
            if label.is_empty() {
                label = location.clone();
            } else {
                label.push_str(" · ");
                label.push_str(location);
            }
        }
        label
    }

    pub fn is_empty(&self) -> bool {
        self.label().is_empty()
    }
}

/// Normalized product, safe for public pages: no price, no stock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<String>,
    pub sku: Option<String>,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub images: Vec<String>,
    pub compatibilities: Vec<Compatibility>,
    pub updated_at: Option<String>,
}

impl Product {
    /// Identity used for deduplication: id, then sku, then the name.
    pub fn dedup_key(&self) -> String {
        if let Some(id) = &self.id {
            format!("id:{}", id)
        } else if let Some(sku) = &self.sku {
            format!("sku:{}", sku.to_lowercase())
        } else {
            format!("name:{}", self.name.to_lowercase())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSeo {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub keywords: Vec<String>,
    pub image: Option<String>,
    pub json_ld: String,
}

#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub product: Product,
    pub seo: PageSeo,
    /// File name inside `products/`, e.g. `filtro-de-aceite.html`.
    pub filename: String,
    /// Site-relative URL, e.g. `/products/filtro-de-aceite.html`.
    pub url_path: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub pages: Vec<RenderedPage>,
    pub catalog_html: String,
    pub sitemap_xml: String,
    pub robots_txt: String,
    pub search_index_json: String,
}

/// What a run produced, reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Products left after normalization and deduplication.
    pub products: usize,
    pub pages_written: usize,
    /// Paths relative to the output root, in write order.
    pub files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compatibility_label() {
        let compat = Compatibility {
            make: Some("Toyota".into()),
            model: Some("Corolla".into()),
            generation: Some("E210".into()),
            year_from: Some(2019),
            year_to: Some(2023),
            location: Some("Delantero".into()),
        };
        assert_eq!(compat.label(), "Toyota Corolla E210 (2019–2023) · Delantero");

        let open_ended = Compatibility {
            make: Some("Nissan".into()),
            year_from: Some(2015),
            ..Default::default()
        };
        assert_eq!(open_ended.label(), "Nissan (2015+)");

        let location_only = Compatibility {
            location: Some("Trasero".into()),
            ..Default::default()
        };
        assert_eq!(location_only.label(), "Trasero");
        assert!(Compatibility::default().is_empty());
    }

    #[test]
    fn test_dedup_key_precedence() {
        let mut product = Product {
            name: "Filtro".into(),
            ..Default::default()
        };
        assert_eq!(product.dedup_key(), "name:filtro");
        product.sku = Some("AB-1".into());
        assert_eq!(product.dedup_key(), "sku:ab-1");
        product.id = Some("42".into());
        assert_eq!(product.dedup_key(), "id:42");
    }
}
