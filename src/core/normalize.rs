//! Maps heterogeneous product JSON into [`Product`].
//!
//! Inputs come from fixtures written by hand and from several API
//! versions, so field names vary. Every accessor here takes a list of
//! aliases and returns the first non-empty match.

use crate::domain::model::{Compatibility, Product};
use serde_json::{Map, Value};
use std::collections::HashSet;

const LIST_KEYS: [&str; 4] = ["data", "products", "items", "results"];

/// Pulls the product array out of whatever envelope the input uses.
pub fn extract_product_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            for key in LIST_KEYS {
                match obj.remove(key) {
                    Some(Value::Array(items)) => return items,
                    Some(Value::Object(inner)) => {
                        for inner_key in LIST_KEYS {
                            if let Some(Value::Array(items)) = inner.get(inner_key) {
                                return items.clone();
                            }
                        }
                    }
                    Some(other) => {
                        obj.insert(key.to_string(), other);
                    }
                    None => {}
                }
            }

            if text(&obj, &["name", "title", "nombre"]).is_some() {
                vec![Value::Object(obj)]
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    }
}

/// Normalizes and deduplicates in input order. Records without a name are skipped.
pub fn normalize_products(values: Vec<Value>, image_base_url: Option<&str>) -> Vec<Product> {
    let mut seen = HashSet::new();
    let mut products = Vec::with_capacity(values.len());

    for (index, value) in values.iter().enumerate() {
        let Some(product) = normalize_product(value, image_base_url) else {
            tracing::warn!("Skipping record #{}: no usable name", index + 1);
            continue;
        };

        if !seen.insert(product.dedup_key()) {
            tracing::debug!("Dropping duplicate product '{}'", product.name);
            continue;
        }
        products.push(product);
    }

    products
}

pub fn normalize_product(value: &Value, image_base_url: Option<&str>) -> Option<Product> {
    let obj = value.as_object()?;
    let name = text(obj, &["name", "title", "nombre"])?;

    let mut images = Vec::new();
    if let Some(Value::Array(list)) = field(obj, &["images", "imagenes"]) {
        for item in list {
            if let Some(raw) = image_ref(item) {
                images.push(resolve_image_url(&raw, image_base_url));
            }
        }
    }
    if let Some(raw) = text(obj, &["image", "imageUrl", "thumbnail"]) {
        images.push(resolve_image_url(&raw, image_base_url));
    }
    let mut seen = HashSet::new();
    images.retain(|url| seen.insert(url.clone()));

    let compatibilities = match field(obj, &["compatibilities", "compatibility", "vehicles"]) {
        Some(Value::Array(list)) => list
            .iter()
            .filter_map(|item| item.as_object().map(normalize_compatibility))
            .filter(|compat| !compat.is_empty())
            .collect(),
        _ => Vec::new(),
    };

    Some(Product {
        id: text(obj, &["id", "_id", "productId"]),
        sku: text(obj, &["sku", "code", "partNumber"]),
        name,
        slug: text(obj, &["slug"]),
        description: text(obj, &["description", "descripcion", "shortDescription"]),
        brand: text(obj, &["brand", "marca"]),
        category: text(obj, &["category", "categoria"]),
        images,
        compatibilities,
        updated_at: text(obj, &["updatedAt", "updated_at", "lastModified"]),
    })
}

fn normalize_compatibility(obj: &Map<String, Value>) -> Compatibility {
    // Newer payloads nest the vehicle and generation.
    let generation_obj = obj.get("generation").and_then(Value::as_object);
    let scopes: Vec<&Map<String, Value>> = [
        Some(obj),
        generation_obj,
        obj.get("vehicle").and_then(Value::as_object),
    ]
    .into_iter()
    .flatten()
    .collect();

    Compatibility {
        make: scoped_text(&scopes, &["make", "brand", "marca"]),
        model: scoped_text(&scopes, &["model", "modelo"]),
        generation: text(obj, &["generation", "generacion", "generationName"])
            .or_else(|| generation_obj.and_then(|g| text(g, &["code"]))),
        year_from: scoped_number(&scopes, &["yearFrom", "yearStart", "year_from"]),
        year_to: scoped_number(&scopes, &["yearTo", "yearEnd", "year_to"]),
        location: text(obj, &["location", "position", "ubicacion"]),
    }
}

fn scoped_text(scopes: &[&Map<String, Value>], keys: &[&str]) -> Option<String> {
    scopes.iter().find_map(|scope| text(scope, keys))
}

fn scoped_number(scopes: &[&Map<String, Value>], keys: &[&str]) -> Option<i32> {
    scopes.iter().find_map(|scope| number(scope, keys))
}

/// Absolute URLs pass through; relative paths go under the image base, or the site root.
pub fn resolve_image_url(raw: &str, image_base_url: Option<&str>) -> String {
    let raw = raw.trim();
    if raw.starts_with("http://") || raw.starts_with("https://") || raw.starts_with("//") {
        return raw.to_string();
    }

    let path = raw.trim_start_matches('/');
    match image_base_url {
        Some(base) if !base.trim().is_empty() => {
            format!("{}/{}", base.trim().trim_end_matches('/'), path)
        }
        _ => format!("/{}", path),
    }
}

fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

/// String-ish field: strings, numbers, or objects carrying a `name`.
fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|key| obj.get(*key)).find_map(as_text)
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Object(inner) => inner.get("name").and_then(as_text),
        _ => None,
    }
}

fn number(obj: &Map<String, Value>, keys: &[&str]) -> Option<i32> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find_map(|value| match value {
            Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
}

fn image_ref(item: &Value) -> Option<String> {
    match item {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(obj) => text(obj, &["url", "src", "path"]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_product_list_shapes() {
        assert_eq!(extract_product_list(json!([{"name": "A"}])).len(), 1);
        assert_eq!(
            extract_product_list(json!({"data": [{"name": "A"}, {"name": "B"}]})).len(),
            2
        );
        assert_eq!(
            extract_product_list(json!({"products": [{"name": "A"}]})).len(),
            1
        );
        assert_eq!(
            extract_product_list(json!({"data": {"items": [{"name": "A"}]}})).len(),
            1
        );
        assert_eq!(
            extract_product_list(json!({"nombre": "Solo", "sku": "S1"})).len(),
            1
        );
        assert!(extract_product_list(json!({"pagination": {"totalPages": 1}})).is_empty());
        assert!(extract_product_list(json!("text")).is_empty());
    }

    #[test]
    fn test_field_aliases() {
        let raw = json!({
            "_id": 7,
            "title": "  Pastillas de freno  ",
            "code": "PF-100",
            "descripcion": "Juego delantero",
            "marca": {"name": "Bosch"},
            "categoria": "Frenos",
            "price": 19.99,
            "stock": 4
        });
        let product = normalize_product(&raw, None).unwrap();
        assert_eq!(product.id.as_deref(), Some("7"));
        assert_eq!(product.name, "Pastillas de freno");
        assert_eq!(product.sku.as_deref(), Some("PF-100"));
        assert_eq!(product.description.as_deref(), Some("Juego delantero"));
        assert_eq!(product.brand.as_deref(), Some("Bosch"));
        assert_eq!(product.category.as_deref(), Some("Frenos"));
    }

    #[test]
    fn test_missing_name_is_rejected() {
        assert!(normalize_product(&json!({"sku": "X", "name": "   "}), None).is_none());
        assert!(normalize_product(&json!(["not", "an", "object"]), None).is_none());
    }

    #[test]
    fn test_images_resolved_and_deduplicated() {
        let raw = json!({
            "name": "Faro",
            "images": ["/img/faro.jpg", {"url": "https://cdn.test/faro-2.jpg"}, {"src": "img/faro.jpg"}],
            "thumbnail": "//cdn.test/thumb.jpg"
        });
        let product = normalize_product(&raw, Some("https://img.test/")).unwrap();
        assert_eq!(
            product.images,
            vec![
                "https://img.test/img/faro.jpg".to_string(),
                "https://cdn.test/faro-2.jpg".to_string(),
                "//cdn.test/thumb.jpg".to_string(),
            ]
        );

        let site_relative = normalize_product(&json!({"name": "F", "image": "a.png"}), None).unwrap();
        assert_eq!(site_relative.images, vec!["/a.png".to_string()]);
    }

    #[test]
    fn test_compatibilities_flat_and_nested() {
        let raw = json!({
            "name": "Amortiguador",
            "compatibilities": [
                {"make": "Toyota", "model": "Corolla", "generation": "E210", "yearFrom": 2019, "yearTo": "2023", "location": "Delantero"},
                {"vehicle": {"marca": "Mazda", "modelo": "3"}, "generation": {"name": "BP", "yearStart": 2019}, "position": "Trasero"},
                {}
            ]
        });
        let product = normalize_product(&raw, None).unwrap();
        assert_eq!(product.compatibilities.len(), 2);
        assert_eq!(product.compatibilities[0].year_to, Some(2023));
        assert_eq!(
            product.compatibilities[1],
            Compatibility {
                make: Some("Mazda".into()),
                model: Some("3".into()),
                generation: Some("BP".into()),
                year_from: Some(2019),
                year_to: None,
                location: Some("Trasero".into()),
            }
        );
    }

    #[test]
    fn test_normalize_products_dedupes_first_wins() {
        let values = vec![
            json!({"id": 1, "name": "Primero"}),
            json!({"id": 1, "name": "Repetido"}),
            json!({"sku": "A", "name": "Con sku"}),
            json!({"sku": "a", "name": "Mismo sku"}),
            json!({"name": "Sin id"}),
            json!({"name": "SIN ID"}),
            json!({"price": 3}),
        ];
        let products = normalize_products(values, None);
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Primero", "Con sku", "Sin id"]);
    }
}
