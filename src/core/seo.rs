use crate::domain::model::{PageSeo, Product};
use regex::Regex;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::OnceLock;

pub const MAX_SLUG_LEN: usize = 80;
pub const MAX_DESCRIPTION_LEN: usize = 160;
const FALLBACK_SLUG: &str = "producto";

pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars().flat_map(char::to_lowercase) {
        let folded = fold_accent(ch);
        if folded.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(folded);
        } else {
            pending_dash = true;
        }
    }

    let slug = truncate_slug(&slug);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

fn truncate_slug(slug: &str) -> String {
    if slug.len() <= MAX_SLUG_LEN {
        return slug.to_string();
    }
    // Slug is ASCII at this point, byte slicing is safe.
    let cut = &slug[..MAX_SLUG_LEN];
    let cut = match cut.rfind('-') {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut,
    };
    cut.trim_matches('-').to_string()
}

/// The explicit slug wins; otherwise name plus sku, unless the name already carries the sku.
pub fn base_slug(product: &Product) -> String {
    if let Some(slug) = &product.slug {
        return slugify(slug);
    }

    let name_slug = slugify(&product.name);
    match &product.sku {
        Some(sku) => {
            let sku_slug = slugify(sku);
            if contains_segments(&name_slug, &sku_slug) {
                name_slug
            } else {
                slugify(&format!("{} {}", product.name, sku))
            }
        }
        None => name_slug,
    }
}

/// Whole `-`-separated segments only: `filtro-a1` carries `a1`, `filtro-a1x` does not.
fn contains_segments(slug: &str, part: &str) -> bool {
    let haystack: Vec<&str> = slug.split('-').collect();
    let needle: Vec<&str> = part.split('-').collect();
    haystack.windows(needle.len()).any(|window| window == needle.as_slice())
}

/// Hands out unique slugs for one run. `index` is reserved for the catalog.
#[derive(Debug)]
pub struct FilenameAllocator {
    used: HashSet<String>,
}

impl Default for FilenameAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl FilenameAllocator {
    pub fn new() -> Self {
        let mut used = HashSet::new();
        used.insert("index".to_string());
        Self { used }
    }

    pub fn allocate(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }

        let mut suffix = 2;
        loop {
            let candidate = format!("{}-{}", base, suffix);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

/// Site-level values that feed every page's metadata.
#[derive(Debug, Clone)]
pub struct SeoContext<'a> {
    pub site_url: &'a str,
    pub site_name: &'a str,
}

impl SeoContext<'_> {
    pub fn product_url(&self, filename: &str) -> String {
        format!("{}/products/{}", self.site_url, filename)
    }
}

pub fn derive_seo(product: &Product, filename: &str, ctx: &SeoContext<'_>) -> PageSeo {
    let canonical_url = ctx.product_url(filename);
    let description = meta_description(product);

    PageSeo {
        title: page_title(product, ctx.site_name),
        json_ld: json_ld(product, &description, &canonical_url),
        description,
        canonical_url,
        keywords: keywords(product),
        image: product.images.first().cloned(),
    }
}

pub fn page_title(product: &Product, site_name: &str) -> String {
    match &product.brand {
        Some(brand) => format!("{} | {} | {}", product.name, brand, site_name),
        None => format!("{} | {}", product.name, site_name),
    }
}

pub fn meta_description(product: &Product) -> String {
    let cleaned = product
        .description
        .as_deref()
        .map(strip_html)
        .filter(|text| !text.is_empty());

    match cleaned {
        Some(text) => truncate_words(&text, MAX_DESCRIPTION_LEN),
        None => truncate_words(&synthesized_description(product), MAX_DESCRIPTION_LEN),
    }
}

fn synthesized_description(product: &Product) -> String {
    let mut text = product.name.clone();
    if let Some(brand) = &product.brand {
        text.push_str(" de ");
        text.push_str(brand);
    }
    match product.compatibilities.len() {
        0 => text.push_str(". Consulta detalles y compatibilidad."),
        1 => text.push_str(". Compatible con 1 vehículo."),
        n => text.push_str(&format!(". Compatible con {} vehículos.", n)),
    }
    text
}

/// Removes tags, decodes entities and collapses whitespace.
pub fn strip_html(input: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("static regex"));
    let without_tags = tags.replace_all(input, " ");
    let decoded = decode_entities(&without_tags);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Single pass, so `&amp;lt;` becomes `&lt;` and not `<`. Unknown entities are kept.
fn decode_entities(input: &str) -> String {
    static ENTITIES: OnceLock<Regex> = OnceLock::new();
    let entities = ENTITIES.get_or_init(|| {
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);").expect("static regex")
    });

    entities
        .replace_all(input, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16).ok())
                    .unwrap_or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32)
                    .filter(|ch| !ch.is_control()),
            };
            match decoded {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Cuts at a word boundary and appends `…` when the text is longer than `max` chars.
pub fn truncate_words(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let head: String = text.chars().take(max - 1).collect();
    let ends_on_word = text.chars().nth(max - 1).is_some_and(char::is_whitespace);
    let cut = match head.rfind(' ') {
        Some(pos) if !ends_on_word && pos > max / 2 => &head[..pos],
        _ => head.as_str(),
    };
    format!(
        "{}…",
        cut.trim_end_matches(|c: char| c == ',' || c == '.' || c == ';' || c.is_whitespace())
    )
}

pub fn keywords(product: &Product) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();
    let mut push = |value: &str| {
        let value = value.trim();
        if !value.is_empty() && seen.insert(value.to_lowercase()) {
            keywords.push(value.to_string());
        }
    };

    push(&product.name);
    for value in [&product.brand, &product.category, &product.sku]
        .into_iter()
        .flatten()
    {
        push(value);
    }
    for compat in &product.compatibilities {
        let vehicle: Vec<&str> = [&compat.make, &compat.model]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        if !vehicle.is_empty() {
            push(&vehicle.join(" "));
        }
    }

    keywords
}

/// schema.org Product without offers; safe inside a `<script>` element.
pub fn json_ld(product: &Product, description: &str, canonical_url: &str) -> String {
    let mut doc = Map::new();
    doc.insert("@context".into(), json!("https://schema.org"));
    doc.insert("@type".into(), json!("Product"));
    doc.insert("name".into(), json!(product.name));
    doc.insert("description".into(), json!(description));
    doc.insert("url".into(), json!(canonical_url));
    if let Some(sku) = &product.sku {
        doc.insert("sku".into(), json!(sku));
    }
    if let Some(brand) = &product.brand {
        doc.insert("brand".into(), json!({"@type": "Brand", "name": brand}));
    }
    if let Some(category) = &product.category {
        doc.insert("category".into(), json!(category));
    }
    if !product.images.is_empty() {
        doc.insert("image".into(), json!(product.images));
    }

    Value::Object(doc).to_string().replace("</", "<\\/")
}
