use crate::domain::model::{PageSeo, Product};
use crate::render::template::TemplateVars;
use crate::render::{escape_html, spanish_date, RenderContext};
use chrono::Datelike;

pub fn page_vars(product: &Product, seo: &PageSeo, ctx: &RenderContext) -> TemplateVars {
    let mut vars = TemplateVars::new();
    vars.set("title", seo.title.as_str())
        .set("description", seo.description.as_str())
        .set("keywords", seo.keywords.join(", "))
        .set("canonical_url", seo.canonical_url.as_str())
        .set("site_url", ctx.site_url.as_str())
        .set("site_name", ctx.site_name.as_str())
        .set("catalog_url", ctx.catalog_url())
        .set("product_name", product.name.as_str())
        .set("brand", product.brand.clone().unwrap_or_default())
        .set("category", product.category.clone().unwrap_or_default())
        .set("sku", product.sku.clone().unwrap_or_default())
        .set("meta", product_meta(product))
        .set("image", seo.image.clone().unwrap_or_default())
        .set("images_html", images_html(product))
        .set("compatibilities_html", compatibilities_html(product))
        .set("json_ld", seo.json_ld.as_str())
        .set(
            "updated",
            format!("Actualizado el {}", spanish_date(ctx.build_date)),
        )
        .set("year", ctx.build_date.year().to_string());
    vars
}

/// `brand · category · SKU x`, leaving out whatever the product lacks.
fn product_meta(product: &Product) -> String {
    let mut parts: Vec<String> = [&product.brand, &product.category]
        .into_iter()
        .flatten()
        .cloned()
        .collect();
    if let Some(sku) = &product.sku {
        parts.push(format!("SKU {}", sku));
    }
    parts.join(" · ")
}

fn images_html(product: &Product) -> String {
    if product.images.is_empty() {
        return String::new();
    }

    let alt = escape_html(&product.name);
    let mut html = String::from("<div class=\"row g-2 product-gallery\">\n");
    for (index, src) in product.images.iter().enumerate() {
        let loading = if index == 0 { "eager" } else { "lazy" };
        html.push_str(&format!(
            "  <div class=\"col-6 col-md-4\"><img src=\"{}\" alt=\"{}\" class=\"img-fluid rounded\" loading=\"{}\"></div>\n",
            escape_html(src),
            alt,
            loading
        ));
    }
    html.push_str("</div>");
    html
}

fn compatibilities_html(product: &Product) -> String {
    if product.compatibilities.is_empty() {
        return "<p class=\"text-muted\">Sin información de compatibilidad.</p>".to_string();
    }

    let mut html = String::from("<ul class=\"list-group product-compatibilities\">\n");
    for compat in &product.compatibilities {
        html.push_str(&format!(
            "  <li class=\"list-group-item\">{}</li>\n",
            escape_html(&compat.label())
        ));
    }
    html.push_str("</ul>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seo::{derive_seo, SeoContext};
    use crate::domain::model::Compatibility;
    use crate::render::template::Template;
    use chrono::NaiveDate;

    fn ctx() -> RenderContext {
        RenderContext {
            site_url: "https://tienda.test".into(),
            site_name: "Tienda".into(),
            build_date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        }
    }

    fn seo() -> PageSeo {
        PageSeo {
            title: "Bujía | Tienda".into(),
            description: "Bujía de iridio".into(),
            canonical_url: "https://tienda.test/products/bujia.html".into(),
            keywords: vec!["Bujía".into(), "NGK".into()],
            image: None,
            json_ld: "{}".into(),
        }
    }

    #[test]
    fn test_page_vars() {
        let product = Product {
            name: "Bujía".into(),
            brand: Some("NGK".into()),
            ..Default::default()
        };
        let vars = page_vars(&product, &seo(), &ctx());
        assert_eq!(vars.get("updated"), Some("Actualizado el 16 de octubre de 2026"));
        assert_eq!(vars.get("year"), Some("2026"));
        assert_eq!(vars.get("keywords"), Some("Bujía, NGK"));
        assert_eq!(vars.get("catalog_url"), Some("https://tienda.test/products/"));
        assert_eq!(vars.get("sku"), Some(""));
    }

    #[test]
    fn test_meta_skips_missing_parts() {
        let mut product = Product {
            name: "Bujía".into(),
            ..Default::default()
        };
        assert_eq!(product_meta(&product), "");

        product.category = Some("Encendido".into());
        product.sku = Some("B-7".into());
        assert_eq!(product_meta(&product), "Encendido · SKU B-7");

        product.brand = Some("NGK".into());
        assert_eq!(product_meta(&product), "NGK · Encendido · SKU B-7");
    }

    #[test]
    fn test_fragments_escape_content() {
        let product = Product {
            name: "Kit <A&B>".into(),
            images: vec!["/img/kit.jpg".into(), "/img/kit-2.jpg".into()],
            compatibilities: vec![Compatibility {
                make: Some("Ford".into()),
                model: Some("F-150 <XL>".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let images = images_html(&product);
        assert!(images.contains("alt=\"Kit &lt;A&amp;B&gt;\""));
        assert!(images.contains("loading=\"eager\""));
        assert!(images.contains("loading=\"lazy\""));

        let compat = compatibilities_html(&product);
        assert!(compat.contains("Ford F-150 &lt;XL&gt;"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let template = Template::new("<title>{{title}}</title>{{{compatibilities_html}}}{{updated}}");
        let product = Product {
            name: "Bujía".into(),
            ..Default::default()
        };
        let first = template.render(&page_vars(&product, &seo(), &ctx()));
        let second = template.render(&page_vars(&product, &seo(), &ctx()));
        assert_eq!(first, second);
        assert!(first.contains("Sin información de compatibilidad."));
    }

    #[test]
    fn test_description_entities_escaped_once() {
        let product = Product {
            name: "Kit de embrague".into(),
            description: Some("<p>Frenos &amp; embragues</p>".into()),
            ..Default::default()
        };
        let seo_ctx = SeoContext {
            site_url: "https://tienda.test",
            site_name: "Tienda",
        };
        let seo = derive_seo(&product, "kit-de-embrague.html", &seo_ctx);
        assert_eq!(seo.description, "Frenos & embragues");

        let html = Template::new("<meta content=\"{{description}}\">")
            .render(&page_vars(&product, &seo, &ctx()));
        assert_eq!(html, "<meta content=\"Frenos &amp; embragues\">");
    }
}
