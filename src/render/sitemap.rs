use crate::domain::model::RenderedPage;
use crate::render::{escape_xml, RenderContext};
use chrono::{DateTime, NaiveDate};

/// Two static entries (home, catalog) plus one `<url>` per page.
pub fn render_sitemap(pages: &[RenderedPage], ctx: &RenderContext) -> String {
    let build_date = ctx.build_date.format("%Y-%m-%d").to_string();
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    push_url(&mut xml, &format!("{}/", ctx.site_url), &build_date, "weekly", "1.0");
    push_url(&mut xml, &ctx.catalog_url(), &build_date, "daily", "0.8");

    for page in pages {
        let lastmod = page
            .product
            .updated_at
            .as_deref()
            .and_then(parse_lastmod)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| build_date.clone());
        push_url(&mut xml, &page.seo.canonical_url, &lastmod, "weekly", "0.6");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: &str, changefreq: &str, priority: &str) {
    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
    xml.push_str(&format!("    <changefreq>{}</changefreq>\n", changefreq));
    xml.push_str(&format!("    <priority>{}</priority>\n", priority));
    xml.push_str("  </url>\n");
}

/// RFC 3339 timestamps or anything starting with `YYYY-MM-DD`.
pub fn parse_lastmod(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    let head = value.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{PageSeo, Product};

    fn page(filename: &str, updated_at: Option<&str>) -> RenderedPage {
        RenderedPage {
            product: Product {
                name: filename.into(),
                updated_at: updated_at.map(String::from),
                ..Default::default()
            },
            seo: PageSeo {
                title: String::new(),
                description: String::new(),
                canonical_url: format!("https://tienda.test/products/{}", filename),
                keywords: Vec::new(),
                image: None,
                json_ld: String::new(),
            },
            filename: filename.into(),
            url_path: format!("/products/{}", filename),
            html: String::new(),
        }
    }

    #[test]
    fn test_one_url_per_page_plus_two_static() {
        let ctx = RenderContext {
            site_url: "https://tienda.test".into(),
            site_name: "Tienda".into(),
            build_date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        };
        let pages = vec![
            page("a.html", Some("2025-03-01T10:00:00Z")),
            page("b.html", None),
            page("c&d.html", Some("garbage")),
        ];
        let xml = render_sitemap(&pages, &ctx);

        assert_eq!(xml.matches("<url>").count(), pages.len() + 2);
        assert!(xml.contains("<loc>https://tienda.test/</loc>"));
        assert!(xml.contains("<loc>https://tienda.test/products/</loc>"));
        assert!(xml.contains("<lastmod>2025-03-01</lastmod>"));
        assert!(xml.contains("c&amp;d.html"));
        assert_eq!(xml.matches("<lastmod>2026-10-16</lastmod>").count(), 4);
    }

    #[test]
    fn test_parse_lastmod() {
        assert_eq!(
            parse_lastmod("2024-02-29T23:30:00-05:00"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_lastmod("2024-06-01"), NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(parse_lastmod("01/06/2024"), None);
        assert_eq!(parse_lastmod("short"), None);
    }
}
