use crate::domain::model::RenderedPage;
use crate::render::{escape_html, spanish_date, RenderContext};
use chrono::Datelike;

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

/// `products/index.html`: every product, sorted by name.
pub fn render_catalog(pages: &[RenderedPage], ctx: &RenderContext) -> String {
    let mut sorted: Vec<&RenderedPage> = pages.iter().collect();
    sorted.sort_by(|a, b| {
        a.product
            .name
            .to_lowercase()
            .cmp(&b.product.name.to_lowercase())
            .then_with(|| a.filename.cmp(&b.filename))
    });

    let site_name = escape_html(&ctx.site_name);
    let mut cards = String::new();
    for page in sorted {
        let product = &page.product;
        let mut meta = Vec::new();
        if let Some(brand) = &product.brand {
            meta.push(escape_html(brand));
        }
        if let Some(category) = &product.category {
            meta.push(escape_html(category));
        }

        cards.push_str("      <div class=\"col\">\n");
        cards.push_str("        <div class=\"card h-100\">\n");
        if let Some(image) = product.images.first() {
            cards.push_str(&format!(
                "          <img src=\"{}\" class=\"card-img-top\" alt=\"{}\" loading=\"lazy\">\n",
                escape_html(image),
                escape_html(&product.name)
            ));
        }
        cards.push_str("          <div class=\"card-body\">\n");
        cards.push_str(&format!(
            "            <h2 class=\"h5 card-title\"><a href=\"{}\" class=\"stretched-link\">{}</a></h2>\n",
            escape_html(&page.filename),
            escape_html(&product.name)
        ));
        if !meta.is_empty() {
            cards.push_str(&format!(
                "            <p class=\"card-text text-muted\">{}</p>\n",
                meta.join(" · ")
            ));
        }
        cards.push_str("          </div>\n");
        cards.push_str("        </div>\n");
        cards.push_str("      </div>\n");
    }

    format!(
        r#"<!doctype html>
<html lang="es">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Productos | {site_name}</title>
  <meta name="description" content="Catálogo de productos de {site_name}.">
  <link rel="canonical" href="{canonical}">
  <link rel="stylesheet" href="{css}">
</head>
<body>
  <main class="container py-5">
    <h1 class="mb-4">Productos</h1>
    <p class="text-muted">{count} productos · Actualizado el {updated}</p>
    <div class="row row-cols-1 row-cols-sm-2 row-cols-lg-3 g-4">
{cards}    </div>
  </main>
  <footer class="container py-4 text-muted small">&copy; {year} {site_name}</footer>
</body>
</html>
"#,
        site_name = site_name,
        canonical = escape_html(&ctx.catalog_url()),
        css = BOOTSTRAP_CSS,
        count = pages.len(),
        updated = spanish_date(ctx.build_date),
        cards = cards,
        year = ctx.build_date.year(),
    )
}
