use crate::render::RenderContext;

pub fn render_robots(ctx: &RenderContext) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        ctx.site_url
    )
}
