pub mod catalog;
pub mod page;
pub mod robots;
pub mod search_index;
pub mod sitemap;
pub mod template;

use chrono::{Datelike, NaiveDate};

/// Site-wide values shared by every renderer.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// No trailing slash.
    pub site_url: String,
    pub site_name: String,
    pub build_date: NaiveDate,
}

impl RenderContext {
    pub fn catalog_url(&self) -> String {
        format!("{}/products/", self.site_url)
    }
}

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// `16 de octubre de 2026`
pub fn spanish_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS_ES[date.month0() as usize],
        date.year()
    )
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

pub fn escape_xml(input: &str) -> String {
    escape_html(input).replace("&#39;", "&apos;")
}
