//! Sitemap `<loc>` extraction
//!
//! Handles both `<urlset>` sitemaps (page entries) and `<sitemapindex>`
//! documents (nested sitemap entries).

use scraper::{Html, Selector};

/// `<loc>` entries of a sitemap document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapEntries {
    /// Entries under `<urlset><url>`
    pub pages: Vec<String>,

    /// Entries under `<sitemapindex><sitemap>`
    pub sitemaps: Vec<String>,
}

impl SitemapEntries {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.sitemaps.is_empty()
    }
}

/// Extracts the trimmed, non-empty `<loc>` values of a sitemap body
///
/// The body is parsed with the lenient HTML parser, which accepts XML
/// sitemaps well enough to read element text.
pub fn parse_sitemap_body(body: &str) -> SitemapEntries {
    SitemapEntries {
        pages: loc_values(body, "url > loc"),
        sitemaps: loc_values(body, "sitemap > loc"),
    }
}

fn loc_values(body: &str, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    let document = Html::parse_document(body);
    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlset() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <url><loc>http://example.com/</loc><lastmod>2024-01-01</lastmod></url>
                <url><loc>
                    http://example.com/docs/report.pdf
                </loc></url>
            </urlset>"#;
        let entries = parse_sitemap_body(body);
        assert_eq!(
            entries.pages,
            vec!["http://example.com/", "http://example.com/docs/report.pdf"]
        );
        assert!(entries.sitemaps.is_empty());
    }

    #[test]
    fn test_sitemap_index() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
            <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <sitemap><loc>http://example.com/sitemap-posts.xml</loc></sitemap>
                <sitemap><loc>http://example.com/sitemap-pages.xml</loc></sitemap>
            </sitemapindex>"#;
        let entries = parse_sitemap_body(body);
        assert!(entries.pages.is_empty());
        assert_eq!(
            entries.sitemaps,
            vec![
                "http://example.com/sitemap-posts.xml",
                "http://example.com/sitemap-pages.xml"
            ]
        );
    }

    #[test]
    fn test_not_a_sitemap() {
        let entries = parse_sitemap_body("<html><body>Not found</body></html>");
        assert!(entries.is_empty());
    }
}
