//! HTML parser for extracting link candidates
//!
//! Every `[src]` and `[href]` attribute value of a page is a candidate. The
//! raw `href` values are also kept separately because the follow decision
//! compares them against normalized links.

use scraper::{Html, Selector};

/// Raw attribute values extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    /// Values of `[src]` attributes, in document order
    pub srcs: Vec<String>,

    /// Values of `[href]` attributes, in document order
    pub hrefs: Vec<String>,
}

impl Candidates {
    /// All candidates: `src` values first, then `href` values
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.srcs
            .iter()
            .chain(self.hrefs.iter())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.srcs.len() + self.hrefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.srcs.is_empty() && self.hrefs.is_empty()
    }
}

/// Extracts link candidates from a page body
///
/// JavaScript bodies (a content type containing `text/javascript`) yield no
/// candidates. Malformed markup is parsed leniently; anything the parser
/// cannot make sense of simply contributes nothing.
///
/// # Arguments
///
/// * `body` - The page body
/// * `content_type` - The page's Content-Type header value
///
/// # Example
///
/// ```
/// use resource_crawler::crawler::extract_candidates;
///
/// let html = r#"<img src="a.png"><a href="/b.pdf">b</a>"#;
/// let candidates = extract_candidates(html, "text/html");
/// assert_eq!(candidates.all().collect::<Vec<_>>(), vec!["a.png", "/b.pdf"]);
/// ```
pub fn extract_candidates(body: &str, content_type: &str) -> Candidates {
    if content_type.contains("text/javascript") || body.trim().is_empty() {
        return Candidates::default();
    }

    let document = Html::parse_document(body);

    Candidates {
        srcs: attribute_values(&document, "src"),
        hrefs: attribute_values(&document, "href"),
    }
}

fn attribute_values(document: &Html, attribute: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(&format!("[{}]", attribute)) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attribute))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_src_before_href() {
        let html = r#"
            <html>
            <body>
                <a href="/page1">Link 1</a>
                <img src="/img/logo.png">
                <script src="/app.js"></script>
                <a href="/doc.pdf">Doc</a>
            </body>
            </html>
        "#;
        let candidates = extract_candidates(html, "text/html");
        assert_eq!(candidates.srcs, vec!["/img/logo.png", "/app.js"]);
        assert_eq!(candidates.hrefs, vec!["/page1", "/doc.pdf"]);
        assert_eq!(
            candidates.all().collect::<Vec<_>>(),
            vec!["/img/logo.png", "/app.js", "/page1", "/doc.pdf"]
        );
    }

    #[test]
    fn test_link_and_area_hrefs() {
        let html = r#"<html><head><link rel="stylesheet" href="/style.css"></head>
            <body><map><area href="/map.pdf"></map></body></html>"#;
        let candidates = extract_candidates(html, "text/html");
        assert_eq!(candidates.hrefs, vec!["/style.css", "/map.pdf"]);
    }

    #[test]
    fn test_raw_values_untouched() {
        let html = r#"<a href="  mailto:test@example.com ">Email</a><a href="">empty</a>"#;
        let candidates = extract_candidates(html, "text/html");
        assert_eq!(candidates.hrefs, vec!["  mailto:test@example.com ", ""]);
    }

    #[test]
    fn test_javascript_content_type_skipped() {
        let body = r#"document.write('<a href="/x.pdf">x</a>');"#;
        let candidates = extract_candidates(body, "text/javascript; charset=utf-8");
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_malformed_markup_degrades() {
        let html = r#"<a href="/ok.pdf"<<<>>><img src=>"#;
        let candidates = extract_candidates(html, "text/html");
        // The quoted href survives the junk that follows it
        assert_eq!(candidates.hrefs, vec!["/ok.pdf".to_string()]);
    }

    #[test]
    fn test_empty_body() {
        assert!(extract_candidates("", "text/html").is_empty());
        assert!(extract_candidates("plain text, no tags", "text/plain").is_empty());
    }
}
