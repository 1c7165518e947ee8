use url::Url;

use super::netloc;

/// Base information of a referring page used to absolutize its links
///
/// `base_url` is `scheme://netloc` and `base_path` is the directory of the
/// page's path (`/blog` for `/blog/post`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBase {
    pub base_url: String,
    pub base_path: String,
}

impl PageBase {
    /// Derives the base URL and base path of a page URL
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use resource_crawler::url::PageBase;
    ///
    /// let base = PageBase::from_url(&Url::parse("https://example.com:8080/blog/post").unwrap());
    /// assert_eq!(base.base_url, "https://example.com:8080");
    /// assert_eq!(base.base_path, "/blog");
    /// ```
    pub fn from_url(url: &Url) -> Self {
        Self {
            base_url: format!("{}://{}", url.scheme(), netloc(url)),
            base_path: dirname(url.path()).to_string(),
        }
    }

    /// Builds a base from already split parts
    pub fn new(base_url: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            base_path: base_path.into(),
        }
    }
}

/// Returns true for links that never produce a URL: same-page anchors and
/// `mailto`/`tel` links
pub fn is_ignorable(link: &str) -> bool {
    if link.starts_with('#') || link.starts_with("mailto:") || link.starts_with("tel:") {
        return true;
    }
    matches!(
        split_scheme(link).0.map(|s| s.to_ascii_lowercase()).as_deref(),
        Some("mailto") | Some("tel")
    )
}

/// Normalizes a raw link found on a page into an absolute URL string
///
/// # Normalization Steps
///
/// 1. Ignorable links (`#...`, `mailto:`, `tel:`) yield `None`
/// 2. Links without a network location are joined onto the page base:
///    `base_url + join("/", base_path, link)` with dot segments collapsed.
///    A link starting with `/` replaces the base path.
///    An empty network location (`///x`) counts as no network location.
/// 3. Scheme-relative links (`//host/x`) get an `http:` scheme
/// 4. Anything else is returned unchanged
///
/// The link is expected to be trimmed already.
///
/// # Examples
///
/// ```
/// use resource_crawler::url::{normalize_link, PageBase};
///
/// let base = PageBase::new("http://host", "/blog/post");
/// assert_eq!(
///     normalize_link("../img/a.png", &base).as_deref(),
///     Some("http://host/blog/img/a.png")
/// );
/// assert_eq!(normalize_link("mailto:a@b.com", &base), None);
/// ```
pub fn normalize_link(link: &str, base: &PageBase) -> Option<String> {
    if is_ignorable(link) {
        return None;
    }

    let (scheme, rest) = split_scheme(link);
    let has_netloc = rest.starts_with("//") && rest.len() > 2 && !rest[2..].starts_with('/');

    if !has_netloc {
        // "///path" carries an empty network location
        let link = if scheme.is_none() && link.starts_with("///") {
            &link[2..]
        } else {
            link
        };
        return Some(format!("{}{}", base.base_url, join_path(&base.base_path, link)));
    }

    if scheme.is_none() {
        return Some(format!("http://{}", rest.trim_start_matches('/')));
    }

    Some(link.to_string())
}

/// Splits a link into its scheme (if it has a syntactically valid one) and
/// the remainder after the colon
fn split_scheme(link: &str) -> (Option<&str>, &str) {
    if let Some(colon) = link.find(':') {
        let candidate = &link[..colon];
        let valid = candidate
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && candidate
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if valid {
            return (Some(candidate), &link[colon + 1..]);
        }
    }
    (None, link)
}

/// Returns the directory portion of a URL path
fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Joins `link` onto `/` and `base_path`, then collapses dot segments
///
/// The query string and fragment of the link are carried over untouched.
fn join_path(base_path: &str, link: &str) -> String {
    let split_at = link
        .find(|c: char| c == '?' || c == '#')
        .unwrap_or(link.len());
    let (link_path, suffix) = link.split_at(split_at);

    let joined = if link_path.starts_with('/') {
        link_path.to_string()
    } else {
        let dir = if base_path.is_empty() { "/" } else { base_path };
        if dir.ends_with('/') {
            format!("{}{}", dir, link_path)
        } else {
            format!("{}/{}", dir, link_path)
        }
    };

    format!("{}{}", collapse_dot_segments(&joined), suffix)
}

/// Removes `.` and `..` segments from an absolute path
///
/// `..` at the root is dropped. A trailing slash, or a trailing `.`/`..`
/// segment, leaves the result ending in `/`.
fn collapse_dot_segments(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let mut trailing_slash = path.ends_with('/');

    for segment in path.split('/').skip(1) {
        match segment {
            "." => trailing_slash = true,
            ".." => {
                segments.pop();
                trailing_slash = true;
            }
            _ => {
                segments.push(segment);
                trailing_slash = false;
            }
        }
    }

    // A trailing "/" leaves an empty final segment which already encodes the slash
    if segments.last() == Some(&"") {
        trailing_slash = false;
    }

    let mut result = format!("/{}", segments.join("/"));
    if trailing_slash && !result.ends_with('/') {
        result.push('/');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> PageBase {
        PageBase::new("http://host", "/blog/post")
    }

    #[test]
    fn test_page_base_from_url() {
        let url = Url::parse("http://example.com/docs/guide/intro.html").unwrap();
        let base = PageBase::from_url(&url);
        assert_eq!(base.base_url, "http://example.com");
        assert_eq!(base.base_path, "/docs/guide");
    }

    #[test]
    fn test_page_base_root() {
        let url = Url::parse("http://example.com").unwrap();
        let base = PageBase::from_url(&url);
        assert_eq!(base.base_path, "/");

        let url = Url::parse("http://example.com/page").unwrap();
        assert_eq!(PageBase::from_url(&url).base_path, "/");
    }

    #[test]
    fn test_page_base_directory_url() {
        let url = Url::parse("http://example.com/blog/post/").unwrap();
        assert_eq!(PageBase::from_url(&url).base_path, "/blog/post");
    }

    #[test]
    fn test_ignorable_links() {
        assert!(is_ignorable("#section"));
        assert!(is_ignorable("mailto:a@b.com"));
        assert!(is_ignorable("MAILTO:a@b.com"));
        assert!(is_ignorable("tel:+123456"));
        assert!(!is_ignorable("/page"));
        assert!(!is_ignorable("http://example.com/#top"));
    }

    #[test]
    fn test_ignored_links_produce_nothing() {
        assert_eq!(normalize_link("#top", &base()), None);
        assert_eq!(normalize_link("mailto:a@b.com", &base()), None);
        assert_eq!(normalize_link("tel:555", &base()), None);
    }

    #[test]
    fn test_relative_link() {
        assert_eq!(
            normalize_link("a.pdf", &base()).as_deref(),
            Some("http://host/blog/post/a.pdf")
        );
    }

    #[test]
    fn test_parent_relative_link() {
        assert_eq!(
            normalize_link("../img/a.png", &base()).as_deref(),
            Some("http://host/blog/img/a.png")
        );
    }

    #[test]
    fn test_parent_beyond_root() {
        let base = PageBase::new("http://host", "/");
        assert_eq!(
            normalize_link("../../x.pdf", &base).as_deref(),
            Some("http://host/x.pdf")
        );
    }

    #[test]
    fn test_root_relative_link_does_not_duplicate_slash() {
        assert_eq!(
            normalize_link("/doc.pdf", &base()).as_deref(),
            Some("http://host/doc.pdf")
        );
    }

    #[test]
    fn test_empty_base_path() {
        let base = PageBase::new("http://host", "");
        assert_eq!(
            normalize_link("doc.pdf", &base).as_deref(),
            Some("http://host/doc.pdf")
        );
    }

    #[test]
    fn test_query_and_fragment_preserved() {
        assert_eq!(
            normalize_link("./file.pdf?dl=1#p2", &base()).as_deref(),
            Some("http://host/blog/post/file.pdf?dl=1#p2")
        );
        assert_eq!(
            normalize_link("view?path=../x", &base()).as_deref(),
            Some("http://host/blog/post/view?path=../x")
        );
    }

    #[test]
    fn test_trailing_slash_preserved() {
        assert_eq!(
            normalize_link("archive/", &base()).as_deref(),
            Some("http://host/blog/post/archive/")
        );
        assert_eq!(normalize_link("..", &base()).as_deref(), Some("http://host/blog/"));
    }

    #[test]
    fn test_scheme_relative_link() {
        assert_eq!(
            normalize_link("//cdn.example.com/a.js", &base()).as_deref(),
            Some("http://cdn.example.com/a.js")
        );
    }

    #[test]
    fn test_empty_netloc_is_a_path() {
        assert_eq!(
            normalize_link("///files/a.pdf", &base()).as_deref(),
            Some("http://host/files/a.pdf")
        );
    }

    #[test]
    fn test_absolute_link_unchanged() {
        let link = "https://other.com/x/../y.pdf";
        assert_eq!(normalize_link(link, &base()).as_deref(), Some(link));
    }

    #[test]
    fn test_normalization_idempotent() {
        for link in ["../img/a.png", "/doc.pdf", "x?y=1", "//cdn.com/z", "http://a.com/b"] {
            let first = normalize_link(link, &base());
            let second = normalize_link(link, &base());
            assert_eq!(first, second, "normalizing {} twice differed", link);
            let again = first.as_deref().and_then(|u| normalize_link(u, &base()));
            assert_eq!(first, again, "re-normalizing {} changed it", link);
        }
    }

    #[test]
    fn test_collapse_dot_segments() {
        assert_eq!(collapse_dot_segments("/a/./b/../c"), "/a/c");
        assert_eq!(collapse_dot_segments("/a/b/.."), "/a/");
        assert_eq!(collapse_dot_segments("/"), "/");
        assert_eq!(collapse_dot_segments("/a/b/"), "/a/b/");
        assert_eq!(collapse_dot_segments("/.."), "/");
    }

    #[test]
    fn test_split_scheme() {
        assert_eq!(split_scheme("http://a"), (Some("http"), "//a"));
        assert_eq!(split_scheme("//a/b"), (None, "//a/b"));
        assert_eq!(split_scheme("a/b:c"), (None, "a/b:c"));
        assert_eq!(split_scheme("1x:y"), (None, "1x:y"));
    }
}
