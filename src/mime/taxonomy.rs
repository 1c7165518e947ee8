use std::collections::{BTreeMap, BTreeSet, HashMap};
use url::Url;

/// Known file extensions and the MIME type each one maps to.
///
/// Mirrors the common system registry (`/etc/mime.types` style) plus the
/// non-strict types browsers and servers still emit in the wild.
const EXTENSION_TABLE: &[(&str, &str)] = &[
    // application
    (".a", "application/octet-stream"),
    (".ai", "application/postscript"),
    (".bcpio", "application/x-bcpio"),
    (".bin", "application/octet-stream"),
    (".bz2", "application/x-bzip2"),
    (".cdf", "application/x-netcdf"),
    (".cpio", "application/x-cpio"),
    (".csh", "application/x-csh"),
    (".deb", "application/vnd.debian.binary-package"),
    (".dll", "application/octet-stream"),
    (".doc", "application/msword"),
    (".docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    (".dot", "application/msword"),
    (".dvi", "application/x-dvi"),
    (".eps", "application/postscript"),
    (".epub", "application/epub+zip"),
    (".exe", "application/octet-stream"),
    (".gtar", "application/x-gtar"),
    (".gz", "application/gzip"),
    (".hdf", "application/x-hdf"),
    (".jar", "application/java-archive"),
    (".js", "application/javascript"),
    (".json", "application/json"),
    (".jsonld", "application/ld+json"),
    (".latex", "application/x-latex"),
    (".man", "application/x-troff-man"),
    (".mdb", "application/x-msaccess"),
    (".me", "application/x-troff-me"),
    (".mif", "application/x-mif"),
    (".ms", "application/x-troff-ms"),
    (".nc", "application/x-netcdf"),
    (".o", "application/octet-stream"),
    (".obj", "application/octet-stream"),
    (".oda", "application/oda"),
    (".odp", "application/vnd.oasis.opendocument.presentation"),
    (".ods", "application/vnd.oasis.opendocument.spreadsheet"),
    (".odt", "application/vnd.oasis.opendocument.text"),
    (".ogx", "application/ogg"),
    (".p12", "application/x-pkcs12"),
    (".p7c", "application/pkcs7-mime"),
    (".pdf", "application/pdf"),
    (".pfx", "application/x-pkcs12"),
    (".pot", "application/vnd.ms-powerpoint"),
    (".ppa", "application/vnd.ms-powerpoint"),
    (".pps", "application/vnd.ms-powerpoint"),
    (".ppt", "application/vnd.ms-powerpoint"),
    (".pptx", "application/vnd.openxmlformats-officedocument.presentationml.presentation"),
    (".ps", "application/postscript"),
    (".pwz", "application/vnd.ms-powerpoint"),
    (".pyc", "application/x-python-code"),
    (".pyo", "application/x-python-code"),
    (".ram", "application/x-pn-realaudio"),
    (".rar", "application/vnd.rar"),
    (".rdf", "application/rdf+xml"),
    (".roff", "application/x-troff"),
    (".rss", "application/rss+xml"),
    (".rtf", "application/rtf"),
    (".sh", "application/x-sh"),
    (".shar", "application/x-shar"),
    (".so", "application/octet-stream"),
    (".src", "application/x-wais-source"),
    (".sv4cpio", "application/x-sv4cpio"),
    (".sv4crc", "application/x-sv4crc"),
    (".swf", "application/x-shockwave-flash"),
    (".t", "application/x-troff"),
    (".tar", "application/x-tar"),
    (".tcl", "application/x-tcl"),
    (".tex", "application/x-tex"),
    (".texi", "application/x-texinfo"),
    (".texinfo", "application/x-texinfo"),
    (".tgz", "application/x-gtar"),
    (".tr", "application/x-troff"),
    (".ustar", "application/x-ustar"),
    (".wasm", "application/wasm"),
    (".wiz", "application/msword"),
    (".wsdl", "application/xml"),
    (".xhtml", "application/xhtml+xml"),
    (".xht", "application/xhtml+xml"),
    (".xla", "application/vnd.ms-excel"),
    (".xlb", "application/vnd.ms-excel"),
    (".xls", "application/vnd.ms-excel"),
    (".xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    (".xpdl", "application/xml"),
    (".xsl", "application/xml"),
    (".xz", "application/x-xz"),
    (".zip", "application/zip"),
    (".7z", "application/x-7z-compressed"),
    // audio
    (".aac", "audio/aac"),
    (".aif", "audio/x-aiff"),
    (".aifc", "audio/x-aiff"),
    (".aiff", "audio/x-aiff"),
    (".au", "audio/basic"),
    (".flac", "audio/flac"),
    (".m4a", "audio/mp4"),
    (".mid", "audio/midi"),
    (".midi", "audio/midi"),
    (".mp2", "audio/mpeg"),
    (".mp3", "audio/mpeg"),
    (".oga", "audio/ogg"),
    (".opus", "audio/opus"),
    (".ra", "audio/x-pn-realaudio"),
    (".snd", "audio/basic"),
    (".wav", "audio/x-wav"),
    (".weba", "audio/webm"),
    // font
    (".otf", "font/otf"),
    (".ttf", "font/ttf"),
    (".woff", "font/woff"),
    (".woff2", "font/woff2"),
    // image
    (".avif", "image/avif"),
    (".bmp", "image/bmp"),
    (".gif", "image/gif"),
    (".heic", "image/heic"),
    (".ico", "image/vnd.microsoft.icon"),
    (".ief", "image/ief"),
    (".jpe", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".jpg", "image/jpeg"),
    (".pbm", "image/x-portable-bitmap"),
    (".pct", "image/pict"),
    (".pgm", "image/x-portable-graymap"),
    (".pic", "image/pict"),
    (".pict", "image/pict"),
    (".png", "image/png"),
    (".pnm", "image/x-portable-anymap"),
    (".ppm", "image/x-portable-pixmap"),
    (".ras", "image/x-cmu-raster"),
    (".rgb", "image/x-rgb"),
    (".svg", "image/svg+xml"),
    (".tif", "image/tiff"),
    (".tiff", "image/tiff"),
    (".webp", "image/webp"),
    (".xbm", "image/x-xbitmap"),
    (".xpm", "image/x-xpixmap"),
    (".xwd", "image/x-xwindowdump"),
    // message
    (".eml", "message/rfc822"),
    (".mht", "message/rfc822"),
    (".mhtml", "message/rfc822"),
    (".nws", "message/rfc822"),
    // text
    (".bat", "text/plain"),
    (".c", "text/plain"),
    (".css", "text/css"),
    (".csv", "text/csv"),
    (".etx", "text/x-setext"),
    (".h", "text/plain"),
    (".htm", "text/html"),
    (".html", "text/html"),
    (".ics", "text/calendar"),
    (".ksh", "text/plain"),
    (".md", "text/markdown"),
    (".mjs", "text/javascript"),
    (".pl", "text/plain"),
    (".py", "text/x-python"),
    (".rtx", "text/richtext"),
    (".sgm", "text/x-sgml"),
    (".sgml", "text/x-sgml"),
    (".tsv", "text/tab-separated-values"),
    (".txt", "text/plain"),
    (".vcf", "text/x-vcard"),
    (".xml", "text/xml"),
    // video
    (".3gp", "video/3gpp"),
    (".avi", "video/x-msvideo"),
    (".flv", "video/x-flv"),
    (".m1v", "video/mpeg"),
    (".m4v", "video/mp4"),
    (".mkv", "video/x-matroska"),
    (".mov", "video/quicktime"),
    (".movie", "video/x-sgi-movie"),
    (".mp4", "video/mp4"),
    (".mpa", "video/mpeg"),
    (".mpe", "video/mpeg"),
    (".mpeg", "video/mpeg"),
    (".mpg", "video/mpeg"),
    (".ogv", "video/ogg"),
    (".qt", "video/quicktime"),
    (".webm", "video/webm"),
    (".wmv", "video/x-ms-wmv"),
];

/// Immutable extension and MIME type registry
///
/// Built once at startup and shared by reference between the target matcher
/// and the MIME resolver.
#[derive(Debug, Clone)]
pub struct MimeTaxonomy {
    /// Lowercase extension (with leading dot) to MIME type
    by_extension: HashMap<String, String>,

    /// Type group (e.g. `image`) to the subtypes registered under it
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl MimeTaxonomy {
    /// Builds the taxonomy from the built-in extension registry
    pub fn standard() -> Self {
        Self::from_pairs(EXTENSION_TABLE.iter().copied())
    }

    /// Builds a taxonomy from arbitrary `(extension, mime type)` pairs
    ///
    /// Extensions are stored lowercase with a leading dot. Entries whose MIME
    /// type is not of the form `type/subtype` are skipped.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut by_extension = HashMap::new();
        let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for (ext, mime) in pairs {
            let mime = mime.trim();
            let Some((typ, subtype)) = mime.split_once('/') else {
                continue;
            };
            if typ.is_empty() || subtype.is_empty() {
                continue;
            }

            let ext = ext.trim().to_ascii_lowercase();
            let ext = if ext.starts_with('.') {
                ext
            } else {
                format!(".{}", ext)
            };

            by_extension.insert(ext, mime.to_string());
            groups
                .entry(typ.to_string())
                .or_default()
                .insert(subtype.to_string());
        }

        Self {
            by_extension,
            groups,
        }
    }

    /// Resolves an extension such as `.pdf` to its MIME type
    ///
    /// Exact lookup first, then a case-insensitive one.
    pub fn resolve_extension(&self, ext: &str) -> Option<&str> {
        self.by_extension
            .get(ext)
            .or_else(|| self.by_extension.get(&ext.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Returns every MIME type registered under a type group
    ///
    /// An unknown group yields an empty set.
    pub fn types_for_group(&self, group: &str) -> BTreeSet<String> {
        self.groups
            .get(group)
            .map(|subtypes| {
                subtypes
                    .iter()
                    .map(|subtype| format!("{}/{}", group, subtype))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns `type/subtype` for every type group owning `subtype`
    ///
    /// The same subtype may be registered under several groups
    /// (`audio/ogg` and `video/ogg`, for instance).
    pub fn all_subtypes_named(&self, subtype: &str) -> BTreeSet<String> {
        self.groups
            .iter()
            .filter(|(_, subtypes)| subtypes.contains(subtype))
            .map(|(typ, _)| format!("{}/{}", typ, subtype))
            .collect()
    }

    /// Returns true if `group` is a known type group
    pub fn is_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Returns true if any type group owns `subtype`
    pub fn is_known_subtype(&self, subtype: &str) -> bool {
        self.groups.values().any(|subtypes| subtypes.contains(subtype))
    }

    /// Returns true if `mime` is a registered `type/subtype`
    pub fn is_known_type(&self, mime: &str) -> bool {
        mime.split_once('/')
            .and_then(|(typ, subtype)| self.groups.get(typ).map(|s| s.contains(subtype)))
            .unwrap_or(false)
    }

    /// Guesses a URL's MIME type from the extension of its last path segment
    ///
    /// Query strings and fragments are ignored. Returns `None` for URLs that
    /// cannot be parsed or whose last segment has no known extension.
    pub fn guess_from_url(&self, url: &str) -> Option<&str> {
        let parsed = Url::parse(url).ok()?;
        let segment = parsed.path().rsplit('/').next()?;
        let dot = segment.rfind('.')?;
        if dot == 0 {
            return None;
        }
        self.resolve_extension(&segment[dot..])
    }

    /// Iterates over every known type group name
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of registered extensions
    pub fn extension_count(&self) -> usize {
        self.by_extension.len()
    }
}

impl Default for MimeTaxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_extension() {
        let taxonomy = MimeTaxonomy::standard();
        assert_eq!(taxonomy.resolve_extension(".pdf"), Some("application/pdf"));
        assert_eq!(taxonomy.resolve_extension(".png"), Some("image/png"));
    }

    #[test]
    fn test_resolve_extension_case_insensitive() {
        let taxonomy = MimeTaxonomy::standard();
        assert_eq!(taxonomy.resolve_extension(".PDF"), Some("application/pdf"));
    }

    #[test]
    fn test_resolve_unknown_extension() {
        let taxonomy = MimeTaxonomy::standard();
        assert_eq!(taxonomy.resolve_extension(".nope"), None);
        assert_eq!(taxonomy.resolve_extension("pdf"), None);
    }

    #[test]
    fn test_resolve_extension_is_deterministic() {
        let taxonomy = MimeTaxonomy::standard();
        for (ext, _) in EXTENSION_TABLE {
            let first = taxonomy.resolve_extension(ext).map(str::to_string);
            let second = taxonomy.resolve_extension(ext).map(str::to_string);
            assert!(first.is_some(), "{} should resolve", ext);
            assert_eq!(first, second);
        }
        assert_eq!(
            MimeTaxonomy::standard().resolve_extension(".zip"),
            taxonomy.resolve_extension(".zip")
        );
    }

    #[test]
    fn test_types_for_group() {
        let taxonomy = MimeTaxonomy::standard();
        let images = taxonomy.types_for_group("image");
        assert!(images.contains("image/png"));
        assert!(images.contains("image/jpeg"));
        assert!(images.iter().all(|m| m.starts_with("image/")));
        assert!(!images.contains("application/pdf"));
    }

    #[test]
    fn test_types_for_unknown_group() {
        let taxonomy = MimeTaxonomy::standard();
        assert!(taxonomy.types_for_group("nonsense").is_empty());
    }

    #[test]
    fn test_subtype_under_multiple_groups() {
        let taxonomy = MimeTaxonomy::standard();
        let oggs = taxonomy.all_subtypes_named("ogg");
        assert!(oggs.contains("audio/ogg"));
        assert!(oggs.contains("video/ogg"));
        assert!(oggs.contains("application/ogg"));
    }

    #[test]
    fn test_known_type_checks() {
        let taxonomy = MimeTaxonomy::standard();
        assert!(taxonomy.is_group("text"));
        assert!(!taxonomy.is_group("pdf"));
        assert!(taxonomy.is_known_subtype("pdf"));
        assert!(taxonomy.is_known_type("application/pdf"));
        assert!(!taxonomy.is_known_type("application/nope"));
        assert!(!taxonomy.is_known_type("pdf"));
    }

    #[test]
    fn test_guess_from_url() {
        let taxonomy = MimeTaxonomy::standard();
        assert_eq!(
            taxonomy.guess_from_url("http://example.com/files/report.pdf"),
            Some("application/pdf")
        );
        assert_eq!(
            taxonomy.guess_from_url("http://example.com/img/Logo.PNG?v=2#top"),
            Some("image/png")
        );
    }

    #[test]
    fn test_guess_from_url_without_extension() {
        let taxonomy = MimeTaxonomy::standard();
        assert_eq!(taxonomy.guess_from_url("http://example.com/"), None);
        assert_eq!(taxonomy.guess_from_url("http://example.com"), None);
        assert_eq!(taxonomy.guess_from_url("http://example.com/download"), None);
        assert_eq!(taxonomy.guess_from_url("http://example.com/.hidden"), None);
        assert_eq!(taxonomy.guess_from_url("not a url"), None);
    }

    #[test]
    fn test_from_pairs_skips_malformed() {
        let taxonomy = MimeTaxonomy::from_pairs([("foo", "bogus"), ("BAR", "x/bar")]);
        assert_eq!(taxonomy.extension_count(), 1);
        assert_eq!(taxonomy.resolve_extension(".bar"), Some("x/bar"));
        assert_eq!(taxonomy.groups().collect::<Vec<_>>(), vec!["x"]);
    }
}
