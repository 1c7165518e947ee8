use crate::mime::MimeTaxonomy;
use crate::ConfigError;
use std::collections::BTreeSet;

/// One user-supplied content type token, classified against the taxonomy
///
/// Classification follows a fixed priority: explicit extension, type group,
/// subtype, full MIME type, and finally a bare extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentTypeSpec {
    /// `.pdf`
    Extension(String),
    /// `image`
    Group(String),
    /// `pdf`, `json`
    Subtype(String),
    /// `application/pdf`
    MimeType(String),
    /// `mp3`: not a known group, subtype or type; retried as `.mp3`
    BareExtension(String),
}

impl ContentTypeSpec {
    /// Classifies a raw token; the token is trimmed first
    pub fn classify(token: &str, taxonomy: &MimeTaxonomy) -> Self {
        let token = token.trim();

        if token.starts_with('.') {
            Self::Extension(token.to_string())
        } else if taxonomy.is_group(token) {
            Self::Group(token.to_string())
        } else if taxonomy.is_known_subtype(token) {
            Self::Subtype(token.to_string())
        } else if taxonomy.is_known_type(token) {
            Self::MimeType(token.to_string())
        } else {
            Self::BareExtension(format!(".{}", token))
        }
    }

    /// Expands this token into concrete MIME types
    ///
    /// Fails when an extension (explicit or bare) has no known mapping.
    pub fn expand(&self, taxonomy: &MimeTaxonomy) -> Result<BTreeSet<String>, ConfigError> {
        match self {
            Self::Extension(ext) | Self::BareExtension(ext) => taxonomy
                .resolve_extension(ext)
                .map(|mime| BTreeSet::from([mime.to_string()]))
                .ok_or_else(|| ConfigError::UnknownContentType(ext.clone())),
            Self::Group(group) => Ok(taxonomy.types_for_group(group)),
            Self::Subtype(subtype) => Ok(taxonomy.all_subtypes_named(subtype)),
            Self::MimeType(mime) => Ok(BTreeSet::from([mime.clone()])),
        }
    }
}

/// Concrete MIME types a crawl is searching for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    types: BTreeSet<String>,
}

impl TargetSet {
    /// Resolves content type tokens into a target set
    ///
    /// Token order does not affect the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownContentType` naming the first token that
    /// cannot be resolved.
    ///
    /// # Example
    ///
    /// ```
    /// use resource_crawler::mime::{MimeTaxonomy, TargetSet};
    ///
    /// let taxonomy = MimeTaxonomy::standard();
    /// let targets = TargetSet::resolve(&[".pdf", "zip"], &taxonomy).unwrap();
    /// assert!(targets.matches("application/pdf"));
    /// assert!(targets.matches("application/zip"));
    /// assert!(!targets.matches("text/html"));
    /// ```
    pub fn resolve<S: AsRef<str>>(
        specs: &[S],
        taxonomy: &MimeTaxonomy,
    ) -> Result<Self, ConfigError> {
        let mut types = BTreeSet::new();
        for spec in specs {
            let spec = ContentTypeSpec::classify(spec.as_ref(), taxonomy);
            types.extend(spec.expand(taxonomy)?);
        }
        Ok(Self { types })
    }

    /// Returns true if any target is contained in `resolved`
    ///
    /// Containment rather than equality lets `text/html; charset=utf-8` match
    /// the target `text/html`.
    pub fn matches(&self, resolved: &str) -> bool {
        !resolved.is_empty() && self.types.iter().any(|target| resolved.contains(target.as_str()))
    }

    pub fn contains(&self, mime: &str) -> bool {
        self.types.contains(mime)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
