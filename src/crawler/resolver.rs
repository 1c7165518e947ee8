//! MIME type resolution for discovered URLs

use crate::crawler::Fetcher;
use crate::mime::MimeTaxonomy;
use std::sync::Arc;

/// Outcome of resolving one URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved MIME type; `Some("")` when a HEAD response carried no
    /// Content-Type, `None` when the URL could not be classified
    pub mimetype: Option<String>,

    /// Content-Length in bytes when known
    pub size: Option<u64>,
}

impl Resolution {
    /// The unclassifiable outcome
    pub fn unknown() -> Self {
        Self::default()
    }

    /// The resolved type, empty when unknown
    pub fn mimetype_str(&self) -> &str {
        self.mimetype.as_deref().unwrap_or("")
    }
}

/// Resolves a URL's MIME type, cheaply when possible
///
/// # Strategy
///
/// 1. With `optimize`, guess from the URL's extension; a hit costs no I/O
///    and leaves the size unknown
/// 2. Otherwise probe with HEAD through the fetcher
///    - transport failure → unclassifiable, logged at debug level
///    - missing Content-Type → empty type, which never matches a target
#[derive(Debug, Clone)]
pub struct MimeResolver {
    taxonomy: Arc<MimeTaxonomy>,
}

impl MimeResolver {
    pub fn new(taxonomy: Arc<MimeTaxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &MimeTaxonomy {
        &self.taxonomy
    }

    pub async fn resolve(&self, fetcher: &dyn Fetcher, url: &str, optimize: bool) -> Resolution {
        if optimize {
            if let Some(guess) = self.taxonomy.guess_from_url(url) {
                return Resolution {
                    mimetype: Some(guess.to_string()),
                    size: None,
                };
            }
        }

        match fetcher.head(url).await {
            Ok(head) => Resolution {
                mimetype: Some(head.content_type.unwrap_or_default()),
                size: head.content_length,
            },
            Err(e) => {
                tracing::debug!("HEAD probe failed for {}: {}", url, e);
                Resolution::unknown()
            }
        }
    }
}
