//! MIME handling module
//!
//! This module provides the static extension registry and the resolution of
//! user content type tokens into the set of MIME types a crawl reports.

mod matcher;
mod taxonomy;

pub use matcher::{ContentTypeSpec, TargetSet};
pub use taxonomy::MimeTaxonomy;

/// Content types reported when none are configured
pub const DEFAULT_CONTENT_TYPES: &[&str] = &["application/pdf"];

/// Converts a byte count to a human readable string
///
/// Divides by 1024 until the magnitude drops below 1024, stopping at
/// zettabytes, and formats with two decimals.
///
/// # Examples
///
/// ```
/// use resource_crawler::mime::bytes2human;
///
/// assert_eq!(bytes2human(500), "500.00B");
/// assert_eq!(bytes2human(1536), "1.50KB");
/// assert_eq!(bytes2human(1073741824), "1.00GB");
/// ```
pub fn bytes2human(bytes: u64) -> String {
    const UNITS: [&str; 8] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value.abs() >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2}{}", value, UNITS[unit])
}
