//! Organization-name matching.
//!
//! Names and filters are compared in [`normalize_text`] form, so matching is
//! case-, accent- and spacing-insensitive.

use pncp_core::normalize_text;

/// Returns `true` if any filter is a substring of `name` after normalization.
///
/// An empty filter list accepts everything; otherwise an empty name never
/// matches.
#[must_use]
pub fn matches(name: &str, filters: &[String]) -> bool {
    OrgFilter::new(filters).accepts(name)
}

/// Filter set with its patterns normalized once up front.
#[derive(Debug, Clone, Default)]
pub struct OrgFilter {
    patterns: Vec<String>,
}

impl OrgFilter {
    #[must_use]
    pub fn new(filters: &[String]) -> Self {
        Self {
            patterns: filters.iter().map(|f| normalize_text(f)).collect(),
        }
    }

    /// A filter with no patterns accepts every organization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        if self.is_empty() {
            return true;
        }
        if name.is_empty() {
            return false;
        }
        let haystack = normalize_text(name);
        self.patterns.iter().any(|p| haystack.contains(p.as_str()))
    }
}
