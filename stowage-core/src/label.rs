//! Names that identify stores in log fields.

use smol_str::SmolStr;
use std::fmt;

/// Name reported by `Store::label`.
///
/// Adapters use a short static name such as `memory` or `file`. A two-tier
/// cache joins the names of its tiers, fast one first:
///
/// ```
/// use stowage_core::StoreLabel;
///
/// let tiers = StoreLabel::new_static("memory").compose(&StoreLabel::new_static("file"));
/// assert_eq!(tiers.as_str(), "memory.file");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StoreLabel(SmolStr);

impl StoreLabel {
    #[inline]
    pub fn new(s: impl Into<SmolStr>) -> Self {
        Self(s.into())
    }

    /// Label borrowed from a static string.
    #[inline]
    pub const fn new_static(s: &'static str) -> Self {
        Self(SmolStr::new_static(s))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins two labels as `self.other`.
    pub fn compose(&self, other: &StoreLabel) -> Self {
        Self(smol_str::format_smolstr!("{}.{}", self.0, other.0))
    }
}

impl fmt::Display for StoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&'static str> for StoreLabel {
    fn from(s: &'static str) -> Self {
        Self::new_static(s)
    }
}

impl From<String> for StoreLabel {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<SmolStr> for StoreLabel {
    fn from(s: SmolStr) -> Self {
        Self(s)
    }
}

impl AsRef<str> for StoreLabel {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_compare_by_text() {
        assert_eq!(StoreLabel::from("file"), StoreLabel::new(String::from("file")));
        assert_eq!(StoreLabel::new_static("memory").to_string(), "memory");
    }
}
