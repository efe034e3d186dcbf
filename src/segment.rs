//! Special path segments.

use std::fmt;

use crate::constants::{COUNT_SEGMENT, LINKS_SEGMENT, VALUE_SEGMENT};

/// A reserved path token that changes what a resource path addresses.
///
/// # Examples
///
/// ```
/// use odata_uri::SpecialSegment;
///
/// assert_eq!(SpecialSegment::parse("$count"), Some(SpecialSegment::Count));
/// assert_eq!(SpecialSegment::parse("Products"), None);
/// assert_eq!(SpecialSegment::Links.as_str(), "$links");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialSegment {
    /// `$count`: number of entries in a collection
    Count,
    /// `$value`: raw value of a property
    Value,
    /// `$links`: links of a navigation property
    Links,
}

impl SpecialSegment {
    /// Recognizes a reserved segment token. Matching is exact.
    #[must_use]
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            COUNT_SEGMENT => Some(Self::Count),
            VALUE_SEGMENT => Some(Self::Value),
            LINKS_SEGMENT => Some(Self::Links),
            _ => None,
        }
    }

    /// Returns the wire token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => COUNT_SEGMENT,
            Self::Value => VALUE_SEGMENT,
            Self::Links => LINKS_SEGMENT,
        }
    }
}

impl fmt::Display for SpecialSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
