//! Service root type.
//!
//! A service root is either absolute (`scheme://authority[/path]`) or a
//! relative URI path. It never carries a trailing slash.

use std::fmt;
use std::str::FromStr;

use crate::error::RootError;

/// The service root every OData URI is addressed against.
///
/// # Examples
///
/// ```
/// use odata_uri::ServiceRoot;
///
/// let root = ServiceRoot::parse("http://services.odata.org/OData/OData.svc/").unwrap();
/// assert!(root.is_absolute());
/// assert_eq!(root.origin(), Some("http://services.odata.org"));
/// assert_eq!(root.path(), "/OData/OData.svc");
/// assert_eq!(root.as_str(), "http://services.odata.org/OData/OData.svc");
///
/// let root = ServiceRoot::parse("/OData/OData.svc").unwrap();
/// assert!(!root.is_absolute());
/// assert_eq!(root.as_str(), "/OData/OData.svc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ServiceRoot {
    /// `scheme://authority` for absolute roots
    origin: Option<String>,
    /// Path component, without trailing slash
    path: String,
    normalized: String,
}

impl ServiceRoot {
    /// Parses a service root from an absolute URI or a relative path.
    ///
    /// Trailing slashes are removed, so `"/"` yields the empty relative root.
    ///
    /// # Errors
    ///
    /// Returns `RootError` if:
    /// - The input contains whitespace, `?` or `#`
    /// - The scheme of an absolute URI is malformed
    /// - An absolute URI has no authority
    pub fn parse(input: &str) -> Result<Self, RootError> {
        for (i, c) in input.chars().enumerate() {
            if c.is_whitespace() || c == '?' || c == '#' {
                return Err(RootError::InvalidChar { char: c, position: i });
            }
        }

        match split_origin(input) {
            Some((scheme, authority, path)) => {
                Self::validate_scheme(scheme)?;
                if authority.is_empty() {
                    return Err(RootError::MissingAuthority);
                }
                let origin = format!("{scheme}://{authority}");
                Ok(Self::from_parts(Some(origin), path))
            }
            None => Ok(Self::from_parts(None, input)),
        }
    }

    /// Returns true if the root carries a scheme and authority.
    #[must_use]
    pub const fn is_absolute(&self) -> bool {
        self.origin.is_some()
    }

    /// Returns `scheme://authority` for absolute roots.
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Returns the path component (empty for a bare origin or `"/"`).
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the normalized string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Returns a root with the same origin and the given path.
    #[must_use]
    pub fn with_path(&self, path: &str) -> Self {
        Self::from_parts(self.origin.clone(), path)
    }

    pub(crate) fn from_parts(origin: Option<String>, path: &str) -> Self {
        let path = path.trim_end_matches('/').to_string();
        let normalized = match &origin {
            Some(origin) => format!("{origin}{path}"),
            None => path.clone(),
        };
        Self {
            origin,
            path,
            normalized,
        }
    }

    /// Strips this root from the start of `candidate` when it matches at a
    /// segment boundary.
    pub(crate) fn strip_from<'a>(&self, candidate: &'a str) -> Option<&'a str> {
        strip_at_boundary(&self.normalized, candidate)
    }

    /// Like [`Self::strip_from`], but compares path components only.
    pub(crate) fn strip_path_from<'a>(&self, candidate_path: &'a str) -> Option<&'a str> {
        strip_at_boundary(
            self.path.trim_start_matches('/'),
            candidate_path.trim_start_matches('/'),
        )
    }

    /// Returns true if `origin` names the same scheme and authority.
    pub(crate) fn same_origin(&self, origin: &str) -> bool {
        self.origin
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(origin))
    }

    fn validate_scheme(scheme: &str) -> Result<(), RootError> {
        let mut chars = scheme.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if valid {
            Ok(())
        } else {
            Err(RootError::InvalidScheme {
                found: scheme.to_string(),
            })
        }
    }
}

/// Splits `scheme://authority/path` into its three parts.
///
/// Returns `None` when the input has no scheme separator before its first
/// `/`, i.e. when it is a relative reference.
pub(crate) fn split_origin(input: &str) -> Option<(&str, &str, &str)> {
    let sep = input.find("://")?;
    let scheme = &input[..sep];
    if scheme.contains('/') {
        return None;
    }
    let rest = &input[sep + 3..];
    let authority_end = rest.find('/').unwrap_or(rest.len());
    Some((scheme, &rest[..authority_end], &rest[authority_end..]))
}

fn strip_at_boundary<'a>(prefix: &str, candidate: &'a str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(candidate);
    }
    let rest = candidate.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

impl fmt::Display for ServiceRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

impl FromStr for ServiceRoot {
    type Err = RootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ServiceRoot {
    fn as_ref(&self) -> &str {
        &self.normalized
    }
}

impl TryFrom<&str> for ServiceRoot {
    type Error = RootError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ServiceRoot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.normalized)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ServiceRoot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
