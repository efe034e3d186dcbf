//! Main OData URI type: the segment model, its parser and its serializer.

use std::fmt;

use crate::constants::{DATA_SERVICE_VERSION_1, DATA_SERVICE_VERSION_2, LINKS_SEGMENT};
use crate::error::{ParseError, ParseErrorKind, RootError};
use crate::options::{QueryOptions, SystemQueryOption};
use crate::root::{ServiceRoot, split_origin};
use crate::segment::SpecialSegment;

/// A structured OData URI.
///
/// Holds the service root, the resource path, the special segment markers
/// and the query options. Values are immutable: every builder operation
/// returns a new `ODataUri` and leaves the receiver untouched, so a shared
/// base can be branched freely.
///
/// # Structure
///
/// ```text
/// <root>[/<resource>][/$count | /$value | /$links/<target>][?<options>]
/// ```
///
/// # Examples
///
/// ```
/// use odata_uri::ODataUri;
///
/// let base = ODataUri::new("http://services.odata.org/OData/OData.svc").unwrap();
///
/// let uri = base.resource("Products").orderby("Name desc").top(5);
/// assert_eq!(
///     uri.to_string(),
///     "http://services.odata.org/OData/OData.svc/Products?$orderby=Name desc&$top=5"
/// );
///
/// // Self-links returned by the server parse back against the same root
/// let entry = base.reparse("http://services.odata.org/OData/OData.svc/Categories(1)/$links/Products").unwrap();
/// assert_eq!(entry.resource_path(), "Categories(1)");
/// assert_eq!(entry.links_target(), Some("Products"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ODataUri {
    pub(crate) root: ServiceRoot,
    pub(crate) resource: String,
    pub(crate) count: bool,
    pub(crate) value: bool,
    pub(crate) links: Option<String>,
    pub(crate) options: QueryOptions,
}

/// How a transport should interpret the response to a URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// Structured JSON
    Json,
    /// Plain text; the response to a `$count` request
    Text,
    /// Content passed through as-is; the response to a `$value` request
    Raw,
}

/// Named parts from which an [`ODataUri`] can be constructed.
///
/// Equivalent to `ODataUri::new(root)` followed by `resource` and `links`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UriDescriptor {
    /// Absolute URI or relative path of the service root
    pub root: String,
    /// Resource path below the root
    #[cfg_attr(feature = "serde", serde(default))]
    pub resource: Option<String>,
    /// Navigation property whose links are addressed
    #[cfg_attr(feature = "serde", serde(default))]
    pub links: Option<String>,
}

impl ODataUri {
    /// Creates a URI addressing the given service root.
    ///
    /// # Errors
    ///
    /// Returns `RootError` if `root` is not a valid absolute URI or URI path.
    pub fn new(root: &str) -> Result<Self, RootError> {
        ServiceRoot::parse(root).map(Self::from_root)
    }

    /// Creates a URI addressing an already parsed service root.
    #[must_use]
    pub fn from_root(root: ServiceRoot) -> Self {
        Self {
            root,
            ..Self::default()
        }
    }

    /// Creates a URI from a descriptor.
    ///
    /// # Errors
    ///
    /// Returns `RootError` if the descriptor's root is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use odata_uri::{ODataUri, UriDescriptor};
    ///
    /// let uri = ODataUri::from_descriptor(&UriDescriptor {
    ///     root: "http://services.odata.org/OData/OData.svc".into(),
    ///     resource: Some("Categories(1)".into()),
    ///     links: Some("Products".into()),
    /// }).unwrap();
    /// assert_eq!(uri.to_string(), "http://services.odata.org/OData/OData.svc/Categories(1)/$links/Products");
    /// ```
    pub fn from_descriptor(descriptor: &UriDescriptor) -> Result<Self, RootError> {
        let mut uri = Self::new(&descriptor.root)?;
        if let Some(resource) = &descriptor.resource {
            uri = uri.resource(resource);
        }
        if let Some(links) = &descriptor.links {
            uri = uri.links(links);
        }
        Ok(uri)
    }

    /// Parses a URI without a known service root.
    ///
    /// The root is taken from the input: the `scheme://authority` of an
    /// absolute URI, or the empty relative root otherwise. Everything after
    /// it is the resource path. Use [`Self::reparse`] when the root is known.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - The input is empty
    /// - The input is absolute with a malformed scheme or no authority
    /// - A trailing `$links` segment has no navigation property after it
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_inner(None, input).map_err(|kind| ParseError {
            input: input.to_string(),
            kind,
        })
    }

    /// Parses `input` against this URI's service root.
    ///
    /// The returned URI keeps this URI's root, and with it the root's
    /// absoluteness, whenever the input path can be correlated with it: an
    /// absolute self-link parsed against a relative root serializes back
    /// relative, and the other way round. Inputs without a scheme or leading
    /// `/` are resource paths relative to the root.
    ///
    /// A root-relative input whose path does not start with the root's path
    /// cannot be correlated. Against an absolute root it keeps the root's
    /// origin and drops its path, so the whole input path becomes the
    /// resource path: `/Other.svc/Products` against
    /// `http://services.odata.org/OData/OData.svc` yields root
    /// `http://services.odata.org` and resource `Other.svc/Products`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` under the same conditions as [`Self::parse`].
    ///
    /// # Examples
    ///
    /// ```
    /// use odata_uri::ODataUri;
    ///
    /// let relative = ODataUri::new("/OData/OData.svc").unwrap();
    /// let uri = relative
    ///     .reparse("http://services.odata.org/OData/OData.svc/Category(1)/Products/")
    ///     .unwrap();
    /// assert_eq!(uri.to_string(), "/OData/OData.svc/Category(1)/Products");
    /// ```
    pub fn reparse(&self, input: &str) -> Result<Self, ParseError> {
        Self::parse_inner(Some(&self.root), input).map_err(|kind| ParseError {
            input: input.to_string(),
            kind,
        })
    }

    /// Returns the service root.
    #[must_use]
    pub const fn root(&self) -> &ServiceRoot {
        &self.root
    }

    /// Returns the resource path, without leading or trailing slash.
    #[must_use]
    pub fn resource_path(&self) -> &str {
        &self.resource
    }

    /// Returns true if the URI addresses `$count`.
    #[must_use]
    pub const fn is_count(&self) -> bool {
        self.count
    }

    /// Returns true if the URI addresses `$value`.
    #[must_use]
    pub const fn is_value(&self) -> bool {
        self.value
    }

    /// Returns the navigation property addressed through `$links`, if any.
    #[must_use]
    pub fn links_target(&self) -> Option<&str> {
        self.links.as_deref()
    }

    /// Returns the query options.
    #[must_use]
    pub const fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Returns the `DataServiceVersion` a request for this URI requires.
    ///
    /// `$count`, `$inlinecount` and `$select` need version 2.0.
    #[must_use]
    pub fn data_service_version(&self) -> &'static str {
        if self.count
            || self.options.contains(SystemQueryOption::InlineCount)
            || self.options.contains(SystemQueryOption::Select)
        {
            DATA_SERVICE_VERSION_2
        } else {
            DATA_SERVICE_VERSION_1
        }
    }

    /// Returns how the response to this URI should be read.
    #[must_use]
    pub const fn response_kind(&self) -> ResponseKind {
        if self.value {
            ResponseKind::Raw
        } else if self.count {
            ResponseKind::Text
        } else {
            ResponseKind::Json
        }
    }

    fn parse_inner(current: Option<&ServiceRoot>, input: &str) -> Result<Self, ParseErrorKind> {
        if input.is_empty() {
            return Err(ParseErrorKind::Empty);
        }

        let (path, query) = match input.split_once('?') {
            Some((path, query)) => (path, query),
            None => (input, ""),
        };

        let (root, rest) = Self::reconcile_root(current, path)?;

        let mut uri = Self::from_root(root);
        uri.options = QueryOptions::parse(query);
        Self::split_special_segments(&mut uri, rest)?;

        Ok(uri)
    }

    /// Decides which part of `path` is the service root.
    ///
    /// The output root is absolute exactly when `current` is, unless there is
    /// no current root, in which case it follows the input.
    fn reconcile_root<'a>(
        current: Option<&ServiceRoot>,
        path: &'a str,
    ) -> Result<(ServiceRoot, &'a str), ParseErrorKind> {
        let input_origin = match split_origin(path) {
            Some((scheme, authority, rest)) => {
                let origin = ServiceRoot::parse(&format!("{scheme}://{authority}"))
                    .map_err(ParseErrorKind::InvalidRoot)?;
                Some((origin, rest))
            }
            None => None,
        };

        let Some(current) = current else {
            return Ok(match input_origin {
                Some((origin, rest)) => (origin, rest),
                None => (ServiceRoot::default(), path),
            });
        };

        let reconciled = match input_origin {
            Some((origin, rest)) if current.is_absolute() => {
                let correlated = origin
                    .origin()
                    .is_some_and(|o| current.same_origin(o))
                    .then(|| current.strip_path_from(rest))
                    .flatten();
                match correlated {
                    Some(remainder) => (current.clone(), remainder),
                    None => (origin, rest),
                }
            }
            Some((_, rest)) => match current.strip_path_from(rest) {
                Some(remainder) => (current.clone(), remainder),
                None => (ServiceRoot::default(), rest),
            },
            None if path.starts_with('/') => match current.strip_path_from(path) {
                Some(remainder) => (current.clone(), remainder),
                None if current.is_absolute() => (current.with_path(""), path),
                None => (ServiceRoot::default(), path),
            },
            None => {
                // Resource path relative to the root, unless it spells out a
                // relative root itself
                let remainder = if current.as_str().is_empty() || current.is_absolute() {
                    path
                } else {
                    current.strip_from(path).unwrap_or(path)
                };
                (current.clone(), remainder)
            }
        };

        Ok(reconciled)
    }

    /// Detects one trailing special segment and stores the rest as the
    /// resource path.
    fn split_special_segments(uri: &mut Self, path: &str) -> Result<(), ParseErrorKind> {
        let segments = path_segments(path);
        if segments.last() == Some(&LINKS_SEGMENT) {
            return Err(ParseErrorKind::MissingLinksTarget);
        }
        uri.assign_segments(segments);
        Ok(())
    }

    /// Moves a trailing `$count`, `$value` or `$links/<target>` into the
    /// marker fields, clearing the other markers, and stores what is left as
    /// the resource path. Markers are untouched when there is no trailing
    /// special segment. Bare trailing `$links` segments, and empty segments
    /// between them, are dropped.
    pub(crate) fn assign_segments(&mut self, mut segments: Vec<&str>) {
        while let Some(&("" | LINKS_SEGMENT)) = segments.last() {
            segments.pop();
        }

        match segments.last().copied().and_then(SpecialSegment::parse) {
            Some(SpecialSegment::Count) => {
                segments.pop();
                self.count = true;
                self.value = false;
                self.links = None;
            }
            Some(SpecialSegment::Value) => {
                segments.pop();
                self.count = false;
                self.value = true;
                self.links = None;
            }
            Some(SpecialSegment::Links) | None => {
                let n = segments.len();
                if n >= 2 && segments[n - 2] == LINKS_SEGMENT {
                    self.links = segments.pop().map(str::to_string);
                    segments.pop();
                    self.count = false;
                    self.value = false;
                }
            }
        }

        self.resource = segments.join("/").trim_matches('/').to_string();
    }
}

/// Splits a path into segments, ignoring leading and trailing slashes.
pub(crate) fn path_segments(path: &str) -> Vec<&str> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

impl fmt::Display for ODataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root.as_str())?;

        if !self.resource.is_empty() {
            write!(f, "/{}", self.resource)?;
        }

        if self.count {
            write!(f, "/{}", SpecialSegment::Count)?;
        } else if self.value {
            write!(f, "/{}", SpecialSegment::Value)?;
        } else if let Some(links) = &self.links {
            write!(f, "/{}/{links}", SpecialSegment::Links)?;
        } else if self.root.as_str().is_empty() && self.resource.is_empty() {
            // Empty relative root with nothing below it
            f.write_str("/")?;
        }

        if !self.options.is_empty() {
            write!(f, "?{}", self.options)?;
        }

        Ok(())
    }
}

impl TryFrom<&str> for ODataUri {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}
