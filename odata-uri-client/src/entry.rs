//! References to entries addressed by update and delete calls.

use odata_uri::ODataUri;
use serde_json::Value;

use crate::ClientError;

/// Returns `entry.__metadata.uri`, the entry's self-link.
#[must_use]
pub fn metadata_uri(entry: &Value) -> Option<&str> {
    entry.get("__metadata")?.get("uri")?.as_str()
}

/// Returns `entry.__metadata.etag`.
#[must_use]
pub fn metadata_etag(entry: &Value) -> Option<&str> {
    entry.get("__metadata")?.get("etag")?.as_str()
}

/// An entry to act on, in any of the forms a caller may hold it.
///
/// # Examples
///
/// ```
/// use odata_uri::ODataUri;
/// use odata_uri_client::EntryRef;
/// use serde_json::json;
///
/// let base = ODataUri::new("http://h/svc").unwrap();
/// let entry = json!({"__metadata": {"uri": "http://h/svc/Products(1)", "etag": "W/\"1\""}});
///
/// let uri = EntryRef::from(&entry).resolve(&base).unwrap();
/// assert_eq!(uri.resource_path(), "Products(1)");
/// assert_eq!(EntryRef::from(&entry).etag(), Some("W/\"1\""));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryRef<'a> {
    /// An entry as returned by the service, carrying `__metadata`
    Entry(&'a Value),
    /// A resource path or URI string
    Path(&'a str),
    /// An already-built model, used as-is
    Uri(&'a ODataUri),
}

impl EntryRef<'_> {
    /// Resolves the reference to a model against `base`.
    ///
    /// Entries and strings are parsed with [`ODataUri::reparse`], so
    /// self-links under the same root keep it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::MissingEntryUri` for an entry without
    /// `__metadata.uri`, or `ClientError::InvalidUri` if the string does
    /// not parse.
    pub fn resolve(&self, base: &ODataUri) -> Result<ODataUri, ClientError> {
        match self {
            Self::Entry(entry) => {
                let uri = metadata_uri(entry).ok_or(ClientError::MissingEntryUri)?;
                Ok(base.reparse(uri)?)
            }
            Self::Path(path) => Ok(base.reparse(path)?),
            Self::Uri(uri) => Ok((*uri).clone()),
        }
    }

    /// Returns the entry's etag, if it carries one.
    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        match self {
            Self::Entry(entry) => metadata_etag(entry),
            Self::Path(_) | Self::Uri(_) => None,
        }
    }
}

impl<'a> From<&'a Value> for EntryRef<'a> {
    fn from(entry: &'a Value) -> Self {
        Self::Entry(entry)
    }
}

impl<'a> From<&'a str> for EntryRef<'a> {
    fn from(path: &'a str) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<&'a String> for EntryRef<'a> {
    fn from(path: &'a String) -> Self {
        Self::Path(path)
    }
}

impl<'a> From<&'a ODataUri> for EntryRef<'a> {
    fn from(uri: &'a ODataUri) -> Self {
        Self::Uri(uri)
    }
}
