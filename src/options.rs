//! Query options of an OData URI.

use std::collections::BTreeMap;
use std::fmt;

use crate::constants::OPTION_MARKER;

/// A reserved (system) query option.
///
/// Variants are declared in alphabetical order of their wire names, so the
/// derived `Ord` is the canonical serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SystemQueryOption {
    /// `$callback`: JSONP callback function name
    Callback,
    /// `$expand`: navigation properties to load inline
    Expand,
    /// `$filter`: filter expression
    Filter,
    /// `$format`: response format
    Format,
    /// `$inlinecount`: include the total count in the response
    InlineCount,
    /// `$orderby`: ordering expression
    OrderBy,
    /// `$select`: projected properties
    Select,
    /// `$skip`: number of entries to skip
    Skip,
    /// `$top`: maximum number of entries
    Top,
}

impl SystemQueryOption {
    /// All reserved options in canonical order.
    pub const ALL: [Self; 9] = [
        Self::Callback,
        Self::Expand,
        Self::Filter,
        Self::Format,
        Self::InlineCount,
        Self::OrderBy,
        Self::Select,
        Self::Skip,
        Self::Top,
    ];

    /// Returns the option name without the `$` marker.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Callback => "callback",
            Self::Expand => "expand",
            Self::Filter => "filter",
            Self::Format => "format",
            Self::InlineCount => "inlinecount",
            Self::OrderBy => "orderby",
            Self::Select => "select",
            Self::Skip => "skip",
            Self::Top => "top",
        }
    }

    /// Looks up an option by its name without the `$` marker.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.name() == name)
    }
}

impl fmt::Display for SystemQueryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{OPTION_MARKER}{}", self.name())
    }
}

/// Query options of an OData URI.
///
/// Reserved options and custom (service operation) parameters are kept in
/// separate maps ordered by key, so serialization does not depend on the
/// order options were set in. Reserved options are emitted first, each with
/// the `$` marker; custom parameters follow, verbatim.
///
/// Values are opaque: nothing is decoded on parse or encoded on output. A
/// value containing `&`, or a parameter name containing `&` or `=`, is
/// therefore split differently when its serialization is parsed again.
///
/// # Examples
///
/// ```
/// use odata_uri::{QueryOptions, SystemQueryOption};
///
/// let options = QueryOptions::parse("$top=5&color='red'&$orderby=Name desc");
/// assert_eq!(options.get(SystemQueryOption::Top), Some("5"));
/// assert_eq!(options.param("color"), Some("'red'"));
/// assert_eq!(options.to_string(), "$orderby=Name desc&$top=5&color='red'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryOptions {
    system: BTreeMap<SystemQueryOption, String>,
    params: BTreeMap<String, String>,
}

impl QueryOptions {
    /// Creates an empty set of options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string (without the leading `?`).
    ///
    /// Tokens are split on `&`, then on the first `=`. A `$`-prefixed key
    /// naming a reserved option sets that option; a reserved option with an
    /// empty value is ignored. Every other key, including unknown
    /// `$`-prefixed ones, becomes a custom parameter under its full key.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut options = Self::new();

        for pair in input.split('&') {
            let (name, value) = match pair.split_once('=') {
                Some((name, value)) => (name, value),
                None => (pair, ""),
            };
            options.insert(name, value);
        }

        options
    }

    /// Returns the value of a reserved option, if set.
    #[must_use]
    pub fn get(&self, option: SystemQueryOption) -> Option<&str> {
        self.system.get(&option).map(String::as_str)
    }

    /// Returns true if the reserved option is set.
    #[must_use]
    pub fn contains(&self, option: SystemQueryOption) -> bool {
        self.system.contains_key(&option)
    }

    /// Returns the value of a custom parameter, if present.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns the custom parameters, ordered by key.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the reserved options that are set, in canonical order.
    pub fn system(&self) -> impl Iterator<Item = (SystemQueryOption, &str)> {
        self.system.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Returns true if no option or parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.system.is_empty() && self.params.is_empty()
    }

    /// Returns the number of options and parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.system.len() + self.params.len()
    }

    /// Returns the `$orderby` option.
    #[must_use]
    pub fn orderby(&self) -> Option<&str> {
        self.get(SystemQueryOption::OrderBy)
    }

    /// Returns the `$top` option.
    #[must_use]
    pub fn top(&self) -> Option<&str> {
        self.get(SystemQueryOption::Top)
    }

    /// Returns the `$skip` option.
    #[must_use]
    pub fn skip(&self) -> Option<&str> {
        self.get(SystemQueryOption::Skip)
    }

    /// Returns the `$filter` option.
    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        self.get(SystemQueryOption::Filter)
    }

    /// Returns the `$expand` option.
    #[must_use]
    pub fn expand(&self) -> Option<&str> {
        self.get(SystemQueryOption::Expand)
    }

    /// Returns the `$select` option.
    #[must_use]
    pub fn select(&self) -> Option<&str> {
        self.get(SystemQueryOption::Select)
    }

    /// Returns the `$inlinecount` option.
    #[must_use]
    pub fn inlinecount(&self) -> Option<&str> {
        self.get(SystemQueryOption::InlineCount)
    }

    /// Returns the `$format` option.
    #[must_use]
    pub fn format(&self) -> Option<&str> {
        self.get(SystemQueryOption::Format)
    }

    /// Sets a reserved option; an empty value clears it.
    pub(crate) fn set(&mut self, option: SystemQueryOption, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.system.remove(&option);
        } else {
            self.system.insert(option, value);
        }
    }

    pub(crate) fn remove(&mut self, option: SystemQueryOption) {
        self.system.remove(&option);
    }

    /// Stores one `name=value` pair the way the parser reads it: a
    /// `$`-prefixed reserved name sets that option, an empty name is
    /// ignored and anything else becomes a custom parameter.
    pub(crate) fn insert(&mut self, name: &str, value: impl Into<String>) {
        if name.is_empty() {
            return;
        }

        let reserved = name
            .strip_prefix(OPTION_MARKER)
            .and_then(SystemQueryOption::from_name);

        match reserved {
            Some(option) => self.set(option, value),
            None => {
                self.params.insert(name.to_string(), value.into());
            }
        }
    }

    pub(crate) fn clear_params(&mut self) {
        self.params.clear();
    }
}

impl fmt::Display for QueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let system = self.system.iter().map(|(k, v)| format!("{k}={v}"));
        let params = self.params.iter().map(|(k, v)| {
            if v.is_empty() {
                k.clone()
            } else {
                format!("{k}={v}")
            }
        });
        let pairs: Vec<String> = system.chain(params).collect();
        write!(f, "{}", pairs.join("&"))
    }
}
