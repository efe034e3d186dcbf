//! Reserved tokens of the OData URI conventions.

/// Marker prepended to reserved (system) query options.
pub const OPTION_MARKER: char = '$';

/// Path segment requesting the number of entries of a collection.
pub const COUNT_SEGMENT: &str = "$count";

/// Path segment requesting the raw value of a property.
pub const VALUE_SEGMENT: &str = "$value";

/// Path segment addressing the links of a navigation property.
pub const LINKS_SEGMENT: &str = "$links";

/// Canonical value emitted for an enabled `$inlinecount`.
pub const INLINECOUNT_ALLPAGES: &str = "allpages";

/// `DataServiceVersion` required by `$count`, `$inlinecount` and `$select`.
pub const DATA_SERVICE_VERSION_2: &str = "2.0";

/// `DataServiceVersion` for every other request.
pub const DATA_SERVICE_VERSION_1: &str = "1.0";
