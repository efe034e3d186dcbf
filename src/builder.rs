//! Immutable query builder.
//!
//! Every operation clones the receiver, changes one part of the clone and
//! returns it. The receiver is never modified, so a shared base can be
//! branched into independent queries.
//!
//! ```
//! use odata_uri::ODataUri;
//!
//! let products = ODataUri::new("http://services.odata.org/OData/OData.svc")
//!     .unwrap()
//!     .resource("Products");
//!
//! let cheap = products.filter("Price lt 10");
//! let pricey = products.filter("Price gt 200");
//!
//! assert_eq!(products.options().filter(), None);
//! assert_eq!(cheap.options().filter(), Some("Price lt 10"));
//! assert_eq!(pricey.options().filter(), Some("Price gt 200"));
//! ```

use std::fmt;

use crate::constants::INLINECOUNT_ALLPAGES;
use crate::options::SystemQueryOption;
use crate::segment::SpecialSegment;
use crate::uri::{ODataUri, path_segments};

impl ODataUri {
    /// Returns a new URI with the given resource path.
    ///
    /// Leading and trailing slashes are removed. A trailing `$count`,
    /// `$value` or `$links/<target>` sets the matching marker, clearing the
    /// other two, exactly as parsing the path would. A bare trailing
    /// `$links` is dropped; follow up with [`Self::links`] to name the
    /// target. Without a trailing special segment the markers are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use odata_uri::ODataUri;
    ///
    /// let uri = ODataUri::new("http://services.odata.org/OData/OData.svc").unwrap();
    /// let uri = uri.resource("/Categories(1)/Name/");
    /// assert_eq!(uri.to_string(), "http://services.odata.org/OData/OData.svc/Categories(1)/Name");
    ///
    /// let uri = uri.resource("Products(1)/Name/$value");
    /// assert_eq!(uri.resource_path(), "Products(1)/Name");
    /// assert!(uri.is_value());
    /// ```
    #[must_use]
    pub fn resource(&self, path: &str) -> Self {
        let mut next = self.clone();
        next.assign_segments(path_segments(path));
        next
    }

    /// Returns a new URI with a key predicate appended to the resource path.
    ///
    /// Ids that parse as a number are written as long literals (`(5L)`),
    /// anything else verbatim (`('ALFKI')`). The test is purely numeric, so
    /// an id such as `1e5` counts as a number.
    ///
    /// The id is not encoded. An id containing `?` does not survive
    /// a parse of the serialized URI.
    ///
    /// # Examples
    ///
    /// ```
    /// use odata_uri::ODataUri;
    ///
    /// let products = ODataUri::new("/svc").unwrap().resource("Products");
    /// assert_eq!(products.with_id(5).to_string(), "/svc/Products(5L)");
    /// assert_eq!(products.with_id("'ALFKI'").to_string(), "/svc/Products('ALFKI')");
    /// ```
    #[must_use]
    pub fn with_id(&self, id: impl fmt::Display) -> Self {
        let id = id.to_string();
        let mut next = self.clone();
        if is_numeric(&id) {
            next.resource = format!("{}({id}L)", self.resource);
        } else {
            next.resource = format!("{}({id})", self.resource);
        }
        next
    }

    /// Returns a new URI addressing the links of a navigation property.
    ///
    /// Clears the `$count` and `$value` markers. Only the first segment of
    /// `navigation_property` is used, so `"Products/Suppliers"` addresses
    /// `Products`. An empty target, or one spelling a special segment such
    /// as `$count`, removes the links marker instead and leaves the other
    /// markers as they are.
    ///
    /// # Examples
    ///
    /// ```
    /// use odata_uri::ODataUri;
    ///
    /// let category = ODataUri::new("/svc").unwrap().resource("Categories(1)");
    /// let links = category.links("Products");
    /// assert_eq!(links.to_string(), "/svc/Categories(1)/$links/Products");
    /// assert_eq!(links.links("").to_string(), "/svc/Categories(1)");
    /// ```
    #[must_use]
    pub fn links(&self, navigation_property: &str) -> Self {
        let target = navigation_property
            .trim_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();

        let mut next = self.clone();
        if target.is_empty() || SpecialSegment::parse(target).is_some() {
            next.links = None;
            if !next.count && !next.value {
                // The resource may end in a special segment that only the
                // cleared target kept apart
                let resource = std::mem::take(&mut next.resource);
                next.assign_segments(path_segments(&resource));
            }
            return next;
        }

        next.links = Some(target.to_string());
        next.count = false;
        next.value = false;
        next
    }

    /// Returns a new URI addressing the number of entries (`$count`).
    ///
    /// This only marks the URI; sending it is up to the caller.
    /// Clears the `$value` and `$links` markers.
    #[must_use]
    pub fn count_query(&self) -> Self {
        let mut next = self.clone();
        next.count = true;
        next.value = false;
        next.links = None;
        next
    }

    /// Returns a new URI addressing the raw value of a property (`$value`).
    ///
    /// This only marks the URI; sending it is up to the caller.
    /// Clears the `$count` and `$links` markers.
    #[must_use]
    pub fn value_query(&self) -> Self {
        let mut next = self.clone();
        next.value = true;
        next.count = false;
        next.links = None;
        next
    }

    /// Returns a new URI with a reserved option set verbatim.
    ///
    /// An empty value removes the option. The value is not encoded, so one
    /// containing `&` is cut short when the serialized URI is parsed again.
    #[must_use]
    pub fn option(&self, option: SystemQueryOption, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.options.set(option, value);
        next
    }

    /// Sets `$orderby`, e.g. `"Rating,Category/Name desc"`.
    #[must_use]
    pub fn orderby(&self, expression: impl Into<String>) -> Self {
        self.option(SystemQueryOption::OrderBy, expression)
    }

    /// Sets `$top`.
    #[must_use]
    pub fn top(&self, entries: u64) -> Self {
        self.option(SystemQueryOption::Top, entries.to_string())
    }

    /// Sets `$skip`.
    #[must_use]
    pub fn skip(&self, entries: u64) -> Self {
        self.option(SystemQueryOption::Skip, entries.to_string())
    }

    /// Sets `$filter`. The expression is not validated.
    #[must_use]
    pub fn filter(&self, expression: impl Into<String>) -> Self {
        self.option(SystemQueryOption::Filter, expression)
    }

    /// Sets `$expand`: comma separated navigation properties, each optionally
    /// followed by `/` and a further navigation property.
    #[must_use]
    pub fn expand(&self, properties: impl Into<String>) -> Self {
        self.option(SystemQueryOption::Expand, properties)
    }

    /// Sets `$select`: comma separated properties, or `*`.
    #[must_use]
    pub fn select(&self, properties: impl Into<String>) -> Self {
        self.option(SystemQueryOption::Select, properties)
    }

    /// Sets `$format`.
    #[must_use]
    pub fn format(&self, format: impl Into<String>) -> Self {
        self.option(SystemQueryOption::Format, format)
    }

    /// Sets `$callback`, the JSONP function name.
    #[must_use]
    pub fn callback(&self, function: impl Into<String>) -> Self {
        self.option(SystemQueryOption::Callback, function)
    }

    /// Enables `$inlinecount` with its canonical value `allpages`.
    ///
    /// # Examples
    ///
    /// ```
    /// use odata_uri::ODataUri;
    ///
    /// let uri = ODataUri::new("/svc").unwrap().resource("Products").inlinecount();
    /// assert_eq!(uri.to_string(), "/svc/Products?$inlinecount=allpages");
    /// ```
    #[must_use]
    pub fn inlinecount(&self) -> Self {
        self.option(SystemQueryOption::InlineCount, INLINECOUNT_ALLPAGES)
    }

    /// Sets `$inlinecount` to an explicit value.
    #[must_use]
    pub fn inlinecount_value(&self, value: impl Into<String>) -> Self {
        self.option(SystemQueryOption::InlineCount, value)
    }

    /// Enables `$inlinecount`, or removes it when `enabled` is false.
    #[must_use]
    pub fn with_inlinecount(&self, enabled: bool) -> Self {
        if enabled {
            self.inlinecount()
        } else {
            self.clear_inlinecount()
        }
    }

    /// Removes `$inlinecount`.
    #[must_use]
    pub fn clear_inlinecount(&self) -> Self {
        let mut next = self.clone();
        next.options.remove(SystemQueryOption::InlineCount);
        next
    }

    /// Replaces all custom (service operation) parameters.
    ///
    /// Parameters from earlier calls are discarded, not merged. Pairs are
    /// stored the way the parser would read them back: a key such as `$top`
    /// that names a reserved option sets that option instead, and an empty
    /// key is ignored. Keys and values are not encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use odata_uri::ODataUri;
    ///
    /// let uri = ODataUri::new("http://services.odata.org/OData/OData.svc").unwrap()
    ///     .resource("ProductsByColor")
    ///     .params([("color", "'red'")]);
    /// assert_eq!(uri.to_string(), "http://services.odata.org/OData/OData.svc/ProductsByColor?color='red'");
    /// ```
    #[must_use]
    pub fn params<I, K, V>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut next = self.clone();
        next.options.clear_params();
        for (key, value) in params {
            let key: String = key.into();
            next.options.insert(&key, value);
        }
        next
    }
}

fn is_numeric(id: &str) -> bool {
    id.trim().parse::<f64>().is_ok_and(|n| !n.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "http://services.odata.org/OData/OData.svc";

    fn from(resource: &str) -> ODataUri {
        ODataUri::new(ROOT).unwrap().resource(resource)
    }

    #[test]
    fn resource_strips_slashes() {
        assert_eq!(
            from("/Categories(1)/Name/").to_string(),
            format!("{ROOT}/Categories(1)/Name")
        );
    }

    fn roundtrips(uri: &ODataUri) -> bool {
        uri.reparse(&uri.to_string()).as_ref() == Ok(uri)
    }

    #[test]
    fn resource_moves_trailing_marker() {
        let uri = from("Products/$count");
        assert!(uri.is_count());
        assert_eq!(uri.resource_path(), "Products");
        assert_eq!(uri.to_string(), format!("{ROOT}/Products/$count"));
        assert!(roundtrips(&uri));

        let uri = from("/Products(1)/Name/$value/");
        assert!(uri.is_value());
        assert_eq!(uri.resource_path(), "Products(1)/Name");
        assert!(roundtrips(&uri));

        let uri = from("Categories(1)/$links/Products");
        assert_eq!(uri.links_target(), Some("Products"));
        assert_eq!(uri.resource_path(), "Categories(1)");
        assert!(roundtrips(&uri));
    }

    #[test]
    fn resource_drops_bare_trailing_links() {
        let uri = from("Categories(1)/$links");
        assert_eq!(uri.resource_path(), "Categories(1)");
        assert_eq!(uri.links_target(), None);
        assert!(roundtrips(&uri));

        let uri = from("Categories(1)/$links").links("Products");
        assert_eq!(uri.to_string(), format!("{ROOT}/Categories(1)/$links/Products"));
    }

    #[test]
    fn resource_marker_replaces_previous_marker() {
        let uri = from("Categories(1)").links("Products").resource("Products/$count");
        assert!(uri.is_count());
        assert_eq!(uri.links_target(), None);
        assert!(roundtrips(&uri));
    }

    #[test]
    fn resource_without_marker_keeps_marker() {
        let uri = from("Products").count_query().resource("Categories");
        assert!(uri.is_count());
        assert_eq!(uri.to_string(), format!("{ROOT}/Categories/$count"));
    }

    #[test]
    fn count_query_appends_marker() {
        let uri = from("Categories(1)/Products/").count_query();
        assert_eq!(uri.to_string(), format!("{ROOT}/Categories(1)/Products/$count"));
    }

    #[test]
    fn value_query_appends_marker() {
        let uri = from("Categories(1)/Products(1)/Supplier/Address/City").value_query();
        assert_eq!(
            uri.to_string(),
            format!("{ROOT}/Categories(1)/Products(1)/Supplier/Address/City/$value")
        );
    }

    #[test]
    fn links_appends_marker_and_target() {
        assert_eq!(
            from("Categories(1)").links("Products").to_string(),
            format!("{ROOT}/Categories(1)/$links/Products")
        );
        assert_eq!(
            from("Products(1)").links("Category").to_string(),
            format!("{ROOT}/Products(1)/$links/Category")
        );
    }

    #[test]
    fn links_uses_first_segment_of_target() {
        let uri = from("Categories(1)").links("/Products/");
        assert_eq!(uri.links_target(), Some("Products"));

        let uri = from("Categories(1)").links("Products/Suppliers");
        assert_eq!(uri.links_target(), Some("Products"));
        assert_eq!(uri.to_string(), format!("{ROOT}/Categories(1)/$links/Products"));
        assert!(roundtrips(&uri));
    }

    #[test]
    fn empty_links_target_clears_marker() {
        let linked = from("Categories(1)").links("Products");
        for target in ["", "/", "$count", "$value", "$links"] {
            let uri = linked.links(target);
            assert_eq!(uri.links_target(), None, "target {target:?}");
            assert!(!uri.is_count());
            assert!(!uri.is_value());
            assert_eq!(uri.to_string(), format!("{ROOT}/Categories(1)"));
            assert!(roundtrips(&uri));
        }

        let uri = from("Products").count_query().links("");
        assert!(uri.is_count());
    }

    #[test]
    fn clearing_links_exposes_nested_marker() {
        let uri = ODataUri::new(ROOT)
            .unwrap()
            .reparse("Products/$count/$links/Category")
            .unwrap();
        assert_eq!(uri.resource_path(), "Products/$count");

        let cleared = uri.links("");
        assert!(cleared.is_count());
        assert_eq!(cleared.resource_path(), "Products");
        assert!(roundtrips(&cleared));
    }

    #[test]
    fn markers_are_mutually_exclusive() {
        let uri = from("Categories(1)").links("Products").count_query();
        assert!(uri.is_count());
        assert_eq!(uri.links_target(), None);

        let uri = from("P(1)/Name").value_query().links("X");
        assert!(!uri.is_value());
        assert_eq!(uri.links_target(), Some("X"));

        let uri = from("P").count_query().value_query();
        assert!(!uri.is_count());
        assert!(uri.is_value());
    }

    #[test]
    fn with_id_numeric_gets_long_suffix() {
        assert_eq!(from("Products").with_id(1).to_string(), format!("{ROOT}/Products(1L)"));
        assert_eq!(from("Products").with_id("42").to_string(), format!("{ROOT}/Products(42L)"));
    }

    #[test]
    fn with_id_exponent_counts_as_numeric() {
        assert_eq!(from("Products").with_id("1e5").resource_path(), "Products(1e5L)");
    }

    #[test]
    fn with_id_string_is_verbatim() {
        assert_eq!(
            from("Customers").with_id("'ALFKI'").resource_path(),
            "Customers('ALFKI')"
        );
        assert_eq!(from("Customers").with_id("NaN").resource_path(), "Customers(NaN)");
    }

    #[test]
    fn service_operation_params() {
        assert_eq!(
            from("ProductsByColor").params([("color", "'red'")]).to_string(),
            format!("{ROOT}/ProductsByColor?color='red'")
        );
        assert_eq!(
            from("ProductsByColor(3)/Category/Name")
                .params([("color", "'red'")])
                .to_string(),
            format!("{ROOT}/ProductsByColor(3)/Category/Name?color='red'")
        );
        assert_eq!(
            from("ProductsByColor")
                .params([("param", "foo"), ("color", "'red'")])
                .to_string(),
            format!("{ROOT}/ProductsByColor?color='red'&param=foo")
        );
    }

    #[test]
    fn params_replace_rather_than_merge() {
        let uri = from("Op").params([("a", "1")]).params([("b", "2")]);
        assert_eq!(uri.options().param("a"), None);
        assert_eq!(uri.options().param("b"), Some("2"));
    }

    #[test]
    fn params_with_reserved_key_set_the_option() {
        let uri = from("Op").params([("$top", "5"), ("color", "'red'")]);
        assert_eq!(uri.options().top(), Some("5"));
        assert_eq!(uri.options().param("$top"), None);
        assert_eq!(uri.to_string(), format!("{ROOT}/Op?$top=5&color='red'"));
        assert!(roundtrips(&uri));

        let uri = from("Op").top(3).params([("$top", "")]);
        assert_eq!(uri.options().top(), None);
    }

    #[test]
    fn params_keep_unknown_marker_keys() {
        let uri = from("Op").params([("$skiptoken", "abc"), ("", "ignored")]);
        assert_eq!(uri.options().param("$skiptoken"), Some("abc"));
        assert_eq!(uri.options().len(), 1);
        assert!(roundtrips(&uri));
    }

    #[test]
    fn values_are_not_encoded() {
        let uri = from("Products").filter("Name eq 'a&b'");
        let reparsed = uri.reparse(&uri.to_string()).unwrap();
        assert_eq!(reparsed.options().filter(), Some("Name eq 'a"));
        assert_eq!(reparsed.options().param("b'"), Some(""));

        let uri = from("P").with_id("'a?b'");
        let reparsed = uri.reparse(&uri.to_string()).unwrap();
        assert_eq!(reparsed.resource_path(), "P('a");
        assert_eq!(reparsed.options().param("b')"), Some(""));
    }

    #[test]
    fn params_with_value_and_orderby() {
        let root = ODataUri::new("http://localhost:32751/services/AdventureWorks.svc").unwrap();
        let uri = root
            .resource("GetProductsByColor(706)/ProductNumber/")
            .params([("color", "'red'")])
            .value_query();
        assert_eq!(
            uri.to_string(),
            "http://localhost:32751/services/AdventureWorks.svc/GetProductsByColor(706)/ProductNumber/$value?color='red'"
        );

        let uri = root
            .resource("GetProductsByColor")
            .params([("color", "'red'")])
            .orderby("Name");
        assert_eq!(
            uri.to_string(),
            "http://localhost:32751/services/AdventureWorks.svc/GetProductsByColor?$orderby=Name&color='red'"
        );
    }

    #[test]
    fn orderby_and_top_are_alphabetical() {
        let expected = format!("{ROOT}/Products?$orderby=Name desc&$top=5");
        assert_eq!(from("Products").orderby("Name desc").top(5).to_string(), expected);
        assert_eq!(from("Products").top(5).orderby("Name desc").to_string(), expected);
    }

    #[test]
    fn skip_top_orderby() {
        assert_eq!(
            from("Products").skip(2).top(2).orderby("Rating").to_string(),
            format!("{ROOT}/Products?$orderby=Rating&$skip=2&$top=2")
        );
    }

    #[test]
    fn opaque_expressions() {
        assert_eq!(
            from("Suppliers").filter("Address/City eq 'Redmond'").to_string(),
            format!("{ROOT}/Suppliers?$filter=Address/City eq 'Redmond'")
        );
        assert_eq!(
            from("Products").orderby("Rating,Category/Name desc").to_string(),
            format!("{ROOT}/Products?$orderby=Rating,Category/Name desc")
        );
        assert_eq!(
            from("Categories").expand("Products/Suppliers").to_string(),
            format!("{ROOT}/Categories?$expand=Products/Suppliers")
        );
        assert_eq!(
            from("Products").select("*").to_string(),
            format!("{ROOT}/Products?$select=*")
        );
    }

    #[test]
    fn select_and_expand() {
        assert_eq!(
            from("Categories")
                .select("Name,Products")
                .expand("Products/Suppliers")
                .to_string(),
            format!("{ROOT}/Categories?$expand=Products/Suppliers&$select=Name,Products")
        );
    }

    #[test]
    fn inlinecount_variants() {
        let expected = format!("{ROOT}/Products?$inlinecount=allpages");
        assert_eq!(from("Products").inlinecount().to_string(), expected);
        assert_eq!(from("Products").inlinecount_value("allpages").to_string(), expected);
        assert_eq!(from("Products").with_inlinecount(true).to_string(), expected);
        assert_eq!(
            from("Products").inlinecount().with_inlinecount(false).to_string(),
            format!("{ROOT}/Products")
        );
        assert_eq!(
            from("Products").inlinecount_value("none").to_string(),
            format!("{ROOT}/Products?$inlinecount=none")
        );
    }

    #[test]
    fn inlinecount_top_filter() {
        assert_eq!(
            from("Products").inlinecount().top(10).filter("Price gt 200").to_string(),
            format!("{ROOT}/Products?$filter=Price gt 200&$inlinecount=allpages&$top=10")
        );
    }

    #[test]
    fn jsonp_options() {
        assert_eq!(
            from("Products").format("json").callback("resultCallback").to_string(),
            format!("{ROOT}/Products?$callback=resultCallback&$format=json")
        );
    }

    #[test]
    fn empty_value_clears_option() {
        let uri = from("Products").filter("x").filter("");
        assert!(uri.options().is_empty());
    }

    #[test]
    fn branches_do_not_alias() {
        let base = from("Products");
        let a = base.filter("X");
        let b = base.filter("Y");

        assert_eq!(a.resource_path(), base.resource_path());
        assert_eq!(b.resource_path(), base.resource_path());
        assert_eq!(base.options().filter(), None);
        assert_eq!(a.options().filter(), Some("X"));
        assert_eq!(b.options().filter(), Some("Y"));
    }
}
