//! Service facade: query, create, update and delete through a transport.

use std::fmt;

use odata_uri::{ODataUri, ResponseKind, SystemQueryOption};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::entry::metadata_etag;
use crate::request::{APPLICATION_JSON, TEXT_PLAIN};
use crate::{
    BeforeRequest, ClientError, DataType, EntryRef, Method, QueryResult, RequestOptions,
    ServiceRequest, ServiceSettings, Transport,
};

/// Options for [`ODataService::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Send `MERGE` instead of `PUT`.
    ///
    /// Default: true
    pub partial: bool,

    /// Send `If-Match: *`, overwriting whatever version the server holds.
    ///
    /// Default: false
    pub force: bool,

    /// Entity tag; taken from the entry's `__metadata.etag` when None.
    ///
    /// Default: None
    pub etag: Option<String>,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            partial: true,
            force: false,
            etag: None,
        }
    }
}

impl UpdateOptions {
    /// Creates options for a partial update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the update is partial.
    #[must_use]
    pub const fn with_partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Sets whether the entity tag check is overridden.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Sets the entity tag.
    #[must_use]
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }
}

/// Options for [`ODataService::delete`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeleteOptions {
    /// Send `If-Match: *`
    pub force: bool,
    /// Entity tag; taken from the entry's `__metadata.etag` when None
    pub etag: Option<String>,
}

impl DeleteOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the entity tag check is overridden.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Sets the entity tag.
    #[must_use]
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }
}

/// Entry point for calls against one OData service.
///
/// Holds the service root model, the settings and a transport. Every call
/// derives a new model from the root, so calls never affect each other.
///
/// # Examples
///
/// ```
/// use odata_uri_client::{InMemoryTransport, ODataService, ServiceSettings, TransportResponse};
///
/// let transport = InMemoryTransport::new()
///     .with_response(TransportResponse::ok(r#"{"d":[{"ID":0,"Name":"Bread"}]}"#));
///
/// let service = ODataService::new(
///     "http://services.odata.org/OData/OData.svc",
///     ServiceSettings::default(),
///     transport,
/// )
/// .unwrap();
///
/// let result = service.from("Products").top(1).execute().unwrap();
/// assert_eq!(result.results().unwrap()[0]["Name"], "Bread");
/// ```
pub struct ODataService<T> {
    root: ODataUri,
    settings: ServiceSettings,
    transport: T,
    before_request: Option<BeforeRequest>,
}

impl<T> fmt::Debug for ODataService<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ODataService")
            .field("root", &self.root.to_string())
            .field("settings", &self.settings)
            .field("before_request", &self.before_request.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> ODataService<T> {
    /// Creates a service rooted at `root`.
    ///
    /// With `DataType::Jsonp` the root model carries `$format=json` and
    /// `$callback=<settings.jsonp_callback>`, so every derived URI does too.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidRoot` if `root` is not a valid service
    /// root.
    pub fn new(root: &str, settings: ServiceSettings, transport: T) -> Result<Self, ClientError> {
        let mut model = ODataUri::new(root)?;
        if settings.data_type == DataType::Jsonp {
            model = model.format("json").callback(settings.jsonp_callback.as_str());
        }

        debug!(root = %model.root(), data_type = ?settings.data_type, "created OData service");

        Ok(Self {
            root: model,
            settings,
            transport,
            before_request: None,
        })
    }

    /// Installs a hook that may rewrite each request before it is sent.
    ///
    /// Replaces any previously installed hook.
    #[must_use]
    pub fn before_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ServiceRequest) + Send + Sync + 'static,
    {
        self.before_request = Some(Box::new(hook));
        self
    }

    /// Returns the root model.
    #[must_use]
    pub const fn root(&self) -> &ODataUri {
        &self.root
    }

    /// Returns the settings.
    #[must_use]
    pub const fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Starts a query on `resource`.
    #[must_use]
    pub fn from(&self, resource: &str) -> Query<'_, T> {
        Query {
            service: self,
            uri: self.root.resource(resource),
        }
    }

    /// Sends a `GET` for `uri`.
    ///
    /// The response is decoded according to [`ODataUri::response_kind`].
    ///
    /// # Errors
    ///
    /// Returns the transport's error, `ClientError::Status` for a non-`2xx`
    /// answer, or `ClientError::InvalidBody` for an undecodable body.
    pub fn query(&self, uri: &ODataUri) -> Result<QueryResult, ClientError> {
        self.dispatch(Method::Get, uri, RequestOptions::default())
    }

    /// Creates `entry` in the collection at `resource` with a `POST`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Serialization` if `entry` cannot be serialized,
    /// otherwise as [`query`](Self::query).
    pub fn create<E: Serialize + ?Sized>(
        &self,
        resource: &str,
        entry: &E,
    ) -> Result<QueryResult, ClientError> {
        let body = to_value(entry)?.to_string();
        let options = RequestOptions::new().with_body(body, APPLICATION_JSON);
        self.dispatch(Method::Post, &self.root.resource(resource), options)
    }

    /// Updates the entry at `resource`.
    ///
    /// Sends `MERGE` for a partial update and `PUT` otherwise. Objects and
    /// arrays are sent as JSON; primitive values (a single property's raw
    /// value) are sent as `text/plain`.
    ///
    /// # Errors
    ///
    /// As [`create`](Self::create).
    pub fn update<E: Serialize + ?Sized>(
        &self,
        resource: &str,
        entry: &E,
        options: UpdateOptions,
    ) -> Result<QueryResult, ClientError> {
        let value = to_value(entry)?;
        let etag = options
            .etag
            .or_else(|| metadata_etag(&value).map(str::to_string));

        let (body, content_type) = match &value {
            Value::String(s) => (s.clone(), TEXT_PLAIN),
            Value::Number(_) | Value::Bool(_) => (value.to_string(), TEXT_PLAIN),
            Value::Null | Value::Array(_) | Value::Object(_) => {
                (value.to_string(), APPLICATION_JSON)
            }
        };

        let mut request = RequestOptions::new()
            .with_body(body, content_type)
            .with_force(options.force);
        request.etag = etag;

        let method = if options.partial {
            Method::Merge
        } else {
            Method::Put
        };
        self.dispatch(method, &self.root.resource(resource), request)
    }

    /// Deletes an entry.
    ///
    /// `entry` may be an entry object (its `__metadata.uri` is used), a
    /// resource path or URI string, or a model.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::MissingEntryUri` or `ClientError::InvalidUri`
    /// if the entry cannot be addressed, otherwise as
    /// [`query`](Self::query).
    pub fn delete<'e>(
        &self,
        entry: impl Into<EntryRef<'e>>,
        options: DeleteOptions,
    ) -> Result<QueryResult, ClientError> {
        let entry = entry.into();
        let uri = entry.resolve(&self.root)?;

        let mut request = RequestOptions::new().with_force(options.force);
        request.etag = options.etag.or_else(|| entry.etag().map(str::to_string));

        self.dispatch(Method::Delete, &uri, request)
    }

    fn dispatch(
        &self,
        method: Method,
        uri: &ODataUri,
        options: RequestOptions,
    ) -> Result<QueryResult, ClientError> {
        let mut request = ServiceRequest::build(method, uri, &self.settings, options);
        if let Some(hook) = &self.before_request {
            hook(&mut request);
        }

        let kind = if method == Method::Get {
            uri.response_kind()
        } else {
            ResponseKind::Json
        };

        debug!(method = %request.method, url = %request.url, ?kind, "sending request");

        let response = self.transport.send(&request).inspect_err(|e| {
            warn!(method = %request.method, url = %request.url, error = %e, "transport failed");
        })?;

        debug!(status = response.status, url = %request.url, "received response");

        QueryResult::from_response(response, kind).inspect_err(|e| {
            warn!(url = %request.url, error = %e, "request failed");
        })
    }
}

fn to_value<E: Serialize + ?Sized>(entry: &E) -> Result<Value, ClientError> {
    serde_json::to_value(entry).map_err(|e| ClientError::Serialization {
        reason: e.to_string(),
    })
}

/// A query under construction, bound to the service that will run it.
///
/// Every builder method returns a new `Query`; the receiver is unchanged.
/// [`execute`](Self::execute), [`count`](Self::count) and
/// [`value`](Self::value) send it.
pub struct Query<'a, T> {
    service: &'a ODataService<T>,
    uri: ODataUri,
}

impl<T> Clone for Query<'_, T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service,
            uri: self.uri.clone(),
        }
    }
}

impl<T> fmt::Debug for Query<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query").field("uri", &self.uri).finish_non_exhaustive()
    }
}

impl<T> fmt::Display for Query<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.uri, f)
    }
}

impl<T: Transport> Query<'_, T> {
    fn map(&self, f: impl FnOnce(&ODataUri) -> ODataUri) -> Self {
        Self {
            service: self.service,
            uri: f(&self.uri),
        }
    }

    /// Returns the model.
    #[must_use]
    pub const fn uri(&self) -> &ODataUri {
        &self.uri
    }

    /// Consumes the query, returning the model.
    #[must_use]
    pub fn into_uri(self) -> ODataUri {
        self.uri
    }

    /// See [`ODataUri::resource`].
    #[must_use]
    pub fn resource(&self, path: &str) -> Self {
        self.map(|u| u.resource(path))
    }

    /// See [`ODataUri::with_id`].
    #[must_use]
    pub fn with_id(&self, id: impl fmt::Display) -> Self {
        self.map(|u| u.with_id(id))
    }

    /// See [`ODataUri::links`].
    #[must_use]
    pub fn links(&self, navigation_property: &str) -> Self {
        self.map(|u| u.links(navigation_property))
    }

    /// See [`ODataUri::count_query`].
    #[must_use]
    pub fn count_query(&self) -> Self {
        self.map(ODataUri::count_query)
    }

    /// See [`ODataUri::value_query`].
    #[must_use]
    pub fn value_query(&self) -> Self {
        self.map(ODataUri::value_query)
    }

    /// See [`ODataUri::option`].
    #[must_use]
    pub fn option(&self, option: SystemQueryOption, value: impl Into<String>) -> Self {
        self.map(|u| u.option(option, value))
    }

    /// See [`ODataUri::orderby`].
    #[must_use]
    pub fn orderby(&self, expression: impl Into<String>) -> Self {
        self.map(|u| u.orderby(expression))
    }

    /// See [`ODataUri::top`].
    #[must_use]
    pub fn top(&self, entries: u64) -> Self {
        self.map(|u| u.top(entries))
    }

    /// See [`ODataUri::skip`].
    #[must_use]
    pub fn skip(&self, entries: u64) -> Self {
        self.map(|u| u.skip(entries))
    }

    /// See [`ODataUri::filter`].
    #[must_use]
    pub fn filter(&self, expression: impl Into<String>) -> Self {
        self.map(|u| u.filter(expression))
    }

    /// See [`ODataUri::expand`].
    #[must_use]
    pub fn expand(&self, properties: impl Into<String>) -> Self {
        self.map(|u| u.expand(properties))
    }

    /// See [`ODataUri::select`].
    #[must_use]
    pub fn select(&self, properties: impl Into<String>) -> Self {
        self.map(|u| u.select(properties))
    }

    /// See [`ODataUri::format`].
    #[must_use]
    pub fn format(&self, format: impl Into<String>) -> Self {
        self.map(|u| u.format(format))
    }

    /// See [`ODataUri::callback`].
    #[must_use]
    pub fn callback(&self, function: impl Into<String>) -> Self {
        self.map(|u| u.callback(function))
    }

    /// See [`ODataUri::inlinecount`].
    #[must_use]
    pub fn inlinecount(&self) -> Self {
        self.map(ODataUri::inlinecount)
    }

    /// See [`ODataUri::inlinecount_value`].
    #[must_use]
    pub fn inlinecount_value(&self, value: impl Into<String>) -> Self {
        self.map(|u| u.inlinecount_value(value))
    }

    /// See [`ODataUri::with_inlinecount`].
    #[must_use]
    pub fn with_inlinecount(&self, enabled: bool) -> Self {
        self.map(|u| u.with_inlinecount(enabled))
    }

    /// See [`ODataUri::clear_inlinecount`].
    #[must_use]
    pub fn clear_inlinecount(&self) -> Self {
        self.map(ODataUri::clear_inlinecount)
    }

    /// See [`ODataUri::params`].
    #[must_use]
    pub fn params<I, K, V>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.map(|u| u.params(params))
    }

    /// Sends the query.
    ///
    /// # Errors
    ///
    /// As [`ODataService::query`].
    pub fn execute(&self) -> Result<QueryResult, ClientError> {
        self.service.query(&self.uri)
    }

    /// Sends the query with `$count` appended and returns the count.
    ///
    /// # Errors
    ///
    /// As [`ODataService::query`].
    pub fn count(&self) -> Result<QueryResult, ClientError> {
        self.service.query(&self.uri.count_query())
    }

    /// Sends the query with `$value` appended and returns the raw value.
    ///
    /// # Errors
    ///
    /// As [`ODataService::query`].
    pub fn value(&self) -> Result<QueryResult, ClientError> {
        self.service.query(&self.uri.value_query())
    }
}
