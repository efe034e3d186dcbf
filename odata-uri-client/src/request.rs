//! Request shaping: method, headers and body for a single service call.

use std::fmt;
use std::time::Duration;

use odata_uri::ODataUri;

use crate::ServiceSettings;

/// `application/json`
pub const APPLICATION_JSON: &str = "application/json";

/// `text/plain`
pub const TEXT_PLAIN: &str = "text/plain";

/// HTTP method of a service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// Read
    #[default]
    Get,
    /// Create
    Post,
    /// Full replace
    Put,
    /// Partial update
    Merge,
    /// Remove
    Delete,
}

impl Method {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Merge => "MERGE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call options merged with the service settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestOptions {
    /// Request body
    pub body: Option<String>,
    /// `Content-Type`; `application/json` when unset
    pub content_type: Option<String>,
    /// Entity tag sent as `If-Match`
    pub etag: Option<String>,
    /// Send `If-Match: *` regardless of `etag`
    pub force: bool,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request body and its content type.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>, content_type: &str) -> Self {
        self.body = Some(body.into());
        self.content_type = Some(content_type.to_string());
        self
    }

    /// Sets the entity tag.
    #[must_use]
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Sets whether the entity tag check is overridden.
    #[must_use]
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Returns the `If-Match` value these options produce.
    #[must_use]
    pub fn if_match(&self) -> Option<&str> {
        if self.force {
            Some("*")
        } else {
            self.etag.as_deref()
        }
    }
}

/// A fully shaped request, ready for a [`Transport`](crate::Transport).
///
/// Header names are matched case-insensitively; insertion order is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    /// HTTP method
    pub method: Method,
    /// Canonical URI string
    pub url: String,
    /// Headers in insertion order
    pub headers: Vec<(String, String)>,
    /// Body, if any
    pub body: Option<String>,
    /// Timeout from the service settings
    pub timeout: Option<Duration>,
}

impl ServiceRequest {
    /// Shapes a request for `uri`.
    ///
    /// Sets `MaxDataServiceVersion`, `DataServiceVersion`, `Accept` and
    /// `Content-Type`, plus `If-Match` when the options carry an etag or
    /// `force`.
    ///
    /// # Examples
    ///
    /// ```
    /// use odata_uri::ODataUri;
    /// use odata_uri_client::{Method, RequestOptions, ServiceRequest, ServiceSettings};
    ///
    /// let uri = ODataUri::new("http://h/svc").unwrap().resource("Products").count_query();
    /// let request = ServiceRequest::build(
    ///     Method::Get,
    ///     &uri,
    ///     &ServiceSettings::default(),
    ///     RequestOptions::default(),
    /// );
    ///
    /// assert_eq!(request.url, "http://h/svc/Products/$count");
    /// assert_eq!(request.header("DataServiceVersion"), Some("2.0"));
    /// assert_eq!(request.header("accept"), Some("application/json"));
    /// ```
    #[must_use]
    pub fn build(
        method: Method,
        uri: &ODataUri,
        settings: &ServiceSettings,
        options: RequestOptions,
    ) -> Self {
        let mut headers = vec![
            (
                "MaxDataServiceVersion".to_string(),
                settings.max_data_service_version.clone(),
            ),
            (
                "DataServiceVersion".to_string(),
                uri.data_service_version().to_string(),
            ),
            ("Accept".to_string(), APPLICATION_JSON.to_string()),
            (
                "Content-Type".to_string(),
                options
                    .content_type
                    .clone()
                    .unwrap_or_else(|| APPLICATION_JSON.to_string()),
            ),
        ];

        if let Some(if_match) = options.if_match() {
            headers.push(("If-Match".to_string(), if_match.to_string()));
        }

        Self {
            method,
            url: uri.to_string(),
            headers,
            body: options.body,
            timeout: settings.timeout,
        }
    }

    /// Returns the value of a header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Sets a header, replacing any existing value under the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Removes a header, returning its value.
    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        let index = self
            .headers
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(self.headers.remove(index).1)
    }
}
