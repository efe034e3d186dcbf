//! Settings shared by every call made through a service.

use std::time::Duration;

use odata_uri::DATA_SERVICE_VERSION_2;

/// Response encoding requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    /// Plain JSON.
    #[default]
    Json,
    /// JSON wrapped in a callback; adds `$format=json` and `$callback` to
    /// every URI.
    Jsonp,
}

/// Settings for an [`ODataService`](crate::ODataService).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Response encoding.
    ///
    /// Default: `DataType::Json`
    pub data_type: DataType,

    /// Callback name used with `DataType::Jsonp`.
    ///
    /// Default: `"resultCallback"`
    pub jsonp_callback: String,

    /// Request timeout handed to the transport. None leaves it to the
    /// transport.
    ///
    /// Default: None
    pub timeout: Option<Duration>,

    /// Value of the `MaxDataServiceVersion` header.
    ///
    /// Default: `"2.0"`
    pub max_data_service_version: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            data_type: DataType::Json,
            jsonp_callback: "resultCallback".to_string(),
            timeout: None,
            max_data_service_version: DATA_SERVICE_VERSION_2.to_string(),
        }
    }
}

impl ServiceSettings {
    /// Creates settings with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response encoding.
    #[must_use]
    pub const fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Sets the JSONP callback name.
    #[must_use]
    pub fn with_jsonp_callback(mut self, callback: impl Into<String>) -> Self {
        self.jsonp_callback = callback.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the `MaxDataServiceVersion` header value.
    #[must_use]
    pub fn with_max_data_service_version(mut self, version: impl Into<String>) -> Self {
        self.max_data_service_version = version.into();
        self
    }
}
