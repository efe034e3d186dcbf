//! Transport trait: the seam between request shaping and the network.

use std::sync::Arc;

use crate::{ClientError, ServiceRequest};

/// Raw response handed back by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers in the order received
    pub headers: Vec<(String, String)>,
    /// Response body, verbatim
    pub body: String,
}

impl TransportResponse {
    /// Creates a response with the given status and body and no headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Creates a `200` response.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the value of a header, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns true for a `2xx` status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status / 100 == 2
    }
}

/// Sends shaped requests to an OData service.
///
/// Implementations own connection handling, TLS, retries and timeouts.
/// The request's `timeout` is a hint the implementation should honor.
///
/// # Errors
///
/// `send` returns `ClientError::Transport` when no response was received.
/// Non-success statuses are returned as ordinary responses; turning them
/// into errors is left to the caller.
pub trait Transport: Send + Sync {
    /// Sends a request and waits for the response.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the request could not be sent
    /// or no response arrived.
    fn send(&self, request: &ServiceRequest) -> Result<TransportResponse, ClientError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &ServiceRequest) -> Result<TransportResponse, ClientError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &ServiceRequest) -> Result<TransportResponse, ClientError> {
        (**self).send(request)
    }
}

/// Hook that may rewrite a request before it is sent.
pub type BeforeRequest = Box<dyn Fn(&mut ServiceRequest) + Send + Sync>;
