//! In-memory transport that replays canned responses.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::{ClientError, ServiceRequest, Transport, TransportResponse};

/// Transport that records every request and answers from a queue.
///
/// Responses are returned in the order they were pushed. Sending with an
/// empty queue fails with `ClientError::Transport`.
///
/// # Thread Safety
///
/// Uses `Mutex` for interior mutability so it can be shared behind an
/// `Arc`.
///
/// # Examples
///
/// ```
/// use odata_uri_client::{InMemoryTransport, ODataService, ServiceSettings, TransportResponse};
///
/// let transport = InMemoryTransport::new();
/// transport.push(TransportResponse::ok("42"));
///
/// let service = ODataService::new("http://h/svc", ServiceSettings::default(), &transport).unwrap();
/// let result = service.from("Products").count().unwrap();
///
/// assert_eq!(result.data, 42);
/// assert_eq!(transport.requests()[0].url, "http://h/svc/Products/$count");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<ServiceRequest>>,
}

impl InMemoryTransport {
    /// Creates a transport with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn push(&self, response: TransportResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Queues a response, returning `self` for chaining.
    #[must_use]
    pub fn with_response(self, response: TransportResponse) -> Self {
        self.push(response);
        self
    }

    /// Returns a copy of every request sent so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ServiceRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recent request.
    #[must_use]
    pub fn last_request(&self) -> Option<ServiceRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Returns the number of responses still queued.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Transport for InMemoryTransport {
    fn send(&self, request: &ServiceRequest) -> Result<TransportResponse, ClientError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| {
                ClientError::transport(format!(
                    "no response queued for {} {}",
                    request.method, request.url
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;

    fn get(url: &str) -> ServiceRequest {
        ServiceRequest {
            method: Method::Get,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    #[test]
    fn replays_in_order() {
        let transport = InMemoryTransport::new()
            .with_response(TransportResponse::ok("first"))
            .with_response(TransportResponse::ok("second"));
        assert_eq!(transport.pending(), 2);

        assert_eq!(transport.send(&get("/a")).unwrap().body, "first");
        assert_eq!(transport.send(&get("/b")).unwrap().body, "second");
        assert_eq!(transport.pending(), 0);
    }

    #[test]
    fn records_requests() {
        let transport = InMemoryTransport::new();
        transport.push(TransportResponse::ok(""));
        transport.send(&get("/svc/Products")).unwrap();

        assert_eq!(transport.requests().len(), 1);
        assert_eq!(transport.last_request().unwrap().url, "/svc/Products");
    }

    #[test]
    fn empty_queue_is_transport_error() {
        let transport = InMemoryTransport::new();
        let err = transport.send(&get("/svc/Products")).unwrap_err();

        assert!(matches!(err, ClientError::Transport { .. }));
        assert!(err.to_string().contains("GET /svc/Products"));
        // The failed attempt is still recorded
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn shared_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let transport = Arc::new(InMemoryTransport::new());
        for _ in 0..4 {
            transport.push(TransportResponse::ok("{}"));
        }

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let transport = Arc::clone(&transport);
                thread::spawn(move || transport.send(&get(&format!("/svc/E({i})"))))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
        assert_eq!(transport.requests().len(), 4);
    }
}
