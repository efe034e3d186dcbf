//! Service-call adapter for `odata-uri`.
//!
//! This crate turns [`ODataUri`](odata_uri::ODataUri) models into requests
//! against an OData service and decodes the answers. It includes:
//!
//! - **Settings**: [`ServiceSettings`] for data type, timeout and protocol
//!   version
//! - **Request shaping**: [`ServiceRequest`] with the OData version headers,
//!   `Accept`, `Content-Type` and `If-Match`
//! - **Trait interface**: [`Transport`] for plugging in an HTTP client
//! - **In-memory transport**: [`InMemoryTransport`] for tests and offline use
//! - **Response decoding**: [`QueryResult`], with the `{"d": ...}` envelope
//!   removed
//! - **Service facade**: [`ODataService`] and [`Query`] for reads, creates,
//!   updates and deletes
//!
//! # Quick Start
//!
//! ```rust
//! use odata_uri_client::{
//!     InMemoryTransport, ODataService, ServiceSettings, TransportResponse,
//! };
//!
//! let transport = InMemoryTransport::new()
//!     .with_response(TransportResponse::ok(r#"{"d":{"results":[],"__count":"0"}}"#));
//!
//! let service = ODataService::new(
//!     "http://services.odata.org/OData/OData.svc",
//!     ServiceSettings::default(),
//!     &transport,
//! )
//! .unwrap();
//!
//! let result = service
//!     .from("Products")
//!     .filter("Price gt 200")
//!     .inlinecount()
//!     .execute()
//!     .unwrap();
//!
//! assert_eq!(result.inline_count(), Some(0));
//!
//! let sent = transport.last_request().unwrap();
//! assert_eq!(
//!     sent.url,
//!     "http://services.odata.org/OData/OData.svc/Products?$filter=Price gt 200&$inlinecount=allpages"
//! );
//! assert_eq!(sent.header("DataServiceVersion"), Some("2.0"));
//! ```
//!
//! # Writes
//!
//! ```rust
//! use odata_uri_client::{
//!     DeleteOptions, InMemoryTransport, ODataService, ServiceSettings, TransportResponse,
//!     UpdateOptions,
//! };
//! use serde_json::json;
//!
//! let transport = InMemoryTransport::new()
//!     .with_response(TransportResponse::new(204, ""))
//!     .with_response(TransportResponse::new(204, ""));
//! let service = ODataService::new("/OData/OData.svc", ServiceSettings::default(), &transport).unwrap();
//!
//! let entry = json!({
//!     "__metadata": {"uri": "/OData/OData.svc/Products(1)", "etag": "W/\"2\""},
//!     "Price": 4.5
//! });
//!
//! // Partial update (MERGE) guarded by the entry's etag
//! service.update("Products(1)", &entry, UpdateOptions::default()).unwrap();
//! assert_eq!(transport.last_request().unwrap().header("If-Match"), Some("W/\"2\""));
//!
//! // Delete by the entry's self-link
//! service.delete(&entry, DeleteOptions::default()).unwrap();
//! assert_eq!(transport.last_request().unwrap().url, "/OData/OData.svc/Products(1)");
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod entry;
mod error;
mod memory;
mod request;
mod response;
mod service;
mod transport;

pub use config::{DataType, ServiceSettings};
pub use entry::{EntryRef, metadata_etag, metadata_uri};
pub use error::ClientError;
pub use memory::InMemoryTransport;
pub use request::{APPLICATION_JSON, Method, RequestOptions, ServiceRequest, TEXT_PLAIN};
pub use response::QueryResult;
pub use service::{DeleteOptions, ODataService, Query, UpdateOptions};
pub use transport::{BeforeRequest, Transport, TransportResponse};
