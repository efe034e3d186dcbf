//! Parser, serializer and immutable query builder for OData service URIs.
//!
//! This crate models the addressing scheme of OData (v2) services: a service
//! root, a resource path with key predicates and navigation properties, the
//! special `$count`, `$value` and `$links` segments, and the system query
//! options (`$filter`, `$orderby`, `$top`, ...).
//!
//! # Overview
//!
//! An [`ODataUri`] has the structure:
//!
//! ```text
//! <root>[/<resource>][/$count | /$value | /$links/<target>][?<options>]
//! ```
//!
//! Its string form is canonical: reserved options are emitted in alphabetical
//! order, followed by custom parameters in alphabetical order, regardless of
//! the order in which they were set.
//!
//! # Quick Start
//!
//! ```rust
//! use odata_uri::ODataUri;
//!
//! let service = ODataUri::new("http://services.odata.org/OData/OData.svc").unwrap();
//!
//! let query = service
//!     .resource("Products")
//!     .inlinecount()
//!     .top(10)
//!     .filter("Price gt 200");
//!
//! assert_eq!(
//!     query.to_string(),
//!     "http://services.odata.org/OData/OData.svc/Products?$filter=Price gt 200&$inlinecount=allpages&$top=10"
//! );
//!
//! // Parsing the canonical string against the same root gives back the
//! // same value
//! assert_eq!(service.reparse(&query.to_string()).unwrap(), query);
//! ```
//!
//! # Immutability
//!
//! Builder operations take `&self` and return a new URI. Branches built from
//! a shared base never affect each other or the base.
//!
//! # Opaque Values
//!
//! Expressions passed to `$filter`, `$orderby`, `$expand` and `$select` are
//! neither validated nor escaped. They are written and read verbatim.
//!
//! Because nothing is escaped, the round trip from a URI to its string and
//! back only holds for values free of the query delimiters. A value
//! containing `&`, a key containing `&` or `=`, or a key predicate
//! containing `?` is split at that character when the string is parsed.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod builder;
mod constants;
mod error;
mod options;
pub mod prelude;
mod root;
mod segment;
mod uri;

pub use constants::{
    COUNT_SEGMENT, DATA_SERVICE_VERSION_1, DATA_SERVICE_VERSION_2, INLINECOUNT_ALLPAGES,
    LINKS_SEGMENT, OPTION_MARKER, VALUE_SEGMENT,
};
pub use error::{ParseError, ParseErrorKind, RootError};
pub use options::{QueryOptions, SystemQueryOption};
pub use root::ServiceRoot;
pub use segment::SpecialSegment;
pub use uri::{ODataUri, ResponseKind, UriDescriptor};
