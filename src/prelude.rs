//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use odata_uri::prelude::*;
//!
//! let uri = ODataUri::new("/OData/OData.svc").unwrap().resource("Products").top(5);
//! assert_eq!(uri.options().get(SystemQueryOption::Top), Some("5"));
//! ```

pub use crate::{
    // Core types
    ODataUri, QueryOptions, ResponseKind, ServiceRoot, SpecialSegment, SystemQueryOption,
    UriDescriptor,
    // Errors
    ParseError, ParseErrorKind, RootError,
};
