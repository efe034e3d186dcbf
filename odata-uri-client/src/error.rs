//! Error types for OData service calls.

use std::fmt;

use odata_uri::{ParseError, RootError};

/// Errors that can occur while calling an OData service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The service root is invalid.
    InvalidRoot(RootError),
    /// A URI (for example an entry's self-link) could not be parsed.
    InvalidUri(ParseError),
    /// The transport failed before a response was received.
    Transport {
        /// Description of the failure
        message: String,
    },
    /// The service answered with a non-success status.
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, verbatim
        body: String,
    },
    /// The response body could not be decoded.
    InvalidBody {
        /// Description of the decoding failure
        reason: String,
    },
    /// An entry could not be serialized into a request body.
    Serialization {
        /// Description of the serialization failure
        reason: String,
    },
    /// An entry to delete carries no `__metadata.uri`.
    MissingEntryUri,
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRoot(e) => write!(f, "invalid service root: {e}"),
            Self::InvalidUri(e) => write!(f, "{e}"),
            Self::Transport { message } => write!(f, "transport error: {message}"),
            Self::Status { status, body } => {
                if body.is_empty() {
                    write!(f, "service responded with status {status}")
                } else {
                    write!(f, "service responded with status {status}: {body}")
                }
            }
            Self::InvalidBody { reason } => write!(f, "could not decode response body: {reason}"),
            Self::Serialization { reason } => {
                write!(f, "could not serialize entry: {reason}")
            }
            Self::MissingEntryUri => write!(
                f,
                "entry has no '__metadata.uri'; pass its resource path or URI instead"
            ),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRoot(e) => Some(e),
            Self::InvalidUri(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for ClientError {
    fn from(e: ParseError) -> Self {
        Self::InvalidUri(e)
    }
}

impl From<RootError> for ClientError {
    fn from(e: RootError) -> Self {
        Self::InvalidRoot(e)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_body(e)
    }
}

impl ClientError {
    /// Creates a `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an `InvalidBody` error.
    #[must_use]
    pub fn invalid_body(reason: impl fmt::Display) -> Self {
        Self::InvalidBody {
            reason: reason.to_string(),
        }
    }

    /// Returns the HTTP status if the service rejected the request.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the service answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
