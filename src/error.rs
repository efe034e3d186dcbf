//! Error types for OData URI parsing.

use std::fmt;

/// Errors that can occur when parsing an OData URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The input that failed to parse
    pub input: String,
    /// The specific error that occurred
    pub kind: ParseErrorKind,
}

/// Specific parsing error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input is empty
    Empty,
    /// The root portion of the input is not a valid URI or URI path
    InvalidRoot(RootError),
    /// A trailing `$links` segment is not followed by a navigation property
    MissingLinksTarget,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse OData URI '{}': ", self.input)?;
        match &self.kind {
            ParseErrorKind::Empty => write!(f, "input is empty"),
            ParseErrorKind::InvalidRoot(e) => write!(f, "invalid service root: {e}"),
            ParseErrorKind::MissingLinksTarget => {
                write!(f, "'$links' must be followed by a navigation property name")
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ParseErrorKind::InvalidRoot(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors for service root parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootError {
    /// The scheme of an absolute root is malformed
    InvalidScheme {
        /// The scheme that was found
        found: String,
    },
    /// An absolute root has no authority (host) after `://`
    MissingAuthority,
    /// Character not allowed in a root
    InvalidChar {
        /// The invalid character
        char: char,
        /// Position in the input
        position: usize,
    },
}

impl fmt::Display for RootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidScheme { found } => {
                write!(
                    f,
                    "invalid scheme '{found}'; must start with a letter followed by letters, digits, '+', '-' or '.'"
                )
            }
            Self::MissingAuthority => write!(f, "absolute root is missing a host after '://'"),
            Self::InvalidChar { char, position } => {
                write!(
                    f,
                    "invalid character '{}' at position {position}; whitespace, '?' and '#' are not allowed in a root",
                    char.escape_default()
                )
            }
        }
    }
}

impl std::error::Error for RootError {}
