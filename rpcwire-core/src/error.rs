//! Error types for rpcwire
//!
//! This module provides the two error shapes the codec deals with:
//!
//! - **Error**: the codec's own failure signal (uses thiserror)
//! - **RpcError**: the wire-level `error` object carried by a response
//!
//! # Error Kinds
//!
//! Every `Error` belongs to exactly one `ErrorKind`:
//!
//! - `ParseError`: the text is not valid JSON
//! - `InvalidMessage`: valid JSON that breaks a JSON-RPC 2.0 rule
//! - `InvalidMethod`: a well-formed request naming an unsupported method
//! - `GenericError`: everything else (missing schema or type binding,
//!   conversion failure, caller misuse)
//!
//! Only `GenericError` aborts a whole batch decode. The other kinds are
//! captured per item so the caller still gets one outcome per wire item.
//!
//! # Examples
//!
//! ```rust
//! use rpcwire_core::{Error, ErrorKind, RpcError};
//!
//! let error = Error::invalid_method("The request method \"foo\" is not supported");
//! assert_eq!(error.kind(), ErrorKind::InvalidMethod);
//! assert!(!error.is_fatal());
//!
//! // What a server would send back for that item
//! let wire = RpcError::from(&error);
//! assert_eq!(wire.code, RpcError::METHOD_NOT_FOUND);
//! ```

use crate::id::IdKind;
use crate::payload::Payload;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for rpcwire operations
pub type Result<T> = std::result::Result<T, Error>;

/// Closed classification of codec failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed JSON text
    ParseError,
    /// Structurally valid JSON violating a JSON-RPC 2.0 rule
    InvalidMessage,
    /// Request for a method absent from the schema's supported set
    InvalidMethod,
    /// Configuration or caller defect; fatal to the whole call
    GenericError,
}

impl ErrorKind {
    /// Short snake_case label, used for log fields and metric attributes
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ParseError => "parse_error",
            ErrorKind::InvalidMessage => "invalid_message",
            ErrorKind::InvalidMethod => "invalid_method",
            ErrorKind::GenericError => "generic_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Codec-level error type
///
/// Variants carry a human-readable message and, where the failure came out
/// of `serde_json`, the underlying cause as the error source. The cause is
/// shared behind an `Arc` so the error stays `Clone` and can sit inside
/// batch results.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The input text is not valid JSON
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Arc<serde_json::Error>>,
    },

    /// The JSON is well-formed but is not a valid JSON-RPC 2.0 message
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// The request names a method the schema does not support
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    /// Missing schema, missing type binding, conversion failure, etc.
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Arc<serde_json::Error>>,
    },

    /// A constructor argument was rejected
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// Narrowing an identifier to a type it does not hold
    #[error("Cannot read {found} identifier as {expected}")]
    IdTypeMismatch { expected: IdKind, found: IdKind },
}

impl Error {
    pub fn parse(message: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Parse {
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    pub fn invalid_message(message: impl Into<String>) -> Self {
        Error::InvalidMessage(message.into())
    }

    pub fn invalid_method(message: impl Into<String>) -> Self {
        Error::InvalidMethod(message.into())
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Error::Generic {
            message: message.into(),
            source: None,
        }
    }

    pub fn generic_with_source(message: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Generic {
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// The taxonomy kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse { .. } => ErrorKind::ParseError,
            Error::InvalidMessage(_) => ErrorKind::InvalidMessage,
            Error::InvalidMethod(_) => ErrorKind::InvalidMethod,
            Error::Generic { .. }
            | Error::InvalidArgument { .. }
            | Error::IdTypeMismatch { .. } => ErrorKind::GenericError,
        }
    }

    /// Whether this error must abort a whole decode/encode call
    ///
    /// Non-fatal errors are attached to the batch item they came from.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::GenericError
    }
}

/// JSON-RPC 2.0 error object as it appears in a response
///
/// `code` and `message` are required on the wire; `data` is optional and is
/// typed through the schema's error-data bindings when decoding.
///
/// # Examples
///
/// ```rust
/// use rpcwire_core::{Payload, RpcError};
///
/// let error = RpcError::method_not_found("calculate");
/// assert_eq!(error.code, -32601);
///
/// let custom = RpcError::with_data(1001, "Insufficient funds", Payload::new(50_i64));
/// assert!(custom.data.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct RpcError {
    /// Numeric error code; -32768 to -32000 are reserved by the protocol
    pub code: i64,
    /// Short description of the error
    pub message: String,
    /// Additional structured information about the error
    pub data: Option<Payload>,
}

impl RpcError {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(code: i64, message: impl Into<String>, data: Payload) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create a parse error (-32700)
    pub fn parse_error() -> Self {
        Self::new(Self::PARSE_ERROR, "Parse error")
    }

    /// Create an invalid request error (-32600)
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(Self::INVALID_REQUEST, msg)
    }

    /// Create a method not found error (-32601)
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(
            Self::METHOD_NOT_FOUND,
            format!("Method not found: {}", method.into()),
        )
    }

    /// Create an invalid params error (-32602)
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(Self::INVALID_PARAMS, msg)
    }

    /// Create an internal error (-32603)
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::new(Self::INTERNAL_ERROR, msg)
    }

    /// Whether the code lies in the range reserved by the protocol
    pub fn is_reserved_code(&self) -> bool {
        (-32768..=-32000).contains(&self.code)
    }
}

impl From<&Error> for RpcError {
    /// Map a codec failure to the error object a peer should receive
    fn from(error: &Error) -> Self {
        match error.kind() {
            ErrorKind::ParseError => RpcError::parse_error(),
            ErrorKind::InvalidMessage => RpcError::invalid_request(error.to_string()),
            ErrorKind::InvalidMethod => {
                RpcError::new(RpcError::METHOD_NOT_FOUND, error.to_string())
            }
            ErrorKind::GenericError => RpcError::internal_error(error.to_string()),
        }
    }
}

impl fmt::Display for RpcError {
    /// Formats as "[code] message"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}
