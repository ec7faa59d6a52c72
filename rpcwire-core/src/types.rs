//! JSON-RPC 2.0 message model
//!
//! Plain data records for requests and responses, plus the batch container
//! the codec hands back from a decode.
//!
//! # Requests
//!
//! A request always has a non-empty method name. Its identifier decides
//! whether it is a notification (`RpcId::Absent`) and its params, if any,
//! are a typed `Payload` that must project to a JSON object or array.
//!
//! # Responses
//!
//! A response carries exactly one of a result or an error. The model stores
//! that as a `Result`, so "both" and "neither" cannot be constructed.
//!
//! # Examples
//!
//! ```rust
//! use rpcwire_core::{Payload, Request, Response, RpcError, RpcId};
//! use serde_json::json;
//!
//! let request = Request::new("subtract", 1)?.with_params(Payload::new(json!([42, 23])));
//! assert!(!request.is_notification());
//!
//! let ping = Request::notification("rpc.ping")?;
//! assert!(ping.is_notification());
//! assert!(ping.is_system());
//!
//! let ok = Response::success(1, Payload::new(19_i64));
//! assert!(ok.is_success());
//!
//! let failed = Response::failure(RpcId::Absent, RpcError::parse_error());
//! assert!(failed.is_error());
//! # Ok::<(), rpcwire_core::Error>(())
//! ```

use crate::error::{Error, Result, RpcError};
use crate::id::RpcId;
use crate::payload::Payload;
use serde_json::Value;

/// Prefix reserved for protocol-internal methods
pub const SYSTEM_METHOD_PREFIX: &str = "rpc.";

/// Whether a method name is reserved for rpc-internal methods
pub fn is_system_method(method: &str) -> bool {
    method.starts_with(SYSTEM_METHOD_PREFIX)
}

/// How a request passes its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamsType {
    /// No `params` member
    None,
    /// `params` is a JSON array
    ByPosition,
    /// `params` is a JSON object
    ByName,
}

impl ParamsType {
    /// Classify a projected params value; `None` for non-structured values
    pub(crate) fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Array(_) => Some(ParamsType::ByPosition),
            Value::Object(_) => Some(ParamsType::ByName),
            _ => None,
        }
    }
}

/// JSON-RPC 2.0 request message
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    id: RpcId,
    params: Option<Payload>,
    // Wire shape, known only for decoded requests
    params_type: Option<ParamsType>,
}

impl Request {
    /// Create a request that expects a response
    ///
    /// Passing `RpcId::Absent` creates a notification.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `method` is empty.
    pub fn new(method: impl Into<String>, id: impl Into<RpcId>) -> Result<Self> {
        let method = method.into();
        if method.is_empty() {
            return Err(Error::invalid_argument("method", "Value is an empty string"));
        }

        Ok(Self {
            method,
            id: id.into(),
            params: None,
            params_type: None,
        })
    }

    /// Create a notification (a request without an identifier)
    pub fn notification(method: impl Into<String>) -> Result<Self> {
        Self::new(method, RpcId::Absent)
    }

    /// Attach parameters
    ///
    /// Their JSON shape is checked when the request is encoded.
    pub fn with_params(mut self, params: Payload) -> Self {
        self.params = Some(params);
        self.params_type = None;
        self
    }

    pub(crate) fn decoded(
        method: String,
        id: RpcId,
        params: Option<(Payload, ParamsType)>,
    ) -> Self {
        let (params, params_type) = match params {
            Some((payload, shape)) => (Some(payload), Some(shape)),
            None => (None, None),
        };
        Self {
            method,
            id,
            params,
            params_type,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn id(&self) -> &RpcId {
        &self.id
    }

    pub fn params(&self) -> Option<&Payload> {
        self.params.as_ref()
    }

    pub fn has_params(&self) -> bool {
        self.params.is_some()
    }

    /// A notification has no identifier and receives no response
    pub fn is_notification(&self) -> bool {
        self.id.is_absent()
    }

    /// Whether the method is reserved for rpc-internal use (`rpc.` prefix)
    pub fn is_system(&self) -> bool {
        is_system_method(&self.method)
    }

    /// Classify how the params are passed
    ///
    /// For decoded requests this is the shape seen on the wire. For
    /// constructed requests the params are projected to JSON first.
    ///
    /// # Errors
    ///
    /// Returns a `GenericError` if the params fail to project or project to
    /// something other than an object or array.
    pub fn params_type(&self) -> Result<ParamsType> {
        let Some(params) = &self.params else {
            return Ok(ParamsType::None);
        };
        if let Some(shape) = self.params_type {
            return Ok(shape);
        }

        let value = params.to_json().map_err(|e| {
            Error::generic_with_source(
                format!("Object deconstruction error for {}", params.type_name()),
                e,
            )
        })?;
        ParamsType::of(&value).ok_or_else(|| {
            Error::generic("The request has the parameters property with invalid type")
        })
    }
}

/// JSON-RPC 2.0 response message
#[derive(Debug, Clone)]
pub struct Response {
    id: RpcId,
    outcome: std::result::Result<Payload, RpcError>,
}

impl Response {
    /// Create a successful response
    pub fn success(id: impl Into<RpcId>, result: Payload) -> Self {
        Self {
            id: id.into(),
            outcome: Ok(result),
        }
    }

    /// Create an error response
    ///
    /// Use `RpcId::Absent` when the request identifier could not be
    /// determined; it is written as `"id": null`.
    pub fn failure(id: impl Into<RpcId>, error: RpcError) -> Self {
        Self {
            id: id.into(),
            outcome: Err(error),
        }
    }

    pub fn id(&self) -> &RpcId {
        &self.id
    }

    pub fn outcome(&self) -> std::result::Result<&Payload, &RpcError> {
        self.outcome.as_ref()
    }

    pub fn into_outcome(self) -> std::result::Result<Payload, RpcError> {
        self.outcome
    }

    pub fn result(&self) -> Option<&Payload> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&RpcError> {
        self.outcome.as_ref().err()
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn is_error(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Outcome of decoding one wire item
pub type ItemResult<T> = std::result::Result<T, Error>;

/// Ordered outcome of a decode call
///
/// Holds one `ItemResult` per wire item, in wire order. Items that broke a
/// protocol rule carry their own error; the rest of the batch is still
/// usable.
#[derive(Debug, Clone)]
pub struct BatchResult<T> {
    items: Vec<ItemResult<T>>,
    is_batch: bool,
}

impl<T> BatchResult<T> {
    pub(crate) fn single(item: ItemResult<T>) -> Self {
        Self {
            items: vec![item],
            is_batch: false,
        }
    }

    pub(crate) fn batch(items: Vec<ItemResult<T>>) -> Self {
        Self {
            items,
            is_batch: true,
        }
    }

    /// The "no responses" result
    pub(crate) fn empty() -> Self {
        Self::batch(Vec::new())
    }

    /// Whether the input was a JSON array rather than a single object
    pub fn is_batch(&self) -> bool {
        self.is_batch
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ItemResult<T>] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ItemResult<T>> {
        self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemResult<T>> {
        self.items.iter()
    }

    /// Successfully decoded items, in wire order
    pub fn successes(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter_map(|item| item.as_ref().ok())
    }

    /// Per-item failures, in wire order
    pub fn failures(&self) -> impl Iterator<Item = &Error> {
        self.items.iter().filter_map(|item| item.as_ref().err())
    }
}

impl<T> IntoIterator for BatchResult<T> {
    type Item = ItemResult<T>;
    type IntoIter = std::vec::IntoIter<ItemResult<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a BatchResult<T> {
    type Item = &'a ItemResult<T>;
    type IntoIter = std::slice::Iter<'a, ItemResult<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_notification_flag() {
        assert!(Request::notification("m").unwrap().is_notification());
        assert!(!Request::new("m", 1).unwrap().is_notification());
        assert!(!Request::new("m", "1").unwrap().is_notification());
        assert_eq!(Request::new("m", 1).unwrap().id(), &RpcId::from(1));
    }

    #[test]
    fn test_system_method() {
        assert!(is_system_method("rpc.ping"));
        assert!(!is_system_method("ping"));
        assert!(!is_system_method("rpc"));
        assert!(Request::notification("rpc.m").unwrap().is_system());
        assert!(!Request::notification("m").unwrap().is_system());
    }

    #[test]
    fn test_empty_method_rejected() {
        let error = Request::new("", 1).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::GenericError);
        assert!(matches!(error, Error::InvalidArgument { name: "method", .. }));
    }

    #[test]
    fn test_params_type_of_constructed_request() {
        let none = Request::notification("m").unwrap();
        assert_eq!(none.params_type().unwrap(), ParamsType::None);
        assert!(!none.has_params());

        let by_position = Request::notification("m")
            .unwrap()
            .with_params(Payload::new(vec![1_i64]));
        assert_eq!(by_position.params_type().unwrap(), ParamsType::ByPosition);

        let mut named = HashMap::new();
        named.insert("p".to_string(), 1_i64);
        let by_name = Request::notification("m").unwrap().with_params(Payload::new(named));
        assert_eq!(by_name.params_type().unwrap(), ParamsType::ByName);

        let scalar = Request::notification("m").unwrap().with_params(Payload::new(5_i64));
        assert_eq!(scalar.params_type().unwrap_err().kind(), ErrorKind::GenericError);
    }

    #[test]
    fn test_params_type_names_unserializable_type() {
        #[derive(Debug)]
        struct Unserializable;

        impl serde::Serialize for Unserializable {
            fn serialize<S>(&self, _: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                Err(serde::ser::Error::custom("not representable"))
            }
        }

        let request = Request::notification("m")
            .unwrap()
            .with_params(Payload::new(Unserializable));
        let error = request.params_type().unwrap_err();

        assert!(error.is_fatal());
        assert!(error.to_string().starts_with("Object deconstruction error for "));
        assert!(error.to_string().ends_with("Unserializable"));
    }

    #[test]
    fn test_params_type_of_decoded_request_uses_wire_shape() {
        // A struct read from an array still reports the wire shape
        let request = Request::decoded(
            "m".to_string(),
            RpcId::from(1),
            Some((Payload::new(json!({"a": 1})), ParamsType::ByPosition)),
        );
        assert_eq!(request.params_type().unwrap(), ParamsType::ByPosition);
    }

    #[test]
    fn test_response_outcome() {
        let ok = Response::success(1, Payload::new(json!(42)));
        assert!(ok.is_success());
        assert!(ok.error().is_none());
        assert_eq!(
            ok.result().and_then(|r| r.downcast_ref::<serde_json::Value>()),
            Some(&json!(42))
        );

        let failed = Response::failure(RpcId::Absent, RpcError::internal_error("test error"));
        assert!(failed.is_error());
        assert!(failed.result().is_none());
        assert_eq!(failed.into_outcome().unwrap_err().code, RpcError::INTERNAL_ERROR);
    }

    #[test]
    fn test_batch_result_accessors() {
        let result: BatchResult<i32> = BatchResult::batch(vec![
            Ok(1),
            Err(Error::invalid_message("The batch item is not a message")),
            Ok(3),
        ]);

        assert!(result.is_batch());
        assert_eq!(result.len(), 3);
        assert_eq!(result.successes().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(result.failures().count(), 1);
        assert!(result.items()[1].is_err());

        let single = BatchResult::single(Ok(5));
        assert!(!single.is_batch());
        assert_eq!(single.into_items().len(), 1);

        let empty: BatchResult<i32> = BatchResult::empty();
        assert!(empty.is_empty());
    }
}
