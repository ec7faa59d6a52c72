//! Type-erased message payloads
//!
//! Params, results and error data are typed by the caller's schema, but the
//! message model has to hold them without knowing their concrete types.
//! `Payload` wraps any `Serialize` value behind an `Arc` so messages stay
//! cheap to clone, can be projected back to JSON when encoding, and can be
//! downcast to the concrete type when the caller reads them.
//!
//! # Examples
//!
//! ```rust
//! use rpcwire_core::Payload;
//! use serde_json::json;
//!
//! let payload = Payload::new(vec![1_i64, 2, 3]);
//! assert_eq!(payload.downcast_ref::<Vec<i64>>(), Some(&vec![1, 2, 3]));
//! assert_eq!(payload.to_json().unwrap(), json!([1, 2, 3]));
//! ```

use serde::Serialize;
use std::any::{self, Any};
use std::fmt;
use std::sync::Arc;

/// Object-safe view of a payload value
pub trait PayloadValue: Any + Send + Sync + fmt::Debug {
    /// Project the value into a JSON tree
    fn to_json(&self) -> serde_json::Result<serde_json::Value>;

    fn as_any(&self) -> &dyn Any;

    fn type_name(&self) -> &'static str;
}

impl<T> PayloadValue for T
where
    T: Serialize + Any + Send + Sync + fmt::Debug,
{
    fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }
}

/// A params, result or error-data value of some caller-defined type
#[derive(Clone)]
pub struct Payload(Arc<dyn PayloadValue>);

impl Payload {
    pub fn new<T>(value: T) -> Self
    where
        T: Serialize + Any + Send + Sync + fmt::Debug,
    {
        Payload(Arc::new(value))
    }

    /// Borrow the value as `T` if that is its concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Project the value into a JSON tree
    ///
    /// The shape of the result is only known after this call, because the
    /// value's `Serialize` impl decides it.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        (*self.0).to_json()
    }

    /// Name of the concrete type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        (*self.0).type_name()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
