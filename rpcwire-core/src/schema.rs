//! Method schema: which methods exist and how their payloads are typed
//!
//! A JSON-RPC message never says what type its params, result or error data
//! should become. The caller declares that up front in a `MethodSchema`,
//! keyed by method name, and the codec consults it while decoding.
//!
//! Each binding is a `TypeBinding`, an opaque capability that turns a JSON
//! tree into a `Payload`. `TypeBinding::of::<T>()` covers any serde type;
//! `TypeBinding::from_fn` accepts a hand-written converter.
//!
//! # Missing vs null bindings
//!
//! A method can have no binding at all, or an explicitly registered null
//! binding (`set_binding(kind, method, None)`). Both are configuration
//! defects and fail decoding with a `GenericError`, but with different
//! messages so the cause is easy to find.
//!
//! # Examples
//!
//! ```rust
//! use rpcwire_core::{BindingKind, MethodSchema};
//!
//! let schema = MethodSchema::new()
//!     .with_method("sum")
//!     .bind_params::<Vec<i64>>("sum")
//!     .bind_result::<i64>("sum")
//!     .bind_error_data::<String>("sum");
//!
//! assert!(schema.supports("sum"));
//! assert!(schema.has_binding(BindingKind::Result, "sum"));
//! ```

use crate::error::{Error, Result};
use crate::payload::Payload;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::{self, Any};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

type DecodeFn = dyn Fn(Value) -> serde_json::Result<Payload> + Send + Sync;

/// Capability that builds a typed payload from a JSON tree
#[derive(Clone)]
pub struct TypeBinding {
    type_name: &'static str,
    decode: Arc<DecodeFn>,
}

impl TypeBinding {
    /// Bind to any serde type
    pub fn of<T>() -> Self
    where
        T: DeserializeOwned + Serialize + Any + Send + Sync + fmt::Debug,
    {
        Self {
            type_name: any::type_name::<T>(),
            decode: Arc::new(|value| serde_json::from_value::<T>(value).map(Payload::new)),
        }
    }

    /// Bind to a custom converter
    pub fn from_fn<F>(type_name: &'static str, decode: F) -> Self
    where
        F: Fn(Value) -> serde_json::Result<Payload> + Send + Sync + 'static,
    {
        Self {
            type_name,
            decode: Arc::new(decode),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn decode(&self, value: Value) -> serde_json::Result<Payload> {
        (self.decode)(value)
    }
}

impl fmt::Debug for TypeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeBinding({})", self.type_name)
    }
}

/// Which payload of a method a binding types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Params,
    Result,
    ErrorData,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BindingKind::Params => "parameters' object",
            BindingKind::Result => "result's object",
            BindingKind::ErrorData => "error data object",
        })
    }
}

/// Mapping from method name to payload types
///
/// Built once, then handed to `RpcCodec::new`, which keeps its own copy.
#[derive(Debug, Clone, Default)]
pub struct MethodSchema {
    supported_methods: HashSet<String>,
    params: HashMap<String, Option<TypeBinding>>,
    results: HashMap<String, Option<TypeBinding>>,
    error_data: HashMap<String, Option<TypeBinding>>,
    generic_error_data: Option<TypeBinding>,
}

impl MethodSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a method as supported for incoming requests
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.add_method(method);
        self
    }

    pub fn bind_params<T>(mut self, method: impl Into<String>) -> Self
    where
        T: DeserializeOwned + Serialize + Any + Send + Sync + fmt::Debug,
    {
        self.set_binding(BindingKind::Params, method, Some(TypeBinding::of::<T>()));
        self
    }

    pub fn bind_result<T>(mut self, method: impl Into<String>) -> Self
    where
        T: DeserializeOwned + Serialize + Any + Send + Sync + fmt::Debug,
    {
        self.set_binding(BindingKind::Result, method, Some(TypeBinding::of::<T>()));
        self
    }

    pub fn bind_error_data<T>(mut self, method: impl Into<String>) -> Self
    where
        T: DeserializeOwned + Serialize + Any + Send + Sync + fmt::Debug,
    {
        self.set_binding(BindingKind::ErrorData, method, Some(TypeBinding::of::<T>()));
        self
    }

    /// Bind the error data type used when a response has no identifier
    pub fn bind_generic_error_data<T>(mut self) -> Self
    where
        T: DeserializeOwned + Serialize + Any + Send + Sync + fmt::Debug,
    {
        self.generic_error_data = Some(TypeBinding::of::<T>());
        self
    }

    /// Returns `true` if the method was not already supported
    pub fn add_method(&mut self, method: impl Into<String>) -> bool {
        self.supported_methods.insert(method.into())
    }

    pub fn remove_method(&mut self, method: &str) -> bool {
        self.supported_methods.remove(method)
    }

    /// Register a binding; `None` registers an explicit null binding
    pub fn set_binding(
        &mut self,
        kind: BindingKind,
        method: impl Into<String>,
        binding: Option<TypeBinding>,
    ) {
        self.bindings_mut(kind).insert(method.into(), binding);
    }

    pub fn remove_binding(&mut self, kind: BindingKind, method: &str) {
        self.bindings_mut(kind).remove(method);
    }

    pub fn set_generic_error_data(&mut self, binding: Option<TypeBinding>) {
        self.generic_error_data = binding;
    }

    pub fn supports(&self, method: &str) -> bool {
        self.supported_methods.contains(method)
    }

    pub fn supported_methods(&self) -> impl Iterator<Item = &str> {
        self.supported_methods.iter().map(String::as_str)
    }

    /// Whether a non-null binding is registered
    pub fn has_binding(&self, kind: BindingKind, method: &str) -> bool {
        matches!(self.bindings(kind).get(method), Some(Some(_)))
    }

    /// Resolve the binding for a method
    ///
    /// # Errors
    ///
    /// Returns a `GenericError` if no binding is registered or the
    /// registered binding is null.
    pub fn resolve(&self, kind: BindingKind, method: &str) -> Result<&TypeBinding> {
        match self.bindings(kind).get(method) {
            Some(Some(binding)) => Ok(binding),
            Some(None) => Err(Error::generic(format!(
                "Invalid type binding for the {} of the \"{}\" method",
                kind, method
            ))),
            None => Err(Error::generic(format!(
                "There is no type binding for the {} of the \"{}\" method",
                kind, method
            ))),
        }
    }

    /// Resolve the error data binding for responses without an identifier
    pub fn resolve_generic_error_data(&self) -> Result<&TypeBinding> {
        self.generic_error_data.as_ref().ok_or_else(|| {
            Error::generic("There is no type binding for the generic error data object")
        })
    }

    fn bindings(&self, kind: BindingKind) -> &HashMap<String, Option<TypeBinding>> {
        match kind {
            BindingKind::Params => &self.params,
            BindingKind::Result => &self.results,
            BindingKind::ErrorData => &self.error_data,
        }
    }

    fn bindings_mut(&mut self, kind: BindingKind) -> &mut HashMap<String, Option<TypeBinding>> {
        match kind {
            BindingKind::Params => &mut self.params,
            BindingKind::Result => &mut self.results,
            BindingKind::ErrorData => &mut self.error_data,
        }
    }
}
