//! Response identifier to method name bindings
//!
//! A JSON-RPC response never repeats the method name of the request it
//! answers, yet the codec needs that name to pick the result and error-data
//! types. The caller records which method each outgoing request id belongs
//! to and exposes that record through `BindingsProvider`.
//!
//! The codec only asks the provider while decoding a response that carries
//! a result, or an error with data. Requests and bare errors never touch it.
//!
//! # Examples
//!
//! ```rust
//! use rpcwire_core::{BindingsProvider, MethodBindings, Request, RpcId};
//!
//! let mut bindings = MethodBindings::new();
//! let request = Request::new("sum", 1)?;
//! bindings.record_request(&request);
//!
//! assert_eq!(bindings.method_for(&RpcId::from(1)), Some("sum"));
//! assert_eq!(bindings.method_for(&RpcId::from(2)), None);
//! # Ok::<(), rpcwire_core::Error>(())
//! ```

use crate::id::RpcId;
use crate::types::Request;
use std::collections::{BTreeMap, HashMap};

/// Lookup of the method that produced a given request identifier
///
/// Returning `Some("")` marks a binding that exists but is unusable; the
/// codec reports it separately from a missing binding.
pub trait BindingsProvider {
    fn method_for(&self, id: &RpcId) -> Option<&str>;
}

impl<P: BindingsProvider + ?Sized> BindingsProvider for &P {
    fn method_for(&self, id: &RpcId) -> Option<&str> {
        (**self).method_for(id)
    }
}

impl BindingsProvider for HashMap<RpcId, String> {
    fn method_for(&self, id: &RpcId) -> Option<&str> {
        self.get(id).map(String::as_str)
    }
}

impl BindingsProvider for BTreeMap<RpcId, String> {
    fn method_for(&self, id: &RpcId) -> Option<&str> {
        self.get(id).map(String::as_str)
    }
}

/// In-memory record of pending request ids
#[derive(Debug, Clone, Default)]
pub struct MethodBindings {
    methods: HashMap<RpcId, String>,
}

impl MethodBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an identifier to a method, returning the previous binding
    pub fn bind(&mut self, id: impl Into<RpcId>, method: impl Into<String>) -> Option<String> {
        self.methods.insert(id.into(), method.into())
    }

    pub fn unbind(&mut self, id: &RpcId) -> Option<String> {
        self.methods.remove(id)
    }

    /// Record an outgoing request; notifications are skipped
    ///
    /// Returns `true` if a binding was recorded.
    pub fn record_request(&mut self, request: &Request) -> bool {
        if request.is_notification() {
            return false;
        }
        self.bind(request.id().clone(), request.method());
        true
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn clear(&mut self) {
        self.methods.clear();
    }
}

impl BindingsProvider for MethodBindings {
    fn method_for(&self, id: &RpcId) -> Option<&str> {
        self.methods.get(id).map(String::as_str)
    }
}

impl FromIterator<(RpcId, String)> for MethodBindings {
    fn from_iter<I: IntoIterator<Item = (RpcId, String)>>(iter: I) -> Self {
        Self {
            methods: iter.into_iter().collect(),
        }
    }
}
