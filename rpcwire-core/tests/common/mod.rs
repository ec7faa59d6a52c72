//! Shared fixtures for codec integration tests

#![allow(dead_code)]

use rpcwire_core::{MethodBindings, MethodSchema, RpcCodec};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtractParams {
    pub minuend: i64,
    pub subtrahend: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quota {
    pub limit: u32,
    pub used: u32,
}

/// Calculator-style schema used across the integration tests
///
/// - `sum`: positional `Vec<i64>` params, `i64` result
/// - `subtract`: named params, `i64` result, `Quota` error data
/// - `update`, `notify_hello`: untyped params, notifications only
/// - `rpc.ping`: no params, `String` result
pub fn calculator_schema() -> MethodSchema {
    MethodSchema::new()
        .with_method("sum")
        .with_method("subtract")
        .with_method("update")
        .with_method("notify_hello")
        .with_method("rpc.ping")
        .with_method("get_data")
        .bind_params::<Vec<i64>>("sum")
        .bind_result::<i64>("sum")
        .bind_params::<SubtractParams>("subtract")
        .bind_result::<i64>("subtract")
        .bind_error_data::<Quota>("subtract")
        .bind_params::<Value>("update")
        .bind_params::<Vec<i64>>("notify_hello")
        .bind_result::<String>("rpc.ping")
        .bind_result::<Value>("get_data")
        .bind_generic_error_data::<String>()
}

pub fn calculator_codec() -> RpcCodec {
    RpcCodec::new(&calculator_schema())
}

/// Bindings a client would hold after sending ids 1..=4
pub fn pending_calls() -> MethodBindings {
    let mut bindings = MethodBindings::new();
    bindings.bind(1, "sum");
    bindings.bind(2, "subtract");
    bindings.bind("ping-1", "rpc.ping");
    bindings.bind(4, "get_data");
    bindings
}

/// Parse encoder output back into a tree for order-independent comparison
pub fn parse(text: &str) -> Value {
    serde_json::from_str(text).expect("encoder produced invalid JSON")
}
