//! rpcwire - schema-driven JSON-RPC 2.0 message codec
//!
//! This is the convenience crate over `rpcwire-core`. It re-exports the
//! whole core crate as `rpcwire::core` and its commonly used items at the
//! root.
//!
//! # Quick Start
//!
//! ```rust
//! use rpcwire::{MethodBindings, MethodSchema, Payload, Request, RpcCodec, RpcError};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct AddParams {
//!     a: i64,
//!     b: i64,
//! }
//!
//! let schema = MethodSchema::new()
//!     .with_method("add")
//!     .bind_params::<AddParams>("add")
//!     .bind_result::<i64>("add")
//!     .bind_error_data::<String>("add");
//! let codec = RpcCodec::new(&schema);
//!
//! // Client: encode a call and remember which method id 1 belongs to
//! let request = Request::new("add", 1)?.with_params(Payload::new(AddParams { a: 5, b: 3 }));
//! let wire = codec.encode_request(&request)?;
//! let mut pending = MethodBindings::new();
//! pending.record_request(&request);
//!
//! // Server: decode it
//! let incoming = codec.decode_requests(&wire)?;
//! let call = incoming.items()[0].as_ref().unwrap();
//! let params = call.params().and_then(|p| p.downcast_ref::<AddParams>()).unwrap();
//! assert_eq!(params.a + params.b, 8);
//!
//! // Client: decode an error reply
//! let reply = r#"{"jsonrpc":"2.0","id":1,
//!     "error":{"code":-32602,"message":"Invalid params","data":"b"}}"#;
//! let responses = codec.decode_responses(reply, &pending)?;
//! let error = responses.items()[0].as_ref().unwrap().error().unwrap();
//! assert_eq!(error.code, RpcError::INVALID_PARAMS);
//! # Ok::<(), rpcwire::Error>(())
//! ```

pub use rpcwire_core as core;

pub use rpcwire_core::{
    init_observability, is_system_method, shutdown_observability, BatchResult, BindingKind,
    BindingsProvider, CodecConfig, CodecMetrics, Error, ErrorKind, IdKind, ItemResult,
    MethodBindings, MethodSchema, ObservabilityConfig, ParamsType, Payload, Request, Response,
    Result, RpcCodec, RpcError, RpcId, TypeBinding,
};
