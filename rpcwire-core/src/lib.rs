//! Core JSON-RPC 2.0 types and codec for rpcwire
//!
//! This crate turns JSON-RPC 2.0 wire text into typed messages and back.
//! It includes:
//!
//! - **Identifiers**: `RpcId`, a four-way tagged message identifier
//! - **Types**: requests, responses and the per-item batch container
//! - **Schema**: `MethodSchema`, the caller's declaration of supported
//!   methods and their params/result/error-data types
//! - **Codec**: `RpcCodec`, the encode/decode engine
//! - **Error handling**: the codec error taxonomy and the wire-level `RpcError`
//! - **Observability**: `tracing` instrumentation, OpenTelemetry metrics and
//!   an optional OTLP pipeline
//!
//! # Architecture
//!
//! The crate is transport-agnostic: it never opens sockets or dispatches
//! calls. Payload types are chosen by the caller at runtime through the
//! schema, so the codec works on type-erased `Payload` values that callers
//! downcast to their concrete types.
//!
//! # Example
//!
//! ```rust
//! use rpcwire_core::{MethodSchema, ParamsType, RpcCodec, RpcId};
//! use serde_json::Value;
//!
//! let schema = MethodSchema::new()
//!     .with_method("update")
//!     .bind_params::<Value>("update");
//! let codec = RpcCodec::new(&schema);
//!
//! let batch = codec.decode_requests(
//!     r#"[{"jsonrpc":"2.0","method":"update","params":{"a":1}},
//!         {"jsonrpc":"2.0","method":"missing","id":"x"}]"#,
//! )?;
//!
//! assert!(batch.is_batch());
//! let update = batch.items()[0].as_ref().unwrap();
//! assert_eq!(update.id(), &RpcId::Absent);
//! assert_eq!(update.params_type()?, ParamsType::ByName);
//! assert!(batch.items()[1].is_err());
//! # Ok::<(), rpcwire_core::Error>(())
//! ```

pub mod bindings;
pub mod codec;
pub mod config;
pub mod error;
pub mod id;
pub mod metrics;
pub mod observability;
pub mod payload;
pub mod schema;
pub mod types;

pub use bindings::{BindingsProvider, MethodBindings};
pub use codec::{RpcCodec, PROTOCOL_VERSION};
pub use config::CodecConfig;
pub use error::{Error, ErrorKind, Result, RpcError};
pub use id::{IdKind, RpcId};
pub use metrics::{CodecMetrics, Direction};
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use payload::{Payload, PayloadValue};
pub use schema::{BindingKind, MethodSchema, TypeBinding};
pub use types::{is_system_method, BatchResult, ItemResult, ParamsType, Request, Response};
