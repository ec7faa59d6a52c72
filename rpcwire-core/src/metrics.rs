//! Codec metrics definitions
//!
//! OpenTelemetry instruments describing what the codec sees on the wire.
//! They are recorded only when a `CodecMetrics` is attached to the codec
//! with `RpcCodec::with_metrics`, and exported by whatever meter provider
//! the application installed (see `init_observability`).
//!
//! # Metrics Collected
//!
//! - **messages_total**: encode/decode calls (counter; `direction`,
//!   `message`, `status`)
//! - **batch_size**: number of items per call (histogram; `direction`)
//! - **item_failures_total**: batch items that failed to decode (counter;
//!   `error_kind`)
//! - **errors_total**: calls that failed as a whole (counter; `direction`,
//!   `error_kind`)
//!
//! # Examples
//!
//! ```rust
//! use rpcwire_core::{CodecMetrics, MethodSchema, RpcCodec};
//!
//! let codec = RpcCodec::new(&MethodSchema::new().with_method("ping"))
//!     .with_metrics(CodecMetrics::new());
//! let batch = codec.decode_requests(r#"{"jsonrpc":"2.0","method":"ping"}"#).unwrap();
//! assert_eq!(batch.len(), 1);
//! ```

use crate::error::ErrorKind;
use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Instrumentation scope name for all codec metrics
pub const METER_NAME: &str = "rpcwire";

/// Direction of a codec call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Decode,
    Encode,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Decode => "decode",
            Direction::Encode => "encode",
        }
    }
}

/// Codec metrics for monitoring
///
/// All metrics are prefixed with `rpcwire.codec.*`.
#[derive(Debug, Clone)]
pub struct CodecMetrics {
    /// Encode/decode calls
    pub messages_total: Counter<u64>,
    /// Items per call
    pub batch_size: Histogram<u64>,
    /// Batch items captured as per-item failures
    pub item_failures_total: Counter<u64>,
    /// Calls that failed as a whole
    pub errors_total: Counter<u64>,
}

impl Default for CodecMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecMetrics {
    /// Create instruments on the global meter provider
    pub fn new() -> Self {
        let meter = global::meter(METER_NAME);
        Self::new_with_meter(&meter)
    }

    /// Create instruments on a specific meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            messages_total: meter
                .u64_counter("rpcwire.codec.messages.total")
                .with_description("Total number of encode and decode calls")
                .build(),
            batch_size: meter
                .u64_histogram("rpcwire.codec.batch.size")
                .with_description("Number of messages handled per call")
                .build(),
            item_failures_total: meter
                .u64_counter("rpcwire.codec.item.failures.total")
                .with_description("Total number of batch items that failed to decode")
                .build(),
            errors_total: meter
                .u64_counter("rpcwire.codec.errors.total")
                .with_description("Total number of calls that failed as a whole")
                .build(),
        }
    }

    /// Record a completed call over `items` messages
    pub fn record_call(&self, direction: Direction, message: &str, items: usize) {
        let attributes = &[
            KeyValue::new("direction", direction.as_str()),
            KeyValue::new("message", message.to_string()),
            KeyValue::new("status", "success"),
        ];
        self.messages_total.add(1, attributes);
        self.batch_size
            .record(items as u64, &[KeyValue::new("direction", direction.as_str())]);
    }

    /// Record a batch item captured as a failure
    pub fn record_item_failure(&self, kind: ErrorKind) {
        self.item_failures_total
            .add(1, &[KeyValue::new("error_kind", kind.as_str())]);
    }

    /// Record a call that failed as a whole
    pub fn record_error(&self, direction: Direction, message: &str, kind: ErrorKind) {
        self.messages_total.add(
            1,
            &[
                KeyValue::new("direction", direction.as_str()),
                KeyValue::new("message", message.to_string()),
                KeyValue::new("status", "error"),
            ],
        );
        self.errors_total.add(
            1,
            &[
                KeyValue::new("direction", direction.as_str()),
                KeyValue::new("error_kind", kind.as_str()),
            ],
        );
    }
}
