//! Codec for JSON-RPC message serialization and deserialization
//!
//! `RpcCodec` converts between wire text and the typed message model. It
//! parses text into a `serde_json::Value` tree, walks the tree enforcing
//! every JSON-RPC 2.0 rule, and builds typed payloads through the caller's
//! `MethodSchema`. Encoding runs the same way in reverse.
//!
//! # Batches and Partial Failure
//!
//! Decoding always yields one outcome per wire item, in wire order. An item
//! that breaks a protocol rule (`ParseError`, `InvalidMessage`,
//! `InvalidMethod`) becomes a failed slot and the remaining items are still
//! decoded. A `GenericError` means the caller's configuration is broken, so
//! it aborts the whole call instead.
//!
//! Some rules apply to the batch as a whole and also abort the call:
//!
//! - an empty array is not a valid batch
//! - no two items may share a non-absent identifier of the same kind
//!   (integers and strings are tracked; notifications are exempt)
//!
//! # Responses and Bindings
//!
//! A response does not name its method. To type a `result` (or error
//! `data`), the codec asks a `BindingsProvider` which method produced the
//! response id. Empty text decodes to an empty batch: that is what a peer
//! sends back for a batch made only of notifications.
//!
//! # Sharing
//!
//! The codec holds only its own copy of the schema and configuration and
//! never mutates them, so one instance can serve any number of concurrent
//! callers.
//!
//! # Examples
//!
//! ```rust
//! use rpcwire_core::{MethodBindings, MethodSchema, Payload, Request, RpcCodec};
//!
//! let schema = MethodSchema::new()
//!     .with_method("sum")
//!     .bind_params::<Vec<i64>>("sum")
//!     .bind_result::<i64>("sum");
//! let codec = RpcCodec::new(&schema);
//!
//! // Server side: decode an incoming request
//! let incoming = r#"{"jsonrpc":"2.0","method":"sum","params":[1,2],"id":1}"#;
//! let requests = codec.decode_requests(incoming)?;
//! let request = requests.items()[0].as_ref().unwrap();
//! assert_eq!(request.params().and_then(|p| p.downcast_ref::<Vec<i64>>()), Some(&vec![1, 2]));
//!
//! // Client side: encode a request and remember its method
//! let outgoing = Request::new("sum", 2)?.with_params(Payload::new(vec![3_i64, 4]));
//! let text = codec.encode_request(&outgoing)?;
//! assert!(text.contains("\"sum\""));
//! let mut bindings = MethodBindings::new();
//! bindings.record_request(&outgoing);
//!
//! let responses = codec.decode_responses(r#"{"jsonrpc":"2.0","result":7,"id":2}"#, &bindings)?;
//! let response = responses.items()[0].as_ref().unwrap();
//! assert_eq!(response.result().and_then(|r| r.downcast_ref::<i64>()), Some(&7));
//! # Ok::<(), rpcwire_core::Error>(())
//! ```

use crate::bindings::BindingsProvider;
use crate::config::CodecConfig;
use crate::error::{Error, Result, RpcError};
use crate::id::RpcId;
use crate::metrics::{CodecMetrics, Direction};
use crate::payload::Payload;
use crate::schema::{BindingKind, MethodSchema, TypeBinding};
use crate::types::{BatchResult, ItemResult, ParamsType, Request, Response};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::hash::Hash;

/// Value of the `jsonrpc` member on every message
pub const PROTOCOL_VERSION: &str = "2.0";

/// Serializer and deserializer for JSON-RPC 2.0 messages
///
/// `RpcCodec::default()` has no schema: it can encode, but decoding any
/// message object fails with a `GenericError`.
#[derive(Debug, Clone, Default)]
pub struct RpcCodec {
    schema: Option<MethodSchema>,
    config: CodecConfig,
    metrics: Option<CodecMetrics>,
}

impl RpcCodec {
    /// Create a codec over a copy of `schema`
    ///
    /// Later changes to `schema` do not affect this codec.
    pub fn new(schema: &MethodSchema) -> Self {
        Self {
            schema: Some(schema.clone()),
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_metrics(mut self, metrics: CodecMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn schema(&self) -> Option<&MethodSchema> {
        self.schema.as_ref()
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode requests from wire text
    ///
    /// # Errors
    ///
    /// - `ParseError` if the text is not JSON
    /// - `InvalidMessage` for an empty or oversized batch, duplicate
    ///   identifiers, or a top-level value that is neither object nor array
    /// - `GenericError` for schema problems or payload conversion failures
    ///
    /// Everything else is reported per item inside the returned batch.
    #[tracing::instrument(level = "debug", skip(self, text), fields(len = text.len()))]
    pub fn decode_requests(&self, text: &str) -> Result<BatchResult<Request>> {
        let outcome = self.decode_batch(text, |object| self.decode_request(object));
        self.finish(Direction::Decode, "request", outcome, BatchResult::len)
    }

    /// Decode responses from wire text
    ///
    /// Empty text is the valid "no responses" case and yields an empty
    /// batch without parsing. Otherwise the same rules as
    /// `decode_requests` apply.
    #[tracing::instrument(level = "debug", skip(self, text, bindings), fields(len = text.len()))]
    pub fn decode_responses<B>(&self, text: &str, bindings: &B) -> Result<BatchResult<Response>>
    where
        B: BindingsProvider + ?Sized,
    {
        if text.is_empty() {
            return self.finish(
                Direction::Decode,
                "response",
                Ok(BatchResult::empty()),
                BatchResult::len,
            );
        }

        let outcome = self.decode_batch(text, |object| self.decode_response(object, bindings));
        self.finish(Direction::Decode, "response", outcome, BatchResult::len)
    }

    /// Encode a single request
    pub fn encode_request(&self, request: &Request) -> Result<String> {
        let outcome = self
            .request_to_json(request)
            .and_then(|value| self.render(&value));
        self.finish(Direction::Encode, "request", outcome, |_| 1)
    }

    /// Encode a batch of requests
    ///
    /// # Errors
    ///
    /// Returns a `GenericError` if the batch is empty, exceeds the
    /// configured limit, repeats an identifier, or a params value does not
    /// project to a JSON object or array.
    pub fn encode_requests(&self, requests: &[Request]) -> Result<String> {
        let outcome = if requests.is_empty() {
            Err(Error::generic("The batch is empty"))
        } else {
            self.encode_batch(requests, |request| self.request_to_json(request))
        };
        self.finish(Direction::Encode, "request", outcome, |_| requests.len())
    }

    /// Encode a single response
    pub fn encode_response(&self, response: &Response) -> Result<String> {
        let outcome = self
            .response_to_json(response)
            .and_then(|value| self.render(&value));
        self.finish(Direction::Encode, "response", outcome, |_| 1)
    }

    /// Encode a batch of responses
    ///
    /// An empty slice encodes to empty text, the counterpart of decoding
    /// empty text.
    pub fn encode_responses(&self, responses: &[Response]) -> Result<String> {
        let outcome = if responses.is_empty() {
            Ok(String::new())
        } else {
            self.encode_batch(responses, |response| self.response_to_json(response))
        };
        self.finish(Direction::Encode, "response", outcome, |_| responses.len())
    }

    fn decode_batch<T, F>(&self, text: &str, decode_item: F) -> Result<BatchResult<T>>
    where
        T: Identified,
        F: Fn(Map<String, Value>) -> Result<T>,
    {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| Error::parse("JSON string parsing error", e))?;

        match value {
            Value::Object(object) => {
                let item = self.capture(decode_item(object))?;
                Ok(BatchResult::single(item))
            }
            Value::Array(elements) => {
                if elements.is_empty() {
                    return Err(Error::invalid_message("The batch is empty"));
                }
                if self.config.exceeds_batch_limit(elements.len()) {
                    return Err(Error::invalid_message(batch_limit_message(
                        elements.len(),
                        &self.config,
                    )));
                }

                let total = elements.len();
                let mut seen = SeenIds::default();
                let mut items = Vec::with_capacity(total);

                for (index, element) in elements.into_iter().enumerate() {
                    let item = match element {
                        Value::Object(object) => self.capture(decode_item(object))?,
                        _ => self.capture(Err(Error::invalid_message(
                            "The batch item is not a message",
                        )))?,
                    };

                    if let Ok(message) = &item {
                        if !seen.insert(message.id(), total - index - 1) {
                            return Err(Error::invalid_message(duplicate_id_message(message.id())));
                        }
                    }

                    items.push(item);
                }

                Ok(BatchResult::batch(items))
            }
            _ => Err(Error::invalid_message("The message is neither an object nor an array")),
        }
    }

    /// Turn a per-item failure into a result slot, unless it is fatal
    fn capture<T>(&self, result: Result<T>) -> Result<ItemResult<T>> {
        match result {
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                tracing::warn!(error_kind = %e.kind(), error = %e, "Message rejected");
                if let Some(metrics) = &self.metrics {
                    metrics.record_item_failure(e.kind());
                }
                Ok(Err(e))
            }
            ok => Ok(ok),
        }
    }

    fn decode_request(&self, mut object: Map<String, Value>) -> Result<Request> {
        let schema = self.require_schema()?;
        check_protocol(&object, "request")?;

        let method = match object.remove("method") {
            Some(Value::String(method)) => method,
            Some(_) => {
                return Err(Error::invalid_message(
                    "The request has the method property with invalid type",
                ))
            }
            None => {
                return Err(Error::invalid_message(
                    "The request does not have the method property",
                ))
            }
        };
        if method.is_empty() {
            return Err(Error::invalid_message("The request has an empty method name"));
        }
        if !schema.supports(&method) {
            return Err(Error::invalid_method(format!(
                "The request method \"{}\" is not supported",
                method
            )));
        }

        let id = match object.remove("id") {
            None => RpcId::Absent,
            Some(value) => read_id(value).ok_or_else(|| {
                Error::invalid_message("The request has the identifier property with invalid type")
            })?,
        };

        let params = match object.remove("params") {
            None | Some(Value::Null) => None,
            Some(value) => {
                let shape = ParamsType::of(&value).ok_or_else(|| {
                    Error::invalid_message(
                        "The request has the parameters property with invalid type",
                    )
                })?;
                let binding = schema.resolve(BindingKind::Params, &method)?;
                Some((construct(binding, value)?, shape))
            }
        };

        Ok(Request::decoded(method, id, params))
    }

    fn decode_response<B>(&self, mut object: Map<String, Value>, bindings: &B) -> Result<Response>
    where
        B: BindingsProvider + ?Sized,
    {
        let schema = self.require_schema()?;
        check_protocol(&object, "response")?;

        let id = match object.remove("id") {
            None | Some(Value::Null) => RpcId::Absent,
            Some(value) => read_id(value).ok_or_else(|| {
                Error::invalid_message("The response has the identifier property with invalid type")
            })?,
        };

        match (object.remove("result"), object.remove("error")) {
            (None, None) => Err(Error::invalid_message(
                "The response has neither result nor error properties",
            )),
            (Some(_), Some(_)) => Err(Error::invalid_message(
                "The response has the result and error properties simultaneously",
            )),
            (Some(result), None) => {
                if id.is_absent() {
                    return Err(Error::invalid_message(
                        "The response has the result property but no identifier",
                    ));
                }
                let method = resolve_method(bindings, &id)?;
                let binding = schema.resolve(BindingKind::Result, method)?;
                let result = construct(binding, result)?;
                Ok(Response::success(id, result))
            }
            (None, Some(error)) => {
                let error = decode_error(schema, error, &id, bindings)?;
                Ok(Response::failure(id, error))
            }
        }
    }

    fn encode_batch<T, F>(&self, messages: &[T], to_json: F) -> Result<String>
    where
        T: Identified,
        F: Fn(&T) -> Result<Value>,
    {
        if self.config.exceeds_batch_limit(messages.len()) {
            return Err(Error::generic(batch_limit_message(messages.len(), &self.config)));
        }

        let mut seen = SeenIds::default();
        let mut array = Vec::with_capacity(messages.len());

        for (index, message) in messages.iter().enumerate() {
            if !seen.insert(message.id(), messages.len() - index - 1) {
                return Err(Error::generic(duplicate_id_message(message.id())));
            }
            array.push(to_json(message)?);
        }

        self.render(&Value::Array(array))
    }

    fn request_to_json(&self, request: &Request) -> Result<Value> {
        let mut object = Map::new();
        object.insert("jsonrpc".to_string(), Value::from(PROTOCOL_VERSION));
        object.insert("method".to_string(), Value::from(request.method()));

        if let Some(params) = request.params() {
            let value = deconstruct(params)?;
            // Shape is only known after projection
            if ParamsType::of(&value).is_none() {
                return Err(Error::generic(
                    "The request has the parameters property with invalid type",
                ));
            }
            object.insert("params".to_string(), value);
        }

        if !request.is_notification() {
            object.insert("id".to_string(), id_to_json(request.id())?);
        }

        Ok(Value::Object(object))
    }

    fn response_to_json(&self, response: &Response) -> Result<Value> {
        let mut object = Map::new();
        object.insert("jsonrpc".to_string(), Value::from(PROTOCOL_VERSION));

        match response.outcome() {
            Ok(result) => {
                object.insert("result".to_string(), deconstruct(result)?);
            }
            Err(error) => {
                object.insert("error".to_string(), error_to_json(error)?);
            }
        }

        // Always present on a response, null when uncorrelated
        object.insert("id".to_string(), id_to_json(response.id())?);

        Ok(Value::Object(object))
    }

    fn render(&self, value: &Value) -> Result<String> {
        let text = if self.config.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        text.map_err(|e| Error::generic_with_source("JSON string composition error", e))
    }

    fn require_schema(&self) -> Result<&MethodSchema> {
        self.schema
            .as_ref()
            .ok_or_else(|| Error::generic("The type schema is not defined"))
    }

    fn finish<T>(
        &self,
        direction: Direction,
        message: &'static str,
        outcome: Result<T>,
        count: impl FnOnce(&T) -> usize,
    ) -> Result<T> {
        match &outcome {
            Ok(value) => {
                let items = count(value);
                tracing::debug!(
                    direction = direction.as_str(),
                    message,
                    items,
                    "Codec call completed"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_call(direction, message, items);
                }
            }
            Err(e) => {
                tracing::warn!(
                    direction = direction.as_str(),
                    message,
                    error_kind = %e.kind(),
                    error = %e,
                    "Codec call failed"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_error(direction, message, e.kind());
                }
            }
        }
        outcome
    }
}

/// Messages that carry an identifier, for batch duplicate checks
trait Identified {
    fn id(&self) -> &RpcId;
}

impl Identified for Request {
    fn id(&self) -> &RpcId {
        Request::id(self)
    }
}

impl Identified for Response {
    fn id(&self) -> &RpcId {
        Response::id(self)
    }
}

/// Identifiers seen so far in one batch
///
/// A set for a kind is only allocated once a later item could repeat it.
#[derive(Debug, Default)]
struct SeenIds {
    integers: Option<HashSet<i64>>,
    strings: Option<HashSet<String>>,
}

impl SeenIds {
    /// Returns `false` if `id` was already seen; `remaining` counts the
    /// items after this one
    fn insert(&mut self, id: &RpcId, remaining: usize) -> bool {
        match id {
            RpcId::Integer(value) => track(&mut self.integers, *value, remaining),
            RpcId::String(value) => track(&mut self.strings, value.clone(), remaining),
            RpcId::Absent | RpcId::Float(_) => true,
        }
    }
}

fn track<K: Eq + Hash>(seen: &mut Option<HashSet<K>>, key: K, remaining: usize) -> bool {
    if let Some(set) = seen.as_mut() {
        return set.insert(key);
    }
    if remaining > 0 {
        *seen = Some(HashSet::from([key]));
    }
    true
}

fn check_protocol(object: &Map<String, Value>, message: &str) -> Result<()> {
    match object.get("jsonrpc") {
        Some(Value::String(version)) if version == PROTOCOL_VERSION => Ok(()),
        Some(Value::String(_)) => Err(Error::invalid_message(format!(
            "The {} has an invalid protocol version",
            message
        ))),
        Some(_) => Err(Error::invalid_message(format!(
            "The {} has the protocol property with invalid type",
            message
        ))),
        None => Err(Error::invalid_message(format!(
            "The {} does not have the protocol property",
            message
        ))),
    }
}

/// Read a wire identifier; `None` for values that cannot be one
fn read_id(value: Value) -> Option<RpcId> {
    match value {
        Value::String(text) => Some(RpcId::String(text)),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => Some(RpcId::Integer(integer)),
            // Integers beyond i64 are rejected rather than rounded
            None if number.is_f64() => number
                .as_f64()
                .filter(|value| !is_rounded_integer(*value))
                .map(RpcId::Float),
            None => None,
        },
        _ => None,
    }
}

/// Whether a parsed float is an integer literal that did not fit in `i64`
///
/// serde_json reads integers above `u64::MAX` or below `i64::MIN` as `f64`.
fn is_rounded_integer(value: f64) -> bool {
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
    value.fract() == 0.0 && !(-I64_BOUND..I64_BOUND).contains(&value)
}

fn id_to_json(id: &RpcId) -> Result<Value> {
    match id {
        RpcId::Absent => Ok(Value::Null),
        RpcId::Integer(value) => Ok(Value::from(*value)),
        RpcId::Float(value) => serde_json::Number::from_f64(*value)
            .map(Value::Number)
            .ok_or_else(|| {
                Error::generic(format!(
                    "The identifier \"{}\" cannot be represented in JSON",
                    id
                ))
            }),
        RpcId::String(value) => Ok(Value::from(value.as_str())),
    }
}

fn decode_error<B>(
    schema: &MethodSchema,
    value: Value,
    id: &RpcId,
    bindings: &B,
) -> Result<RpcError>
where
    B: BindingsProvider + ?Sized,
{
    let Value::Object(mut object) = value else {
        return Err(Error::invalid_message(
            "The response has the error property with invalid type",
        ));
    };

    let code = match object.get("code") {
        Some(Value::Number(number)) => number.as_i64().ok_or_else(|| {
            Error::invalid_message("The response has the error code property with invalid type")
        })?,
        Some(_) => {
            return Err(Error::invalid_message(
                "The response has the error code property with invalid type",
            ))
        }
        None => {
            return Err(Error::invalid_message(
                "The response does not have the error code property",
            ))
        }
    };

    let message = match object.remove("message") {
        Some(Value::String(message)) => message,
        Some(_) => {
            return Err(Error::invalid_message(
                "The response has the error message property with invalid type",
            ))
        }
        None => {
            return Err(Error::invalid_message(
                "The response does not have the error message property",
            ))
        }
    };

    let data = match object.remove("data") {
        None | Some(Value::Null) => None,
        Some(data) => {
            // Without an id there is no request to correlate with
            let binding = if id.is_absent() {
                schema.resolve_generic_error_data()?
            } else {
                let method = resolve_method(bindings, id)?;
                schema.resolve(BindingKind::ErrorData, method)?
            };
            Some(construct(binding, data)?)
        }
    };

    Ok(RpcError {
        code,
        message,
        data,
    })
}

fn error_to_json(error: &RpcError) -> Result<Value> {
    let mut object = Map::new();
    object.insert("code".to_string(), Value::from(error.code));
    object.insert("message".to_string(), Value::from(error.message.as_str()));
    if let Some(data) = &error.data {
        object.insert("data".to_string(), deconstruct(data)?);
    }
    Ok(Value::Object(object))
}

fn resolve_method<'a, B>(bindings: &'a B, id: &RpcId) -> Result<&'a str>
where
    B: BindingsProvider + ?Sized,
{
    match bindings.method_for(id) {
        Some("") => Err(Error::generic(format!(
            "Invalid method binding for the response with the \"{}\" identifier",
            id
        ))),
        Some(method) => Ok(method),
        None => Err(Error::generic(format!(
            "There is no method binding for the response with the \"{}\" identifier",
            id
        ))),
    }
}

fn construct(binding: &TypeBinding, value: Value) -> Result<Payload> {
    binding.decode(value).map_err(|e| {
        Error::generic_with_source(
            format!("Object construction error for {}", binding.type_name()),
            e,
        )
    })
}

fn deconstruct(payload: &Payload) -> Result<Value> {
    payload.to_json().map_err(|e| {
        Error::generic_with_source(
            format!("Object deconstruction error for {}", payload.type_name()),
            e,
        )
    })
}

fn duplicate_id_message(id: &RpcId) -> String {
    format!(
        "The batch contains messages with the same identifier: \"{}\"",
        id
    )
}

fn batch_limit_message(size: usize, config: &CodecConfig) -> String {
    format!(
        "Batch size limit exceeded: limit={}, actual={}",
        config.max_batch_size.unwrap_or_default(),
        size
    )
}
