//! Request and response encoding integration tests

mod common;

use common::{calculator_codec, calculator_schema, parse, Quota, SubtractParams};
use rpcwire_core::{
    CodecConfig, ErrorKind, MethodBindings, ParamsType, Payload, Request, Response, RpcCodec,
    RpcError, RpcId,
};
use serde::Serialize;
use serde_json::json;

#[test]
fn test_encode_request() {
    let codec = calculator_codec();
    let request = Request::new("subtract", 1)
        .unwrap()
        .with_params(Payload::new(SubtractParams {
            minuend: 42,
            subtrahend: 23,
        }));

    let text = codec.encode_request(&request).unwrap();

    assert_eq!(
        parse(&text),
        json!({
            "jsonrpc": "2.0",
            "method": "subtract",
            "params": {"minuend": 42, "subtrahend": 23},
            "id": 1
        })
    );
}

#[test]
fn test_notification_never_emits_id() {
    let codec = calculator_codec();
    let request = Request::notification("update")
        .unwrap()
        .with_params(Payload::new(json!([1, 2, 3])));

    let value = parse(&codec.encode_request(&request).unwrap());

    assert!(value.get("id").is_none());
    assert_eq!(value["params"], json!([1, 2, 3]));
}

#[test]
fn test_request_without_params_omits_member() {
    let codec = RpcCodec::default();
    let request = Request::new("rpc.ping", "p").unwrap();

    let value = parse(&codec.encode_request(&request).unwrap());

    assert_eq!(value, json!({"jsonrpc": "2.0", "method": "rpc.ping", "id": "p"}));
}

#[test]
fn test_params_shape_checked_after_projection() {
    #[derive(Debug, Serialize)]
    struct Scalar(i64);

    let codec = calculator_codec();
    let request = Request::new("sum", 1).unwrap().with_params(Payload::new(Scalar(3)));

    let error = codec.encode_request(&request).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::GenericError);
    assert_eq!(
        error.to_string(),
        "The request has the parameters property with invalid type"
    );
    assert!(request.params_type().is_err());

    let error = codec.encode_requests(&[request]).unwrap_err();
    assert!(error.is_fatal());
}

#[test]
fn test_encode_request_batch() {
    let codec = calculator_codec();
    let requests = vec![
        Request::new("sum", 1).unwrap().with_params(Payload::new(vec![1_i64, 2, 4])),
        Request::notification("notify_hello")
            .unwrap()
            .with_params(Payload::new(vec![7_i64])),
        Request::new("rpc.ping", "ping-1").unwrap(),
    ];

    let value = parse(&codec.encode_requests(&requests).unwrap());

    assert_eq!(
        value,
        json!([
            {"jsonrpc": "2.0", "method": "sum", "params": [1, 2, 4], "id": 1},
            {"jsonrpc": "2.0", "method": "notify_hello", "params": [7]},
            {"jsonrpc": "2.0", "method": "rpc.ping", "id": "ping-1"}
        ])
    );
}

#[test]
fn test_empty_request_batch_fails() {
    let codec = calculator_codec();

    let error = codec.encode_requests(&[]).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::GenericError);
    assert_eq!(error.to_string(), "The batch is empty");
}

#[test]
fn test_duplicate_ids_fail_encode() {
    let codec = calculator_codec();

    let requests = vec![
        Request::new("rpc.ping", "a").unwrap(),
        Request::notification("update").unwrap(),
        Request::notification("update").unwrap(),
        Request::new("rpc.ping", "a").unwrap(),
    ];
    let error = codec.encode_requests(&requests).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::GenericError);
    assert!(error.to_string().contains("\"a\""));

    let responses = vec![
        Response::success(7, Payload::new(1_i64)),
        Response::failure(7, RpcError::internal_error("boom")),
    ];
    let error = codec.encode_responses(&responses).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::GenericError);

    // Integer 1 and string "1" never collide
    let requests = vec![
        Request::new("rpc.ping", 1).unwrap(),
        Request::new("rpc.ping", "1").unwrap(),
    ];
    assert!(codec.encode_requests(&requests).is_ok());
}

#[test]
fn test_encode_success_response() {
    let codec = calculator_codec();

    let value = parse(&codec.encode_response(&Response::success(1, Payload::new(19_i64))).unwrap());

    assert_eq!(value, json!({"jsonrpc": "2.0", "result": 19, "id": 1}));
}

#[test]
fn test_absent_response_id_emits_null() {
    let codec = calculator_codec();
    let response = Response::failure(RpcId::Absent, RpcError::parse_error());

    let text = codec.encode_response(&response).unwrap();
    let value = parse(&text);

    assert_eq!(value["id"], serde_json::Value::Null);
    assert!(value.as_object().unwrap().contains_key("id"));
    assert_eq!(value["error"]["code"], json!(-32700));
    assert!(value["error"].get("data").is_none());
}

#[test]
fn test_encode_error_with_data() {
    let codec = calculator_codec();
    let error = RpcError::with_data(
        1001,
        "Quota exceeded",
        Payload::new(Quota {
            limit: 10,
            used: 10,
        }),
    );

    let value = parse(&codec.encode_response(&Response::failure(2, error)).unwrap());

    assert_eq!(
        value,
        json!({
            "jsonrpc": "2.0",
            "error": {"code": 1001, "message": "Quota exceeded", "data": {"limit": 10, "used": 10}},
            "id": 2
        })
    );
}

#[test]
fn test_empty_response_batch_is_empty_text() {
    let codec = calculator_codec();

    assert_eq!(codec.encode_responses(&[]).unwrap(), "");

    // And back again
    let decoded = codec.decode_responses("", &MethodBindings::new()).unwrap();
    assert!(decoded.is_empty());
}

#[test]
fn test_encode_response_batch() {
    let codec = calculator_codec();
    let responses = vec![
        Response::success(1, Payload::new(7_i64)),
        Response::success("ping-1", Payload::new("pong".to_string())),
        Response::failure(
            RpcId::Absent,
            RpcError::invalid_request("The batch item is not a message"),
        ),
    ];

    let value = parse(&codec.encode_responses(&responses).unwrap());

    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["result"], json!(7));
    assert_eq!(items[1]["id"], json!("ping-1"));
    assert_eq!(items[2]["id"], serde_json::Value::Null);
    assert_eq!(items[2]["error"]["code"], json!(-32600));
}

#[test]
fn test_float_ids() {
    let codec = RpcCodec::new(&calculator_schema());

    let text = codec.encode_request(&Request::new("rpc.ping", 2.5).unwrap()).unwrap();
    assert_eq!(parse(&text)["id"], json!(2.5));

    let decoded = codec.decode_requests(&text).unwrap();
    assert_eq!(decoded.items()[0].as_ref().unwrap().id(), &RpcId::from(2.5));

    let error = codec
        .encode_request(&Request::new("rpc.ping", f64::INFINITY).unwrap())
        .unwrap_err();
    assert!(error.is_fatal());
}

#[test]
fn test_batch_size_limit_on_encode() {
    let codec = calculator_codec().with_config(CodecConfig::new().with_max_batch_size(1));
    let requests = vec![
        Request::notification("update").unwrap(),
        Request::notification("update").unwrap(),
    ];

    let error = codec.encode_requests(&requests).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::GenericError);
    assert!(codec.encode_requests(&requests[..1]).is_ok());
}

#[test]
fn test_pretty_output() {
    let codec = calculator_codec().with_config(CodecConfig::new().with_pretty(true));
    let response = Response::success(1, Payload::new(19_i64));

    let text = codec.encode_response(&response).unwrap();

    assert!(text.contains('\n'));
    assert_eq!(parse(&text), json!({"jsonrpc": "2.0", "result": 19, "id": 1}));
}

#[test]
fn test_client_server_exchange() {
    let codec = calculator_codec();

    // Client
    let calls = vec![
        Request::new("sum", 1).unwrap().with_params(Payload::new(vec![1_i64, 2, 3])),
        Request::new("subtract", 2).unwrap().with_params(Payload::new(SubtractParams {
            minuend: 5,
            subtrahend: 9,
        })),
        Request::notification("update").unwrap().with_params(Payload::new(json!({"x": 1}))),
    ];
    let mut bindings = MethodBindings::new();
    for call in &calls {
        bindings.record_request(call);
    }
    assert_eq!(bindings.len(), 2);
    let wire = codec.encode_requests(&calls).unwrap();

    // Server
    let incoming = codec.decode_requests(&wire).unwrap();
    let mut replies = Vec::new();
    for item in &incoming {
        let request = item.as_ref().unwrap();
        if request.is_notification() {
            continue;
        }
        let reply = match request.method() {
            "sum" => {
                let values = request.params().and_then(|p| p.downcast_ref::<Vec<i64>>()).unwrap();
                Response::success(request.id().clone(), Payload::new(values.iter().sum::<i64>()))
            }
            _ => {
                assert_eq!(request.params_type().unwrap(), ParamsType::ByName);
                Response::failure(
                    request.id().clone(),
                    RpcError::with_data(
                        1001,
                        "Quota exceeded",
                        Payload::new(Quota { limit: 1, used: 1 }),
                    ),
                )
            }
        };
        replies.push(reply);
    }
    let wire = codec.encode_responses(&replies).unwrap();

    // Client
    let responses = codec.decode_responses(&wire, &bindings).unwrap();
    assert_eq!(responses.len(), 2);
    let sum = responses.items()[0].as_ref().unwrap();
    assert_eq!(sum.result().and_then(|r| r.downcast_ref::<i64>()), Some(&6));
    let failed = responses.items()[1].as_ref().unwrap();
    assert_eq!(
        failed.error().and_then(|e| e.data.as_ref()).and_then(|d| d.downcast_ref::<Quota>()),
        Some(&Quota { limit: 1, used: 1 })
    );
}
