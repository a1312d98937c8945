//! Operations client against stub servers
//!
//! Request/response exchanges use wiremock. Subscriptions that must stay open
//! use a minimal chunked HTTP server so events can arrive before cancellation.

#![allow(non_snake_case)]

use opsgen_client::prelude::*;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

async fn next_within(sub: &mut Subscription) -> Option<ClientResponse> {
    tokio::time::timeout(WAIT, sub.next()).await.expect("subscription stalled")
}

fn data(value: serde_json::Value) -> ClientResponse {
    ClientResponse::success(Some(value))
}

async fn read_request(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let Ok(n) = socket.read(&mut chunk).await else { return };
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                return;
            }
        }
    }
}

/// Serve one streaming response: each event as its own chunk, then either
/// end the body or hold the connection open
async fn streaming_server(events: Vec<&'static str>, hold_open: bool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else { return };
        read_request(&mut socket).await;
        let _ = socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ntransfer-encoding: chunked\r\n\r\n")
            .await;
        for event in events {
            let payload = format!("{event}\n\n");
            let _ = socket
                .write_all(format!("{:x}\r\n{payload}\r\n", payload.len()).as_bytes())
                .await;
            let _ = socket.flush().await;
        }
        if hold_open {
            tokio::time::sleep(Duration::from_secs(30)).await;
        } else {
            let _ = socket.write_all(b"0\r\n\r\n").await;
        }
    });
    format!("http://{addr}")
}

// query / mutate

#[tokio::test]
async fn mutate___users_update___returns_data_without_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/operations/users/update"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "input": {"id": "1", "name": "Jens", "bio": "Founder"},
            "meta": {"clientRequestContext": {}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "1"}})))
        .expect(1)
        .mount(&server)
        .await;
    let client = OperationsClient::connect(&server.uri()).unwrap();

    let response = client
        .mutate(OperationRequest::new("users/update").with_input(json!({"id": "1", "name": "Jens", "bio": "Founder"})))
        .await;

    assert_eq!(response.error, None);
    assert_eq!(response.data, Some(json!({"id": "1"})));
}

#[tokio::test]
async fn query___without_input___omits_input_and_forwards_context() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/operations/users/me"))
        .and(body_json(json!({"meta": {"clientRequestContext": {"tenant": "acme"}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"name": "Jens"}})))
        .mount(&server)
        .await;
    let config = ClientConfig::new(&server.uri())
        .unwrap()
        .with_client_request_context(json!({"tenant": "acme"}));
    let client = OperationsClient::new(config);

    let response = client.query(OperationRequest::new("users/me")).await;

    assert_eq!(response, data(json!({"name": "Jens"})));
}

#[tokio::test]
async fn query___non_2xx___status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    let client = OperationsClient::connect(&server.uri()).unwrap();

    let response = client.query(OperationRequest::new("users/get")).await;

    assert_eq!(response.data, None);
    assert_eq!(
        response.error,
        Some(ClientError::Status {
            status: 500,
            body: "boom".into()
        })
    );
}

#[tokio::test]
async fn query___graphql_errors___upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errors": [{"message": "denied"}]})))
        .mount(&server)
        .await;
    let client = OperationsClient::connect(&server.uri()).unwrap();

    let response = client.query(OperationRequest::new("users/get")).await;

    assert!(matches!(response.error, Some(ClientError::Upstream { ref message, .. }) if message == "denied"));
}

#[tokio::test]
async fn query___undecodable_body___decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;
    let client = OperationsClient::connect(&server.uri()).unwrap();

    let response = client.query(OperationRequest::new("users/get")).await;

    assert!(matches!(response.error, Some(ClientError::Decode(_))));
}

#[tokio::test]
async fn query___empty_body___success_without_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let client = OperationsClient::connect(&server.uri()).unwrap();

    let response = client.mutate(OperationRequest::new("users/delete")).await;

    assert_eq!(response, ClientResponse::success(None));
}

#[tokio::test]
async fn query___connection_refused___network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = OperationsClient::connect(&format!("http://{addr}")).unwrap();

    let response = client.query(OperationRequest::new("users/get")).await;

    assert!(matches!(response.error, Some(ClientError::Network(_))));
}

#[tokio::test]
async fn query___abort_signal___aborted_promptly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {}}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;
    let client = OperationsClient::connect(&server.uri()).unwrap();
    let handle = AbortHandle::new();
    let request = OperationRequest::new("users/slow").with_abort(handle.signal());
    let started = Instant::now();

    let aborter = handle.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        aborter.abort();
    });
    let response = client.query(request).await;

    assert_eq!(response.error, Some(ClientError::Aborted));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn query___already_aborted___never_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let client = OperationsClient::connect(&server.uri()).unwrap();
    let handle = AbortHandle::new();
    handle.abort();

    let response = client
        .query(OperationRequest::new("users/get").with_abort(handle.signal()))
        .await;

    assert_eq!(response.error, Some(ClientError::Aborted));
}

// with_headers

#[tokio::test]
async fn with_headers___adds_headers_without_touching_original() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("x-tenant", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"ok": true}})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let client = OperationsClient::connect(&server.uri()).unwrap();
    let mut headers = HeaderMap::new();
    headers.insert("x-tenant", HeaderValue::from_static("acme"));

    let tenant_client = client.with_headers(headers);
    let with = tenant_client.query(OperationRequest::new("ping")).await;
    let without = client.query(OperationRequest::new("ping")).await;

    assert_eq!(with, data(json!({"ok": true})));
    assert!(matches!(without.error, Some(ClientError::Status { status: 401, .. })));
    assert!(client.headers().get("x-tenant").is_none());
}

// subscribe

#[tokio::test]
async fn subscribe___once___single_event_matching_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/operations/users/changed"))
        .and(query_param("wg_subscribe_once", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "1"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/operations/users/changed"))
        .and(query_param_is_missing("wg_subscribe_once"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "1"}})))
        .mount(&server)
        .await;
    let client = OperationsClient::connect(&server.uri()).unwrap();

    let direct = client.query(OperationRequest::new("users/changed")).await;
    let mut sub = client.subscribe(OperationRequest::new("users/changed").subscribe_once());

    assert_eq!(next_within(&mut sub).await, Some(direct));
    assert_eq!(next_within(&mut sub).await, None);
    assert_eq!(sub.state(), SubscriptionState::Completed);
}

#[tokio::test]
async fn subscribe___stream___yields_events_and_trailing_partial() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/operations/counter"))
        .and(query_param_is_missing("wg_live"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("{\"data\":{\"n\":1}}\n\n{\"data\":{\"n\":2}}\n\n{\"data\":{\"n\":3}}"),
        )
        .mount(&server)
        .await;
    let client = OperationsClient::connect(&server.uri()).unwrap();

    let mut sub = client.subscribe(OperationRequest::new("counter"));

    assert_eq!(next_within(&mut sub).await, Some(data(json!({"n": 1}))));
    assert_eq!(next_within(&mut sub).await, Some(data(json!({"n": 2}))));
    assert_eq!(next_within(&mut sub).await, Some(data(json!({"n": 3}))));
    assert_eq!(next_within(&mut sub).await, None);
    assert_eq!(sub.state(), SubscriptionState::Completed);
    assert_eq!(client.open_subscriptions(), 0);
}

#[tokio::test]
async fn subscribe___live_query___marks_wire_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/operations/users/get"))
        .and(query_param("wg_live", ""))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\":{\"name\":\"Jens\"}}\n\n"))
        .expect(1)
        .mount(&server)
        .await;
    let client = OperationsClient::connect(&server.uri()).unwrap();

    let mut sub = client.subscribe(OperationRequest::new("users/get").live_query());

    assert_eq!(next_within(&mut sub).await, Some(data(json!({"name": "Jens"}))));
    assert_eq!(next_within(&mut sub).await, None);
}

#[tokio::test]
async fn subscribe___non_2xx___single_error_event_then_completed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such operation"))
        .mount(&server)
        .await;
    let client = OperationsClient::connect(&server.uri()).unwrap();

    let mut sub = client.subscribe(OperationRequest::new("missing"));

    let event = next_within(&mut sub).await.unwrap();
    assert!(matches!(event.error, Some(ClientError::Status { status: 404, .. })));
    assert_eq!(next_within(&mut sub).await, None);
    assert_eq!(sub.state(), SubscriptionState::Completed);
}

#[tokio::test]
async fn subscribe___into_stream___collects_events() {
    use futures_util::StreamExt;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"data\":1}\n\n{\"data\":2}\n\n"))
        .mount(&server)
        .await;
    let client = OperationsClient::connect(&server.uri()).unwrap();

    let events: Vec<ClientResponse> = tokio::time::timeout(
        WAIT,
        client.subscribe(OperationRequest::new("numbers")).into_stream().collect(),
    )
    .await
    .unwrap();

    assert_eq!(events, vec![data(json!(1)), data(json!(2))]);
}

// cancellation

#[tokio::test]
async fn cancel_subscriptions___stops_open_streams_keeps_delivered_events() {
    let url = streaming_server(vec!["{\"data\":{\"n\":1}}"], true).await;
    let client = OperationsClient::connect(&url).unwrap();
    let mut sub = client.subscribe(OperationRequest::new("counter"));
    let first = next_within(&mut sub).await;
    assert_eq!(sub.state(), SubscriptionState::Streaming);

    let canceled = client.cancel_subscriptions();

    assert_eq!(canceled, 1);
    assert_eq!(next_within(&mut sub).await, None);
    assert_eq!(sub.state(), SubscriptionState::Canceled);
    assert_eq!(first, Some(data(json!({"n": 1}))));
    assert_eq!(client.open_subscriptions(), 0);
}

#[tokio::test]
async fn cancel_subscriptions___later_subscriptions_unaffected() {
    let held = streaming_server(vec![], true).await;
    let fresh = streaming_server(vec!["{\"data\":{\"n\":7}}"], false).await;
    let client = OperationsClient::connect(&held).unwrap();
    let mut old = client.subscribe(OperationRequest::new("counter"));

    client.cancel_subscriptions();
    let fresh_client = OperationsClient::connect(&fresh).unwrap();
    let mut new = client.subscribe(OperationRequest::new("counter"));
    let mut other = fresh_client.subscribe(OperationRequest::new("counter"));

    assert_eq!(next_within(&mut old).await, None);
    assert_eq!(new.state(), SubscriptionState::Pending);
    assert_eq!(client.open_subscriptions(), 1);
    assert_eq!(next_within(&mut other).await, Some(data(json!({"n": 7}))));
    new.cancel();
}

#[tokio::test]
async fn cancel_subscriptions___no_open_subscriptions___noop() {
    let client = OperationsClient::connect("http://localhost:9991").unwrap();

    assert_eq!(client.cancel_subscriptions(), 0);
}

#[tokio::test]
async fn Subscription___cancel___leaves_siblings_open() {
    let first_url = streaming_server(vec!["{\"data\":1}"], true).await;
    let second_url = streaming_server(vec!["{\"data\":2}"], true).await;
    let first_client = OperationsClient::connect(&first_url).unwrap();
    let second_client = OperationsClient::connect(&second_url).unwrap();
    let mut first = first_client.subscribe(OperationRequest::new("a"));
    let mut second = second_client.subscribe(OperationRequest::new("b"));
    next_within(&mut first).await;
    next_within(&mut second).await;

    first.cancel();

    assert_eq!(first.state(), SubscriptionState::Canceled);
    assert_eq!(second.state(), SubscriptionState::Streaming);
    second.cancel();
}

#[tokio::test]
async fn subscribe___caller_abort___cancels_stream() {
    let url = streaming_server(vec!["{\"data\":1}"], true).await;
    let client = OperationsClient::connect(&url).unwrap();
    let handle = AbortHandle::new();
    let mut sub = client.subscribe(OperationRequest::new("counter").with_abort(handle.signal()));
    next_within(&mut sub).await;

    handle.abort();

    assert_eq!(next_within(&mut sub).await, None);
    assert_eq!(sub.state(), SubscriptionState::Canceled);
}

#[test]
fn subscribe___outside_runtime___single_error_event_then_completed() {
    let client = OperationsClient::connect("http://127.0.0.1:9").unwrap();

    let mut sub = client.subscribe(OperationRequest::new("users/changed"));

    assert_eq!(sub.state(), SubscriptionState::Completed);
    assert_eq!(client.open_subscriptions(), 0);
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let first = runtime.block_on(sub.next()).unwrap();
    assert!(matches!(first.error, Some(ClientError::InvalidConfig(_))));
    assert!(runtime.block_on(sub.next()).is_none());
}
