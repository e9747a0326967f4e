//! End-to-end tests over TCP against the product store service.

use http::Method;
use httpmediator::cli::echo_dispatcher;
use httpmediator::dispatcher::{HandlerRequest, HandlerResponse};
use httpmediator::middleware::Middleware;
use httpmediator::response::NOT_FOUND_MESSAGE;
use httpmediator::router::{RouteMeta, Router};
use httpmediator::server::AppService;
use product_store::handlers::order_product::CONFLICT_MESSAGE;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

mod common;
use common::http::request;
use common::test_server::{setup_may_runtime, TestServer};

fn product_store() -> TestServer {
    setup_may_runtime();
    let routes = product_store::routes().unwrap();
    TestServer::start(product_store::build_service(routes).unwrap())
}

#[test]
fn test_get_product() {
    let server = product_store();
    let resp = request(&server.addr, "GET", "/products/1", None);
    assert_eq!(resp.status, 200);
    assert!(resp.header("content-type").unwrap().starts_with("application/json"));
    assert_eq!(resp.json(), json!({"id": 1, "name": "Product #1"}));
}

#[test]
fn test_get_unknown_product() {
    let server = product_store();
    let resp = request(&server.addr, "GET", "/products/0", None);
    assert_eq!(resp.status, 404);
    assert!(resp.header("content-type").unwrap().starts_with("text/plain"));
    assert_eq!(resp.body, NOT_FOUND_MESSAGE);
}

#[test]
fn test_order_conflict() {
    let server = product_store();
    let body = r#"{"productId":1,"causeConflict":true,"includeModel":true}"#;
    let resp = request(&server.addr, "POST", "/orders", Some(body));
    assert_eq!(resp.status, 409);
    assert_eq!(resp.body, CONFLICT_MESSAGE);

    let body = r#"{"productId":1,"causeConflict":true}"#;
    let resp = request(&server.addr, "POST", "/orders", Some(body));
    assert_eq!(resp.status, 409);
    assert!(resp.header("content-type").unwrap().starts_with("text/plain"));
    assert_eq!(resp.body, CONFLICT_MESSAGE);
}

#[test]
fn test_order_created_without_model() {
    let server = product_store();
    let body = r#"{"productId":1,"causeConflict":false,"includeModel":false}"#;
    let resp = request(&server.addr, "POST", "/orders", Some(body));
    assert_eq!(resp.status, 201);
    assert!(resp.body.is_empty());
    assert!(resp.header("content-type").is_none());
}

#[test]
fn test_order_created_with_model() {
    let server = product_store();
    let body = r#"{"productId":1,"causeConflict":false,"includeModel":true}"#;
    let resp = request(&server.addr, "POST", "/orders", Some(body));
    assert_eq!(resp.status, 201);
    assert_eq!(resp.json(), json!({"orderId": 2}));
}

#[test]
fn test_order_unknown_product() {
    let server = product_store();
    let resp = request(&server.addr, "POST", "/orders", Some(r#"{"productId":0}"#));
    assert_eq!(resp.status, 404);
    assert_eq!(resp.body, NOT_FOUND_MESSAGE);
}

#[test]
fn test_order_malformed_body() {
    let server = product_store();
    let resp = request(&server.addr, "POST", "/orders", Some("{not json"));
    assert_eq!(resp.status, 400);
    assert_eq!(resp.json()["error"], "Invalid request data");
}

#[test]
fn test_delete_product() {
    let server = product_store();
    let resp = request(&server.addr, "DELETE", "/products/1", None);
    assert_eq!(resp.status, 204);
    assert!(resp.body.is_empty());

    let resp = request(&server.addr, "DELETE", "/products/0", None);
    assert_eq!(resp.status, 404);
    assert_eq!(resp.body, NOT_FOUND_MESSAGE);
}

#[test]
fn test_health_endpoint() {
    let server = product_store();
    let resp = request(&server.addr, "GET", "/health", None);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json(), json!({"status": "ok"}));
}

#[test]
fn test_route_miss_is_json_404() {
    let server = product_store();
    let resp = request(&server.addr, "GET", "/nowhere", None);
    assert_eq!(resp.status, 404);
    assert_eq!(
        resp.json(),
        json!({"error": "Not Found", "method": "GET", "path": "/nowhere"})
    );

    // Non-integer id does not match the int constraint
    let resp = request(&server.addr, "GET", "/products/abc", None);
    assert_eq!(resp.status, 404);
    assert_eq!(resp.json()["error"], "Not Found");

    // Neither does an integer outside the 32-bit range
    let resp = request(&server.addr, "GET", "/products/99999999999", None);
    assert_eq!(resp.status, 404);
    assert_eq!(resp.json()["error"], "Not Found");
}

#[test]
fn test_unregistered_handler_is_500() {
    setup_may_runtime();
    let routes = vec![RouteMeta::new(Method::GET, "/orphan", "orphan")];
    let service = product_store::build_service(routes).unwrap();
    let server = TestServer::start(service);

    let resp = request(&server.addr, "GET", "/orphan", None);
    assert_eq!(resp.status, 500);
    assert_eq!(resp.json()["error"], "Handler failed or not registered");
}

#[test]
fn test_echo_service_reflects_request() {
    setup_may_runtime();
    let routes = vec![RouteMeta::new(Method::POST, "/things/{id}", "create_thing")];
    let dispatcher = echo_dispatcher(&routes);
    let service = AppService::new(Router::new(routes).unwrap(), dispatcher);
    let server = TestServer::start(service);

    let resp = request(&server.addr, "POST", "/things/7?verbose=true", Some(r#"{"a":1}"#));
    assert_eq!(resp.status, 200);
    let body = resp.json();
    assert_eq!(body["handler"], "create_thing");
    assert_eq!(body["params"]["id"], "7");
    assert_eq!(body["query"]["verbose"], "true");
    assert_eq!(body["body"], json!({"a": 1}));
}

struct ServedBy;

impl Middleware for ServedBy {
    fn after(&self, _req: &HandlerRequest, res: &mut HandlerResponse, _latency: Duration) {
        res.set_header("x-served-by", "echo".to_string());
    }
}

#[test]
fn test_handler_headers_reach_the_wire() {
    setup_may_runtime();
    let routes = vec![RouteMeta::new(Method::GET, "/things/{id}", "get_thing")];
    let mut dispatcher = echo_dispatcher(&routes);
    dispatcher.add_middleware(Arc::new(ServedBy));
    let service = AppService::new(Router::new(routes).unwrap(), dispatcher);
    let server = TestServer::start(service);

    for id in 0..3 {
        let resp = request(&server.addr, "GET", &format!("/things/{id}"), None);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("x-served-by"), Some("echo"));
    }
}
