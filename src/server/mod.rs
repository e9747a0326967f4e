//! HTTP front end on `may_minihttp`.
//!
//! [`AppService`] parses each request, answers `GET /health` itself, routes
//! everything else through the [`Router`](crate::router::Router) and the
//! [`Dispatcher`](crate::dispatcher::Dispatcher), and writes the reply.
//! Route misses are a JSON 404; a route whose handler is not registered is
//! a JSON 500.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_json_body, parse_query_params, parse_request, ParsedRequest};
pub use response::{
    status_forbids_body, write_handler_response, write_json_error, MAX_INTERNED_HEADER_LINES,
};
pub use service::{health_endpoint, AppService};
