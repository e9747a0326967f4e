//! # httpmediator
//!
//! Mediator-style request dispatch for HTTP services on the `may` coroutine
//! runtime.
//!
//! ## Overview
//!
//! A request flows through four pieces:
//!
//! 1. **[`router`]** matches method + path to a handler name and extracts
//!    path parameters (`/products/{productId:int}`)
//! 2. **[`dispatcher`]** sends the request to the coroutine registered under
//!    that name and waits for its reply
//! 3. **[`typed`]** binds the raw request into the handler's input type
//!    (any type marked [`request::HttpRequest`]), calls the handler, and
//!    translates the returned envelope
//! 4. **[`server`]** writes the result with `may_minihttp`
//!
//! Handlers never touch the wire. They return an
//! [`HttpResponse`](response::HttpResponse) envelope built with helpers
//! such as [`ok_with`](response::ok_with) or
//! [`not_found`](response::not_found):
//!
//! | Envelope | Wire |
//! |---|---|
//! | failure (error message set) | envelope status, message as `text/plain` |
//! | success with a model | envelope status, model as `application/json` |
//! | success without a model | envelope status, empty body |
//!
//! ## Example
//!
//! ```rust,no_run
//! use httpmediator::cancellation::CancellationToken;
//! use httpmediator::dispatcher::{Dispatcher, HandlerRequest};
//! use httpmediator::request::HttpRequest;
//! use httpmediator::response::{no_content, not_found, UntypedResponse};
//! use httpmediator::router::{parse_routes, Router};
//! use httpmediator::server::{AppService, HttpServer};
//! use httpmediator::typed::HttpHandler;
//!
//! struct DeleteItem { id: i64 }
//!
//! impl TryFrom<HandlerRequest> for DeleteItem {
//!     type Error = anyhow::Error;
//!     fn try_from(req: HandlerRequest) -> anyhow::Result<Self> {
//!         Ok(Self { id: req.path_param_as("id")? })
//!     }
//! }
//! impl HttpRequest for DeleteItem {}
//!
//! struct DeleteItemHandler;
//!
//! impl HttpHandler for DeleteItemHandler {
//!     type Request = DeleteItem;
//!     type Model = serde_json::Value;
//!     fn handle(&self, input: DeleteItem, _cancel: &CancellationToken) -> UntypedResponse {
//!         if input.id == 0 { not_found() } else { no_content() }
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! let routes = parse_routes("routes:\n  - method: DELETE\n    path: /items/{id:int}\n    handler: delete_item\n")?;
//! let mut dispatcher = Dispatcher::new();
//! unsafe { dispatcher.register_typed("delete_item", DeleteItemHandler) };
//! let service = AppService::new(Router::new(routes)?, dispatcher);
//! HttpServer(service).start("0.0.0.0:8080")?.join().ok();
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! - [`runtime_config`]: coroutine stack size (`HTTPMED_STACK_SIZE`)
//! - [`logging`]: `tracing` subscriber setup (`HTTPMED_LOG_*`)

pub mod cancellation;
pub mod cli;
pub mod dispatcher;
mod echo;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod request;
pub mod response;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod typed;

pub use cancellation::CancellationToken;
pub use dispatcher::{Dispatcher, HandlerRequest, HandlerResponse, ResponseBody};
pub use request::HttpRequest;
pub use response::{HttpResponse, UntypedResponse};
pub use router::{RouteMeta, Router};
pub use typed::HttpHandler;
