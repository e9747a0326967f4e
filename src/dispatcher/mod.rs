//! # Dispatcher Module
//!
//! The mediator between the HTTP layer and handlers. Each registered handler
//! runs in its own `may` coroutine and receives [`HandlerRequest`]s over an
//! MPSC channel; the reply travels back on a per-request channel.
//!
//! ## Request Flow
//!
//! 1. Router matches the incoming request to a handler name
//! 2. [`Dispatcher::dispatch`] looks the handler up and runs middleware `before` hooks
//! 3. The request is sent to the handler coroutine
//! 4. The handler replies with a [`HandlerResponse`]
//! 5. Middleware `after` hooks run and the response goes back to the server
//!
//! ## Error Handling
//!
//! - Unknown handler names yield `None`; the server answers 500
//! - Handler panics are caught and answered with a 500 JSON body
//! - A closed handler channel is answered with a 503
//!
//! ```rust
//! use httpmediator::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
//! use httpmediator::ids::RequestId;
//! use httpmediator::router::{RouteMeta, Router};
//! use http::Method;
//!
//! # httpmediator::runtime_config::RuntimeConfig::default().apply();
//! let router = Router::new(vec![RouteMeta::new(Method::GET, "/ping", "ping")]).unwrap();
//! let mut dispatcher = Dispatcher::new();
//! unsafe {
//!     dispatcher.register_handler("ping", |req: HandlerRequest| {
//!         let _ = req.reply_tx.send(HandlerResponse::text(200, "pong"));
//!     });
//! }
//!
//! let matched = router.route(Method::GET, "/ping").unwrap();
//! let resp = dispatcher
//!     .dispatch(matched, None, Default::default(), RequestId::new())
//!     .unwrap();
//! assert_eq!(resp.status, 200);
//! assert_eq!(resp.body.as_text(), Some("pong"));
//! ```

mod core;

pub(crate) use self::core::spawn_handler;
pub use self::core::{
    Dispatcher, HandlerRequest, HandlerResponse, HandlerSender, HeaderVec, ResponseBody,
    MAX_INLINE_HEADERS,
};
