//! # Typed Module
//!
//! The dispatch adapter. An [`HttpHandler`] receives an input that has
//! already been bound from the raw request and returns an
//! [`HttpResponse`](crate::response::HttpResponse) envelope; this module
//! turns that envelope into a [`HandlerResponse`](crate::dispatcher::HandlerResponse).
//!
//! ```rust
//! use httpmediator::cancellation::CancellationToken;
//! use httpmediator::dispatcher::HandlerRequest;
//! use httpmediator::request::HttpRequest;
//! use httpmediator::response::{not_found, ok_with, HttpResponse};
//! use httpmediator::typed::{respond, HttpHandler};
//! use serde::Serialize;
//!
//! struct GetUser { id: u32 }
//!
//! impl TryFrom<HandlerRequest> for GetUser {
//!     type Error = anyhow::Error;
//!     fn try_from(req: HandlerRequest) -> anyhow::Result<Self> {
//!         Ok(Self { id: req.path_param_as("id")? })
//!     }
//! }
//! impl HttpRequest for GetUser {}
//!
//! #[derive(Serialize)]
//! struct User { id: u32 }
//!
//! struct GetUserHandler;
//!
//! impl HttpHandler for GetUserHandler {
//!     type Request = GetUser;
//!     type Model = User;
//!
//!     fn handle(&self, input: GetUser, _cancel: &CancellationToken) -> HttpResponse<User> {
//!         if input.id == 0 {
//!             return not_found();
//!         }
//!         ok_with(User { id: input.id })
//!     }
//! }
//!
//! let resp = respond(&GetUserHandler, GetUser { id: 0 }, &CancellationToken::new());
//! assert_eq!(resp.status, 404);
//! ```

mod core;

pub use self::core::{
    handler_fn, into_handler_response, respond, spawn_typed, FnHandler, HttpHandler,
};
