//! # Response Module
//!
//! The response module defines the envelope a handler hands back to the
//! dispatch adapter: the outcome of one request, independent of the wire.
//!
//! ## Overview
//!
//! An [`HttpResponse<T>`] is one of three things:
//!
//! - **success without a model** - only a status code reaches the client
//! - **success with a model** - the model is serialized as `application/json`
//! - **failure** - the error message is sent as `text/plain`
//!
//! The envelope is built once inside a handler, consumed once by
//! [`crate::typed::into_handler_response`], and never mutated in between.
//!
//! ## Usage
//!
//! Handlers normally reach for the free helper functions:
//!
//! ```rust
//! use httpmediator::response::{conflict, created_with, not_found, HttpResponse};
//!
//! #[derive(serde::Serialize)]
//! struct Order {
//!     order_id: i32,
//! }
//!
//! fn place(product_id: i32, clash: bool) -> HttpResponse<Order> {
//!     if product_id == 0 {
//!         return not_found();
//!     }
//!     if clash {
//!         return conflict("order already placed");
//!     }
//!     created_with(Order { order_id: product_id + 1 })
//! }
//!
//! assert_eq!(place(0, false).status_code().as_u16(), 404);
//! assert!(!place(1, true).succeeded());
//! assert_eq!(place(1, false).model().map(|o| o.order_id), Some(2));
//! ```
//!
//! ## Contract violations
//!
//! Building a failure with a blank message is a programming error and panics.
//! The `try_*` constructors return [`EnvelopeError`] instead for callers that
//! assemble envelopes from data they do not control.

mod envelope;
mod helpers;

pub use envelope::{EnvelopeError, HttpResponse, UntypedResponse, NOT_FOUND_MESSAGE};
pub use helpers::{
    conflict, created, created_with, no_content, no_content_with, not_found, ok, ok_with,
};
