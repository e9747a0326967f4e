//! Request marker.
//!
//! A handler input is any type that can be bound from a [`HandlerRequest`]
//! and has opted in by implementing [`HttpRequest`]. The trait has no methods
//! of its own; it exists so that only deliberate request types can be
//! registered with the dispatch adapter.
//!
//! ```rust
//! use httpmediator::dispatcher::HandlerRequest;
//! use httpmediator::request::HttpRequest;
//!
//! pub struct GetProduct {
//!     pub product_id: i32,
//! }
//!
//! impl TryFrom<HandlerRequest> for GetProduct {
//!     type Error = anyhow::Error;
//!
//!     fn try_from(req: HandlerRequest) -> anyhow::Result<Self> {
//!         Ok(Self { product_id: req.path_param_as("productId")? })
//!     }
//! }
//!
//! impl HttpRequest for GetProduct {}
//! ```

use crate::dispatcher::HandlerRequest;

/// Marks a type as an HTTP handler input.
///
/// Binding from the transport request happens through the
/// `TryFrom<HandlerRequest>` supertrait; a binding error is answered with a
/// 400 before any handler runs.
pub trait HttpRequest: TryFrom<HandlerRequest, Error = anyhow::Error> + Send + 'static {}
