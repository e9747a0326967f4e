//! # Router Module
//!
//! Maps an HTTP method and path to the name of the handler that should
//! receive the request. The dispatcher only ever sees handler names, so the
//! router is the one place that knows about URLs.
//!
//! ## Path patterns
//!
//! - literal segments match themselves: `/orders`
//! - `{name}` captures one segment as a string: `/users/{id}`
//! - `{name:int}` captures one segment only if it is an optionally signed
//!   integer: `/products/{productId:int}`; `/products/abc` does not match
//!
//! Routes are tried in declaration order and the first match wins.
//!
//! ## Route tables
//!
//! Tables can be written in code or loaded from YAML/JSON:
//!
//! ```yaml
//! routes:
//!   - method: GET
//!     path: /products/{productId:int}
//!     handler: get_product
//!   - method: POST
//!     path: /orders
//!     handler: order_product
//! ```
//!
//! ```rust
//! use httpmediator::router::{parse_routes, Router};
//! use http::Method;
//!
//! let routes = parse_routes(
//!     "routes:\n  - method: GET\n    path: /products/{productId:int}\n    handler: get_product\n",
//! )?;
//! let router = Router::new(routes)?;
//! let m = router.route(Method::GET, "/products/7").expect("route");
//! assert_eq!(m.handler_name, "get_product");
//! assert_eq!(m.get_path_param("productId"), Some("7"));
//! # Ok::<(), anyhow::Error>(())
//! ```

mod core;
mod table;
#[cfg(test)]
mod tests;

pub use self::core::{ParamVec, RouteMatch, RouteMeta, Router, MAX_INLINE_PARAMS};
pub use table::{load_routes, parse_routes};
