//! Sample product store: three handlers behind `httpmediator`.
//!
//! | Route | Handler | Outcomes |
//! |---|---|---|
//! | `GET /products/{productId:int}` | `get_product` | 404 for id 0, else 200 + product |
//! | `POST /orders` | `order_product` | 404 for product 0, 409 on conflict, else 201 (+ order when asked) |
//! | `DELETE /products/{productId:int}` | `delete_product` | 404 for id 0, else 204 |

pub mod handlers;
pub mod registry;

use httpmediator::dispatcher::Dispatcher;
use httpmediator::middleware::TracingMiddleware;
use httpmediator::router::{parse_routes, RouteMeta, Router};
use httpmediator::server::AppService;
use std::sync::Arc;

/// Route table bundled with the demo.
pub const ROUTES_YAML: &str = include_str!("../routes.yaml");

/// Parse the bundled route table.
///
/// # Errors
///
/// Only if the bundled file is malformed.
pub fn routes() -> anyhow::Result<Vec<RouteMeta>> {
    parse_routes(ROUTES_YAML)
}

/// Router plus a dispatcher with every handler registered.
///
/// # Errors
///
/// Route compilation failures.
pub fn build_service(routes: Vec<RouteMeta>) -> anyhow::Result<AppService> {
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_middleware(Arc::new(TracingMiddleware));
    // SAFETY: callers configure the may runtime before building the service.
    unsafe {
        registry::register_from_routes(&mut dispatcher, &routes);
    }
    Ok(AppService::new(Router::new(routes)?, dispatcher))
}
