// Handler registry
use crate::handlers::delete_product::DeleteProductHandler;
use crate::handlers::get_product::GetProductHandler;
use crate::handlers::order_product::OrderProductHandler;
use httpmediator::dispatcher::Dispatcher;
use httpmediator::router::RouteMeta;
use httpmediator::typed::spawn_typed;
use tracing::{error, warn};

/// Register handlers for exactly the routes given, keyed by their handler names.
///
/// # Safety
///
/// Spawns `may` coroutines; see `Dispatcher::register_typed`.
pub unsafe fn register_from_routes(dispatcher: &mut Dispatcher, routes: &[RouteMeta]) {
    for route in routes {
        let name = route.handler_name.as_str();
        let spawned = unsafe {
            match name {
                "get_product" => spawn_typed(name, GetProductHandler),
                "order_product" => spawn_typed(name, OrderProductHandler),
                "delete_product" => spawn_typed(name, DeleteProductHandler),
                other => {
                    warn!(handler_name = %other, "No product store handler for route");
                    continue;
                }
            }
        };
        match spawned {
            Ok(tx) => dispatcher.add_route(route, tx),
            Err(e) => error!(handler_name = %name, error = %e, "Failed to spawn handler"),
        }
    }
}
