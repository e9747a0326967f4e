use super::request::{parse_request, ParsedRequest};
use super::response::{write_handler_response, write_json_error};
use crate::dispatcher::Dispatcher;
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::router::Router;
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;

/// `may_minihttp` service: route, dispatch, write.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<RwLock<Router>>,
    pub dispatcher: Arc<RwLock<Dispatcher>>,
}

impl AppService {
    #[must_use]
    pub fn new(router: Router, dispatcher: Dispatcher) -> Self {
        Self {
            router: Arc::new(RwLock::new(router)),
            dispatcher: Arc::new(RwLock::new(dispatcher)),
        }
    }
}

/// `{"status":"ok"}`.
pub fn health_endpoint(res: &mut Response) -> io::Result<()> {
    res.status_code(200, "OK");
    res.header("Content-Type: application/json");
    res.body_vec(json!({ "status": "ok" }).to_string().into_bytes());
    Ok(())
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let ParsedRequest {
            method,
            path,
            headers,
            query_params,
            body,
        } = parse_request(req);

        if method == "GET" && path == "/health" {
            return health_endpoint(res);
        }

        let Ok(http_method) = method.parse::<Method>() else {
            warn!(method = %method, "Unparseable HTTP method");
            write_json_error(res, 400, json!({"error": "Bad Request", "method": method}));
            return Ok(());
        };

        let route_opt = self
            .router
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .route(http_method, &path);
        let Some(mut route_match) = route_opt else {
            write_json_error(
                res,
                404,
                json!({"error": "Not Found", "method": method, "path": path}),
            );
            return Ok(());
        };
        route_match.query_params = query_params;

        let request_id = RequestId::from_header_or_new(
            headers
                .iter()
                .find(|(k, _)| k.as_ref() == REQUEST_ID_HEADER)
                .map(|(_, v)| v.as_str()),
        );

        let handler_response = self
            .dispatcher
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .dispatch(route_match, body, headers, request_id);

        match handler_response {
            Some(hr) => write_handler_response(res, hr),
            None => write_json_error(
                res,
                500,
                json!({
                    "error": "Handler failed or not registered",
                    "method": method,
                    "path": path
                }),
            ),
        }
        Ok(())
    }
}
