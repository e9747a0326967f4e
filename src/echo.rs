use crate::dispatcher::{HandlerRequest, HandlerResponse};
use serde_json::json;
use tracing::debug;

/// Reflects the request back as JSON. Used by `httpmediator serve` to stand
/// in for real handlers.
pub fn echo_handler(req: HandlerRequest) {
    let params: serde_json::Map<String, serde_json::Value> = req
        .path_params
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect();
    let query: serde_json::Map<String, serde_json::Value> = req
        .query_params
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect();

    let response = HandlerResponse::json(
        200,
        json!({
            "handler": req.handler_name,
            "method": req.method.to_string(),
            "path": req.path,
            "params": params,
            "query": query,
            "body": req.body,
        }),
    );

    if req.reply_tx.send(response).is_err() {
        debug!(request_id = %req.request_id, "Echo reply dropped");
    }
}
