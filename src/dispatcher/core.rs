use crate::cancellation::CancellationToken;
use crate::ids::RequestId;
use crate::middleware::Middleware;
use crate::router::{ParamVec, RouteMatch, RouteMeta};
use http::Method;
use may::coroutine;
use may::sync::mpsc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use smallvec::SmallVec;
use std::any::Any;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Header storage for requests and responses. Names are lower-cased by the
/// server when parsing; lookups are case-insensitive either way.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data passed to a handler coroutine.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    pub request_id: RequestId,
    pub method: Method,
    /// Route pattern that matched, e.g. `/products/{productId:int}`
    pub path: String,
    pub handler_name: String,
    pub path_params: ParamVec,
    pub query_params: ParamVec,
    pub headers: HeaderVec,
    /// Request body parsed as JSON (if present)
    pub body: Option<Value>,
    /// Fires when the dispatcher is shut down.
    pub cancellation: CancellationToken,
    /// Channel for sending the response back to the dispatcher
    pub reply_tx: mpsc::Sender<HandlerResponse>,
}

impl HandlerRequest {
    /// Last occurrence wins when a name repeats.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Last occurrence wins (`?limit=10&limit=20` -> `20`).
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Case-insensitive per RFC 9110.
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse a path parameter.
    ///
    /// # Errors
    ///
    /// Missing parameter or a value `T` cannot parse.
    pub fn path_param_as<T>(&self, name: &str) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self
            .get_path_param(name)
            .ok_or_else(|| anyhow::anyhow!("missing path parameter '{name}'"))?;
        raw.parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid path parameter '{name}'='{raw}': {e}"))
    }

    /// Parse an optional query parameter. Absent parameters yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// A present value `T` cannot parse.
    pub fn query_param_as<T>(&self, name: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_query_param(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| anyhow::anyhow!("invalid query parameter '{name}'='{raw}': {e}"))
            })
            .transpose()
    }

    /// Deserialize the JSON body.
    ///
    /// # Errors
    ///
    /// No body was sent, or it does not match `T`.
    pub fn json_body<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        let body = self
            .body
            .clone()
            .ok_or_else(|| anyhow::anyhow!("request body is required"))?;
        Ok(serde_json::from_value(body)?)
    }
}

/// What a response carries on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResponseBody {
    #[default]
    Empty,
    Json(Value),
    Text(String),
}

impl ResponseBody {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseBody::Empty)
    }

    /// Content type implied by the body kind.
    #[must_use]
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            ResponseBody::Empty => None,
            ResponseBody::Json(_) => Some("application/json"),
            ResponseBody::Text(_) => Some("text/plain; charset=utf-8"),
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Serialized bytes, empty for [`ResponseBody::Empty`].
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            ResponseBody::Empty => Vec::new(),
            ResponseBody::Json(v) => serde_json::to_vec(v).unwrap_or_default(),
            ResponseBody::Text(s) => s.as_bytes().to_vec(),
        }
    }
}

/// Response sent back from a handler coroutine.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: u16,
    pub headers: HeaderVec,
    pub body: ResponseBody,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: ResponseBody) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Status only, no body.
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self::new(status, HeaderVec::new(), ResponseBody::Empty)
    }

    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        Self::new(status, HeaderVec::new(), ResponseBody::Json(body))
    }

    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, HeaderVec::new(), ResponseBody::Text(body.into()))
    }

    /// Framework-level error: `{"error": message}`.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header (case-insensitive).
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Channel sender feeding one handler coroutine.
pub type HandlerSender = mpsc::Sender<HandlerRequest>;

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run one request through `handler_fn`, answering with a 500 if it panics.
fn run_handler<F>(handler_name: &str, handler_fn: &F, req: HandlerRequest)
where
    F: Fn(HandlerRequest),
{
    let reply_tx = req.reply_tx.clone();
    let request_id = req.request_id;

    info!(
        request_id = %request_id,
        handler_name = %handler_name,
        path_params = ?req.path_params,
        query_params = ?req.query_params,
        "Handler execution start"
    );
    let execution_start = Instant::now();

    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler_fn(req))) {
        Ok(()) => {
            info!(
                request_id = %request_id,
                handler_name = %handler_name,
                execution_time_ms = execution_start.elapsed().as_millis() as u64,
                "Handler execution complete"
            );
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            error!(
                request_id = %request_id,
                handler_name = %handler_name,
                panic_message = %message,
                "Handler panicked"
            );
            let resp = HandlerResponse::json(
                500,
                serde_json::json!({
                    "error": "Handler panicked",
                    "details": message,
                }),
            );
            if reply_tx.send(resp).is_err() {
                warn!(request_id = %request_id, "Reply channel closed before panic response");
            }
        }
    }
}

/// Spawn the coroutine loop behind a handler and return its sender.
///
/// The loop hands every request to a coroutine of its own, so a handler that
/// suspends (sleeps, waits on I/O) does not hold up other requests for the
/// same route. Every request gets exactly one reply: the handler's own, or a
/// 500 when the handler panics. A request whose coroutine cannot be spawned
/// is dropped, which the dispatcher answers with a 503.
///
/// # Safety
///
/// Calls `may::coroutine::Builder::spawn`, which is unsafe in the `may`
/// runtime. The caller must have configured the runtime (see
/// [`crate::runtime_config::RuntimeConfig::apply`]) and `handler_fn` must not
/// rely on thread-local state across yields.
pub(crate) unsafe fn spawn_handler<F>(name: &str, handler_fn: F) -> std::io::Result<HandlerSender>
where
    F: Fn(HandlerRequest) + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::channel::<HandlerRequest>();
    let stack_size = may::config().get_stack_size();
    let handler_name: Arc<str> = Arc::from(name);
    let handler_fn = Arc::new(handler_fn);

    // SAFETY: every closure owns what it touches (`Send + Sync + 'static`).
    unsafe {
        coroutine::Builder::new()
            .name(format!("handler-{handler_name}"))
            .stack_size(stack_size)
            .spawn(move || {
                debug!(handler_name = %handler_name, stack_size, "Handler coroutine start");

                for req in rx.iter() {
                    let request_id = req.request_id;
                    let name = Arc::clone(&handler_name);
                    let handler_fn = Arc::clone(&handler_fn);
                    let spawned = coroutine::Builder::new()
                        .stack_size(stack_size)
                        .spawn(move || run_handler(&name, handler_fn.as_ref(), req));
                    if let Err(e) = spawned {
                        error!(
                            request_id = %request_id,
                            handler_name = %handler_name,
                            error = %e,
                            "Failed to spawn request coroutine"
                        );
                    }
                }

                debug!(handler_name = %handler_name, "Handler coroutine exit");
            })?;
    }

    Ok(tx)
}

/// Routes matched requests to registered handler coroutines.
#[derive(Clone, Default)]
pub struct Dispatcher {
    /// Handler name -> coroutine sender
    pub handlers: HashMap<String, HandlerSender>,
    /// Applied in insertion order
    pub middlewares: Vec<Arc<dyn Middleware>>,
    shutdown: CancellationToken,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `sender` as the handler for `route`.
    ///
    /// An existing handler with the same name is replaced; dropping its
    /// sender closes the channel and its coroutine exits.
    pub fn add_route(&mut self, route: &RouteMeta, sender: HandlerSender) {
        self.insert_handler(route.handler_name.clone(), sender);
    }

    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    pub(crate) fn insert_handler(&mut self, name: String, sender: HandlerSender) {
        if self.handlers.insert(name.clone(), sender).is_some() {
            warn!(
                handler_name = %name,
                total_handlers = self.handlers.len(),
                "Replaced existing handler - old coroutine will exit"
            );
        } else {
            info!(
                handler_name = %name,
                total_handlers = self.handlers.len(),
                "Handler registered successfully"
            );
        }
    }

    /// Register a raw handler under `name`.
    ///
    /// The handler must send exactly one [`HandlerResponse`] on
    /// `req.reply_tx`. Panics are caught and answered with a 500.
    ///
    /// # Safety
    ///
    /// See [`spawn_handler`]: spawns a `may` coroutine.
    pub unsafe fn register_handler<F>(&mut self, name: &str, handler_fn: F)
    where
        F: Fn(HandlerRequest) + Send + Sync + 'static,
    {
        match unsafe { spawn_handler(name, handler_fn) } {
            Ok(tx) => self.insert_handler(name.to_string(), tx),
            Err(e) => {
                error!(
                    handler_name = %name,
                    error = %e,
                    "Failed to spawn handler coroutine"
                );
            }
        }
    }

    /// Cancel every in-flight and future request.
    pub fn cancel_all(&self) {
        warn!(handlers = self.handlers.len(), "Cancelling all handler requests");
        self.shutdown.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Send a matched request to its handler and wait for the reply.
    ///
    /// Returns `None` when no handler is registered under the matched name.
    /// A handler whose channel has closed yields a 503.
    #[must_use]
    pub fn dispatch(
        &self,
        route_match: RouteMatch,
        body: Option<Value>,
        headers: HeaderVec,
        request_id: RequestId,
    ) -> Option<HandlerResponse> {
        debug!(
            handler_name = %route_match.handler_name,
            available_handlers = self.handlers.len(),
            "Handler lookup"
        );

        let Some(tx) = self.handlers.get(&route_match.handler_name) else {
            let available: Vec<&String> = self.handlers.keys().collect();
            error!(
                request_id = %request_id,
                handler_name = %route_match.handler_name,
                available_handlers = ?available,
                "Handler not found"
            );
            return None;
        };

        let (reply_tx, reply_rx) = mpsc::channel();
        let mut request = HandlerRequest {
            request_id,
            method: route_match.route.method.clone(),
            path: route_match.route.path_pattern.clone(),
            handler_name: route_match.handler_name,
            path_params: route_match.path_params,
            query_params: route_match.query_params,
            headers,
            body,
            cancellation: self.shutdown.child_token(),
            reply_tx,
        };

        let mut early_resp: Option<HandlerResponse> = None;
        for mw in &self.middlewares {
            let resp = mw.before(&request);
            if early_resp.is_none() && resp.is_some() {
                debug!(
                    request_id = %request_id,
                    middleware_name = std::any::type_name_of_val(mw.as_ref()),
                    "Middleware returned early response"
                );
                early_resp = resp;
            }
        }

        let (mut resp, latency) = if let Some(r) = early_resp {
            (r, Duration::ZERO)
        } else {
            info!(
                request_id = %request_id,
                handler_name = %request.handler_name,
                method = %request.method,
                path = %request.path,
                "Request dispatched to handler"
            );
            let start = Instant::now();

            if let Err(e) = tx.send(request.clone()) {
                error!(
                    request_id = %request_id,
                    handler_name = %request.handler_name,
                    error = %e,
                    "Failed to send request to handler"
                );
                return Some(Self::not_responding(&request.handler_name));
            }
            // Only the handler may hold the reply sender, so a handler that
            // drops the request without answering closes the channel.
            request.reply_tx = mpsc::channel().0;

            match reply_rx.recv() {
                Ok(response) => {
                    info!(
                        request_id = %request_id,
                        handler_name = %request.handler_name,
                        latency_ms = start.elapsed().as_millis() as u64,
                        status = response.status,
                        "Handler response received"
                    );
                    (response, start.elapsed())
                }
                Err(e) => {
                    error!(
                        request_id = %request_id,
                        handler_name = %request.handler_name,
                        error = %e,
                        "Handler channel closed - handler may have crashed"
                    );
                    return Some(Self::not_responding(&request.handler_name));
                }
            }
        };

        for mw in &self.middlewares {
            mw.after(&request, &mut resp, latency);
        }
        Some(resp)
    }

    fn not_responding(handler_name: &str) -> HandlerResponse {
        HandlerResponse::error(503, &format!("Handler '{handler_name}' is not responding"))
    }
}
