use crate::cancellation::CancellationToken;
use crate::dispatcher::{spawn_handler, Dispatcher, HandlerRequest, HandlerResponse, HandlerSender};
use crate::request::HttpRequest;
use crate::response::HttpResponse;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::{error, warn};

/// A handler that turns a bound request into a response envelope.
///
/// `handle` runs on a `may` coroutine: blocking-style I/O inside it yields to
/// the scheduler. Requests to the same handler run concurrently on separate
/// coroutines sharing `&self`. `cancel` fires when the dispatcher shuts down;
/// long-running handlers should poll it.
pub trait HttpHandler: Send + Sync + 'static {
    type Request: HttpRequest;
    /// Payload type; `serde_json::Value` for handlers without a fixed model.
    type Model: Serialize;

    fn handle(&self, input: Self::Request, cancel: &CancellationToken) -> HttpResponse<Self::Model>;
}

/// Adapts a closure into an [`HttpHandler`].
pub struct FnHandler<Req, M, F> {
    f: F,
    _marker: PhantomData<fn(Req) -> M>,
}

/// Wrap `f` as an [`HttpHandler`].
pub fn handler_fn<Req, M, F>(f: F) -> FnHandler<Req, M, F>
where
    F: Fn(Req, &CancellationToken) -> HttpResponse<M> + Send + Sync + 'static,
{
    FnHandler {
        f,
        _marker: PhantomData,
    }
}

impl<Req, M, F> HttpHandler for FnHandler<Req, M, F>
where
    Req: HttpRequest,
    M: Serialize + 'static,
    F: Fn(Req, &CancellationToken) -> HttpResponse<M> + Send + Sync + 'static,
{
    type Request = Req;
    type Model = M;

    fn handle(&self, input: Req, cancel: &CancellationToken) -> HttpResponse<M> {
        (self.f)(input, cancel)
    }
}

/// Map an envelope onto the transport response.
///
/// - failure: the error message as `text/plain`, with the envelope's status
/// - success with a model: the model as JSON
/// - success without a model: status only
///
/// A model that cannot be serialized is answered with a 500.
#[must_use]
pub fn into_handler_response<T: Serialize>(envelope: HttpResponse<T>) -> HandlerResponse {
    let (model, status, error_message) = envelope.into_parts();
    let status = status.as_u16();

    if let Some(message) = error_message {
        if message.trim().is_empty() {
            warn!(status, "Failure envelope with blank error message");
        }
        return HandlerResponse::text(status, message);
    }

    match model {
        Some(model) => match serde_json::to_value(&model) {
            Ok(body) => HandlerResponse::json(status, body),
            Err(e) => {
                error!(status, error = %e, "Failed to serialize response model");
                HandlerResponse::error(500, "Failed to serialize response")
            }
        },
        None => HandlerResponse::empty(status),
    }
}

/// Run `handler` on an already-bound input and translate its envelope.
#[must_use]
pub fn respond<H: HttpHandler>(
    handler: &H,
    input: H::Request,
    cancel: &CancellationToken,
) -> HandlerResponse {
    into_handler_response(handler.handle(input, cancel))
}

/// Bind, handle, and translate one raw request.
fn handle_raw<H: HttpHandler>(handler: &H, req: HandlerRequest) -> HandlerResponse {
    let request_id = req.request_id;
    let handler_name = req.handler_name.clone();
    let cancel = req.cancellation.clone();

    match H::Request::try_from(req) {
        Ok(input) => respond(handler, input, &cancel),
        Err(err) => {
            warn!(
                request_id = %request_id,
                handler_name = %handler_name,
                error = %err,
                "Request binding failed"
            );
            HandlerResponse::json(
                400,
                serde_json::json!({
                    "error": "Invalid request data",
                    "message": err.to_string(),
                }),
            )
        }
    }
}

/// Spawn a coroutine serving `handler` and return its sender.
///
/// # Safety
///
/// Spawns a `may` coroutine; see [`Dispatcher::register_handler`].
///
/// # Errors
///
/// The coroutine could not be spawned.
pub unsafe fn spawn_typed<H: HttpHandler>(name: &str, handler: H) -> std::io::Result<HandlerSender> {
    unsafe {
        spawn_handler(name, move |req: HandlerRequest| {
            let reply_tx = req.reply_tx.clone();
            let request_id = req.request_id;
            let resp = handle_raw(&handler, req);
            if reply_tx.send(resp).is_err() {
                warn!(request_id = %request_id, "Reply channel closed before response was sent");
            }
        })
    }
}

impl Dispatcher {
    /// Register a typed handler under `name`.
    ///
    /// Requests are bound with `TryFrom<HandlerRequest>` (400 on failure),
    /// handled, and the envelope is translated by [`into_handler_response`].
    ///
    /// # Safety
    ///
    /// Spawns a `may` coroutine; see [`Dispatcher::register_handler`].
    pub unsafe fn register_typed<H: HttpHandler>(&mut self, name: &str, handler: H) {
        match unsafe { spawn_typed(name, handler) } {
            Ok(tx) => self.insert_handler(name.to_string(), tx),
            Err(e) => {
                error!(handler_name = %name, error = %e, "Failed to spawn typed handler coroutine");
            }
        }
    }
}
