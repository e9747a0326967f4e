use httpmediator::cancellation::CancellationToken;
use httpmediator::dispatcher::HandlerRequest;
use httpmediator::request::HttpRequest;
use httpmediator::response::{no_content, not_found, UntypedResponse};
use httpmediator::typed::HttpHandler;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub product_id: i32,
}

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> anyhow::Result<Self> {
        Ok(Self {
            product_id: req.path_param_as("productId")?,
        })
    }
}

impl HttpRequest for Request {}

/// No fixed model: answers with an untyped envelope.
pub struct DeleteProductHandler;

impl HttpHandler for DeleteProductHandler {
    type Request = Request;
    type Model = serde_json::Value;

    fn handle(&self, input: Request, _cancel: &CancellationToken) -> UntypedResponse {
        if input.product_id == 0 {
            return not_found();
        }
        no_content()
    }
}
