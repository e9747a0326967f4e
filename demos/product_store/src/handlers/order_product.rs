use httpmediator::cancellation::CancellationToken;
use httpmediator::dispatcher::HandlerRequest;
use httpmediator::request::HttpRequest;
use httpmediator::response::{conflict, created, created_with, not_found, HttpResponse};
use httpmediator::typed::HttpHandler;
use serde::{Deserialize, Serialize};

pub const CONFLICT_MESSAGE: &str = "Oops! Conflict occured :(";

/// JSON body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub product_id: i32,
    #[serde(default)]
    pub cause_conflict: bool,
    #[serde(default)]
    pub include_model: bool,
}

impl TryFrom<HandlerRequest> for Request {
    type Error = anyhow::Error;

    fn try_from(req: HandlerRequest) -> anyhow::Result<Self> {
        req.json_body()
    }
}

impl HttpRequest for Request {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i32,
}

pub struct OrderProductHandler;

impl HttpHandler for OrderProductHandler {
    type Request = Request;
    type Model = Order;

    fn handle(&self, input: Request, _cancel: &CancellationToken) -> HttpResponse<Order> {
        if input.product_id == 0 {
            return not_found();
        }
        if input.cause_conflict {
            return conflict(CONFLICT_MESSAGE);
        }
        if input.include_model {
            return created_with(Order {
                order_id: input.product_id.wrapping_add(1),
            });
        }
        created()
    }
}
