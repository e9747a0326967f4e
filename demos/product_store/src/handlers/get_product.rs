use httpmediator::cancellation::CancellationToken;
use httpmediator::dispatcher::HandlerRequest;
use httpmediator::request::HttpRequest;
use httpmediator::response::{not_found, ok_with, HttpResponse};
use httpmediator::typed::HttpHandler;
use serde::Serialize;

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

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
}

pub struct GetProductHandler;

impl HttpHandler for GetProductHandler {
    type Request = Request;
    type Model = Product;

    fn handle(&self, input: Request, _cancel: &CancellationToken) -> HttpResponse<Product> {
        if input.product_id == 0 {
            return not_found();
        }
        ok_with(Product {
            id: input.product_id,
            name: format!("Product #{}", input.product_id),
        })
    }
}
