use crate::dispatcher::HeaderVec;
use crate::router::ParamVec;
use may_minihttp::Request;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info};

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    pub method: String,
    /// Path without the query string
    pub path: String,
    /// Header names are lower-cased
    pub headers: HeaderVec,
    pub query_params: ParamVec,
    /// Body parsed as JSON; `None` when absent or not valid JSON
    pub body: Option<serde_json::Value>,
}

/// Split the query string off `path` and URL-decode its pairs.
#[must_use]
pub fn parse_query_params(path: &str) -> ParamVec {
    match path.split_once('?') {
        Some((_, query)) => url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
            .collect(),
        None => ParamVec::new(),
    }
}

/// Parse a raw body as JSON. Blank bodies are `None`.
#[must_use]
pub fn parse_json_body(raw: &str) -> Option<serde_json::Value> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(json) => Some(json),
        Err(e) => {
            debug!(error = %e, body_size_bytes = raw.len(), "JSON body parse failed");
            None
        }
    }
}

/// Extract method, path, headers, query and JSON body from a request.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase()),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();
    debug!(
        header_count = headers.len(),
        header_names = ?headers.iter().map(|(k, _)| k.as_ref()).collect::<Vec<_>>(),
        "Headers extracted"
    );

    let query_params = parse_query_params(&raw_path);
    debug!(param_count = query_params.len(), query_params = ?query_params, "Query params parsed");

    // body() consumes the request, so it goes last
    let mut raw_body = String::new();
    let body = match req.body().read_to_string(&mut raw_body) {
        Ok(size) if size > 0 => {
            debug!(body_size_bytes = size, "Request body read");
            parse_json_body(&raw_body)
        }
        _ => None,
    };

    info!(
        method = %method,
        path = %path,
        headers_count = headers.len(),
        has_body = body.is_some(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        query_params,
        body,
    }
}
