use crate::dispatcher::{HandlerResponse, ResponseBody};
use may_minihttp::Response;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::warn;

/// Distinct handler header lines kept for the life of the process.
pub const MAX_INTERNED_HEADER_LINES: usize = 1024;

static HEADER_LINES: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();

fn intern_in(
    cache: &mut HashSet<&'static str>,
    line: String,
    capacity: usize,
) -> Option<&'static str> {
    if let Some(existing) = cache.get(line.as_str()) {
        return Some(*existing);
    }
    if cache.len() >= capacity {
        return None;
    }
    let leaked: &'static str = Box::leak(line.into_boxed_str());
    cache.insert(leaked);
    Some(leaked)
}

/// `'static` copy of a header line, leaked at most once per distinct line.
/// `None` once [`MAX_INTERNED_HEADER_LINES`] distinct lines exist.
fn intern_header_line(line: String) -> Option<&'static str> {
    let cache = HEADER_LINES.get_or_init(|| Mutex::new(HashSet::new()));
    let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);
    intern_in(&mut cache, line, MAX_INTERNED_HEADER_LINES)
}

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        s if s < 300 => "OK",
        s if s < 400 => "Redirect",
        s if s < 500 => "Client Error",
        _ => "Server Error",
    }
}

/// Statuses that must not carry a body (RFC 9110 §15.3.5, §15.4.5).
#[must_use]
pub fn status_forbids_body(status: u16) -> bool {
    matches!(status, 204 | 304) || (100..200).contains(&status)
}

fn content_type_line(body: &ResponseBody) -> Option<&'static str> {
    match body {
        ResponseBody::Empty => None,
        ResponseBody::Json(_) => Some("Content-Type: application/json"),
        ResponseBody::Text(_) => Some("Content-Type: text/plain; charset=utf-8"),
    }
}

/// Write a handler response: status, headers, and a body typed by its kind.
///
/// `may_minihttp` needs `'static` header lines, so each distinct handler
/// header line is leaked once and reused. Headers whose values vary per
/// request (ids, timestamps) fill that cache; past
/// [`MAX_INTERNED_HEADER_LINES`] new lines are dropped with a warning.
pub fn write_handler_response(res: &mut Response, hr: HandlerResponse) {
    res.status_code(usize::from(hr.status), status_reason(hr.status));

    let has_content_type = hr.get_header("content-type").is_some();
    for (name, value) in &hr.headers {
        // may_minihttp only takes 'static header lines
        match intern_header_line(format!("{name}: {value}")) {
            Some(line) => {
                res.header(line);
            }
            None => warn!(
                header = %name,
                limit = MAX_INTERNED_HEADER_LINES,
                "Header line cache full, header dropped"
            ),
        }
    }

    if status_forbids_body(hr.status) {
        return;
    }
    if !has_content_type {
        if let Some(ct) = content_type_line(&hr.body) {
            res.header(ct);
        }
    }
    match hr.body {
        ResponseBody::Empty => {}
        ResponseBody::Text(s) => res.body_vec(s.into_bytes()),
        json @ ResponseBody::Json(_) => res.body_vec(json.to_bytes()),
    }
}

/// Write a framework-level JSON error.
pub fn write_json_error(res: &mut Response, status: u16, body: Value) {
    res.status_code(usize::from(status), status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(body.to_string().into_bytes());
}
