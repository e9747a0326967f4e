//! Route tables loaded from YAML or JSON.

use super::core::RouteMeta;
use anyhow::{Context, Result};
use http::Method;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RouteFile {
    #[serde(default)]
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    method: String,
    path: String,
    handler: String,
}

const SUPPORTED_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
    Method::HEAD,
];

/// Parse a route table. JSON is accepted as well since it is valid YAML.
///
/// # Errors
///
/// Fails on malformed documents, unsupported methods, or blank paths and
/// handler names.
pub fn parse_routes(source: &str) -> Result<Vec<RouteMeta>> {
    let file: RouteFile = serde_yaml::from_str(source).context("failed to parse route table")?;
    file.routes
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let method: Method = entry
                .method
                .to_ascii_uppercase()
                .parse()
                .with_context(|| format!("route #{idx}: invalid method '{}'", entry.method))?;
            if !SUPPORTED_METHODS.contains(&method) {
                anyhow::bail!("route #{idx}: unsupported method '{method}'");
            }
            if !entry.path.starts_with('/') {
                anyhow::bail!("route #{idx}: path '{}' must start with '/'", entry.path);
            }
            if entry.handler.trim().is_empty() {
                anyhow::bail!("route #{idx}: handler name must not be blank");
            }
            Ok(RouteMeta::new(method, entry.path, entry.handler))
        })
        .collect()
}

/// Read and parse a route table file.
///
/// # Errors
///
/// I/O failures and everything [`parse_routes`] rejects.
pub fn load_routes(path: impl AsRef<Path>) -> Result<Vec<RouteMeta>> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route table {}", path.display()))?;
    parse_routes(&source).with_context(|| format!("in {}", path.display()))
}
