use anyhow::{bail, Context, Result};
use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum number of path/query parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage.
///
/// Param names are `Arc<str>` because they come from the route table and are
/// shared by every match; values are per-request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// One entry of the routing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMeta {
    pub method: Method,
    /// Pattern such as `/products/{productId:int}`
    pub path_pattern: String,
    /// Name the handler was registered under in the dispatcher
    pub handler_name: String,
}

impl RouteMeta {
    #[must_use]
    pub fn new(method: Method, path_pattern: impl Into<String>, handler_name: impl Into<String>) -> Self {
        Self {
            method,
            path_pattern: path_pattern.into(),
            handler_name: handler_name.into(),
        }
    }
}

/// Result of matching a request against the routing table.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: Arc<RouteMeta>,
    /// Path parameters extracted from the URL (`{id}` -> `("id", "123")`)
    pub path_params: ParamVec,
    pub handler_name: String,
    /// Query string parameters (populated by the server)
    pub query_params: ParamVec,
}

impl RouteMatch {
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

}

/// Value constraint on a `{name:constraint}` segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamConstraint {
    Any,
    /// 32-bit signed integer
    Int,
}

impl ParamConstraint {
    fn accepts(self, value: &str) -> bool {
        match self {
            ParamConstraint::Any => true,
            ParamConstraint::Int => value.parse::<i32>().is_ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathParam {
    pub(crate) name: String,
    pub(crate) constraint: ParamConstraint,
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    regex: Regex,
    meta: Arc<RouteMeta>,
    param_names: Vec<Arc<str>>,
    constraints: Vec<ParamConstraint>,
}

/// Method + path -> handler name.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<CompiledRoute>,
}

impl Router {
    /// Compile a routing table.
    ///
    /// # Errors
    ///
    /// Fails when a pattern uses an unknown parameter constraint or an empty
    /// parameter name.
    pub fn new(routes: Vec<RouteMeta>) -> Result<Self> {
        let mut compiled = Vec::with_capacity(routes.len());
        for route in routes {
            let (regex, params) = Self::path_to_regex(&route.path_pattern)
                .with_context(|| format!("invalid route pattern '{}'", route.path_pattern))?;
            compiled.push(CompiledRoute {
                regex,
                meta: Arc::new(route),
                param_names: params.iter().map(|p| Arc::from(p.name.as_str())).collect(),
                constraints: params.iter().map(|p| p.constraint).collect(),
            });
        }

        let routes_summary: Vec<String> = compiled
            .iter()
            .take(10)
            .map(|r| format!("{} {}", r.meta.method, r.meta.path_pattern))
            .collect();
        info!(
            routes_count = compiled.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        Ok(Self { routes: compiled })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routing table in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteMeta> {
        self.routes.iter().map(|r| r.meta.as_ref())
    }

    /// Print all registered routes to stdout.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for r in &self.routes {
            println!(
                "[route] {} {} -> {}",
                r.meta.method, r.meta.path_pattern, r.meta.handler_name
            );
        }
    }

    /// Match `method` + `path` (without query string).
    #[must_use]
    pub fn route(&self, method: Method, path: &str) -> Option<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");

        for compiled in &self.routes {
            if compiled.meta.method != method {
                continue;
            }
            let Some(captures) = compiled.regex.captures(path) else {
                continue;
            };
            let mut path_params = ParamVec::new();
            let mut constraints_hold = true;
            for (i, name) in compiled.param_names.iter().enumerate() {
                if let Some(val) = captures.get(i + 1) {
                    if !compiled.constraints[i].accepts(val.as_str()) {
                        constraints_hold = false;
                        break;
                    }
                    path_params.push((Arc::clone(name), val.as_str().to_string()));
                }
            }
            if !constraints_hold {
                debug!(
                    path = %path,
                    route_pattern = %compiled.meta.path_pattern,
                    "Path parameter out of range for constraint"
                );
                continue;
            }
            info!(
                method = %method,
                path = %path,
                handler_name = %compiled.meta.handler_name,
                route_pattern = %compiled.meta.path_pattern,
                path_params = ?path_params,
                "Route matched"
            );
            return Some(RouteMatch {
                route: Arc::clone(&compiled.meta),
                path_params,
                handler_name: compiled.meta.handler_name.clone(),
                query_params: ParamVec::new(),
            });
        }

        warn!(method = %method, path = %path, "No route matched");
        None
    }

    /// Turn `/users/{id}/orders/{n:int}` into an anchored regex plus the
    /// ordered parameters. The regex only checks the shape of an `int`
    /// segment; its range is checked at match time.
    pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<PathParam>)> {
        if path == "/" {
            return Ok((Regex::new(r"^/$")?, Vec::new()));
        }

        let mut pattern = String::with_capacity(path.len() + 8);
        pattern.push('^');
        let mut params = Vec::with_capacity(path.matches('{').count());

        for segment in path.split('/') {
            if segment.starts_with('{') && segment.ends_with('}') {
                let inner = &segment[1..segment.len() - 1];
                let (name, constraint) = match inner.split_once(':') {
                    Some((name, constraint)) => (name.trim(), Some(constraint.trim())),
                    None => (inner.trim(), None),
                };
                if name.is_empty() {
                    bail!("empty parameter name in '{path}'");
                }
                let constraint = match constraint {
                    None => {
                        pattern.push_str("/([^/]+)");
                        ParamConstraint::Any
                    }
                    Some("int") => {
                        pattern.push_str("/(-?[0-9]+)");
                        ParamConstraint::Int
                    }
                    Some(other) => bail!("unsupported constraint '{other}' on parameter '{name}'"),
                };
                params.push(PathParam {
                    name: name.to_string(),
                    constraint,
                });
            } else if !segment.is_empty() {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }

        pattern.push('$');
        Ok((Regex::new(&pattern)?, params))
    }
}
