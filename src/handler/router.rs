//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, route matching, and dispatching.

use crate::config::AppState;
use crate::handler::static_files::{self, AssetFile};
use crate::http;
use crate::logger;
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub is_head: bool,
    pub body: Bytes,
    pub access_log: bool,
}

pub type HandlerFuture = Pin<Box<dyn Future<Output = Response<Full<Bytes>>> + Send>>;

/// A registered route handler
pub type Handler = fn(RequestContext, Arc<AppState>) -> HandlerFuture;

/// Exact-match request router
///
/// Maps `(method, path)` pairs to handlers, with a fixed allow-list of
/// static assets as the GET fallback. The table is populated once at
/// startup and never mutated afterwards.
pub struct Router {
    routes: HashMap<(Method, String), Handler>,
    assets: HashMap<String, AssetFile>,
    error_page: PathBuf,
}

impl Router {
    pub fn new(assets: HashMap<String, AssetFile>, error_page: PathBuf) -> Self {
        Self {
            routes: HashMap::new(),
            assets,
            error_page,
        }
    }

    /// Register a handler for an exact `(method, path)` pair.
    ///
    /// Registering the same pair again replaces the earlier handler.
    pub fn add_route(&mut self, method: Method, path: &str, handler: Handler) {
        self.routes.insert((method, path.to_string()), handler);
    }

    /// Resolve a request to a handler, a static asset, or the 404 path.
    ///
    /// Matching is on the path component only; any query string is
    /// stripped first. HEAD requests match GET routes and are served
    /// with an empty body.
    pub async fn dispatch(&self, ctx: RequestContext, state: Arc<AppState>) -> Response<Full<Bytes>> {
        let path = strip_query(&ctx.path).to_string();
        let method = if ctx.is_head {
            Method::GET
        } else {
            ctx.method.clone()
        };

        if let Some(handler) = self.routes.get(&(method.clone(), path.clone())) {
            return handler(ctx, state).await;
        }

        // Only GET falls through to the asset allow-list; a listed asset
        // missing on disk continues to the 404 path.
        if method == Method::GET {
            if let Some(asset) = self.assets.get(path.as_str()) {
                if let Some(resp) = static_files::serve_asset(asset, &ctx).await {
                    return resp;
                }
            }
        }

        self.not_found(ctx.is_head).await
    }

    /// Serve the configured error page with status 404, degrading to an
    /// inline body if the page file is itself missing.
    pub async fn not_found(&self, is_head: bool) -> Response<Full<Bytes>> {
        static_files::serve_error_page(&self.error_page, is_head).await
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();
    let is_head = method == Method::HEAD;
    let access_log = state.config.logging.access_log;

    if access_log {
        logger::log_request(&method, &uri, version);
    }

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(&method) {
        return Ok(resp);
    }

    // 2. Check declared body size
    if let Some(resp) = check_body_size(req.headers(), state.config.http.max_body_size) {
        return Ok(resp);
    }

    // 3. Collect the request body
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_error(&format!("Failed to read request body: {e}"));
            return Ok(http::build_400_response());
        }
    };

    // 4. Dispatch
    let ctx = RequestContext {
        method,
        path: uri.path().to_string(),
        is_head,
        body,
        access_log,
    };
    let dispatch_state = Arc::clone(&state);
    Ok(state.router.dispatch(ctx, dispatch_state).await)
}

/// Check HTTP method and return appropriate response for unsupported methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD | &Method::POST => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &hyper::HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Drop the query component before route matching
fn strip_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(p, _)| p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query() {
        assert_eq!(strip_query("/read"), "/read");
        assert_eq!(strip_query("/read?x=1"), "/read");
        assert_eq!(strip_query("/read?x=1&y=2"), "/read");
        assert_eq!(strip_query("/?"), "/");
    }

    #[test]
    fn test_strip_query_keeps_trailing_slash() {
        assert_eq!(strip_query("/read/?x=1"), "/read/");
    }
}
