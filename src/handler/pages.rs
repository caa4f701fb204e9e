//! Page handlers module
//!
//! The routed endpoints: static site pages, the rendered message listing,
//! and the form POST that stores a new message.

use crate::config::AppState;
use crate::handler::router::{HandlerFuture, RequestContext, Router};
use crate::handler::static_files;
use crate::http::{self, form, response};
use crate::logger;
use crate::storage::MessageRecord;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// View model handed to the listing template
#[derive(Serialize)]
struct MessageView {
    posted_at: String,
    username: String,
    message: String,
}

/// Register the application routes
pub fn register_routes(router: &mut Router) {
    router.add_route(Method::GET, "/", handle_index);
    router.add_route(Method::GET, "/message.html", handle_message_page);
    router.add_route(Method::GET, "/read", handle_read);
    router.add_route(Method::POST, "/message", handle_message_post);
}

fn handle_index(ctx: RequestContext, state: Arc<AppState>) -> HandlerFuture {
    Box::pin(async move { serve_site_page("index.html", &ctx, &state).await })
}

fn handle_message_page(ctx: RequestContext, state: Arc<AppState>) -> HandlerFuture {
    Box::pin(async move { serve_site_page("message.html", &ctx, &state).await })
}

/// Render the listing of all stored messages
fn handle_read(ctx: RequestContext, state: Arc<AppState>) -> HandlerFuture {
    Box::pin(async move {
        let messages = match state.store.read_all().await {
            Ok(messages) => messages,
            Err(e) => {
                logger::log_error(&format!("Failed to read message store: {e}"));
                return http::build_500_response();
            }
        };

        let views: Vec<MessageView> = messages
            .into_iter()
            .map(|(posted_at, record)| MessageView {
                posted_at,
                username: record.username,
                message: record.message,
            })
            .collect();

        let mut context = tera::Context::new();
        context.insert("messages", &views);

        match state.tera.render("read.html", &context) {
            Ok(html) => {
                if ctx.access_log {
                    logger::log_response(html.len());
                }
                response::build_html_response(html, ctx.is_head)
            }
            Err(e) => {
                logger::log_error(&format!("Failed to render read.html: {e}"));
                http::build_500_response()
            }
        }
    })
}

/// Store a submitted message and redirect back to the submission page
fn handle_message_post(ctx: RequestContext, state: Arc<AppState>) -> HandlerFuture {
    Box::pin(async move {
        let mut fields = form::parse(&ctx.body);
        let record = MessageRecord {
            username: fields.remove("username").unwrap_or_default(),
            message: fields.remove("message").unwrap_or_default(),
        };

        match state.store.append(record).await {
            Ok(_key) => http::build_redirect_response("/message.html"),
            Err(e) => {
                logger::log_error(&format!("Failed to persist message: {e}"));
                http::build_500_response()
            }
        }
    })
}

/// Serve a page from the site root, falling through to the 404 path if the
/// file is missing
async fn serve_site_page(
    name: &str,
    ctx: &RequestContext,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let path = Path::new(&state.config.site.root).join(name);
    match static_files::load_file(&path).await {
        Some((content, content_type)) => {
            if ctx.access_log {
                logger::log_response(content.len());
            }
            response::build_file_response(Bytes::from(content), content_type, 200, ctx.is_head)
        }
        None => {
            logger::log_warning(&format!("Site page missing '{}'", path.display()));
            state.router.not_found(ctx.is_head).await
        }
    }
}
