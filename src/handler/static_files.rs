//! Static file serving module
//!
//! Serves the fixed set of allow-listed assets and the error page. Only
//! paths enumerated in the asset table are ever resolved to files, so no
//! user-supplied path reaches the filesystem.

use crate::config::SiteConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, mime, response};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// An allow-listed public asset and the file backing it
pub struct AssetFile {
    pub path: PathBuf,
    pub content_type: &'static str,
}

/// Build the asset allow-list from site configuration.
///
/// Content types are fixed at startup from the backing file's extension.
pub fn build_asset_table(site: &SiteConfig) -> HashMap<String, AssetFile> {
    site.assets
        .iter()
        .map(|(public_path, backing_file)| {
            let path = PathBuf::from(backing_file);
            let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
            (public_path.clone(), AssetFile { path, content_type })
        })
        .collect()
}

/// Load a file and derive its content type from the extension
pub async fn load_file(path: &Path) -> Option<(Vec<u8>, &'static str)> {
    let content = fs::read(path).await.ok()?;
    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Serve an allow-listed asset, or `None` if its file is missing on disk
pub async fn serve_asset(asset: &AssetFile, ctx: &RequestContext) -> Option<Response<Full<Bytes>>> {
    let content = match fs::read(&asset.path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_warning(&format!(
                "Allow-listed asset missing '{}': {e}",
                asset.path.display()
            ));
            return None;
        }
    };

    if ctx.access_log {
        logger::log_response(content.len());
    }

    Some(response::build_file_response(
        Bytes::from(content),
        asset.content_type,
        200,
        ctx.is_head,
    ))
}

/// Serve the error page with status 404.
///
/// An error page must always exist; if the file is absent the response
/// degrades to a minimal inline body rather than failing the request.
pub async fn serve_error_page(error_page: &Path, is_head: bool) -> Response<Full<Bytes>> {
    match fs::read(error_page).await {
        Ok(content) => response::build_file_response(
            Bytes::from(content),
            "text/html; charset=utf-8",
            404,
            is_head,
        ),
        Err(e) => {
            logger::log_warning(&format!(
                "Error page missing '{}', using inline fallback: {e}",
                error_page.display()
            ));
            http::build_404_fallback_response(is_head)
        }
    }
}
