//! Request handler module
//!
//! Responsible for request routing dispatch and business logic processing.

pub mod pages;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::{handle_request, Handler, HandlerFuture, RequestContext, Router};
