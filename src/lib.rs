//! corkboard - a small message-board web server.
//!
//! Serves a static site, renders a listing of submitted messages, and accepts
//! new submissions via form POST, persisting them to a flat JSON file.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod storage;
