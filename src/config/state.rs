// Application state module
// Wires the long-lived components together at startup

use std::path::PathBuf;
use tera::Tera;

use super::types::Config;
use crate::handler::{pages, static_files, Router};
use crate::storage::MessageStore;

/// Application state
///
/// Built once at startup and shared behind an `Arc`; every request receives
/// a reference instead of reaching for process-global state.
pub struct AppState {
    pub config: Config,
    pub router: Router,
    pub store: MessageStore,
    pub tera: Tera,
}

impl AppState {
    /// Create `AppState` from loaded configuration.
    ///
    /// Failures here (storage directory cannot be created, templates do not
    /// parse) are fatal to process startup.
    pub fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let assets = static_files::build_asset_table(&config.site);
        let mut router = Router::new(assets, PathBuf::from(&config.site.error_page));
        pages::register_routes(&mut router);

        let store = MessageStore::open(&config.storage.path)?;
        let tera = Tera::new(&format!("{}/**/*.html", config.site.templates))?;

        Ok(Self {
            config,
            router,
            store,
            tera,
        })
    }
}
