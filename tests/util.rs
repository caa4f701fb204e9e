use corkboard::config::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, SiteConfig, StorageConfig,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Removes test directories on construction and again on drop, so a failed
/// run does not leave state behind for the next one.
pub struct Cleanup<'a> {
    pub test_paths: &'a Vec<&'a str>,
}

impl<'a> Cleanup<'a> {
    pub fn remove_test_paths(&self) {
        for path in self.test_paths {
            let path_buf = PathBuf::from(path);
            if path_buf.exists() {
                let result = if path_buf.is_dir() {
                    fs::remove_dir_all(path)
                } else {
                    fs::remove_file(path)
                };
                if let Err(e) = result {
                    eprintln!("Failed to remove test path {path}: {e}");
                }
            }
        }
    }
}

impl<'a> Drop for Cleanup<'a> {
    fn drop(&mut self) {
        self.remove_test_paths();
    }
}

pub const READ_TEMPLATE: &str = "<html><body>\
{% for m in messages %}<p>{{ m.posted_at }} {{ m.username }}: {{ m.message }}</p>{% endfor %}\
</body></html>";

/// Write a complete site fixture (pages, assets, listing template) under `root`
pub fn write_site_fixture(root: &Path) {
    let site = root.join("site");
    fs::create_dir_all(&site).expect("create site dir");
    fs::create_dir_all(root.join("templates")).expect("create templates dir");

    fs::write(
        site.join("index.html"),
        "<html><body><h1>Corkboard</h1></body></html>",
    )
    .expect("write index.html");
    fs::write(
        site.join("message.html"),
        "<html><body><form action=\"/message\" method=\"post\"></form></body></html>",
    )
    .expect("write message.html");
    fs::write(
        site.join("error.html"),
        "<html><body><h1>Page not found</h1></body></html>",
    )
    .expect("write error.html");
    fs::write(site.join("style.css"), "body { background: #f2ead9; }\n").expect("write style.css");
    fs::write(site.join("logo.png"), b"\x89PNG\r\n\x1a\nnot-a-real-png").expect("write logo.png");
    fs::write(root.join("templates").join("read.html"), READ_TEMPLATE).expect("write read.html");
}

/// Configuration pointing every path into the fixture directory
pub fn test_config(root: &Path) -> Config {
    let site = root.join("site");
    let path_str = |p: &Path| p.to_string_lossy().into_owned();

    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: None,
        },
        logging: LoggingConfig {
            level: "info".to_string(),
            access_log: false,
            access_log_file: None,
            error_log_file: None,
        },
        performance: PerformanceConfig {
            keep_alive_timeout: 75,
            read_timeout: 30,
            write_timeout: 30,
            max_connections: None,
        },
        http: HttpConfig {
            max_body_size: 1_048_576,
        },
        storage: StorageConfig {
            path: path_str(&root.join("storage").join("data.json")),
        },
        site: SiteConfig {
            root: path_str(&site),
            templates: path_str(&root.join("templates")),
            error_page: path_str(&site.join("error.html")),
            assets: HashMap::from([
                ("/style.css".to_string(), path_str(&site.join("style.css"))),
                ("/logo.png".to_string(), path_str(&site.join("logo.png"))),
            ]),
        },
    }
}
