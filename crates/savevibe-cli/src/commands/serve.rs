//! Serve command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use savevibe_core::{MemoryStore, Store};
use savevibe_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    memory: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    let store: Arc<dyn Store> = if memory {
        println!("💾 Using in-memory storage (data is lost on exit)");
        Arc::new(MemoryStore::new())
    } else {
        println!("💾 Database: {}", db_path.display());
        Arc::new(open_db(db_path, no_encrypt)?)
    };

    let static_dir = static_dir
        .map(|dir| {
            dir.to_str()
                .with_context(|| format!("Static dir is not valid UTF-8: {}", dir.display()))
        })
        .transpose()?;

    let config = ServerConfig {
        require_auth: !no_auth,
        api_keys: ServerConfig::api_keys_from_env(),
        ..Default::default()
    };

    if no_auth {
        println!("🔓 Authentication: disabled (local development only)");
    } else {
        println!(
            "🔐 Authentication: {} API key(s) configured",
            config.api_keys.len()
        );
    }
    if let Some(dir) = static_dir {
        println!("📁 Serving static files from {}", dir);
    }
    println!("🚀 Listening on http://{}:{}", host, port);

    savevibe_server::serve_with_config(store, host, port, static_dir, config).await
}
