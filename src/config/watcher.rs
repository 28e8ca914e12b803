//! Configuration reload: file watching and on-demand reloads.

use std::path::{Path, PathBuf};
use std::time::Duration;
use notify::{Watcher, RecursiveMode, Event, RecommendedWatcher, Config};
use tokio::sync::mpsc;
use crate::config::loader::load_config;
use crate::config::schema::NodeConfig;

/// Reloads the breaker settings file and publishes validated configs.
///
/// Files that fail to load or validate are logged and skipped, so the node
/// keeps its current breaker settings.
#[derive(Clone)]
pub struct ConfigReloader {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<NodeConfig>,
}

impl ConfigReloader {
    /// Create a reloader for `path` and the receiving end of its updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<NodeConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (Self {
            path: path.to_path_buf(),
            update_tx,
        }, update_rx)
    }

    /// Load the file now. Returns whether a new config was published.
    pub fn reload(&self) -> bool {
        match load_config(&self.path) {
            Ok(new_config) => self.update_tx.send(new_config).is_ok(),
            Err(e) => {
                tracing::error!(path = ?self.path, "Failed to reload config: {}. Keeping current breaker settings.", e);
                false
            }
        }
    }

    /// Reload whenever the file is modified. Dropping the returned watcher stops it.
    pub fn watch(&self) -> Result<RecommendedWatcher, notify::Error> {
        let reloader = self.clone();

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!(path = ?reloader.path, "Breaker settings changed, reloading");
                        reloader.reload();
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }, Config::default().with_poll_interval(Duration::from_secs(2)))?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}
