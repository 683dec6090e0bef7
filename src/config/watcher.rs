//! Route table watcher for hot reload.
//!
//! # Responsibilities
//! - Watch the directory holding the route table file
//! - Reload on changes to that file only
//! - Publish a new config only when it differs and builds into a router
//!
//! # Design Decisions
//! - The parent directory is watched so editors that save by rename are seen
//! - Editors emit several events per save; unchanged configs are dropped
//! - A config that fails to build is never published, so the server only
//!   ever swaps between working tables

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RouterConfig;

/// Monitors the route table file and publishes every new working version.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let tx = self.update_tx;
        let mut reloader = Reloader::new(self.path.clone(), load_config(&self.path).ok());

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Some(config) = reloader.handle(&event) {
                        let _ = tx.send(config);
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Route table watcher started");
        Ok(watcher)
    }
}

/// Turns file events into config updates.
struct Reloader {
    path: PathBuf,
    file_name: Option<OsString>,
    last: Option<RouterConfig>,
}

impl Reloader {
    fn new(path: PathBuf, last: Option<RouterConfig>) -> Self {
        let file_name = path.file_name().map(|n| n.to_os_string());
        Self {
            path,
            file_name,
            last,
        }
    }

    fn handle(&mut self, event: &Event) -> Option<RouterConfig> {
        if !(event.kind.is_modify() || event.kind.is_create()) || !self.concerns(event) {
            return None;
        }

        let config = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload route table, keeping the current one");
                return None;
            }
        };
        if self.last.as_ref() == Some(&config) {
            return None;
        }
        if let Err(e) = config.build_router() {
            tracing::error!(error = %e, "Reloaded route table does not build, keeping the current one");
            return None;
        }

        tracing::info!(path = ?self.path, routes = config.routes.len(), "Route table change detected");
        self.last = Some(config.clone());
        Some(config)
    }

    fn concerns(&self, event: &Event) -> bool {
        event
            .paths
            .iter()
            .any(|p| p.file_name().map(|n| n.to_os_string()) == self.file_name)
    }
}
