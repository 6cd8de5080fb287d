//! File provider: republishes frontends when the config file changes.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::FrontendConfig;

/// Provider name used for frontends coming from the config file.
pub const FILE_PROVIDER: &str = "file";

/// A frontend set published by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUpdate {
    pub provider: &'static str,
    pub frontends: Vec<FrontendConfig>,
}

/// Watches the config file and publishes its frontends on every change.
pub struct FileProvider {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ProviderUpdate>,
}

impl FileProvider {
    /// Returns the provider and a receiver for its updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ProviderUpdate>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned watcher must be kept alive.
    ///
    /// The parent directory is watched so editors that replace the file
    /// by rename are still seen.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();
        let file_name = self.path.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let touches_file = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if !touches_file || !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }

                    tracing::info!(path = ?path, "Config file change detected, reloading");
                    match load_config(&path) {
                        Ok(config) => {
                            let _ = tx.send(ProviderUpdate {
                                provider: FILE_PROVIDER,
                                frontends: config.frontends,
                            });
                        }
                        Err(e) => {
                            tracing::error!(
                                error = %e,
                                "Failed to reload config, keeping current routes"
                            );
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "File provider started");
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const INITIAL: &str = r#"
[[frontends]]
id = "web"
rule = "Host:example.com"
backend = "web-pool"
"#;

    const UPDATED: &str = r#"
[[frontends]]
id = "web"
rule = "Host:example.com"
backend = "web-pool"

[[frontends]]
id = "api"
rule = "PathPrefix:/api"
backend = "api-pool"
priority = 5
"#;

    /// Replace the file in one step so no half-written content is observed.
    fn replace(dir: &Path, path: &Path, contents: &str) {
        let staging = dir.join("router.toml.tmp");
        fs::write(&staging, contents).unwrap();
        fs::rename(&staging, path).unwrap();
    }

    async fn next_update(
        rx: &mut mpsc::UnboundedReceiver<ProviderUpdate>,
    ) -> Option<ProviderUpdate> {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .ok()
            .flatten()
    }

    #[tokio::test]
    async fn test_reload_publishes_updates_and_skips_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("router.toml");
        fs::write(&path, INITIAL).unwrap();

        let (provider, mut rx) = FileProvider::new(&path);
        let _watcher = provider.run().unwrap();

        replace(dir.path(), &path, UPDATED);
        let mut ids = Vec::new();
        while ids != ["web", "api"] {
            let update = next_update(&mut rx).await.expect("no update after rewrite");
            assert_eq!(update.provider, FILE_PROVIDER);
            ids = update.frontends.iter().map(|f| f.id.clone()).collect();
        }

        // drain duplicate events for the same rewrite
        tokio::time::sleep(Duration::from_millis(300)).await;
        while rx.try_recv().is_ok() {}

        replace(dir.path(), &path, "[[frontends]]\nid = \n");
        let late = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await;
        assert!(late.is_err(), "invalid config was published: {late:?}");
    }
}
