//! scanview TUI: ratatui application shell.

pub mod app;
pub mod event;
pub mod surface;
pub mod theme;
pub mod widgets;

pub use app::{App, AppState};

use scanview_core::config::Config;
use scanview_core::kv::{JsonFileStore, KeyValueStore, MemoryStore};
use scanview_core::view::SurfaceOptions;
use scanview_feeds::{HostingBase, HttpTransport};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

/// Everything the interactive viewer needs from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: Config,
    pub base: HostingBase,
    pub storage: PathBuf,
    pub interval: Duration,
}

/// Open the store, build the transport and run the viewer until quit.
pub fn run(opts: RunOptions, runtime: Handle) -> anyhow::Result<()> {
    let kv: Arc<dyn KeyValueStore> = match JsonFileStore::open(&opts.storage) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(error = %e, path = %opts.storage.display(), "storage unusable, seen marks will not persist");
            Arc::new(MemoryStore::new())
        }
    };
    let transport = HttpTransport::new(opts.base, &opts.config.http)?;
    let state = AppState::new(kv, SurfaceOptions::from(&opts.config.ui));
    App::new(state, runtime, transport, opts.config.sources, opts.interval).run()
}
