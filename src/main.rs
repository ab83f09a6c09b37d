use anyhow::Context;
use clap::Parser;
use scanview::headless::{self, HeadlessOptions};
use scanview_core::config::{default_storage_path, Config};
use scanview_core::{FilterState, SeenVisibility};
use scanview_feeds::HostingBase;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "scanview", about = "Terminal viewer for scan findings")]
struct Cli {
    /// URL or directory the findings file is published next to.
    #[arg(long, value_name = "URL|PATH", default_value = ".")]
    base: String,

    /// Refresh interval in seconds (overrides the config file).
    #[arg(long, value_name = "SECS")]
    interval: Option<u64>,

    /// Key-value store file for seen marks and theme.
    #[arg(long, value_name = "PATH")]
    storage: Option<PathBuf>,

    /// Load once, print the filtered rows as TSV and exit.
    #[arg(long)]
    headless: bool,

    /// Only rows carrying this exact keyword token (headless).
    #[arg(long)]
    keyword: Option<String>,

    /// Earliest date, YYYY-MM-DD (headless).
    #[arg(long, value_name = "DATE")]
    from: Option<String>,

    /// Latest date, inclusive, YYYY-MM-DD (headless).
    #[arg(long, value_name = "DATE")]
    to: Option<String>,

    /// Leave out rows already marked seen (headless).
    #[arg(long)]
    hide_seen: bool,

    /// Write debug logs to /tmp/scanview-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.headless {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    } else if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/scanview-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("scanview debug log started, tail -f /tmp/scanview-debug.log");
    }

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unreadable, using defaults");
        Config::defaults()
    });
    let base = HostingBase::parse(&cli.base)?;
    let storage = cli.storage.clone().unwrap_or_else(default_storage_path);

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;

    if cli.headless {
        let filter = FilterState {
            keyword: cli.keyword.clone().unwrap_or_default(),
            date_from: FilterState::parse_date(cli.from.as_deref().unwrap_or_default())?,
            date_to: FilterState::parse_date(cli.to.as_deref().unwrap_or_default())?,
        };
        let visibility = if cli.hide_seen { SeenVisibility::HideSeen } else { SeenVisibility::ShowAll };
        let session = runtime.block_on(headless::load(HeadlessOptions {
            config,
            base,
            storage,
            filter,
            visibility,
        }))?;
        let stdout = std::io::stdout();
        headless::write_tsv(&session, &mut stdout.lock())?;
        return Ok(());
    }

    let interval = cli
        .interval
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| config.refresh.interval());
    scanview_tui::run(
        scanview_tui::RunOptions { config, base, storage, interval },
        runtime.handle().clone(),
    )
}
