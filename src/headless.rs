//! Headless mode: one load cycle, filtered rows printed as TSV.
//!
//! Shares every layer with the TUI except the terminal: the same resolver,
//! fetch coordinator, session and view binder rows.

use anyhow::Context;
use scanview_core::{
    config::Config,
    kv::{JsonFileStore, KeyValueStore},
    resolver,
    seen::SeenStore,
    view::{bind_rows, columns},
    CycleOutcome, FilterState, SeenVisibility, Session, Trigger,
};
use scanview_feeds::{FetchCoordinator, FetchProgress, HostingBase, HttpTransport};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    pub config: Config,
    pub base: HostingBase,
    pub storage: PathBuf,
    pub filter: FilterState,
    pub visibility: SeenVisibility,
}

/// Run one load cycle and return the session holding its records.
pub async fn load(opts: HeadlessOptions) -> anyhow::Result<Session> {
    let kv: Arc<dyn KeyValueStore> = Arc::new(
        JsonFileStore::open(&opts.storage)
            .with_context(|| format!("opening storage {}", opts.storage.display()))?,
    );
    let mut session = Session::new(SeenStore::open(kv));
    session.set_filter(opts.filter);
    session.set_visibility(opts.visibility);

    let candidates = resolver::resolve(&opts.base.hosting_context(), &opts.config.sources);
    let fetcher = FetchCoordinator::new(HttpTransport::new(opts.base, &opts.config.http)?);

    let ticket = session.begin_cycle(Trigger::Startup);
    let result = fetcher
        .load_from_with(&candidates, |progress| {
            if let FetchProgress::Trying(location) = progress {
                tracing::info!(%location, "trying");
            }
        })
        .await;

    match session.complete_cycle(ticket, result.map(|l| l.fetched)) {
        CycleOutcome::Rendered { source, records } => {
            tracing::info!(%source, records, "loaded");
            Ok(session)
        }
        CycleOutcome::Failed(err) => Err(err).context("loading findings"),
        CycleOutcome::Stale { .. } => anyhow::bail!("load cycle superseded"),
    }
}

/// Write the visible rows of `session` as tab-separated values.
pub fn write_tsv(session: &Session, out: &mut impl Write) -> std::io::Result<()> {
    let cols = columns();
    let header: Vec<&str> = cols.iter().map(|c| c.name).collect();
    writeln!(out, "{}", header.join("\t"))?;
    for row in bind_rows(session) {
        let cells: Vec<String> = cols.iter().map(|c| tsv_cell(&c.cell(&row).plain())).collect();
        writeln!(out, "{}", cells.join("\t"))?;
    }
    Ok(())
}

fn tsv_cell(value: &str) -> String {
    value.replace(['\t', '\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn loads_local_copy_and_prints_visible_rows() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("findings.csv"),
            "date_utc,message_id,url,keywords,snippet\n2024-01-01,1,http://a,x|y,\"multi\nline\"\n2024-01-02,2,,y,b\n",
        )
        .unwrap();
        let storage = dir.path().join("storage.json");
        std::fs::write(&storage, r#"{"seen_ids":"[\"2\"]"}"#).unwrap();

        let session = load(HeadlessOptions {
            config: Config::defaults(),
            base: HostingBase::Dir(dir.path().to_path_buf()),
            storage,
            filter: FilterState::default(),
            visibility: SeenVisibility::ShowAll,
        })
        .await
        .unwrap();

        let mut out = Vec::new();
        write_tsv(&session, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "seen\tdate_utc\tmessage_id\turl\tkeywords\tsnippet");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "x\t2024-01-02\t2\t\ty\tb");
    }
}
