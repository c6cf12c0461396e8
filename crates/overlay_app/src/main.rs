//! Command-line host for the overlay: applies the preferences to a saved
//! page and prints what the user would see.

mod logging;
mod report;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use overlay_core::EntryVisibility;
use overlay_engine::{
    LocalPreferenceStore, OverlayRuntime, PageDocument, PageEvent, PreferenceStore,
    RuntimeSettings,
};
use overlay_logging::{overlay_info, overlay_warn};

use crate::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(name = "overlay")]
#[command(about = "Hide and mark list entries the user is not interested in", long_about = None)]
#[command(version)]
struct Cli {
    /// Saved host page (HTML, any encoding)
    #[arg(short, long)]
    page: PathBuf,

    /// Content-Type the page was served with, for its charset
    #[arg(long)]
    content_type: Option<String>,

    /// Directory holding preferences.json. Without it nothing is persisted.
    #[arg(short, long)]
    state_dir: Option<PathBuf>,

    /// Store this visibility mode before the page loads
    #[arg(long)]
    visibility: Option<EntryVisibility>,

    /// Mark a name as not interested before the page loads
    #[arg(long, value_name = "NAME")]
    mark: Vec<String>,

    /// Click the injected control of this entry
    #[arg(long, value_name = "NAME")]
    click: Vec<String>,

    /// Remove a name from the ignored list while the page is open
    #[arg(long, value_name = "NAME")]
    unmark: Vec<String>,

    #[arg(long, value_enum, default_value = "terminal")]
    log: LogDestination,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(cli.log, level);

    let bytes = std::fs::read(&cli.page)
        .with_context(|| format!("reading page {}", cli.page.display()))?;
    let dom = PageDocument::from_bytes(&bytes, cli.content_type.as_deref())
        .with_context(|| format!("decoding page {}", cli.page.display()))?;

    let store = Arc::new(match &cli.state_dir {
        Some(dir) => LocalPreferenceStore::open(dir)
            .with_context(|| format!("opening preferences in {}", dir.display()))?,
        None => LocalPreferenceStore::in_memory(),
    });
    if let Some(visibility) = cli.visibility {
        store.set_entry_visibility(visibility).await?;
    }
    for name in &cli.mark {
        store.add_ignored_name(name).await?;
    }

    let mut runtime =
        OverlayRuntime::start(dom, Arc::clone(&store), RuntimeSettings::default()).await?;
    runtime.handle_page_event(PageEvent::Mutated);

    for name in &cli.click {
        match runtime.controller().control_for(name).copied() {
            Some(button) => runtime.handle_page_event(PageEvent::Clicked(button)),
            None => overlay_warn!("no control for {:?} on this page", name),
        }
    }
    runtime.flush().await;

    if !cli.unmark.is_empty() {
        store.remove_ignored_names(&cli.unmark).await?;
    }
    runtime.pump_storage_changes().await;

    let controller = runtime.controller();
    let entries = controller.report(runtime.dom());
    overlay_info!("reporting {} entries", entries.len());
    print!(
        "{}",
        report::render(controller.variant(), controller.state().visibility(), &entries)
    );
    Ok(())
}
