//! TKB Paper Table - Command Line Entry Point
//!
//! Loads the first window of the paper list for an optional title search
//! and prints it, driving the same adapter a virtualized table would.

use std::time::Duration;

use tkb_papers::config::load_config;
use tkb_papers::constants::DEMO_WINDOW_ROWS;
use tkb_papers::domain::PaperQuery;
use tkb_papers::services::{block_on, runtime_handle, HttpPaperSource, TableEvent};
use tkb_papers::table::{PagedDataProvider, ViewportLoader, VirtualizationAdapter};

const COUNT_WAIT: Duration = Duration::from_secs(30);

fn main() -> anyhow::Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting TKB paper table...");

    let config = load_config()?;
    let title = std::env::args().nth(1).unwrap_or_default();
    let query = PaperQuery::new().with_title(title).key();

    let source = HttpPaperSource::new(&config)?;
    tracing::info!("Reading papers from {}", source.papers_url());

    let adapter = VirtualizationAdapter::new(source, query, runtime_handle());
    let mut loader = ViewportLoader::from_config(&config);
    let events = adapter.events();

    loop {
        match events.recv_timeout(COUNT_WAIT)? {
            TableEvent::CountResolved { count, .. } => {
                tracing::info!("{} papers match", count);
                break;
            }
            TableEvent::CountFailed { message, .. } => {
                anyhow::bail!("count query failed: {message}");
            }
            event => {
                loader.handle_event(&event);
            }
        }
    }

    let row_count = adapter.row_count();
    if row_count == 0 {
        println!("No papers.");
        adapter.unmount();
        return Ok(());
    }

    let last_visible = DEMO_WINDOW_ROWS.min(row_count) - 1;
    block_on(loader.load_visible(&adapter, 0, last_visible));

    for index in 0..=last_visible {
        let paper = adapter.row(index);
        println!("{:>5}  {:<24}  {}", index, paper.id, paper.title);
    }

    adapter.unmount();
    Ok(())
}
