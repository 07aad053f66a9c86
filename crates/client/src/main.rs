//! `posboard` command line client.

#[cfg(feature = "http")]
mod cli {
    use std::path::PathBuf;
    use std::rc::Rc;

    use anyhow::{Context, Result, bail};
    use clap::{Parser, Subcommand};
    use serde::Deserialize;

    use posboard_client::config::ClientConfig;
    use posboard_client::grid::{GridEvent, MemoryGrid};
    use posboard_client::http::HttpTransport;
    use posboard_client::listing::{ListingCell, ListingKind};
    use posboard_client::lookup::{LookupOutcome, TokioDelay};
    use posboard_client::pages::{ProductListPage, StockAdjustmentWorkbench};
    use posboard_client::types::Pagination;
    use posboard_core::InventoryId;

    #[derive(Parser)]
    #[command(name = "posboard")]
    #[command(about = "Product and stock management against a POS server", long_about = None)]
    #[command(version)]
    pub struct Cli {
        /// Overrides POSBOARD_BASE_URL.
        #[arg(long, global = true)]
        pub base_url: Option<String>,

        #[command(subcommand)]
        pub command: Commands,
    }

    #[derive(Subcommand)]
    pub enum Commands {
        /// List batches offered for a stock adjustment.
        Search { term: String },

        /// Apply target stock levels from a JSON file of `[{"id": .., "newstock": ..}]`.
        Adjust { file: PathBuf },

        /// Print the product listing.
        Products {
            #[arg(long, default_value = "1")]
            page: u32,

            #[arg(long, default_value = "10")]
            per_page: u32,
        },
    }

    #[derive(Debug, Deserialize)]
    struct Target {
        id: InventoryId,
        newstock: i64,
    }

    pub async fn run() -> Result<()> {
        let cli = Cli::parse();
        let mut config = ClientConfig::from_env();
        if let Some(url) = cli.base_url {
            config = config.with_base_url(url);
        }
        let endpoint = config.endpoints.stock_adjustment.clone();
        let product_list = config.endpoints.product_list.clone();
        let settings = config.lookup_settings();
        let transport = Rc::new(HttpTransport::new(config));

        match cli.command {
            Commands::Search { term } => {
                let bench = StockAdjustmentWorkbench::new(
                    transport,
                    TokioDelay,
                    settings,
                    MemoryGrid::new(),
                    MemoryGrid::new(),
                    endpoint,
                );
                match bench.search(&term).await {
                    LookupOutcome::Results(candidates) if candidates.is_empty() => {
                        println!("no candidates for `{term}`");
                    }
                    LookupOutcome::Results(candidates) => {
                        for c in candidates {
                            println!(
                                "{:>6}  {}  {:<40}  saldo {}",
                                c.id,
                                c.date_joined,
                                c.label(),
                                c.saldo.normalize()
                            );
                        }
                    }
                    LookupOutcome::TooShort => {
                        bail!("search term must have at least {} characters", settings.min_term_len)
                    }
                    LookupOutcome::Superseded => {}
                }
            }
            Commands::Adjust { file } => {
                let raw = std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                let targets: Vec<Target> = serde_json::from_str(&raw)
                    .with_context(|| format!("failed to parse {}", file.display()))?;

                let mut bench = StockAdjustmentWorkbench::new(
                    transport,
                    TokioDelay,
                    settings,
                    MemoryGrid::new(),
                    MemoryGrid::new(),
                    endpoint,
                );
                bench.open_staged("").await;
                for target in &targets {
                    let position = bench
                        .staged()
                        .candidates()
                        .iter()
                        .position(|c| c.id == target.id)
                        .with_context(|| format!("inventory batch {} not found", target.id))?;
                    let key = bench
                        .staged()
                        .grid()
                        .target()
                        .key_at(position)
                        .context("staged table out of sync")?;
                    let added = bench
                        .staged_event(GridEvent::add(key))?
                        .context("batch could not be added")?;
                    let row = bench
                        .grid()
                        .target()
                        .key_at(added)
                        .context("detail table out of sync")?;
                    bench.handle(GridEvent::commit(row, "newstock", &target.newstock.to_string()))?;
                }

                for line in bench.lines() {
                    println!("{:>6}  {:<40}  {} -> {}", line.id, line.product_name, line.saldo.normalize(), line.newstock);
                }
                bench.submit().await?;
                println!("{} line(s) adjusted", targets.len());
            }
            Commands::Products { page, per_page } => {
                let mut listing = ProductListPage::new(transport, ListingKind::Basic, product_list)
                    .with_pagination(Pagination::new(Some(page), Some(per_page)));
                listing.load().await?;
                let current = listing.go_to(page);
                println!("{}", ListingKind::Basic.headers().join(" | "));
                for row in &current.items {
                    let cells: Vec<String> = row
                        .cells(listing.listing().base_url())
                        .iter()
                        .map(cell_text)
                        .collect();
                    println!("{}", cells.join(" | "));
                }
                let (from, to) = current.meta.range();
                println!("{from}-{to} of {} (page {}/{})", current.meta.total, current.meta.page, current.meta.total_pages);
            }
        }
        Ok(())
    }

    fn cell_text(cell: &ListingCell) -> String {
        match cell {
            ListingCell::Text(t) => t.clone(),
            ListingCell::Badge { text, .. } => text.clone(),
            ListingCell::Lines(lines) => lines.join("; "),
            ListingCell::Button(_) => String::new(),
            ListingCell::Links { edit, .. } => edit.clone(),
        }
    }
}

#[cfg(feature = "http")]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    posboard_observability::init();
    cli::run().await
}

#[cfg(not(feature = "http"))]
fn main() {
    eprintln!("This binary requires the 'http' feature to be enabled.");
    eprintln!("Build with: cargo build --features http");
    std::process::exit(1);
}
