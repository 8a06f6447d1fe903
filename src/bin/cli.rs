//! ax-observe CLI
//!
//! Snapshots a page (from a saved capture file, or a live Chrome tab with
//! the `chrome` feature) and prints the interactive surface as one line per
//! element, or resolves a previously issued element identifier.

use anyhow::{bail, Context, Result};
use ax_observe::page::PageTree;
use ax_observe::prompt::{format_element_line, format_tree_summary, prune_for_prompt};
use ax_observe::snapshot::{observe, resolve_eid};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ax-observe", version, about = "Page-structure observation for AI agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a snapshot and print it
    Snapshot {
        #[command(flatten)]
        source: Source,

        /// Prune to at most this many elements before printing
        #[arg(long, default_value_t = 50)]
        top_k: usize,

        /// Print the full snapshot as JSON instead of element lines
        #[arg(long)]
        json: bool,
    },
    /// Resolve an element identifier against the current page state
    Resolve {
        #[command(flatten)]
        source: Source,

        /// Identifier issued by an earlier snapshot (e.g. e-9f03c2a1)
        eid: String,
    },
}

#[derive(clap::Args)]
struct Source {
    /// Read a page capture from a JSON file (the capture_page.js payload)
    #[cfg_attr(feature = "chrome", arg(long, conflicts_with = "url"))]
    #[cfg_attr(not(feature = "chrome"), arg(long))]
    file: Option<std::path::PathBuf>,

    /// Navigate a headless Chrome tab to this URL and capture it
    #[cfg(feature = "chrome")]
    #[arg(long)]
    url: Option<String>,
}

impl Source {
    fn load(&self) -> Result<PageTree> {
        if let Some(path) = &self.file {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            return PageTree::from_json(&json).context("failed to parse capture file");
        }

        #[cfg(feature = "chrome")]
        if let Some(url) = &self.url {
            return capture_url(url);
        }

        bail!("no page source given; pass --file (or --url with the chrome feature)");
    }
}

#[cfg(feature = "chrome")]
fn capture_url(url: &str) -> Result<PageTree> {
    let browser = headless_chrome::Browser::default()
        .map_err(|e| anyhow::anyhow!("failed to launch Chrome: {}", e))?;
    let tab = browser.new_tab().map_err(|e| anyhow::anyhow!("failed to open tab: {}", e))?;
    tab.navigate_to(url).map_err(|e| anyhow::anyhow!("navigation failed: {}", e))?;
    tab.wait_until_navigated().map_err(|e| anyhow::anyhow!("navigation timeout: {}", e))?;
    Ok(PageTree::from_tab(&tab)?)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Snapshot { source, top_k, json } => {
            let tree = source.load()?;
            let snapshot = observe(&tree);

            if let Some(error) = &snapshot.error {
                bail!("extraction failed: {}", error);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                println!("{}", format_tree_summary(&snapshot.tree_summary));
                for element in prune_for_prompt(&snapshot.elements, top_k) {
                    println!("{}", format_element_line(&element));
                }
                if snapshot.element_count > top_k {
                    println!("... ({} of {} elements shown)", top_k, snapshot.element_count);
                }
            }
        }
        Command::Resolve { source, eid } => {
            let tree = source.load()?;
            let resolution = resolve_eid(&tree, &eid);
            println!("{}", serde_json::to_string_pretty(&resolution)?);
            if !resolution.found {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
