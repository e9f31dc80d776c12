use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use ringbuilder::build::SystemClipboard;
use ringbuilder::catalog::{load_catalog, sample_catalog};
use ringbuilder::config::resolve_config;
use ringbuilder::pricing::format_gbp;
use ringbuilder::tier::TierSelection;
use ringbuilder::{init_logging, Catalog, Configurator, Dimension};

/// Configure rings from a catalog and produce shareable build links.
#[derive(Debug, Parser)]
#[command(name = "ringbuilder", version, about)]
struct Cli {
    /// Catalog file (TOML or JSON). Defaults to the built-in demo catalog.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Engine config file. Defaults to the user config dir, if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output (skipped link fields, ignored edits)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List catalog products
    Products,

    /// Price a configuration and print it as JSON
    Quote {
        /// Product id
        product: String,

        /// Shared link or query string to restore first
        #[arg(long)]
        link: Option<String>,

        /// Edits applied in order, as `dimension=label` (e.g. `metal=Platinum`)
        #[arg(long = "set", value_name = "DIM=LABEL")]
        sets: Vec<String>,

        /// Tier to apply after the edits
        #[arg(long)]
        tier: Option<String>,

        /// Switch engraving on with this text
        #[arg(long, conflicts_with = "no_engrave")]
        engrave: Option<String>,

        /// Switch engraving off
        #[arg(long)]
        no_engrave: bool,

        /// Copy the resulting share link to the system clipboard
        #[arg(long)]
        copy: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "warn" });

    let config = resolve_config(cli.config.as_deref())?;
    let catalog = match &cli.catalog {
        Some(path) => load_catalog(path)?,
        None => sample_catalog().context("Built-in catalog is invalid")?,
    };

    match cli.command {
        Command::Products => list_products(&catalog),
        Command::Quote {
            product,
            link,
            sets,
            tier,
            engrave,
            no_engrave,
            copy,
        } => {
            let product = catalog
                .product(&product)
                .ok_or_else(|| anyhow!("Unknown product '{}'", product))?;

            let mut configurator = match &link {
                Some(link) => Configurator::from_link(product, &config, link),
                None => Configurator::new(product, &config),
            };

            for edit in &sets {
                let (dimension, label) = parse_edit(edit)?;
                configurator.set_dimension(dimension, label)?;
            }

            if let Some(tier) = &tier {
                if configurator.select_tier(tier)? == TierSelection::RequiresConsultation {
                    eprintln!("Tier '{}' requires a consultation; selection unchanged", tier);
                }
            }

            if let Some(text) = &engrave {
                configurator.set_engraving(true, text)?;
            } else if no_engrave {
                configurator.set_engraving(false, "")?;
            }

            println!("{}", serde_json::to_string_pretty(&configurator.view())?);

            if copy {
                let clipboard = SystemClipboard::detect();
                if configurator.copy_link(&clipboard).await {
                    eprintln!("Link copied to clipboard");
                } else {
                    eprintln!("Could not copy link; share it from the output above");
                }
            }
            Ok(())
        }
    }
}

fn list_products(catalog: &Catalog) -> Result<()> {
    info!("Listing {} products", catalog.len());
    for product in catalog.products() {
        let dimensions: Vec<String> = product
            .domain()
            .supported()
            .map(|d| d.to_string())
            .collect();
        println!(
            "{:<24} {:<28} {:>10}  {}",
            product.id(),
            product.name(),
            format_gbp(product.base_price()),
            dimensions.join(", ")
        );
    }
    Ok(())
}

/// `metal=Platinum` sets a pick, `metal=` clears it.
fn parse_edit(edit: &str) -> Result<(Dimension, Option<&str>)> {
    let Some((dimension, label)) = edit.split_once('=') else {
        bail!("Expected DIM=LABEL, got '{}'", edit);
    };
    let dimension: Dimension = dimension.parse().map_err(|e: String| anyhow!(e))?;
    let label = label.trim();
    Ok((dimension, (!label.is_empty()).then_some(label)))
}
