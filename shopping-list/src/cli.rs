use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shopping_list_core::cart::FileCartSource;
use shopping_list_core::contract::ArtifactFormat;
use shopping_list_core::export::export;

use crate::load_config::{default_config, load_config};

/// CLI for shopping-list: export a user's consolidated shopping list.
#[derive(Parser)]
#[clap(
    name = "shopping-list",
    version,
    about = "Aggregate the recipes in a user's cart into a downloadable shopping list"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export the shopping list of one user as text or PDF
    Export {
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Cart file (.yaml, .yml or .json) with recipes and carts
        #[clap(long)]
        cart: PathBuf,
        /// Owner of the cart to export
        #[clap(long)]
        user: String,
        /// Output format, overrides the config file (text or pdf)
        #[clap(long)]
        format: Option<ArtifactFormat>,
        /// Directory the artifact is written to, overrides the config file
        #[clap(long)]
        output_dir: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    let result = match cli.command {
        Commands::Export {
            config,
            cart,
            user,
            format,
            output_dir,
        } => run_export(config, cart, user, format, output_dir).await,
    };

    let exit_span = tracing::info_span!("exit");
    exit_span.in_scope(|| {
        tracing::info!(success = result.is_ok(), "exit");
    });

    result
}

async fn run_export(
    config: Option<PathBuf>,
    cart: PathBuf,
    user: String,
    format: Option<ArtifactFormat>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut app_config = match config {
        Some(path) => load_config(path)?,
        None => default_config()?,
    };
    if let Some(format) = format {
        app_config.export.format = format;
    }
    if let Some(output_dir) = output_dir {
        app_config.output_dir = output_dir;
    }

    println!("Export starting...");
    let source = FileCartSource::new(cart);
    let report = match export(&app_config.export, &source, &user).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("[ERROR] Export failed: {}", e);
            return Err(anyhow::Error::new(e).context(format!("Export failed for user '{user}'")));
        }
    };

    fs::create_dir_all(&app_config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            app_config.output_dir.display()
        )
    })?;
    let target = app_config.output_dir.join(&report.artifact.filename);
    fs::write(&target, &report.artifact.content)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    tracing::info!(path = %target.display(), "Wrote shopping list");

    println!("Export complete.");
    println!(
        "user: {}\ningredient lines: {}\ndistinct items: {}\npages: {}\ncontent type: {}\nwritten to: {}",
        report.user,
        report.input_lines,
        report.distinct_lines,
        report.pages,
        report.artifact.content_type,
        target.display()
    );
    Ok(())
}
