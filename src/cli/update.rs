use std::path::{Path, PathBuf};

use clap::Args;

use crate::cli::OutputFormat;
use crate::loader;

#[derive(Args)]
pub struct UpdateArgs {
    /// URL of the Super Check Partial database
    #[arg(long, default_value = loader::DEFAULT_URL)]
    pub url: String,

    /// Where to store the local copy (default: ~/.config/hamradio/MASTER.SCP)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Download even if the local copy is up to date
    #[arg(long)]
    pub force: bool,
}

/// Execute update subcommand
///
/// # Errors
///
/// Returns an error if the download fails or the local copy cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: UpdateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let path = match args.output {
        Some(path) => path,
        None => loader::local_filename()?,
    };

    if verbose {
        eprintln!("Checking {} for {}", args.url, path.display());
    }

    let updated = if args.force {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(loader::download(&args.url, &path))?;
        true
    } else {
        update_local_copy(&args.url, &path)?
    };

    match format {
        OutputFormat::Text => {
            if updated {
                println!("Updated local copy: {}", path.display());
            } else {
                println!("Local copy is up to date: {}", path.display());
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "url": args.url,
                "path": path.display().to_string(),
                "updated": updated,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("path\tupdated");
            println!("{}\t{updated}", path.display());
        }
    }

    Ok(())
}

/// Run [`loader::update`] to completion on a fresh runtime
///
/// # Errors
///
/// Returns an error if the runtime cannot be started or the update fails.
pub fn update_local_copy(url: &str, path: &Path) -> anyhow::Result<bool> {
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(loader::update(url, path))?)
}
