use clap::Parser;
use tracing_subscriber::EnvFilter;

use supercheck::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("supercheck=debug,info")
    } else {
        EnvFilter::new("supercheck=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Find(args) => {
            cli::find::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Update(args) => {
            cli::update::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
