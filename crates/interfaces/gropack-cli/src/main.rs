use anyhow::Context;
use clap::{Parser, Subcommand};
use gropack_cli::{commands, PackArgs};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about = "Packs the resources a game world depends on into a GRO archive")]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan inputs and pack their dependencies into an archive
    Pack(PackArgs),
    /// List dependencies without packing anything
    #[command(alias = "dep")]
    Deps(PackArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")?;

    match cli.command {
        Commands::Pack(args) => {
            commands::cmd_pack(&args)?;
        }
        Commands::Deps(args) => {
            commands::cmd_deps(&args)?;
        }
    }

    Ok(())
}
