use clap::Parser;
use commands::Cmd;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

pub mod commands;

/// Shroud CLI
///
/// Shroud randomizes the member order of structs marked `randomize_layout`,
/// keeping bitfield runs together and flexible array members last.
#[derive(Parser)]
#[command(name = "shroud")]
#[command(about = "Shroud: struct layout randomizer")]
pub struct Cli {
    /// Log every builder and shuffler step
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Cmd,
}

/// Level used when `RUST_LOG` does not say otherwise.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Log filter honouring `RUST_LOG`, falling back to [`default_level`].
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level(verbose).into())
        .from_env_lossy()
}
