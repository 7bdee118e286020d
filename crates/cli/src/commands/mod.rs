use clap::Subcommand;
use std::error::Error;

pub mod check;
pub mod plan;
pub mod randomize;
pub mod seed;

use thiserror::Error;

/// Errors raised while interpreting command line arguments.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the input or parsing a seed failed.
    #[error(transparent)]
    Core(#[from] shroud_core::Error),
    /// No record with the requested name.
    #[error("no record named '{0}' in input")]
    UnknownRecord(String),
}

/// CLI subcommands for Shroud.
#[derive(Subcommand)]
pub enum Cmd {
    /// Randomize every eligible record of a JSON translation unit.
    Randomize(randomize::RandomizeArgs),
    /// Show the cache-line buckets built for each record, before shuffling.
    Plan(plan::PlanArgs),
    /// Report whether each record would be randomized.
    Check(check::CheckArgs),
    /// Print a freshly generated seed.
    Seed(seed::SeedArgs),
}

/// Trait for executing CLI subcommands.
pub trait Command {
    /// Executes the subcommand.
    fn execute(self) -> Result<(), Box<dyn Error>>;
}

impl Command for Cmd {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        match self {
            Cmd::Randomize(args) => args.execute(),
            Cmd::Plan(args) => args.execute(),
            Cmd::Check(args) => args.execute(),
            Cmd::Seed(args) => args.execute(),
        }
    }
}

/// Reads a translation unit, narrowing it to one record when `only` is set.
pub fn load_unit(
    input: &str,
    only: Option<&str>,
) -> Result<shroud_core::TranslationUnit, CliError> {
    let mut unit = shroud_core::TranslationUnit::from_file(input)?;
    if let Some(name) = only {
        unit.records.retain(|record| record.name == name);
        if unit.records.is_empty() {
            return Err(CliError::UnknownRecord(name.to_string()));
        }
    }
    Ok(unit)
}
