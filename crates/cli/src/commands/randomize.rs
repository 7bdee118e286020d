//! Module for the `randomize` subcommand, which rewrites the declaration order of every
//! record marked `randomize_layout` in a JSON translation unit.

use super::{load_unit, CliError};
use clap::Args;
use shroud_core::seed::Seed;
use shroud_core::Capacity;
use shroud_transform::randomizer::{randomize_unit, RandomizeConfig, UnitReport};
use shroud_transform::Strategy;
use std::error::Error;
use std::fs;

/// Arguments for the `randomize` subcommand.
#[derive(Args)]
pub struct RandomizeArgs {
    /// JSON file describing the records to randomize.
    pub input: String,
    /// 256-bit seed as 64 hex chars for reproducible layouts.
    #[arg(long, conflicts_with = "seed_phrase")]
    seed: Option<String>,
    /// Arbitrary seed string, hashed to 256 bits.
    #[arg(long)]
    seed_phrase: Option<String>,
    /// Bucket capacity in bits.
    #[arg(long, default_value_t = shroud_core::DEFAULT_CACHE_LINE_BITS)]
    cache_line: u64,
    /// Reorganization strategy (cache_line or plain).
    #[arg(long, default_value = "cache_line")]
    strategy: String,
    /// Only randomize the record with this name.
    #[arg(long)]
    record: Option<String>,
    /// Path to write the full JSON report (optional).
    #[arg(long)]
    emit: Option<String>,
}

impl super::Command for RandomizeArgs {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        let RandomizeArgs {
            input,
            seed,
            seed_phrase,
            cache_line,
            strategy,
            record,
            emit,
        } = self;

        let unit = load_unit(&input, record.as_deref())?;

        let seed = match (seed, seed_phrase) {
            (Some(hex), _) => Seed::from_hex(&hex).map_err(CliError::Core)?,
            (None, Some(phrase)) => Seed::from_phrase(&phrase),
            (None, None) => Seed::generate(),
        };

        let mut config = RandomizeConfig::with_seed(seed);
        config.capacity = Capacity::new(cache_line)?;
        config.strategy = strategy.parse::<Strategy>()?;

        let report = randomize_unit(&unit, &config)?;
        print_report(&report);

        if let Some(path) = emit.as_ref() {
            fs::write(path, serde_json::to_string_pretty(&report)?)?;
            println!("Wrote layout report to {}", path);
        }

        Ok(())
    }
}

fn print_report(report: &UnitReport) {
    println!("seed: {}", report.seed);
    for outcome in &report.records {
        if outcome.decision.should_randomize() {
            println!(
                "{}: [{}] -> [{}]",
                outcome.record.name,
                outcome.original_fields.join(", "),
                outcome.final_fields.join(", ")
            );
        } else {
            println!(
                "{}: unchanged ({})",
                outcome.record.name,
                outcome.decision.as_str()
            );
        }
    }
}
