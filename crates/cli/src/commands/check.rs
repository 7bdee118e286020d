//! Module for the `check` subcommand, which reports the randomization decision for each
//! record without changing anything.

use super::load_unit;
use clap::Args;
use shroud_core::LayoutDecision;
use std::error::Error;
use tracing::warn;

/// Arguments for the `check` subcommand.
#[derive(Args)]
pub struct CheckArgs {
    /// JSON file describing the records.
    pub input: String,
}

impl super::Command for CheckArgs {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        let unit = load_unit(&self.input, None)?;

        println!("{:<24} {:<9} {:<7} decision", "record", "randomize", "trivial");
        for record in &unit.records {
            let decision = LayoutDecision::for_record(record);
            if decision == LayoutDecision::Conflict {
                warn!(
                    "record '{}' has both randomize_layout and no_randomize_layout",
                    record.name
                );
            }
            println!(
                "{:<24} {:<9} {:<7} {}",
                record.name,
                decision.should_randomize(),
                record.is_trivially_randomizable(),
                decision.as_str()
            );
        }
        Ok(())
    }
}
