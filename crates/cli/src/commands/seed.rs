//! Module for the `seed` subcommand.

use clap::Args;
use shroud_core::seed::Seed;
use std::error::Error;

/// Arguments for the `seed` subcommand.
#[derive(Args)]
pub struct SeedArgs {
    /// Derive the seed from this phrase instead of fresh entropy.
    #[arg(long)]
    phrase: Option<String>,
}

impl super::Command for SeedArgs {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        let seed = match self.phrase {
            Some(phrase) => Seed::from_phrase(&phrase),
            None => Seed::generate(),
        };
        println!("{}", seed.to_hex());
        Ok(())
    }
}
