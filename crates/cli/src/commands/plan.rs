//! Module for the `plan` subcommand, which prints the buckets the cache-line builder forms
//! for each record before any shuffling happens.

use super::load_unit;
use clap::Args;
use shroud_core::{Capacity, RecordDecl};
use shroud_transform::builder;
use shroud_transform::Partition;
use std::error::Error;

/// Arguments for the `plan` subcommand.
#[derive(Args)]
pub struct PlanArgs {
    /// JSON file describing the records.
    pub input: String,
    /// Bucket capacity in bits.
    #[arg(long, default_value_t = shroud_core::DEFAULT_CACHE_LINE_BITS)]
    cache_line: u64,
    /// Only show the record with this name.
    #[arg(long)]
    record: Option<String>,
}

impl super::Command for PlanArgs {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        let unit = load_unit(&self.input, self.record.as_deref())?;
        let capacity = Capacity::new(self.cache_line)?;

        for record in &unit.records {
            print_plan(record, capacity);
        }
        Ok(())
    }
}

fn print_plan(record: &RecordDecl, capacity: Capacity) {
    let name_of = |id| record.decl(id).map(|decl| display_name(decl.name())).unwrap_or("?");
    let partition = Partition::of(record);

    println!("{} ({} per bucket)", record.name, capacity);
    if !partition.others.is_empty() {
        let others: Vec<_> = partition.others.iter().map(|id| name_of(*id)).collect();
        println!("  pinned first: {}", others.join(", "));
    }
    for (idx, bucket) in builder::build(&partition.fields, capacity).iter().enumerate() {
        let members: Vec<_> = bucket.members().into_iter().map(name_of).collect();
        println!("  [{idx}] {:<12} {}", bucket.kind_name(), members.join(", "));
    }
    if let Some(tail) = partition.tail {
        println!("  pinned last: {}", name_of(tail));
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "<unnamed>"
    } else {
        name
    }
}
