//! Field reorganization strategies.

use crate::randomize::randomize_with;
use crate::{builder, Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use shroud_core::{Capacity, DeclId, RecordDecl};
use std::fmt;
use std::str::FromStr;

/// A strategy that proposes a new declaration order for a record.
pub trait Reorganizer: Send + Sync {
    /// Returns the strategy's name for logging and identification.
    fn name(&self) -> &'static str;
    /// Returns a permutation of every declaration of `record`.
    fn reorganize(&self, record: &RecordDecl, rng: &mut StdRng) -> Result<Vec<DeclId>>;
}

/// Cache-line bucketing followed by bucket and member shuffling.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheLine {
    pub capacity: Capacity,
}

impl CacheLine {
    pub fn new(capacity: Capacity) -> Self {
        Self { capacity }
    }
}

impl Reorganizer for CacheLine {
    fn name(&self) -> &'static str {
        "CacheLine"
    }

    fn reorganize(&self, record: &RecordDecl, rng: &mut StdRng) -> Result<Vec<DeclId>> {
        Ok(randomize_with(record, rng, |fields| {
            builder::build(fields, self.capacity)
        }))
    }
}

/// Uniform shuffle of every member, ignoring cache lines. Bitfield runs,
/// barriers and the flexible array tail are still honoured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Reorganizer for Plain {
    fn name(&self) -> &'static str {
        "Plain"
    }

    fn reorganize(&self, record: &RecordDecl, rng: &mut StdRng) -> Result<Vec<DeclId>> {
        if !record.is_trivially_randomizable() {
            return Ok(randomize_with(record, rng, builder::singletons));
        }

        let (mut fields, others): (Vec<_>, Vec<_>) = record
            .iter()
            .map(|(id, decl)| (id, decl.as_field().is_some()))
            .partition(|(_, is_field)| *is_field);
        fields.shuffle(rng);
        Ok(others
            .into_iter()
            .chain(fields)
            .map(|(id, _)| id)
            .collect())
    }
}

/// Selectable reorganization strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    CacheLine,
    Plain,
}

impl Strategy {
    pub fn reorganizer(self, capacity: Capacity) -> Box<dyn Reorganizer> {
        match self {
            Strategy::CacheLine => Box::new(CacheLine::new(capacity)),
            Strategy::Plain => Box::new(Plain),
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim() {
            "cache_line" | "cacheline" | "perf" => Ok(Strategy::CacheLine),
            "plain" | "shuffle" => Ok(Strategy::Plain),
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::CacheLine => "cache_line",
            Strategy::Plain => "plain",
        })
    }
}
