//! Record and translation-unit randomization pipeline.

use crate::reorganizer::Strategy;
use crate::Result;
use serde::{Deserialize, Serialize};
use shroud_core::seed::Seed;
use shroud_core::{Capacity, LayoutDecision, RecordDecl, TranslationUnit};
use tracing::{debug, info, warn};

/// Configuration for the randomization pipeline
#[derive(Debug, Clone)]
pub struct RandomizeConfig {
    /// Seed every record's RNG is derived from
    pub seed: Seed,
    /// General bucket capacity, in bits
    pub capacity: Capacity,
    /// Reorganization strategy applied to eligible records
    pub strategy: Strategy,
}

impl RandomizeConfig {
    /// Create config with a specific seed
    pub fn with_seed(seed: Seed) -> Self {
        Self {
            seed,
            capacity: Capacity::default(),
            strategy: Strategy::default(),
        }
    }
}

impl Default for RandomizeConfig {
    fn default() -> Self {
        Self::with_seed(Seed::generate())
    }
}

/// Result of randomizing one record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// The record with its final declaration order
    pub record: RecordDecl,
    /// What the randomization gate decided
    pub decision: LayoutDecision,
    /// Field names before randomization
    pub original_fields: Vec<String>,
    /// Field names after randomization
    pub final_fields: Vec<String>,
}

impl RecordOutcome {
    /// Whether the field order differs from the declared one.
    pub fn changed(&self) -> bool {
        self.original_fields != self.final_fields
    }
}

/// Result of randomizing a translation unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitReport {
    /// Seed used, as 0x-prefixed hex
    pub seed: String,
    /// Bucket capacity in bits
    pub capacity: u64,
    pub strategy: Strategy,
    pub records: Vec<RecordOutcome>,
}

impl UnitReport {
    /// Records whose layout was left alone because of conflicting attributes.
    pub fn conflicts(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.records
            .iter()
            .filter(|outcome| outcome.decision == LayoutDecision::Conflict)
    }

    pub fn into_unit(self) -> TranslationUnit {
        TranslationUnit {
            records: self
                .records
                .into_iter()
                .map(|outcome| outcome.record)
                .collect(),
        }
    }
}

/// Randomize a single record if its attributes allow it.
///
/// The record's RNG stream is derived from its name.
pub fn randomize_record(record: &RecordDecl, config: &RandomizeConfig) -> Result<RecordOutcome> {
    randomize_labelled(record, config, record.name.as_bytes())
}

fn randomize_labelled(
    record: &RecordDecl,
    config: &RandomizeConfig,
    label: &[u8],
) -> Result<RecordOutcome> {
    let decision = LayoutDecision::for_record(record);
    let original_fields = record.field_names();
    let mut record = record.clone();

    match decision {
        LayoutDecision::Randomize => {
            let reorganizer = config.strategy.reorganizer(config.capacity);
            let mut rng = config.seed.derive_rng(label);
            let order = reorganizer.reorganize(&record, &mut rng)?;
            record.commit(&order)?;
            info!(
                "{:>10} {} -> {:?}",
                reorganizer.name(),
                record.name,
                record.field_names()
            );
        }
        LayoutDecision::Conflict => {
            warn!(
                "record '{}' has both randomize_layout and no_randomize_layout; layout left unchanged",
                record.name
            );
        }
        other => {
            debug!("record '{}' not randomized: {}", record.name, other.as_str());
        }
    }

    let final_fields = record.field_names();
    Ok(RecordOutcome {
        record,
        decision,
        original_fields,
        final_fields,
    })
}

/// RNG label for the record at `index` of `unit`.
///
/// Named records use their name, so their layout does not move when other
/// records are added or removed. Anonymous records, and records whose name
/// is repeated in the unit, also mix in their position.
pub fn stream_label(unit: &TranslationUnit, index: usize) -> Vec<u8> {
    let Some(record) = unit.records.get(index) else {
        return Vec::new();
    };
    let repeated = unit
        .records
        .iter()
        .filter(|other| other.name == record.name)
        .nth(1)
        .is_some();
    if record.name.is_empty() || repeated {
        format!("{}#{index}", record.name).into_bytes()
    } else {
        record.name.as_bytes().to_vec()
    }
}

/// Randomize every record of `unit`, one after the other.
pub fn randomize_unit(unit: &TranslationUnit, config: &RandomizeConfig) -> Result<UnitReport> {
    debug!(
        "randomizing {} records (seed hash {}, capacity {}, strategy {})",
        unit.records.len(),
        config.seed.hash_hex(),
        config.capacity,
        config.strategy
    );

    let records = unit
        .records
        .iter()
        .enumerate()
        .map(|(index, record)| randomize_labelled(record, config, &stream_label(unit, index)))
        .collect::<Result<Vec<_>>>()?;

    Ok(UnitReport {
        seed: config.seed.to_hex(),
        capacity: config.capacity.bits(),
        strategy: config.strategy,
        records,
    })
}
