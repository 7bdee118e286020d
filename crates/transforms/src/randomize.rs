//! Record-level partitioning and reassembly around the builder and shuffler.

use crate::bucket::Bucket;
use crate::{builder, shuffler};
use rand::Rng;
use shroud_core::{Capacity, DeclId, Member, RecordDecl};

/// A record's declarations split by how they take part in randomization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Non-field declarations, in declaration order. Never moved relative to
    /// each other and always emitted first.
    pub others: Vec<DeclId>,
    /// Data members handed to the builder.
    pub fields: Vec<Member>,
    /// Trailing flexible array member, always emitted last.
    pub tail: Option<DeclId>,
}

impl Partition {
    pub fn of(record: &RecordDecl) -> Self {
        let mut partition = Partition::default();
        let last_field = record.fields().last().map(|(id, _)| id);

        for (id, decl) in record.iter() {
            match decl.as_field() {
                Some(field) if field.incomplete_array && Some(id) == last_field => {
                    partition.tail = Some(id);
                }
                Some(field) => partition.fields.push(field.member(id)),
                None => partition.others.push(id),
            }
        }
        partition
    }

    /// `others ++ shuffled ++ tail`.
    pub fn reassemble(&self, shuffled: Vec<DeclId>) -> Vec<DeclId> {
        let mut order = Vec::with_capacity(self.others.len() + shuffled.len() + 1);
        order.extend_from_slice(&self.others);
        order.extend(shuffled);
        order.extend(self.tail);
        order
    }
}

/// Randomize the declaration order of `record` with the cache-line strategy.
///
/// Returns a permutation of every declaration handle; the record itself is
/// not modified. Committing the order is up to the caller.
pub fn randomize_layout<R: Rng + ?Sized>(
    record: &RecordDecl,
    capacity: Capacity,
    rng: &mut R,
) -> Vec<DeclId> {
    randomize_with(record, rng, |fields| builder::build(fields, capacity))
}

pub(crate) fn randomize_with<R, F>(record: &RecordDecl, rng: &mut R, group: F) -> Vec<DeclId>
where
    R: Rng + ?Sized,
    F: FnOnce(&[Member]) -> Vec<Bucket>,
{
    let partition = Partition::of(record);
    let buckets = group(&partition.fields);
    let shuffled = shuffler::shuffle(buckets, rng);
    partition.reassemble(shuffled)
}
