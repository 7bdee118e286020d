//! Bucket shuffler.
//!
//! Bucket order is permuted first, then the members of every general bucket.
//! Bitfield runs, oversized members and barriers are emitted as they are.

use crate::bucket::Bucket;
use rand::seq::SliceRandom;
use rand::Rng;
use shroud_core::DeclId;
use tracing::debug;

/// Shuffle `buckets` and flatten them into the final member order.
pub fn shuffle<R: Rng + ?Sized>(mut buckets: Vec<Bucket>, rng: &mut R) -> Vec<DeclId> {
    buckets.shuffle(rng);

    let total = buckets.iter().map(Bucket::len).sum();
    let mut order = Vec::with_capacity(total);
    for mut bucket in buckets {
        if let Bucket::General { members, .. } = &mut bucket {
            members.shuffle(rng);
        }
        debug!(
            "shuffler: emitting {} bucket {:?}",
            bucket.kind_name(),
            bucket.members()
        );
        bucket.extend_into(&mut order);
    }
    order
}
