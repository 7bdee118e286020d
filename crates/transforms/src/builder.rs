//! Best-effort cache-line bucket builder.
//!
//! Members are read from a working queue. A member that does not fit the
//! bucket being filled goes to the back of the queue and is retried after the
//! others; once every remaining member has been skipped in a row the bucket is
//! closed and a fresh one started. This is first-fit with wraparound, not
//! optimal packing: the goal is an unpredictable grouping of roughly
//! cache-line sized chunks.
//!
//! Bitfields never enter a general bucket. Adjacent non-zero-width bitfields
//! collect into a single [`Bucket::BitfieldRun`], which any other member
//! closes. A zero-width bitfield closes the run and is pinned right after it.

use crate::bucket::Bucket;
use shroud_core::{Capacity, Member, MemberKind};
use std::collections::VecDeque;
use tracing::debug;

/// Group `members` into sealed buckets, in declaration-derived order.
///
/// Every member appears in exactly one bucket. Worst case is quadratic in the
/// number of members.
pub fn build(members: &[Member], capacity: Capacity) -> Vec<Bucket> {
    let mut queue: VecDeque<Member> = members.iter().copied().collect();
    let mut buckets = Vec::new();

    let mut current: Option<Bucket> = None;
    let mut run: Option<Bucket> = None;
    // Consecutive members deferred since the last successful placement.
    let mut skipped = 0usize;

    while !queue.is_empty() {
        if skipped >= queue.len() {
            debug!(
                "builder: {} members cannot join the current bucket, closing it",
                queue.len()
            );
            skipped = 0;
            if let Some(bucket) = current.take() {
                buckets.push(bucket);
            }
        }

        let Some(member) = queue.pop_front() else {
            break;
        };

        match member.kind {
            MemberKind::Bitfield => {
                run.get_or_insert_with(Bucket::bitfield_run)
                    .push(member.id, 0);
            }
            MemberKind::ZeroWidthBitfield => match run.take() {
                Some(Bucket::BitfieldRun { members, .. }) => {
                    debug!("builder: {} ends a run of {} bitfields", member.id, members.len());
                    buckets.push(Bucket::BitfieldRun {
                        members,
                        barrier: Some(member.id),
                    });
                }
                _ => {
                    debug!("builder: {} is a standalone barrier", member.id);
                    buckets.push(Bucket::Barrier { member: member.id });
                }
            },
            MemberKind::Regular { width } => {
                if let Some(sealed) = run.take() {
                    buckets.push(sealed);
                }

                if width >= capacity.bits() {
                    debug!("builder: {} ({} bits) is oversized", member.id, width);
                    buckets.push(Bucket::Oversized {
                        member: member.id,
                        width,
                    });
                    continue;
                }

                let bucket = current.get_or_insert_with(Bucket::general);
                if bucket.can_fit(width, capacity) {
                    bucket.push(member.id, width);
                    skipped = 0;
                    if bucket.is_full(capacity) {
                        if let Some(full) = current.take() {
                            buckets.push(full);
                        }
                    }
                } else {
                    skipped += 1;
                    queue.push_back(member);
                }
            }
        }
    }

    if let Some(bucket) = current.take() {
        buckets.push(bucket);
    }
    if let Some(bucket) = run.take() {
        buckets.push(bucket);
    }

    debug!(
        "builder: {} members packed into {} buckets ({} capacity)",
        members.len(),
        buckets.len(),
        capacity
    );
    buckets
}

/// One bucket per member, with bitfield runs and their barriers kept whole.
///
/// Used by the plain reorganizer, which shuffles the whole record without
/// regard for cache lines.
pub fn singletons(members: &[Member]) -> Vec<Bucket> {
    let mut buckets = Vec::with_capacity(members.len());
    let mut run: Option<Bucket> = None;

    for member in members {
        match member.kind {
            MemberKind::Bitfield => {
                run.get_or_insert_with(Bucket::bitfield_run)
                    .push(member.id, 0);
            }
            MemberKind::ZeroWidthBitfield => match run.take() {
                Some(Bucket::BitfieldRun { members, .. }) => buckets.push(Bucket::BitfieldRun {
                    members,
                    barrier: Some(member.id),
                }),
                _ => buckets.push(Bucket::Barrier { member: member.id }),
            },
            MemberKind::Regular { width } => {
                if let Some(sealed) = run.take() {
                    buckets.push(sealed);
                }
                buckets.push(Bucket::General {
                    members: vec![member.id],
                    occupied: width,
                });
            }
        }
    }

    if let Some(sealed) = run.take() {
        buckets.push(sealed);
    }
    buckets
}
