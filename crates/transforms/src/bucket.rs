//! Buckets produced by the cache-line builder.
//!
//! ```text
//! declared:  a:i32  b:i32  x:1 y:1 z:1  c:i16  d:i64
//! buckets:   [a b]  [x y z]  [c]  [d]
//!            general  run  general  oversized
//! ```

use shroud_core::{Capacity, DeclId};

/// A sealed group of members, the unit of inter-group shuffling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bucket {
    /// Members packed up to one cache line. Shuffled internally.
    General { members: Vec<DeclId>, occupied: u64 },
    /// Adjacent non-zero-width bitfields in declaration order, plus the
    /// zero-width bitfield that ended the run, if any. Never shuffled
    /// internally.
    BitfieldRun {
        members: Vec<DeclId>,
        barrier: Option<DeclId>,
    },
    /// A single member at least as wide as a cache line.
    Oversized { member: DeclId, width: u64 },
    /// A zero-width bitfield that did not follow a bitfield run.
    Barrier { member: DeclId },
}

impl Bucket {
    pub fn general() -> Self {
        Bucket::General {
            members: Vec::new(),
            occupied: 0,
        }
    }

    pub fn bitfield_run() -> Self {
        Bucket::BitfieldRun {
            members: Vec::new(),
            barrier: None,
        }
    }

    /// Whether a member of `width` bits can be added without overflowing.
    pub fn can_fit(&self, width: u64, capacity: Capacity) -> bool {
        match self {
            Bucket::General { occupied, .. } => occupied.saturating_add(width) <= capacity.bits(),
            Bucket::BitfieldRun { .. } => true,
            Bucket::Oversized { .. } | Bucket::Barrier { .. } => false,
        }
    }

    /// Append a member. Only general buckets and runs grow; singletons are
    /// sealed on creation.
    pub(crate) fn push(&mut self, id: DeclId, width: u64) {
        match self {
            Bucket::General { members, occupied } => {
                members.push(id);
                *occupied = occupied.saturating_add(width);
            }
            Bucket::BitfieldRun { members, .. } => members.push(id),
            Bucket::Oversized { .. } | Bucket::Barrier { .. } => {
                debug_assert!(false, "push into sealed {} bucket", self.kind_name());
            }
        }
    }

    pub fn is_full(&self, capacity: Capacity) -> bool {
        match self {
            Bucket::General { occupied, .. } => *occupied >= capacity.bits(),
            Bucket::BitfieldRun { .. } => false,
            Bucket::Oversized { .. } | Bucket::Barrier { .. } => true,
        }
    }

    #[inline]
    pub fn is_bitfield_run(&self) -> bool {
        matches!(self, Bucket::BitfieldRun { .. })
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Bucket::General { members, .. } => members.is_empty(),
            Bucket::BitfieldRun { members, barrier } => members.is_empty() && barrier.is_none(),
            Bucket::Oversized { .. } | Bucket::Barrier { .. } => false,
        }
    }

    /// Number of declarations the bucket will emit.
    pub fn len(&self) -> usize {
        match self {
            Bucket::General { members, .. } => members.len(),
            Bucket::BitfieldRun { members, barrier } => members.len() + usize::from(barrier.is_some()),
            Bucket::Oversized { .. } | Bucket::Barrier { .. } => 1,
        }
    }

    /// Declarations in emission order.
    pub fn members(&self) -> Vec<DeclId> {
        let mut out = Vec::with_capacity(self.len());
        self.extend_into(&mut out);
        out
    }

    pub(crate) fn extend_into(&self, out: &mut Vec<DeclId>) {
        match self {
            Bucket::General { members, .. } => out.extend_from_slice(members),
            Bucket::BitfieldRun { members, barrier } => {
                out.extend_from_slice(members);
                out.extend(barrier.iter().copied());
            }
            Bucket::Oversized { member, .. } | Bucket::Barrier { member } => out.push(*member),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Bucket::General { .. } => "general",
            Bucket::BitfieldRun { .. } => "bitfield-run",
            Bucket::Oversized { .. } => "oversized",
            Bucket::Barrier { .. } => "barrier",
        }
    }
}
