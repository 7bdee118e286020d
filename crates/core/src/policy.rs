//! Whether a record's layout may be randomized at all.

use crate::record::RecordDecl;
use serde::{Deserialize, Serialize};

/// Gate consulted before any randomization is attempted.
///
/// Unions are never randomized: every member aliases the same storage, so
/// member order carries no layout. When both `randomize_layout` and
/// `no_randomize_layout` are present the opt-out wins and the caller is
/// expected to warn.
pub fn should_randomize(is_union: bool, has_randomize: bool, has_no_randomize: bool) -> bool {
    if is_union {
        return false;
    }
    has_randomize && !has_no_randomize
}

/// Outcome of the randomization gate for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDecision {
    /// Marked with `randomize_layout` only.
    Randomize,
    /// No layout attribute present.
    Unmarked,
    /// Marked with `no_randomize_layout` only.
    OptedOut,
    /// Both attributes present; layout is left alone.
    Conflict,
    /// Unions keep their declared order.
    Union,
}

impl LayoutDecision {
    pub fn for_record(record: &RecordDecl) -> Self {
        let attrs = &record.attrs;
        if record.is_union() {
            return Self::Union;
        }
        match (attrs.randomize_layout, attrs.no_randomize_layout) {
            (true, true) => Self::Conflict,
            (true, false) => Self::Randomize,
            (false, true) => Self::OptedOut,
            (false, false) => Self::Unmarked,
        }
    }

    #[inline]
    pub fn should_randomize(self) -> bool {
        matches!(self, Self::Randomize)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Randomize => "randomize",
            Self::Unmarked => "unmarked",
            Self::OptedOut => "no_randomize_layout",
            Self::Conflict => "conflicting attributes",
            Self::Union => "union",
        }
    }
}
