pub mod capacity;
pub mod policy;
pub mod record;
pub mod result;
pub mod seed;

pub use capacity::{Capacity, DEFAULT_CACHE_LINE_BITS};
pub use policy::{should_randomize, LayoutDecision};
pub use record::{
    Decl, DeclId, FieldDecl, LayoutAttrs, Member, MemberKind, OtherDecl, RecordDecl, RecordKind,
    TranslationUnit,
};
pub use result::{Error, Result};
