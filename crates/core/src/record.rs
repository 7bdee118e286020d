//! Aggregate (struct/union) declarations as seen by the layout randomizer.
//!
//! A [`RecordDecl`] owns its declarations in source order. Everything the
//! randomizer produces refers back to them through [`DeclId`] handles, which
//! are plain indices into [`RecordDecl::decls`]; the record only changes when
//! a finished order is committed with [`RecordDecl::commit`].

use crate::result::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to one declaration of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclId(pub usize);

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a data member takes part in bucket packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Ordinary data member with its declared width in bits.
    Regular { width: u64 },
    /// Bitfield with a non-zero width. Its type width is irrelevant to packing.
    Bitfield,
    /// `int : 0` style alignment barrier. Carries no storage.
    ZeroWidthBitfield,
}

/// A data member handed to the bucket builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub id: DeclId,
    pub kind: MemberKind,
}

impl Member {
    pub fn regular(id: DeclId, width: u64) -> Self {
        Self {
            id,
            kind: MemberKind::Regular { width },
        }
    }

    pub fn bitfield(id: DeclId) -> Self {
        Self {
            id,
            kind: MemberKind::Bitfield,
        }
    }

    pub fn zero_width_bitfield(id: DeclId) -> Self {
        Self {
            id,
            kind: MemberKind::ZeroWidthBitfield,
        }
    }

    #[inline]
    pub fn is_bitfield(&self) -> bool {
        matches!(
            self.kind,
            MemberKind::Bitfield | MemberKind::ZeroWidthBitfield
        )
    }

    #[inline]
    pub fn is_zero_width_bitfield(&self) -> bool {
        matches!(self.kind, MemberKind::ZeroWidthBitfield)
    }

    /// Declared width in bits. Bitfields report zero.
    #[inline]
    pub fn width(&self) -> u64 {
        match self.kind {
            MemberKind::Regular { width } => width,
            MemberKind::Bitfield | MemberKind::ZeroWidthBitfield => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    Struct,
    Union,
}

/// Layout attributes attached to a record.
///
/// `packed` and `aligned` are carried through untouched; the layout engine
/// that runs after randomization applies them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutAttrs {
    pub randomize_layout: bool,
    pub no_randomize_layout: bool,
    pub packed: bool,
    pub aligned: Option<u64>,
}

/// A data member declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Empty for unnamed members such as zero-width bitfields.
    #[serde(default)]
    pub name: String,
    /// Width of the declared type in bits.
    #[serde(default)]
    pub width: u64,
    /// Present for bitfields, including zero-width ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_width: Option<u32>,
    /// Trailing `T name[]` member.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub incomplete_array: bool,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, width: u64) -> Self {
        Self {
            name: name.into(),
            width,
            bit_width: None,
            incomplete_array: false,
        }
    }

    pub fn bitfield(name: impl Into<String>, width: u64, bits: u32) -> Self {
        Self {
            bit_width: Some(bits),
            ..Self::new(name, width)
        }
    }

    pub fn flexible_array(name: impl Into<String>, element_width: u64) -> Self {
        Self {
            incomplete_array: true,
            ..Self::new(name, element_width)
        }
    }

    pub fn is_zero_width_bitfield(&self) -> bool {
        self.bit_width == Some(0)
    }

    /// Classify this declaration for the bucket builder.
    pub fn member(&self, id: DeclId) -> Member {
        match self.bit_width {
            Some(0) => Member::zero_width_bitfield(id),
            Some(_) => Member::bitfield(id),
            None => Member::regular(id, self.width),
        }
    }
}

/// Any non-field declaration nested in a record (types, static asserts, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherDecl {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decl {
    Field(FieldDecl),
    Other(OtherDecl),
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Field(field) => &field.name,
            Decl::Other(other) => &other.name,
        }
    }

    pub fn as_field(&self) -> Option<&FieldDecl> {
        match self {
            Decl::Field(field) => Some(field),
            Decl::Other(_) => None,
        }
    }
}

impl From<FieldDecl> for Decl {
    fn from(field: FieldDecl) -> Self {
        Decl::Field(field)
    }
}

impl From<OtherDecl> for Decl {
    fn from(other: OtherDecl) -> Self {
        Decl::Other(other)
    }
}

/// A struct or union declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDecl {
    pub name: String,
    #[serde(default)]
    pub kind: RecordKind,
    #[serde(default)]
    pub attrs: LayoutAttrs,
    pub decls: Vec<Decl>,
}

impl RecordDecl {
    pub fn new(name: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            name: name.into(),
            kind,
            attrs: LayoutAttrs::default(),
            decls: Vec::new(),
        }
    }

    pub fn with_attrs(mut self, attrs: LayoutAttrs) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_decl(mut self, decl: impl Into<Decl>) -> Self {
        self.decls.push(decl.into());
        self
    }

    pub fn is_union(&self) -> bool {
        self.kind == RecordKind::Union
    }

    /// A struct whose fields are all plain members: no bitfields, no
    /// zero-width barriers and no flexible array. Such a record needs no
    /// bucketing to be shuffled. A struct without fields qualifies.
    pub fn is_trivially_randomizable(&self) -> bool {
        !self.is_union()
            && self
                .fields()
                .all(|(_, field)| field.bit_width.is_none() && !field.incomplete_array)
    }

    pub fn decl(&self, id: DeclId) -> Option<&Decl> {
        self.decls.get(id.0)
    }

    /// All declarations with their handles, in current order.
    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Decl)> {
        self.decls
            .iter()
            .enumerate()
            .map(|(idx, decl)| (DeclId(idx), decl))
    }

    /// Field declarations with their handles, in current order.
    pub fn fields(&self) -> impl Iterator<Item = (DeclId, &FieldDecl)> {
        self.iter()
            .filter_map(|(id, decl)| decl.as_field().map(|field| (id, field)))
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields().map(|(_, field)| field.name.clone()).collect()
    }

    /// Rebuild the declaration list in `order`.
    ///
    /// `order` must name every declaration exactly once. Handles issued before
    /// the commit refer to the old positions and must not be reused.
    pub fn commit(&mut self, order: &[DeclId]) -> Result<()> {
        if order.len() != self.decls.len() {
            return Err(Error::InvalidOrder(format!(
                "record '{}' has {} declarations, order names {}",
                self.name,
                self.decls.len(),
                order.len()
            )));
        }

        let mut slots: Vec<Option<Decl>> = self.decls.drain(..).map(Some).collect();
        let mut rebuilt = Vec::with_capacity(slots.len());
        for id in order {
            match slots.get_mut(id.0).and_then(Option::take) {
                Some(decl) => rebuilt.push(decl),
                None => {
                    // Put the original list back before reporting.
                    let restored = restore(slots, rebuilt, order);
                    self.decls = restored;
                    return Err(Error::InvalidOrder(format!(
                        "declaration {id} of record '{}' is out of range or repeated",
                        self.name
                    )));
                }
            }
        }

        self.decls = rebuilt;
        Ok(())
    }
}

fn restore(mut slots: Vec<Option<Decl>>, taken: Vec<Decl>, order: &[DeclId]) -> Vec<Decl> {
    for (id, decl) in order.iter().zip(taken) {
        slots[id.0] = Some(decl);
    }
    slots.into_iter().flatten().collect()
}

/// A set of records read from one input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub records: Vec<RecordDecl>,
}

impl TranslationUnit {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn record(&self, name: &str) -> Option<&RecordDecl> {
        self.records.iter().find(|record| record.name == name)
    }
}
