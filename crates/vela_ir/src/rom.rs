//! Declarations of external read-only lookup tables.

use crate::ids::RomId;
use serde::{Deserialize, Serialize};
use vela_common::Ident;

/// A byte-addressed ROM the design reads but does not own.
///
/// The contents are supplied when a simulator is constructed; the design only
/// records the name the table is bound by and its expected depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RomDecl {
    /// The id of this ROM in the design.
    pub id: RomId,
    /// The binding name.
    pub name: Ident,
    /// Expected number of bytes. Reads past the bound table's end give 0.
    pub depth: usize,
}
