//! External read-only lookup tables.
//!
//! ROM contents belong to the host, not the kernel. A [`RomBindings`] maps
//! the names the design declared to shared tables, and is resolved once
//! when a simulator is constructed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use vela_ir::{Design, RomId};

use crate::error::SimError;

/// A byte-addressed read-only table.
pub trait RomTable {
    /// Returns the byte at `addr`, or 0 past the end of the table.
    fn read(&self, addr: u64) -> u8;

    /// Returns the number of bytes in the table.
    fn len(&self) -> usize;

    /// Returns `true` if the table holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RomTable for Vec<u8> {
    fn read(&self, addr: u64) -> u8 {
        usize::try_from(addr)
            .ok()
            .and_then(|a| self.get(a))
            .copied()
            .unwrap_or(0)
    }

    fn len(&self) -> usize {
        self.as_slice().len()
    }
}

impl RomTable for &'static [u8] {
    fn read(&self, addr: u64) -> u8 {
        usize::try_from(addr)
            .ok()
            .and_then(|a| self.get(a))
            .copied()
            .unwrap_or(0)
    }

    fn len(&self) -> usize {
        <[u8]>::len(self)
    }
}

/// A shared handle to a ROM table.
pub type SharedRom = Arc<dyn RomTable + Send + Sync>;

/// ROM tables supplied by the host, keyed by the name the design uses.
#[derive(Clone, Default)]
pub struct RomBindings {
    tables: HashMap<String, SharedRom>,
}

impl RomBindings {
    /// Creates an empty set of bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `table` to `name`, replacing any earlier binding.
    pub fn bind(&mut self, name: impl Into<String>, table: SharedRom) -> &mut Self {
        self.tables.insert(name.into(), table);
        self
    }

    /// Returns the table bound to `name`.
    pub fn get(&self, name: &str) -> Option<&SharedRom> {
        self.tables.get(name)
    }

    /// Resolves one table per ROM the design declares, in declaration order.
    pub(crate) fn resolve(&self, design: &Design) -> Result<RomSet, SimError> {
        let tables = design
            .roms
            .values()
            .map(|decl| {
                let name = design.interner.resolve(decl.name);
                self.get(name)
                    .cloned()
                    .ok_or_else(|| SimError::MissingRom(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RomSet { tables })
    }
}

impl fmt::Debug for RomBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.tables.keys().collect();
        names.sort();
        f.debug_struct("RomBindings").field("names", &names).finish()
    }
}

/// The tables of one simulator, indexed by [`RomId`].
#[derive(Clone, Default)]
pub struct RomSet {
    tables: Vec<SharedRom>,
}

impl RomSet {
    /// Reads one byte; unknown ROMs and out-of-range addresses read as 0.
    pub fn read(&self, rom: RomId, addr: u64) -> u8 {
        self.tables.get(rom.index()).map_or(0, |t| t.read(addr))
    }
}

impl fmt::Debug for RomSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.tables.iter().map(|t| t.len()))
            .finish()
    }
}
