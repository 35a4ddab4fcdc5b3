//! Trigger evaluation.
//!
//! Each region owns a [`RegionTriggers`] table. Evaluating the table compares
//! every watched signal against its edge reference in the
//! [`SignalStore`], moves the reference forward, and reports the triggers
//! that fired as a [`TriggerSet`]. A region runs only if its set is
//! non-empty.

use std::collections::BTreeMap;
use std::fmt;

use vela_ir::{Edge, EdgeSensitivity, SignalId};

use crate::region::Region;
use crate::store::{EdgeSlot, SignalStore, Transition};

/// A growable bit set with one bit per declared trigger.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct TriggerSet {
    words: Vec<u64>,
    len: usize,
}

impl TriggerSet {
    /// Creates an empty set able to hold `len` triggers.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Returns the number of trigger positions.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set has no positions at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Marks trigger `index` as fired.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize) {
        assert!(index < self.len, "trigger {index} out of range {}", self.len);
        self.words[index / 64] |= 1u64 << (index % 64);
    }

    /// Returns `true` if trigger `index` fired.
    pub fn get(&self, index: usize) -> bool {
        index < self.len && self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Returns `true` if any trigger fired.
    pub fn any(&self) -> bool {
        self.words.iter().any(|w| *w != 0)
    }

    /// Returns the number of fired triggers.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterates over the indices of fired triggers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|&i| self.get(i))
    }

    /// Clears every bit.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }
}

impl fmt::Debug for TriggerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// A lifecycle condition that fires exactly once per simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OneShot {
    /// Start of the static region.
    Static,
    /// Start of the initial region.
    Initial,
    /// First iteration of the settle loop.
    FirstSettle,
    /// First input-combinational pass.
    FirstInputComb,
}

impl OneShot {
    fn description(self) -> &'static str {
        match self {
            OneShot::Static => "Internal 'static' trigger - first evaluation",
            OneShot::Initial => "Internal 'initial' trigger - first evaluation",
            OneShot::FirstSettle => "Internal 'stl' trigger - first iteration",
            OneShot::FirstInputComb => "Internal 'ico' trigger - first iteration",
        }
    }
}

#[derive(Debug, Clone)]
enum Condition {
    OneShot { spent: bool },
    Change(usize),
    Edges(Vec<(Edge, usize)>),
}

#[derive(Debug, Clone)]
struct Trigger {
    condition: Condition,
    description: String,
}

/// The trigger table of one region.
#[derive(Debug, Clone)]
pub struct RegionTriggers {
    region: Region,
    slots: Vec<EdgeSlot>,
    slot_of: BTreeMap<SignalId, usize>,
    triggers: Vec<Trigger>,
}

impl RegionTriggers {
    /// Creates an empty table for `region`.
    pub fn new(region: Region) -> Self {
        Self {
            region,
            slots: Vec::new(),
            slot_of: BTreeMap::new(),
            triggers: Vec::new(),
        }
    }

    /// The region this table gates.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Returns the number of declared triggers.
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    /// Returns `true` if no triggers are declared; such a region never runs.
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// One edge reference per (region, signal), shared by every trigger of
    /// this region that watches the signal.
    fn slot_for(&mut self, store: &mut SignalStore, signal: SignalId) -> usize {
        if let Some(&local) = self.slot_of.get(&signal) {
            return local;
        }
        self.slots.push(store.add_slot(signal));
        let local = self.slots.len() - 1;
        self.slot_of.insert(signal, local);
        local
    }

    fn push(&mut self, condition: Condition, description: String) -> usize {
        self.triggers.push(Trigger {
            condition,
            description,
        });
        self.triggers.len() - 1
    }

    /// Declares a lifecycle trigger.
    pub fn add_one_shot(&mut self, kind: OneShot) -> usize {
        self.push(
            Condition::OneShot { spent: false },
            kind.description().to_string(),
        )
    }

    /// Declares a trigger firing whenever `signal` changes value.
    pub fn add_change(
        &mut self,
        store: &mut SignalStore,
        signal: SignalId,
        description: impl Into<String>,
    ) -> usize {
        let slot = self.slot_for(store, signal);
        self.push(Condition::Change(slot), description.into())
    }

    /// Declares a trigger firing when any edge of `list` occurs.
    pub fn add_edges(
        &mut self,
        store: &mut SignalStore,
        list: &[EdgeSensitivity],
        description: impl Into<String>,
    ) -> usize {
        let edges = list
            .iter()
            .map(|s| (s.edge, self.slot_for(store, s.signal)))
            .collect();
        self.push(Condition::Edges(edges), description.into())
    }

    /// Computes which triggers fire now and moves every edge reference of
    /// this region to the current values.
    pub fn evaluate(&mut self, store: &mut SignalStore) -> TriggerSet {
        let transitions: Vec<Transition> = self
            .slots
            .iter()
            .map(|&slot| store.snapshot_edge(slot))
            .collect();
        let mut set = TriggerSet::new(self.triggers.len());
        for (index, trigger) in self.triggers.iter_mut().enumerate() {
            let fired = match &mut trigger.condition {
                Condition::OneShot { spent } => !std::mem::replace(spent, true),
                Condition::Change(slot) => transitions[*slot].changed(),
                Condition::Edges(edges) => edges.iter().any(|(edge, slot)| {
                    let t = &transitions[*slot];
                    edge.matches(t.old.lsb(), t.new.lsb())
                }),
            };
            if fired {
                set.set(index);
            }
        }
        set
    }

    /// Describes the fired triggers of `set`, one per line.
    pub fn describe(&self, set: &TriggerSet) -> String {
        if !set.any() {
            return "No triggers active".to_string();
        }
        set.iter()
            .map(|i| {
                format!(
                    "'{}' region trigger index {} is active: {}",
                    self.region, i, self.triggers[i].description
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
