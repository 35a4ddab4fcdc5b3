//! The signal store: current values and edge-reference snapshots.
//!
//! Every signal of one simulator instance lives here, addressed by its
//! [`SignalId`]. Trigger evaluation keeps its own "previous value" per
//! watched signal in an [`EdgeSlot`], so the same signal can be compared
//! independently by different regions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vela_common::Bits;
use vela_config::{InitConfig, InitPolicy};
use vela_ir::{Design, SignalId};

/// Handle of one edge-reference snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeSlot(usize);

/// The outcome of [`SignalStore::snapshot_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The reference value recorded by the previous snapshot.
    pub old: Bits,
    /// The current value, now also the reference.
    pub new: Bits,
}

impl Transition {
    /// Returns `true` if the value changed since the last snapshot.
    pub fn changed(&self) -> bool {
        self.old != self.new
    }
}

#[derive(Debug, Clone)]
struct SlotEntry {
    signal: SignalId,
    reference: Bits,
}

/// Values of every signal in one design instance.
#[derive(Debug, Clone)]
pub struct SignalStore {
    values: Vec<Bits>,
    slots: Vec<SlotEntry>,
}

impl SignalStore {
    /// Creates a store for `design`, filling signals that have no explicit
    /// initial value according to `init`.
    pub fn new(design: &Design, init: &InitConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(init.seed);
        let values = design
            .signals
            .values()
            .map(|s| match (s.init, init.policy) {
                (Some(v), _) => Bits::new(v, s.width),
                (None, InitPolicy::Zero) => Bits::zero(s.width),
                (None, InitPolicy::Ones) => Bits::ones(s.width),
                (None, InitPolicy::Random) => Bits::new(rng.gen::<u64>(), s.width),
            })
            .collect();
        Self {
            values,
            slots: Vec::new(),
        }
    }

    /// Returns the number of signals.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the store holds no signals.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the current value of a signal.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this store's design.
    pub fn get(&self, id: SignalId) -> Bits {
        self.values[id.index()]
    }

    /// Returns the declared width of a signal.
    pub fn width(&self, id: SignalId) -> u32 {
        self.values[id.index()].width()
    }

    /// Writes a signal, truncating or zero-extending `value` to the declared
    /// width. Returns `true` if the stored value changed.
    pub fn set(&mut self, id: SignalId, value: Bits) -> bool {
        let slot = &mut self.values[id.index()];
        let next = value.resize(slot.width());
        let changed = *slot != next;
        *slot = next;
        changed
    }

    /// Writes the bits selected by `mask`, keeping the rest.
    pub fn set_masked(&mut self, id: SignalId, value: u64, mask: u64) -> bool {
        let current = self.values[id.index()];
        let merged = (current.as_u64() & !mask) | (value & mask);
        self.set(id, Bits::new(merged, current.width()))
    }

    /// Allocates a new edge reference for `signal`, initialised to its
    /// current value.
    pub fn add_slot(&mut self, signal: SignalId) -> EdgeSlot {
        let reference = self.get(signal);
        self.slots.push(SlotEntry { signal, reference });
        EdgeSlot(self.slots.len() - 1)
    }

    /// Returns the signal an edge slot watches.
    pub fn slot_signal(&self, slot: EdgeSlot) -> SignalId {
        self.slots[slot.0].signal
    }

    /// Compares the watched signal against the slot's reference and moves
    /// the reference to the current value.
    pub fn snapshot_edge(&mut self, slot: EdgeSlot) -> Transition {
        let entry = &mut self.slots[slot.0];
        let new = self.values[entry.signal.index()];
        let old = std::mem::replace(&mut entry.reference, new);
        Transition { old, new }
    }

    /// Moves every edge reference to its signal's current value without
    /// reporting transitions.
    pub fn seed_edges(&mut self) {
        for entry in &mut self.slots {
            entry.reference = self.values[entry.signal.index()];
        }
    }
}
