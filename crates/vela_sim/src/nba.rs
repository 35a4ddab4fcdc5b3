//! The delayed-write queue behind non-blocking assignments.
//!
//! Clocked processes never write the signal store directly. Each
//! `target <= value` lands here as a masked write and stays invisible until
//! [`NbaQueue::commit`] applies the whole batch at once.

use std::collections::BTreeMap;

use vela_common::Bits;
use vela_ir::SignalId;

use crate::store::SignalStore;

/// Bits pending for one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingWrite {
    /// The pending bit values; only bits under `mask` are meaningful.
    pub value: u64,
    /// The bits that will be overwritten on commit.
    pub mask: u64,
}

/// Per-commit counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Number of signals that had pending writes.
    pub signals: usize,
    /// Number of those whose stored value actually changed.
    pub changed: usize,
}

/// Pending non-blocking writes, keyed by signal.
#[derive(Debug, Clone, Default)]
pub struct NbaQueue {
    pending: BTreeMap<SignalId, PendingWrite>,
    pushed: usize,
}

impl NbaQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `value` for the bits of `signal` selected by `mask`.
    ///
    /// A later write to the same bits replaces an earlier one, so the value
    /// committed is that of the last writer in program order.
    pub fn push(&mut self, signal: SignalId, value: u64, mask: u64) {
        let entry = self.pending.entry(signal).or_insert(PendingWrite { value: 0, mask: 0 });
        entry.value = (entry.value & !mask) | (value & mask);
        entry.mask |= mask;
        self.pushed += 1;
    }

    /// Queues a whole-signal write of `value`.
    pub fn push_full(&mut self, signal: SignalId, value: Bits) {
        self.push(signal, value.as_u64(), Bits::mask(value.width()));
    }

    /// Returns the pending write for `signal`, if any.
    pub fn pending(&self, signal: SignalId) -> Option<PendingWrite> {
        self.pending.get(&signal).copied()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the number of distinct signals with pending writes.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns the number of writes queued since the last commit, counting
    /// overwritten ones.
    pub fn pushed(&self) -> usize {
        self.pushed
    }

    /// Applies every pending write to `store` and empties the queue.
    pub fn commit(&mut self, store: &mut SignalStore) -> CommitSummary {
        let mut summary = CommitSummary::default();
        for (signal, write) in std::mem::take(&mut self.pending) {
            summary.signals += 1;
            if store.set_masked(signal, write.value, write.mask) {
                summary.changed += 1;
            }
        }
        self.pushed = 0;
        summary
    }
}
