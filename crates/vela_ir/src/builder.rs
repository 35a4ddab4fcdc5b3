//! Incremental construction and validation of a [`Design`].
//!
//! Signal and ROM declarations are checked as they are made; process bodies
//! are checked together in [`DesignBuilder::build`], once every signal they
//! can reference exists.

use crate::arena::Arena;
use crate::design::{expr_width, Design};
use crate::error::DesignError;
use crate::expr::Expr;
use crate::ids::{ProcessId, RomId, SignalId};
use crate::process::{EdgeSensitivity, Process, ProcessKind};
use crate::rom::RomDecl;
use crate::signal::{Signal, SignalKind};
use crate::stmt::{LValue, Statement};
use std::collections::{BTreeMap, BTreeSet};
use vela_common::{Bits, Interner, MAX_WIDTH};

/// Builds a [`Design`] one declaration at a time.
///
/// ```
/// use vela_ir::{DesignBuilder, EdgeSensitivity, Expr, Statement};
///
/// let mut b = DesignBuilder::new();
/// let clk = b.input("clk", 1).unwrap();
/// let q = b.output("q", 1).unwrap();
/// b.clocked(
///     "toggle",
///     vec![EdgeSensitivity::posedge(clk)],
///     Statement::nonblocking(q, Expr::signal(q).not()),
/// );
/// let design = b.build().unwrap();
/// assert_eq!(design.processes.len(), 1);
/// ```
pub struct DesignBuilder {
    interner: Interner,
    signals: Arena<SignalId, Signal>,
    processes: Arena<ProcessId, Process>,
    roms: Arena<RomId, RomDecl>,
}

impl Default for DesignBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DesignBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            interner: Interner::new(),
            signals: Arena::new(),
            processes: Arena::new(),
            roms: Arena::new(),
        }
    }

    fn declare(&mut self, name: &str, width: u32, kind: SignalKind) -> Result<SignalId, DesignError> {
        if width == 0 || width > MAX_WIDTH {
            return Err(DesignError::InvalidWidth {
                name: name.to_string(),
                width,
            });
        }
        let ident = self.interner.get_or_intern(name);
        if self.signals.values().any(|s| s.name == ident) {
            return Err(DesignError::Duplicate(name.to_string()));
        }
        let id = self.signals.next_id();
        Ok(self.signals.alloc(Signal {
            id,
            name: ident,
            width,
            kind,
            init: None,
        }))
    }

    /// Declares a primary input.
    pub fn input(&mut self, name: &str, width: u32) -> Result<SignalId, DesignError> {
        self.declare(name, width, SignalKind::Input)
    }

    /// Declares a primary output.
    pub fn output(&mut self, name: &str, width: u32) -> Result<SignalId, DesignError> {
        self.declare(name, width, SignalKind::Output)
    }

    /// Declares an internal combinational net.
    pub fn wire(&mut self, name: &str, width: u32) -> Result<SignalId, DesignError> {
        self.declare(name, width, SignalKind::Internal)
    }

    /// Declares an internal register. Without [`set_init`](Self::set_init)
    /// its starting value follows the simulator's initial-value policy.
    pub fn reg(&mut self, name: &str, width: u32) -> Result<SignalId, DesignError> {
        self.declare(name, width, SignalKind::Internal)
    }

    /// Gives a signal a fixed construction-time value.
    pub fn set_init(&mut self, id: SignalId, value: u64) -> Result<(), DesignError> {
        let signal = self
            .signals
            .try_get(id)
            .ok_or(DesignError::UnknownSignal(id.as_raw()))?;
        if !Bits::fits(value, signal.width) {
            return Err(DesignError::InitTooWide {
                name: self.interner.resolve(signal.name).to_string(),
                width: signal.width,
                value,
            });
        }
        self.signals[id].init = Some(value);
        Ok(())
    }

    /// Declares an external byte-addressed ROM of `depth` bytes.
    pub fn rom(&mut self, name: &str, depth: usize) -> Result<RomId, DesignError> {
        let ident = self.interner.get_or_intern(name);
        if self.roms.values().any(|r| r.name == ident) {
            return Err(DesignError::Duplicate(name.to_string()));
        }
        let id = self.roms.next_id();
        Ok(self.roms.alloc(RomDecl {
            id,
            name: ident,
            depth,
        }))
    }

    fn process(&mut self, name: &str, kind: ProcessKind, body: Statement) -> ProcessId {
        let name = (!name.is_empty()).then(|| self.interner.get_or_intern(name));
        let id = self.processes.next_id();
        self.processes.alloc(Process {
            id,
            name,
            kind,
            body,
        })
    }

    /// Adds an unclocked process (`always @*`).
    pub fn comb(&mut self, name: &str, body: Statement) -> ProcessId {
        self.process(name, ProcessKind::Combinational, body)
    }

    /// Adds a continuous assignment (`assign target = value`).
    pub fn assign(&mut self, target: SignalId, value: Expr) -> ProcessId {
        self.process("", ProcessKind::Combinational, Statement::assign(target, value))
    }

    /// Adds an edge-triggered process (`always @(posedge clk ...)`).
    pub fn clocked(
        &mut self,
        name: &str,
        sensitivity: Vec<EdgeSensitivity>,
        body: Statement,
    ) -> ProcessId {
        self.process(name, ProcessKind::Clocked(sensitivity), body)
    }

    /// Adds a construction-time process.
    pub fn static_init(&mut self, name: &str, body: Statement) -> ProcessId {
        self.process(name, ProcessKind::Static, body)
    }

    /// Adds an `initial` block.
    pub fn initial(&mut self, name: &str, body: Statement) -> ProcessId {
        self.process(name, ProcessKind::Initial, body)
    }

    /// Adds a `final` block.
    pub fn final_block(&mut self, name: &str, body: Statement) -> ProcessId {
        self.process(name, ProcessKind::Final, body)
    }

    /// Validates every process and returns the finished design.
    pub fn build(self) -> Result<Design, DesignError> {
        let design = Design {
            signals: self.signals,
            processes: self.processes,
            roms: self.roms,
            interner: self.interner,
        };
        let mut comb_driven: BTreeMap<SignalId, ProcessId> = BTreeMap::new();
        let mut clocked_driven = BTreeSet::new();
        for (id, process) in design.processes.iter() {
            let label = design.process_label(id);
            let checker = Checker {
                design: &design,
                label: &label,
            };
            if let ProcessKind::Clocked(list) = &process.kind {
                if list.is_empty() {
                    return Err(DesignError::EmptySensitivity { process: label });
                }
                for s in list {
                    checker.signal(s.signal)?;
                }
            }
            checker.statement(&process.kind, &process.body)?;
            match process.kind {
                ProcessKind::Combinational => {
                    let mut writes = BTreeSet::new();
                    process.body.collect_writes(&mut writes);
                    for signal in writes {
                        if let Some(&first) = comb_driven.get(&signal) {
                            return Err(DesignError::MultipleDrivers {
                                signal: design.signal_name(signal).to_string(),
                                first: design.process_label(first),
                                second: label,
                            });
                        }
                        comb_driven.insert(signal, id);
                    }
                }
                ProcessKind::Clocked(_) => process.body.collect_writes(&mut clocked_driven),
                _ => {}
            }
        }
        if let Some(&id) = clocked_driven.iter().find(|s| comb_driven.contains_key(s)) {
            return Err(DesignError::MixedDrivers(design.signal_name(id).to_string()));
        }
        Ok(design)
    }
}

struct Checker<'a> {
    design: &'a Design,
    label: &'a str,
}

impl Checker<'_> {
    fn signal(&self, id: SignalId) -> Result<&Signal, DesignError> {
        self.design
            .signals
            .try_get(id)
            .ok_or(DesignError::UnknownSignal(id.as_raw()))
    }

    fn slice(&self, high: u32, low: u32, width: u32) -> Result<(), DesignError> {
        if low > high || high >= width {
            return Err(DesignError::SliceOutOfRange {
                process: self.label.to_string(),
                high,
                low,
                width,
            });
        }
        Ok(())
    }

    fn statement(&self, kind: &ProcessKind, stmt: &Statement) -> Result<(), DesignError> {
        let mut result = Ok(());
        stmt.walk(&mut |s| {
            if result.is_ok() {
                result = self.check_one(kind, s);
            }
        });
        result?;
        let mut result = Ok(());
        stmt.exprs(&mut |e| {
            if result.is_ok() {
                result = self.expr(e);
            }
        });
        result
    }

    fn check_one(&self, kind: &ProcessKind, stmt: &Statement) -> Result<(), DesignError> {
        let (target, blocking) = match stmt {
            Statement::Assign { target, .. } => (target, true),
            Statement::NonBlocking { target, .. } => (target, false),
            _ => return Ok(()),
        };
        let process = self.label.to_string();
        match (kind, blocking) {
            (ProcessKind::Final, _) => return Err(DesignError::AssignInFinal { process }),
            (ProcessKind::Clocked(_), true) => {
                return Err(DesignError::BlockingInClocked { process })
            }
            (ProcessKind::Clocked(_), false) => {}
            (_, false) => return Err(DesignError::NonBlockingOutsideClocked { process }),
            (_, true) => {}
        }
        let signal = self.signal(target.signal())?;
        if signal.is_input() {
            return Err(DesignError::AssignToInput {
                process,
                signal: self.design.interner.resolve(signal.name).to_string(),
            });
        }
        if let LValue::Slice { high, low, .. } = *target {
            self.slice(high, low, signal.width)?;
        }
        Ok(())
    }

    fn expr(&self, expr: &Expr) -> Result<(), DesignError> {
        let mut result = Ok(());
        expr.walk(&mut |e| {
            if result.is_err() {
                return;
            }
            result = match e {
                Expr::Signal(id) => self.signal(*id).map(|_| ()),
                Expr::Slice { expr, high, low } => {
                    self.slice(*high, *low, expr_width(&self.design.signals, expr))
                }
                Expr::Concat(_) => {
                    let width = expr_width(&self.design.signals, e);
                    if width == 0 || width > MAX_WIDTH {
                        Err(DesignError::InvalidConcat {
                            process: self.label.to_string(),
                            width,
                        })
                    } else {
                        Ok(())
                    }
                }
                Expr::RomRead { rom, .. } if !self.design.roms.contains(*rom) => {
                    Err(DesignError::UnknownRom(rom.as_raw()))
                }
                _ => Ok(()),
            };
        });
        result
    }
}
