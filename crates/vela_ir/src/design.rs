//! Top-level design container.
//!
//! A [`Design`] holds the signal table, all processes, the ROM declarations,
//! and the interner that owns their names. It is immutable once built; the
//! kernel shares one design between any number of simulator instances.

use crate::arena::Arena;
use crate::expr::{BinaryOp, Expr, UnaryOp};
use crate::ids::{ProcessId, RomId, SignalId};
use crate::process::Process;
use crate::rom::RomDecl;
use crate::signal::Signal;
use vela_common::Interner;

/// A complete, validated design network.
#[derive(Debug)]
pub struct Design {
    /// All signals, keyed by [`SignalId`].
    pub signals: Arena<SignalId, Signal>,
    /// All processes in declaration order.
    pub processes: Arena<ProcessId, Process>,
    /// External ROM tables the design reads.
    pub roms: Arena<RomId, RomDecl>,
    /// Owner of every name in the design.
    pub interner: Interner,
}

impl Design {
    /// Looks up a signal by name.
    pub fn find_signal(&self, name: &str) -> Option<SignalId> {
        let ident = self.interner.get(name)?;
        self.signals
            .iter()
            .find(|(_, s)| s.name == ident)
            .map(|(id, _)| id)
    }

    /// Returns the name of a signal.
    pub fn signal_name(&self, id: SignalId) -> &str {
        self.interner.resolve(self.signals[id].name)
    }

    /// Returns the declared width of a signal.
    pub fn signal_width(&self, id: SignalId) -> u32 {
        self.signals[id].width
    }

    /// Looks up a ROM declaration by name.
    pub fn find_rom(&self, name: &str) -> Option<RomId> {
        let ident = self.interner.get(name)?;
        self.roms
            .iter()
            .find(|(_, r)| r.name == ident)
            .map(|(id, _)| id)
    }

    /// Returns a printable label for a process, such as `process 'vga'`.
    pub fn process_label(&self, id: ProcessId) -> String {
        match self.processes[id].name {
            Some(name) => format!("process '{}'", self.interner.resolve(name)),
            None => format!("process #{}", id.as_raw()),
        }
    }

    /// Iterates over primary inputs in declaration order.
    pub fn inputs(&self) -> impl Iterator<Item = SignalId> + '_ {
        self.signals
            .iter()
            .filter(|(_, s)| s.is_input())
            .map(|(id, _)| id)
    }

    /// Iterates over primary outputs in declaration order.
    pub fn outputs(&self) -> impl Iterator<Item = SignalId> + '_ {
        self.signals
            .iter()
            .filter(|(_, s)| s.is_output())
            .map(|(id, _)| id)
    }

    /// Computes the result width of an expression.
    ///
    /// Arithmetic and bitwise operators take the wider operand, shifts keep
    /// the left operand's width, and comparisons, reductions, logical
    /// operators and bit-selects are one bit wide. ROM reads are one byte.
    pub fn expr_width(&self, expr: &Expr) -> u32 {
        expr_width(&self.signals, expr)
    }
}

pub(crate) fn expr_width(signals: &Arena<SignalId, Signal>, expr: &Expr) -> u32 {
    match expr {
        Expr::Signal(id) => signals.try_get(*id).map_or(1, |s| s.width),
        Expr::Literal(bits) => bits.width(),
        Expr::Unary { op, operand } => match op {
            UnaryOp::Not | UnaryOp::Neg => expr_width(signals, operand),
            UnaryOp::RedAnd | UnaryOp::RedOr | UnaryOp::RedXor | UnaryOp::LogicNot => 1,
        },
        Expr::Binary { op, lhs, rhs } => {
            if op.is_boolean() {
                1
            } else if matches!(op, BinaryOp::Shl | BinaryOp::Shr) {
                expr_width(signals, lhs)
            } else {
                expr_width(signals, lhs).max(expr_width(signals, rhs))
            }
        }
        Expr::Ternary {
            true_val,
            false_val,
            ..
        } => expr_width(signals, true_val).max(expr_width(signals, false_val)),
        Expr::Concat(parts) => parts.iter().map(|p| expr_width(signals, p)).sum(),
        Expr::Slice { high, low, .. } => high.saturating_sub(*low) + 1,
        Expr::Index { .. } => 1,
        Expr::RomRead { .. } => 8,
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::DesignBuilder;
    use crate::expr::Expr;
    use crate::stmt::Statement;

    #[test]
    fn lookup_by_name() {
        let mut b = DesignBuilder::new();
        let clk = b.input("clk", 1).unwrap();
        let led = b.output("led", 1).unwrap();
        b.comb("drive_led", Statement::assign(led, Expr::signal(clk)));
        let design = b.build().unwrap();
        assert_eq!(design.find_signal("clk"), Some(clk));
        assert_eq!(design.find_signal("missing"), None);
        assert_eq!(design.signal_name(led), "led");
        assert_eq!(design.inputs().collect::<Vec<_>>(), vec![clk]);
        assert_eq!(design.outputs().collect::<Vec<_>>(), vec![led]);
    }

    #[test]
    fn widths_follow_operands() {
        let mut b = DesignBuilder::new();
        let a = b.wire("a", 10).unwrap();
        let c = b.wire("c", 4).unwrap();
        let design = b.build().unwrap();
        let sum = Expr::signal(a).add(Expr::signal(c));
        assert_eq!(design.expr_width(&sum), 10);
        assert_eq!(design.expr_width(&Expr::signal(a).less_than(Expr::signal(c))), 1);
        assert_eq!(design.expr_width(&Expr::signal(c).shl(Expr::signal(a))), 4);
        assert_eq!(
            design.expr_width(&Expr::Concat(vec![Expr::signal(a), Expr::signal(c)])),
            14
        );
        assert_eq!(design.expr_width(&Expr::signal(a).slice(7, 4)), 4);
    }

    #[test]
    fn process_labels() {
        let mut b = DesignBuilder::new();
        let x = b.wire("x", 1).unwrap();
        let named = b.comb("named", Statement::assign(x, Expr::lit(0, 1)));
        let design = b.build().unwrap();
        assert_eq!(design.process_label(named), "process 'named'");
    }
}
