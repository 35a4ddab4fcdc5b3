//! Expression trees evaluated by the kernel.
//!
//! Widths are carried by values rather than by a type table: a literal has
//! its declared width, a signal read has the signal's width, and operators
//! derive their result width from their operands.

use crate::ids::{RomId, SignalId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use vela_common::Bits;

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Bitwise NOT (`~`).
    Not,
    /// Two's complement negation (`-`).
    Neg,
    /// Reduction AND (`&`).
    RedAnd,
    /// Reduction OR (`|`).
    RedOr,
    /// Reduction XOR (`^`).
    RedXor,
    /// Logical NOT (`!`).
    LogicNot,
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`); dividing by zero yields 0.
    Div,
    /// Modulo (`%`); modulo by zero yields 0.
    Mod,
    /// Bitwise AND (`&`).
    And,
    /// Bitwise OR (`|`).
    Or,
    /// Bitwise XOR (`^`).
    Xor,
    /// Logical left shift (`<<`).
    Shl,
    /// Logical right shift (`>>`).
    Shr,
    /// Equality (`==`).
    Eq,
    /// Inequality (`!=`).
    Ne,
    /// Unsigned less than (`<`).
    Lt,
    /// Unsigned less than or equal (`<=`).
    Le,
    /// Unsigned greater than (`>`).
    Gt,
    /// Unsigned greater than or equal (`>=`).
    Ge,
    /// Logical AND (`&&`).
    LogicAnd,
    /// Logical OR (`||`).
    LogicOr,
}

impl BinaryOp {
    /// Returns `true` for operators producing a single-bit result.
    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::LogicAnd
                | BinaryOp::LogicOr
        )
    }
}

/// An expression over the current signal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// The full value of a signal.
    Signal(SignalId),
    /// A constant.
    Literal(Bits),
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// The left-hand side.
        lhs: Box<Expr>,
        /// The right-hand side.
        rhs: Box<Expr>,
    },
    /// `condition ? true_val : false_val`.
    Ternary {
        /// The selector.
        condition: Box<Expr>,
        /// The value when the selector is non-zero.
        true_val: Box<Expr>,
        /// The value when the selector is zero.
        false_val: Box<Expr>,
    },
    /// `{a, b, ...}`, first element most significant.
    Concat(Vec<Expr>),
    /// `expr[high:low]` with constant bounds.
    Slice {
        /// The sliced value.
        expr: Box<Expr>,
        /// High bit (inclusive).
        high: u32,
        /// Low bit (inclusive).
        low: u32,
    },
    /// `expr[index]` with a computed index; out-of-range reads give 0.
    Index {
        /// The indexed value.
        expr: Box<Expr>,
        /// The bit position.
        index: Box<Expr>,
    },
    /// An 8-bit read from an external ROM table.
    RomRead {
        /// The table.
        rom: RomId,
        /// The byte address.
        addr: Box<Expr>,
    },
}

#[allow(clippy::should_implement_trait)]
impl Expr {
    /// Reads a signal.
    pub fn signal(id: SignalId) -> Self {
        Expr::Signal(id)
    }

    /// A literal of the given width.
    pub fn lit(value: u64, width: u32) -> Self {
        Expr::Literal(Bits::new(value, width))
    }

    /// A unary operation.
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// A binary operation.
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// `self ? true_val : false_val`.
    pub fn select(self, true_val: Expr, false_val: Expr) -> Self {
        Expr::Ternary {
            condition: Box::new(self),
            true_val: Box::new(true_val),
            false_val: Box::new(false_val),
        }
    }

    /// `self[high:low]`.
    pub fn slice(self, high: u32, low: u32) -> Self {
        Expr::Slice {
            expr: Box::new(self),
            high,
            low,
        }
    }

    /// `self[index]`.
    pub fn index(self, index: Expr) -> Self {
        Expr::Index {
            expr: Box::new(self),
            index: Box::new(index),
        }
    }

    /// Reads `rom[addr]`.
    pub fn rom(rom: RomId, addr: Expr) -> Self {
        Expr::RomRead {
            rom,
            addr: Box::new(addr),
        }
    }

    /// `self + rhs`.
    pub fn add(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Add, self, rhs)
    }

    /// `self - rhs`.
    pub fn sub(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Sub, self, rhs)
    }

    /// `self & rhs`.
    pub fn and(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::And, self, rhs)
    }

    /// `self | rhs`.
    pub fn or(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Or, self, rhs)
    }

    /// `self << rhs`.
    pub fn shl(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Shl, self, rhs)
    }

    /// `self >> rhs`.
    pub fn shr(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Shr, self, rhs)
    }

    /// `self == rhs`.
    pub fn equals(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Eq, self, rhs)
    }

    /// `self < rhs`.
    pub fn less_than(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Lt, self, rhs)
    }

    /// `self >= rhs`.
    pub fn greater_eq(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Ge, self, rhs)
    }

    /// `self && rhs`.
    pub fn logic_and(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::LogicAnd, self, rhs)
    }

    /// `~self`.
    pub fn not(self) -> Self {
        Self::unary(UnaryOp::Not, self)
    }

    /// `!self`.
    pub fn logic_not(self) -> Self {
        Self::unary(UnaryOp::LogicNot, self)
    }

    /// Visits this expression and every sub-expression, parents first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        match self {
            Expr::Signal(_) | Expr::Literal(_) => {}
            Expr::Unary { operand, .. } => operand.walk(f),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.walk(f);
                rhs.walk(f);
            }
            Expr::Ternary {
                condition,
                true_val,
                false_val,
            } => {
                condition.walk(f);
                true_val.walk(f);
                false_val.walk(f);
            }
            Expr::Concat(parts) => {
                for p in parts {
                    p.walk(f);
                }
            }
            Expr::Slice { expr, .. } => expr.walk(f),
            Expr::Index { expr, index } => {
                expr.walk(f);
                index.walk(f);
            }
            Expr::RomRead { addr, .. } => addr.walk(f),
        }
    }

    /// Adds every signal this expression reads to `out`.
    pub fn collect_reads(&self, out: &mut BTreeSet<SignalId>) {
        self.walk(&mut |e| {
            if let Expr::Signal(id) = e {
                out.insert(*id);
            }
        });
    }
}
