//! Behavioral statements for process bodies.
//!
//! [`Statement`] is the body of every [`Process`](crate::process::Process).
//! Blocking assignments write straight into the signal store; non-blocking
//! assignments are queued until the commit pass.

use crate::expr::Expr;
use crate::ids::SignalId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The target of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LValue {
    /// The whole signal.
    Signal(SignalId),
    /// A constant part-select `signal[high:low]`.
    Slice {
        /// The written signal.
        signal: SignalId,
        /// High bit (inclusive).
        high: u32,
        /// Low bit (inclusive).
        low: u32,
    },
}

impl LValue {
    /// Returns the signal this target writes.
    pub fn signal(&self) -> SignalId {
        match *self {
            LValue::Signal(id) | LValue::Slice { signal: id, .. } => id,
        }
    }
}

/// A case arm in a case statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseArm {
    /// The values that select this arm.
    pub patterns: Vec<Expr>,
    /// The body to execute when matched.
    pub body: Statement,
}

/// A behavioral statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// A blocking assignment (`target = value`).
    Assign {
        /// The target signal or slice.
        target: LValue,
        /// The value expression.
        value: Expr,
    },
    /// A non-blocking assignment (`target <= value`).
    NonBlocking {
        /// The target signal or slice.
        target: LValue,
        /// The value expression, evaluated against pre-edge state.
        value: Expr,
    },
    /// An if-else statement.
    If {
        /// The condition expression.
        condition: Expr,
        /// The body when the condition is non-zero.
        then_body: Box<Statement>,
        /// The optional body when the condition is zero.
        else_body: Option<Box<Statement>>,
    },
    /// A case statement. The first matching arm wins.
    Case {
        /// The subject expression being matched.
        subject: Expr,
        /// The match arms.
        arms: Vec<CaseArm>,
        /// The default arm, if any.
        default: Option<Box<Statement>>,
    },
    /// A block of sequential statements.
    Block(Vec<Statement>),
    /// A `$display`-style formatted line.
    Display {
        /// The format string (`%d`, `%h`, `%b`, `%%`).
        format: String,
        /// The format arguments.
        args: Vec<Expr>,
    },
    /// A no-operation (placeholder for empty branches).
    Nop,
}

impl Statement {
    /// `target = value`.
    pub fn assign(target: SignalId, value: Expr) -> Self {
        Statement::Assign {
            target: LValue::Signal(target),
            value,
        }
    }

    /// `target <= value`.
    pub fn nonblocking(target: SignalId, value: Expr) -> Self {
        Statement::NonBlocking {
            target: LValue::Signal(target),
            value,
        }
    }

    /// `if (condition) then_body`.
    pub fn if_then(condition: Expr, then_body: Statement) -> Self {
        Statement::If {
            condition,
            then_body: Box::new(then_body),
            else_body: None,
        }
    }

    /// `if (condition) then_body else else_body`.
    pub fn if_else(condition: Expr, then_body: Statement, else_body: Statement) -> Self {
        Statement::If {
            condition,
            then_body: Box::new(then_body),
            else_body: Some(Box::new(else_body)),
        }
    }

    /// `begin ... end`.
    pub fn block(stmts: impl IntoIterator<Item = Statement>) -> Self {
        Statement::Block(stmts.into_iter().collect())
    }

    /// `$display(format, args...)`.
    pub fn display(format: impl Into<String>, args: Vec<Expr>) -> Self {
        Statement::Display {
            format: format.into(),
            args,
        }
    }

    /// Visits this statement and every nested statement, parents first.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Statement)) {
        f(self);
        match self {
            Statement::If {
                then_body,
                else_body,
                ..
            } => {
                then_body.walk(f);
                if let Some(e) = else_body {
                    e.walk(f);
                }
            }
            Statement::Case { arms, default, .. } => {
                for arm in arms {
                    arm.body.walk(f);
                }
                if let Some(d) = default {
                    d.walk(f);
                }
            }
            Statement::Block(stmts) => {
                for s in stmts {
                    s.walk(f);
                }
            }
            Statement::Assign { .. }
            | Statement::NonBlocking { .. }
            | Statement::Display { .. }
            | Statement::Nop => {}
        }
    }

    /// Visits every expression directly owned by this statement tree.
    pub fn exprs<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        self.walk(&mut |s| match s {
            Statement::Assign { value, .. } | Statement::NonBlocking { value, .. } => f(value),
            Statement::If { condition, .. } => f(condition),
            Statement::Case { subject, arms, .. } => {
                f(subject);
                for arm in arms {
                    for p in &arm.patterns {
                        f(p);
                    }
                }
            }
            Statement::Display { args, .. } => {
                for a in args {
                    f(a);
                }
            }
            Statement::Block(_) | Statement::Nop => {}
        });
    }

    /// Adds every signal read anywhere in this statement to `out`.
    pub fn collect_reads(&self, out: &mut BTreeSet<SignalId>) {
        self.exprs(&mut |e| e.collect_reads(out));
    }

    /// Adds every signal assigned (blocking or not) to `out`.
    pub fn collect_writes(&self, out: &mut BTreeSet<SignalId>) {
        self.walk(&mut |s| {
            if let Statement::Assign { target, .. } | Statement::NonBlocking { target, .. } = s {
                out.insert(target.signal());
            }
        });
    }
}
