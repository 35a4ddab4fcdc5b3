//! Expression evaluator and statement executor.
//!
//! [`eval_expr`] recursively evaluates an IR [`Expr`] into [`Bits`], reading
//! the signal store. [`Exec`] runs a [`Statement`] tree: blocking assignments
//! go straight into the store, non-blocking assignments into the
//! delayed-write queue, and `Display` lines into the output buffer.
//!
//! Values are 2-state, so evaluation cannot fail: division and modulo by
//! zero give 0 and out-of-range bit selects read 0.

use tracing::info;
use vela_common::Bits;
use vela_ir::{BinaryOp, Expr, LValue, Statement, UnaryOp};

use crate::nba::NbaQueue;
use crate::rom::RomSet;
use crate::store::SignalStore;

/// Read-only inputs to expression evaluation.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    /// Current signal values.
    pub store: &'a SignalStore,
    /// External lookup tables.
    pub roms: &'a RomSet,
}

/// Evaluates an expression against the current store.
pub fn eval_expr(ctx: EvalContext<'_>, expr: &Expr) -> Bits {
    match expr {
        Expr::Signal(id) => ctx.store.get(*id),
        Expr::Literal(bits) => *bits,
        Expr::Unary { op, operand } => eval_unary(*op, eval_expr(ctx, operand)),
        Expr::Binary { op, lhs, rhs } => {
            eval_binary(*op, eval_expr(ctx, lhs), eval_expr(ctx, rhs))
        }
        Expr::Ternary {
            condition,
            true_val,
            false_val,
        } => {
            // Both arms are pure, so evaluating the untaken one only costs
            // time; it gives the result width without a width table.
            let t = eval_expr(ctx, true_val);
            let f = eval_expr(ctx, false_val);
            let width = t.width().max(f.width());
            if eval_expr(ctx, condition).is_true() {
                t.resize(width)
            } else {
                f.resize(width)
            }
        }
        Expr::Concat(parts) => {
            let values: Vec<Bits> = parts.iter().map(|p| eval_expr(ctx, p)).collect();
            Bits::concat(&values).unwrap_or_else(|| Bits::zero(1))
        }
        Expr::Slice { expr, high, low } => eval_expr(ctx, expr).slice(*high, *low),
        Expr::Index { expr, index } => {
            let val = eval_expr(ctx, expr);
            let idx = eval_expr(ctx, index).as_u64();
            Bits::from_bool(idx < u64::from(val.width()) && val.bit(idx as u32))
        }
        Expr::RomRead { rom, addr } => {
            let addr = eval_expr(ctx, addr).as_u64();
            Bits::new(u64::from(ctx.roms.read(*rom, addr)), 8)
        }
    }
}

fn eval_unary(op: UnaryOp, val: Bits) -> Bits {
    let w = val.width();
    match op {
        UnaryOp::Not => Bits::new(!val.as_u64(), w),
        UnaryOp::Neg => Bits::new(val.as_u64().wrapping_neg(), w),
        UnaryOp::RedAnd => Bits::from_bool(val.as_u64() == Bits::mask(w)),
        UnaryOp::RedOr => Bits::from_bool(val.as_u64() != 0),
        UnaryOp::RedXor => Bits::from_bool(val.as_u64().count_ones() % 2 == 1),
        UnaryOp::LogicNot => Bits::from_bool(!val.is_true()),
    }
}

fn eval_binary(op: BinaryOp, lhs: Bits, rhs: Bits) -> Bits {
    let (a, b) = (lhs.as_u64(), rhs.as_u64());
    let width = lhs.width().max(rhs.width());
    let arith = |v: u64| Bits::new(v, width);
    match op {
        BinaryOp::Add => arith(a.wrapping_add(b)),
        BinaryOp::Sub => arith(a.wrapping_sub(b)),
        BinaryOp::Mul => arith(a.wrapping_mul(b)),
        BinaryOp::Div => arith(a.checked_div(b).unwrap_or(0)),
        BinaryOp::Mod => arith(a.checked_rem(b).unwrap_or(0)),
        BinaryOp::And => arith(a & b),
        BinaryOp::Or => arith(a | b),
        BinaryOp::Xor => arith(a ^ b),
        BinaryOp::Shl => Bits::new(if b >= 64 { 0 } else { a << b }, lhs.width()),
        BinaryOp::Shr => Bits::new(if b >= 64 { 0 } else { a >> b }, lhs.width()),
        BinaryOp::Eq => Bits::from_bool(a == b),
        BinaryOp::Ne => Bits::from_bool(a != b),
        BinaryOp::Lt => Bits::from_bool(a < b),
        BinaryOp::Le => Bits::from_bool(a <= b),
        BinaryOp::Gt => Bits::from_bool(a > b),
        BinaryOp::Ge => Bits::from_bool(a >= b),
        BinaryOp::LogicAnd => Bits::from_bool(a != 0 && b != 0),
        BinaryOp::LogicOr => Bits::from_bool(a != 0 || b != 0),
    }
}

/// Mutable state for running process bodies.
pub struct Exec<'a> {
    /// The signal store; blocking assignments write here.
    pub store: &'a mut SignalStore,
    /// The delayed-write queue; non-blocking assignments write here.
    pub nba: &'a mut NbaQueue,
    /// External lookup tables.
    pub roms: &'a RomSet,
    /// Collected `Display` lines.
    pub display: &'a mut Vec<String>,
    /// Blocking writes that changed a stored value.
    pub changed: usize,
}

impl Exec<'_> {
    fn ctx(&self) -> EvalContext<'_> {
        EvalContext {
            store: &*self.store,
            roms: self.roms,
        }
    }

    /// Executes a statement tree.
    pub fn run(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Assign { target, value } => {
                let v = eval_expr(self.ctx(), value);
                let changed = match *target {
                    LValue::Signal(id) => self.store.set(id, v),
                    LValue::Slice { signal, high, low } => {
                        let merged = self.store.get(signal).with_slice(high, low, v.as_u64());
                        self.store.set(signal, merged)
                    }
                };
                if changed {
                    self.changed += 1;
                }
            }
            Statement::NonBlocking { target, value } => {
                let v = eval_expr(self.ctx(), value);
                match *target {
                    LValue::Signal(id) => {
                        let width = self.store.width(id);
                        self.nba.push_full(id, v.resize(width));
                    }
                    LValue::Slice { signal, high, low } => {
                        let mask = Bits::mask(high - low + 1) << low;
                        self.nba.push(signal, v.as_u64() << low, mask);
                    }
                }
            }
            Statement::If {
                condition,
                then_body,
                else_body,
            } => {
                if eval_expr(self.ctx(), condition).is_true() {
                    self.run(then_body);
                } else if let Some(else_body) = else_body {
                    self.run(else_body);
                }
            }
            Statement::Case {
                subject,
                arms,
                default,
            } => {
                let subject = eval_expr(self.ctx(), subject).as_u64();
                let ctx = self.ctx();
                let arm = arms.iter().find(|arm| {
                    arm.patterns
                        .iter()
                        .any(|p| eval_expr(ctx, p).as_u64() == subject)
                });
                match (arm, default) {
                    (Some(arm), _) => self.run(&arm.body),
                    (None, Some(default)) => self.run(default),
                    (None, None) => {}
                }
            }
            Statement::Block(stmts) => {
                for s in stmts {
                    self.run(s);
                }
            }
            Statement::Display { format, args } => {
                let values: Vec<Bits> = args.iter().map(|a| eval_expr(self.ctx(), a)).collect();
                let line = format_display(format, &values);
                info!(target: "vela_sim::display", "{line}");
                self.display.push(line);
            }
            Statement::Nop => {}
        }
    }
}

/// Formats a display string with `%d`, `%h`/`%x`, `%b` and `%%`.
pub fn format_display(format: &str, args: &[Bits]) -> String {
    let mut result = String::new();
    let mut args = args.iter();
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            result.push(c);
            continue;
        }
        let Some(spec) = chars.next() else {
            result.push('%');
            break;
        };
        if spec == '%' {
            result.push('%');
            continue;
        }
        match (spec, args.next()) {
            ('d' | 'D', Some(v)) => result.push_str(&v.as_u64().to_string()),
            ('h' | 'H' | 'x' | 'X', Some(v)) => result.push_str(&format!("{:x}", v.as_u64())),
            ('b' | 'B', Some(v)) => result.push_str(&v.to_string()),
            _ => {
                result.push('%');
                result.push(spec);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_config::InitConfig;
    use vela_ir::{CaseArm, Design, DesignBuilder, RomId, SignalId};

    struct Fixture {
        design: Design,
        a: SignalId,
        b: SignalId,
        y: SignalId,
    }

    fn fixture() -> Fixture {
        let mut builder = DesignBuilder::new();
        let a = builder.wire("a", 8).unwrap();
        let b = builder.wire("b", 4).unwrap();
        let y = builder.wire("y", 8).unwrap();
        Fixture {
            design: builder.build().unwrap(),
            a,
            b,
            y,
        }
    }

    fn eval(store: &SignalStore, expr: &Expr) -> Bits {
        let roms = RomSet::default();
        eval_expr(EvalContext { store, roms: &roms }, expr)
    }

    #[test]
    fn arithmetic_wraps_to_widest_operand() {
        let f = fixture();
        let mut store = SignalStore::new(&f.design, &InitConfig::default());
        store.set(f.a, Bits::new(0xff, 8));
        store.set(f.b, Bits::new(1, 4));
        let sum = eval(&store, &Expr::signal(f.a).add(Expr::signal(f.b)));
        assert_eq!(sum, Bits::new(0, 8));
        let diff = eval(&store, &Expr::signal(f.b).sub(Expr::lit(2, 4)));
        assert_eq!(diff, Bits::new(0xf, 4));
    }

    #[test]
    fn division_by_zero_is_zero() {
        let f = fixture();
        let store = SignalStore::new(&f.design, &InitConfig::default());
        let e = Expr::binary(BinaryOp::Div, Expr::lit(9, 8), Expr::signal(f.b));
        assert_eq!(eval(&store, &e), Bits::zero(8));
        let m = Expr::binary(BinaryOp::Mod, Expr::lit(9, 8), Expr::lit(0, 8));
        assert_eq!(eval(&store, &m), Bits::zero(8));
    }

    #[test]
    fn comparisons_and_reductions() {
        let f = fixture();
        let store = SignalStore::new(&f.design, &InitConfig::default());
        assert_eq!(eval(&store, &Expr::lit(3, 4).less_than(Expr::lit(4, 4))), Bits::from_bool(true));
        assert_eq!(eval(&store, &Expr::lit(3, 4).greater_eq(Expr::lit(4, 4))), Bits::from_bool(false));
        assert_eq!(eval(&store, &Expr::unary(UnaryOp::RedAnd, Expr::lit(0xf, 4))), Bits::from_bool(true));
        assert_eq!(eval(&store, &Expr::unary(UnaryOp::RedXor, Expr::lit(0b111, 3))), Bits::from_bool(true));
        assert_eq!(eval(&store, &Expr::lit(2, 4).logic_not()), Bits::from_bool(false));
        assert_eq!(eval(&store, &Expr::lit(0b1010, 4).not()), Bits::new(0b0101, 4));
    }

    #[test]
    fn shifts_keep_left_width() {
        let f = fixture();
        let store = SignalStore::new(&f.design, &InitConfig::default());
        assert_eq!(eval(&store, &Expr::lit(0b11, 4).shl(Expr::lit(3, 8))), Bits::new(0b1000, 4));
        assert_eq!(eval(&store, &Expr::lit(0x80, 8).shr(Expr::lit(70, 8))), Bits::zero(8));
    }

    #[test]
    fn ternary_concat_slice_index() {
        let f = fixture();
        let store = SignalStore::new(&f.design, &InitConfig::default());
        let t = Expr::lit(1, 1).select(Expr::lit(0xa, 4), Expr::lit(0, 8));
        assert_eq!(eval(&store, &t), Bits::new(0xa, 8));
        let c = Expr::Concat(vec![Expr::lit(0b10, 2), Expr::lit(0b01, 2)]);
        assert_eq!(eval(&store, &c), Bits::new(0b1001, 4));
        assert_eq!(eval(&store, &Expr::lit(0b1100, 4).slice(3, 2)), Bits::new(0b11, 2));
        assert_eq!(eval(&store, &Expr::lit(0b0100, 4).index(Expr::lit(2, 3))), Bits::from_bool(true));
        assert_eq!(eval(&store, &Expr::lit(0b1111, 4).index(Expr::lit(9, 4))), Bits::from_bool(false));
    }

    #[test]
    fn rom_reads_bytes() {
        let mut builder = DesignBuilder::new();
        let font = builder.rom("font", 2).unwrap();
        let design = builder.build().unwrap();
        let mut bindings = crate::rom::RomBindings::new();
        bindings.bind("font", std::sync::Arc::new(vec![0x12u8, 0x34]));
        let roms = bindings.resolve(&design).unwrap();
        let store = SignalStore::new(&design, &InitConfig::default());
        let ctx = EvalContext {
            store: &store,
            roms: &roms,
        };
        assert_eq!(eval_expr(ctx, &Expr::rom(font, Expr::lit(1, 4))), Bits::new(0x34, 8));
        assert_eq!(eval_expr(ctx, &Expr::rom(font, Expr::lit(5, 4))), Bits::zero(8));
        assert_eq!(eval_expr(ctx, &Expr::rom(RomId::from_raw(9), Expr::lit(0, 4))), Bits::zero(8));
    }

    #[test]
    fn blocking_and_nonblocking_targets() {
        let f = fixture();
        let mut store = SignalStore::new(&f.design, &InitConfig::default());
        let mut nba = NbaQueue::new();
        let roms = RomSet::default();
        let mut display = Vec::new();
        let mut exec = Exec {
            store: &mut store,
            nba: &mut nba,
            roms: &roms,
            display: &mut display,
            changed: 0,
        };
        exec.run(&Statement::block([
            Statement::assign(f.a, Expr::lit(0x1ff, 12)),
            Statement::Assign {
                target: LValue::Slice {
                    signal: f.y,
                    high: 7,
                    low: 4,
                },
                value: Expr::lit(0xc, 4),
            },
            Statement::nonblocking(f.b, Expr::lit(5, 4)),
        ]));
        assert_eq!(exec.changed, 2);
        assert_eq!(store.get(f.a), Bits::new(0xff, 8));
        assert_eq!(store.get(f.y), Bits::new(0xc0, 8));
        // The non-blocking write is only queued.
        assert_eq!(store.get(f.b), Bits::zero(4));
        assert_eq!(nba.pending(f.b).map(|w| w.value), Some(5));
    }

    #[test]
    fn case_picks_first_match_or_default() {
        let f = fixture();
        let mut store = SignalStore::new(&f.design, &InitConfig::default());
        store.set(f.b, Bits::new(2, 4));
        let mut nba = NbaQueue::new();
        let roms = RomSet::default();
        let mut display = Vec::new();
        let stmt = Statement::Case {
            subject: Expr::signal(f.b),
            arms: vec![
                CaseArm {
                    patterns: vec![Expr::lit(0, 4), Expr::lit(2, 4)],
                    body: Statement::assign(f.y, Expr::lit(1, 8)),
                },
                CaseArm {
                    patterns: vec![Expr::lit(2, 4)],
                    body: Statement::assign(f.y, Expr::lit(2, 8)),
                },
            ],
            default: Some(Box::new(Statement::assign(f.y, Expr::lit(9, 8)))),
        };
        let mut exec = Exec {
            store: &mut store,
            nba: &mut nba,
            roms: &roms,
            display: &mut display,
            changed: 0,
        };
        exec.run(&stmt);
        exec.store.set(f.b, Bits::new(7, 4));
        exec.run(&Statement::Case {
            subject: Expr::signal(f.b),
            arms: vec![],
            default: Some(Box::new(Statement::assign(f.a, Expr::lit(9, 8)))),
        });
        assert_eq!(store.get(f.y), Bits::new(1, 8));
        assert_eq!(store.get(f.a), Bits::new(9, 8));
    }

    #[test]
    fn display_collects_lines() {
        let f = fixture();
        let mut store = SignalStore::new(&f.design, &InitConfig::default());
        store.set(f.a, Bits::new(42, 8));
        let mut nba = NbaQueue::new();
        let roms = RomSet::default();
        let mut display = Vec::new();
        let mut exec = Exec {
            store: &mut store,
            nba: &mut nba,
            roms: &roms,
            display: &mut display,
            changed: 0,
        };
        exec.run(&Statement::display("a=%d (%h) 100%%", vec![Expr::signal(f.a), Expr::signal(f.a)]));
        assert_eq!(display, vec!["a=42 (2a) 100%".to_string()]);
    }

    #[test]
    fn format_display_variants() {
        assert_eq!(format_display("val=%b", &[Bits::new(0b101, 3)]), "val=101");
        assert_eq!(format_display("val=%h", &[Bits::new(0xff, 8)]), "val=ff");
        assert_eq!(format_display("missing %d", &[]), "missing %d");
        assert_eq!(format_display("trailing %", &[]), "trailing %");
    }
}
