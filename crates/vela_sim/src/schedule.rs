//! Static scheduling: assigns every process of a design to its region.
//!
//! Compiling a [`Schedule`] happens once per simulator. Combinational
//! processes whose reads are all primary inputs form the input-combinational
//! region; every other combinational process belongs to the settle loop.
//! Clocked processes are grouped into clock domains, one per distinct
//! sensitivity list.

use std::collections::BTreeSet;

use vela_ir::{
    describe_sensitivity, settle_order, Design, EdgeSensitivity, ProcessId, ProcessKind, SignalId,
};

/// Clocked processes sharing one sensitivity list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockDomain {
    /// The edges that trigger this domain.
    pub sensitivity: Vec<EdgeSensitivity>,
    /// Human-readable form, e.g. `@(posedge clk or negedge reset)`.
    pub description: String,
    /// Member processes in declaration order.
    pub processes: Vec<ProcessId>,
}

/// Region assignment of every process in a design.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    /// Static processes in declaration order.
    pub statics: Vec<ProcessId>,
    /// Initial processes in declaration order.
    pub initials: Vec<ProcessId>,
    /// Final processes in declaration order.
    pub finals: Vec<ProcessId>,
    /// Input-combinational processes in dependency order.
    pub input_comb: Vec<ProcessId>,
    /// Primary inputs read by the input-combinational processes.
    pub input_comb_watch: BTreeSet<SignalId>,
    /// Settle processes in dependency order.
    pub settle: Vec<ProcessId>,
    /// Signals whose change re-triggers the settle loop.
    pub settle_watch: BTreeSet<SignalId>,
    /// Signals written by input-combinational or settle processes.
    pub comb_driven: BTreeSet<SignalId>,
    /// Signals written by a settle process and read at or before it.
    pub feedback: BTreeSet<SignalId>,
    /// Clock domains in order of first appearance.
    pub domains: Vec<ClockDomain>,
    /// Every clocked process with the index of its domain, in declaration
    /// order.
    pub clocked: Vec<(ProcessId, usize)>,
}

impl Schedule {
    /// Classifies the processes of `design`.
    pub fn compile(design: &Design) -> Self {
        let inputs: BTreeSet<SignalId> = design.inputs().collect();
        let mut schedule = Schedule::default();
        let mut input_comb = Vec::new();
        let mut settle = Vec::new();

        for (id, process) in design.processes.iter() {
            match &process.kind {
                ProcessKind::Static => schedule.statics.push(id),
                ProcessKind::Initial => schedule.initials.push(id),
                ProcessKind::Final => schedule.finals.push(id),
                ProcessKind::Combinational => {
                    let mut reads = BTreeSet::new();
                    process.body.collect_reads(&mut reads);
                    if reads.is_subset(&inputs) {
                        schedule.input_comb_watch.extend(reads);
                        input_comb.push(id);
                    } else {
                        settle.push(id);
                    }
                }
                ProcessKind::Clocked(list) => {
                    let domain = match schedule
                        .domains
                        .iter()
                        .position(|d| d.sensitivity == *list)
                    {
                        Some(index) => index,
                        None => {
                            schedule.domains.push(ClockDomain {
                                sensitivity: list.clone(),
                                description: describe_sensitivity(design, list),
                                processes: Vec::new(),
                            });
                            schedule.domains.len() - 1
                        }
                    };
                    schedule.domains[domain].processes.push(id);
                    schedule.clocked.push((id, domain));
                }
            }
        }

        schedule.input_comb = settle_order(design, &input_comb).order;
        for &id in &schedule.input_comb {
            design.processes[id].body.collect_writes(&mut schedule.comb_driven);
        }

        let ordered = settle_order(design, &settle);
        let mut reads = BTreeSet::new();
        let mut writes = BTreeSet::new();
        for &id in &ordered.order {
            let body = &design.processes[id].body;
            body.collect_reads(&mut reads);
            body.collect_writes(&mut writes);
        }
        schedule.settle_watch = reads
            .difference(&writes)
            .copied()
            .chain(ordered.feedback.iter().copied())
            .collect();
        schedule.comb_driven.extend(writes);
        schedule.feedback = ordered.feedback;
        schedule.settle = ordered.order;
        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_ir::{DesignBuilder, Expr, Statement};

    #[test]
    fn classifies_regions() {
        let mut b = DesignBuilder::new();
        let clk = b.input("clk", 1).unwrap();
        let reset = b.input("reset", 1).unwrap();
        let btn = b.input("btn", 1).unwrap();
        let led = b.output("led", 1).unwrap();
        let q = b.reg("q", 4).unwrap();
        let y = b.output("y", 4).unwrap();
        let r = b.reg("r", 1).unwrap();

        let led_p = b.assign(led, Expr::signal(btn));
        let y_p = b.assign(y, Expr::signal(q).add(Expr::lit(1, 4)));
        let q_p = b.clocked(
            "count",
            vec![EdgeSensitivity::posedge(clk), EdgeSensitivity::negedge(reset)],
            Statement::nonblocking(q, Expr::signal(q).add(Expr::lit(1, 4))),
        );
        let r_p = b.clocked(
            "sample",
            vec![EdgeSensitivity::posedge(clk)],
            Statement::nonblocking(r, Expr::signal(btn)),
        );
        let q2_p = b.clocked(
            "shadow",
            vec![EdgeSensitivity::posedge(clk), EdgeSensitivity::negedge(reset)],
            Statement::Nop,
        );
        let init_p = b.initial("boot", Statement::assign(r, Expr::lit(0, 1)));
        let design = b.build().unwrap();

        let s = Schedule::compile(&design);
        assert_eq!(s.input_comb, vec![led_p]);
        assert_eq!(s.input_comb_watch, BTreeSet::from([btn]));
        assert_eq!(s.settle, vec![y_p]);
        assert_eq!(s.settle_watch, BTreeSet::from([q]));
        assert!(s.feedback.is_empty());
        assert_eq!(s.comb_driven, BTreeSet::from([led, y]));
        assert_eq!(s.initials, vec![init_p]);
        assert_eq!(s.domains.len(), 2);
        assert_eq!(s.domains[0].description, "@(posedge clk or negedge reset)");
        assert_eq!(s.domains[0].processes, vec![q_p, q2_p]);
        assert_eq!(s.domains[1].processes, vec![r_p]);
        assert_eq!(s.clocked, vec![(q_p, 0), (r_p, 1), (q2_p, 0)]);
    }

    #[test]
    fn settle_follows_dependencies() {
        let mut b = DesignBuilder::new();
        let a = b.input("a", 4).unwrap();
        let r = b.reg("r", 4).unwrap();
        let x = b.wire("x", 4).unwrap();
        let y = b.wire("y", 4).unwrap();
        // Declared reader-first; the order must put the writer first.
        let y_p = b.assign(y, Expr::signal(x).add(Expr::signal(a)));
        let x_p = b.assign(x, Expr::signal(r));
        let design = b.build().unwrap();

        let s = Schedule::compile(&design);
        assert_eq!(s.settle, vec![x_p, y_p]);
        assert_eq!(s.settle_watch, BTreeSet::from([a, r]));
    }

    #[test]
    fn cycle_signals_are_watched() {
        let mut b = DesignBuilder::new();
        let r = b.reg("r", 4).unwrap();
        let x = b.wire("x", 4).unwrap();
        let y = b.wire("y", 4).unwrap();
        b.assign(x, Expr::signal(y).and(Expr::signal(r)));
        b.assign(y, Expr::signal(x));
        let design = b.build().unwrap();

        let s = Schedule::compile(&design);
        assert!(s.feedback.contains(&y));
        assert!(s.settle_watch.contains(&y));
        assert!(s.settle_watch.contains(&r));
    }
}
