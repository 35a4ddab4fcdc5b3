//! Write→read ordering of combinational processes.
//!
//! The settle loop runs its processes in dependency order so that an
//! acyclic network settles in a single pass. Processes that form a cycle are
//! kept together in declaration order, and the signals closing the cycle are
//! reported as feedback so the kernel can watch them for changes.

use crate::design::Design;
use crate::ids::{ProcessId, SignalId};
use petgraph::algo::condensation;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

/// The result of ordering a set of combinational processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettleOrder {
    /// Processes in execution order.
    pub order: Vec<ProcessId>,
    /// Signals read at or before the position of a process writing them.
    /// A change to one of these after a pass means another pass is needed.
    pub feedback: BTreeSet<SignalId>,
}

struct Access {
    reads: BTreeSet<SignalId>,
    writes: BTreeSet<SignalId>,
}

/// Orders `processes` topologically by write→read dependency.
///
/// Among processes that are ready at the same time, and inside a cycle, the
/// lower [`ProcessId`] runs first, which keeps the order deterministic and
/// close to declaration order.
pub fn settle_order(design: &Design, processes: &[ProcessId]) -> SettleOrder {
    let access: BTreeMap<ProcessId, Access> = processes
        .iter()
        .map(|&id| {
            let body = &design.processes[id].body;
            let mut reads = BTreeSet::new();
            let mut writes = BTreeSet::new();
            body.collect_reads(&mut reads);
            body.collect_writes(&mut writes);
            (id, Access { reads, writes })
        })
        .collect();

    let mut graph: DiGraph<ProcessId, ()> = DiGraph::new();
    let nodes: BTreeMap<ProcessId, NodeIndex> = access
        .keys()
        .map(|&id| (id, graph.add_node(id)))
        .collect();
    for (&writer, w) in &access {
        for (&reader, r) in &access {
            if writer != reader && !w.writes.is_disjoint(&r.reads) {
                graph.add_edge(nodes[&writer], nodes[&reader], ());
            }
        }
    }

    // One node per strongly connected component; members sorted so a cycle
    // runs in declaration order.
    let mut dag = condensation(graph, true);
    for members in dag.node_weights_mut() {
        members.sort();
    }

    let mut indegree: Vec<usize> = dag
        .node_indices()
        .map(|n| dag.neighbors_directed(n, Direction::Incoming).count())
        .collect();
    let mut ready: BinaryHeap<Reverse<(ProcessId, NodeIndex)>> = dag
        .node_indices()
        .filter(|n| indegree[n.index()] == 0)
        .map(|n| Reverse((dag[n][0], n)))
        .collect();
    let mut order = Vec::with_capacity(processes.len());
    while let Some(Reverse((_, n))) = ready.pop() {
        order.extend_from_slice(&dag[n]);
        for next in dag.neighbors_directed(n, Direction::Outgoing) {
            indegree[next.index()] -= 1;
            if indegree[next.index()] == 0 {
                ready.push(Reverse((dag[next][0], next)));
            }
        }
    }

    let position: BTreeMap<ProcessId, usize> =
        order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let mut feedback = BTreeSet::new();
    for (writer, w) in &access {
        for (reader, r) in &access {
            if position[reader] > position[writer] {
                continue;
            }
            feedback.extend(w.writes.intersection(&r.reads).copied());
        }
    }

    SettleOrder { order, feedback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DesignBuilder;
    use crate::expr::Expr;
    use crate::stmt::Statement;

    #[test]
    fn chain_is_reordered() {
        let mut b = DesignBuilder::new();
        let a = b.input("a", 1).unwrap();
        let x = b.wire("x", 1).unwrap();
        let y = b.wire("y", 1).unwrap();
        // Declared consumer-first.
        let p_y = b.assign(y, Expr::signal(x).not());
        let p_x = b.assign(x, Expr::signal(a));
        let design = b.build().unwrap();
        let result = settle_order(&design, &[p_y, p_x]);
        assert_eq!(result.order, vec![p_x, p_y]);
        assert!(result.feedback.is_empty());
    }

    #[test]
    fn independent_keep_declaration_order() {
        let mut b = DesignBuilder::new();
        let a = b.input("a", 1).unwrap();
        let x = b.wire("x", 1).unwrap();
        let y = b.wire("y", 1).unwrap();
        let p0 = b.assign(x, Expr::signal(a));
        let p1 = b.assign(y, Expr::signal(a));
        let design = b.build().unwrap();
        let result = settle_order(&design, &[p1, p0]);
        assert_eq!(result.order, vec![p0, p1]);
    }

    #[test]
    fn cycle_reports_feedback() {
        let mut b = DesignBuilder::new();
        let x = b.wire("x", 1).unwrap();
        let y = b.wire("y", 1).unwrap();
        let p0 = b.assign(x, Expr::signal(y));
        let p1 = b.assign(y, Expr::signal(x).not());
        let design = b.build().unwrap();
        let result = settle_order(&design, &[p0, p1]);
        assert_eq!(result.order, vec![p0, p1]);
        // p0 reads y before p1 writes it.
        assert!(result.feedback.contains(&y));
        assert!(!result.feedback.contains(&x));
    }

    #[test]
    fn self_read_is_feedback() {
        let mut b = DesignBuilder::new();
        let x = b.wire("x", 4).unwrap();
        let p = b.comb("inc", Statement::assign(x, Expr::signal(x).add(Expr::lit(1, 4))));
        let design = b.build().unwrap();
        let result = settle_order(&design, &[p]);
        assert_eq!(result.order, vec![p]);
        assert!(result.feedback.contains(&x));
    }
}
