//! Per-sink throughput for a completed assignment.
//!
//! A sink's throughput is the number of distinct symbols on its incoming
//! links. Under coding the count is clamped to the packet count: an XOR label
//! can't give a sink more information than the source injected. Whether the
//! sink could actually decode is not checked.

use crate::engine::{Assignment, Strategy};
use crate::graph::{NodeId, Topology};

/// Outcome of scoring one assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    /// Distinct symbols achieved by each sink, in sink order
    pub per_sink: Vec<usize>,

    /// Mean of `per_sink`
    pub throughput: f64,

    /// Memory figure carried over from the assignment
    pub memory_used: u32,
}

impl Score {
    /// Whether every sink received all `num_packets` symbols.
    pub fn is_full_rate(&self, num_packets: usize) -> bool {
        self.per_sink.iter().all(|&count| count >= num_packets)
    }
}

/// Distinct symbols a single sink receives.
pub fn sink_throughput(
    topology: &Topology,
    assignment: &Assignment,
    sink: NodeId,
    strategy: Strategy,
    num_packets: usize,
) -> usize {
    let distinct = assignment.labels.distinct(&topology.incoming(sink)).len();
    match strategy {
        Strategy::Plain => distinct,
        Strategy::Coded => distinct.min(num_packets),
    }
}

/// Score an assignment across all sinks.
pub fn score(
    topology: &Topology,
    assignment: &Assignment,
    sinks: &[NodeId],
    strategy: Strategy,
    num_packets: usize,
) -> Score {
    let per_sink: Vec<usize> = sinks
        .iter()
        .map(|&sink| sink_throughput(topology, assignment, sink, strategy, num_packets))
        .collect();

    let throughput = if per_sink.is_empty() {
        0.0
    } else {
        per_sink.iter().sum::<usize>() as f64 / per_sink.len() as f64
    };

    Score {
        per_sink,
        throughput,
        memory_used: assignment.memory_used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{LinkLabels, Symbol};

    /// S -> A, S -> B, A -> D, B -> D, S -> E. Sinks D and E.
    fn fixture() -> (Topology, Vec<NodeId>, Vec<crate::graph::LinkId>) {
        let mut t = Topology::new();
        let s = t.add_node("S");
        let a = t.add_node("A");
        let b = t.add_node("B");
        let d = t.add_node("D");
        let e = t.add_node("E");
        let links = vec![
            t.create_link(s, a, 1.0),
            t.create_link(s, b, 1.0),
            t.create_link(a, d, 1.0),
            t.create_link(b, d, 1.0),
            t.create_link(s, e, 1.0),
        ];
        (t, vec![d, e], links)
    }

    fn assignment(topology: &Topology, symbols: &[Symbol], memory_used: u32) -> Assignment {
        let mut labels = LinkLabels::unassigned(topology);
        for (i, &symbol) in symbols.iter().enumerate() {
            labels.set(crate::graph::LinkId::new(i), symbol);
        }
        Assignment {
            labels,
            memory_used,
        }
    }

    #[test]
    fn test_plain_counts_distinct() {
        let (topology, sinks, _) = fixture();
        let a = assignment(
            &topology,
            &[
                Symbol::Original(1),
                Symbol::Original(2),
                Symbol::Original(1),
                Symbol::Original(2),
                Symbol::Original(1),
            ],
            4,
        );
        let score = score(&topology, &a, &sinks, Strategy::Plain, 2);
        assert_eq!(score.per_sink, vec![2, 1]);
        assert_eq!(score.throughput, 1.5);
        assert_eq!(score.memory_used, 4);
        assert!(!score.is_full_rate(2));
    }

    #[test]
    fn test_duplicates_collapse() {
        let (topology, sinks, _) = fixture();
        let same = Symbol::Original(2);
        let a = assignment(&topology, &[same, same, same, same, same], 4);
        let score = score(&topology, &a, &sinks, Strategy::Plain, 2);
        assert_eq!(score.per_sink, vec![1, 1]);
        assert_eq!(score.throughput, 1.0);
    }

    #[test]
    fn test_coded_clamps_to_packet_count() {
        // Three parallel links carrying 1, 2 and 1^2
        let mut t = Topology::new();
        let s = t.add_node("S");
        let d = t.add_node("D");
        t.create_link(s, d, 1.0);
        t.create_link(s, d, 1.0);
        t.create_link(s, d, 1.0);
        let a = assignment(&t, &[Symbol::Original(1), Symbol::Original(2), Symbol::Xor], 0);

        assert_eq!(sink_throughput(&t, &a, d, Strategy::Plain, 2), 3);
        assert_eq!(sink_throughput(&t, &a, d, Strategy::Coded, 2), 2);

        let score = score(&t, &a, &[d], Strategy::Coded, 2);
        assert!(score.is_full_rate(2));
    }

    #[test]
    fn test_unassigned_is_not_a_symbol() {
        let (topology, sinks, _) = fixture();
        let a = assignment(&topology, &[], 0);
        let score = score(&topology, &a, &sinks, Strategy::Plain, 2);
        assert_eq!(score.per_sink, vec![0, 0]);
        assert_eq!(score.throughput, 0.0);
    }
}
