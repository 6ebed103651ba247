//! Directed topology: nodes, links and their creation order.
//!
//! Backed by a petgraph `DiGraph`. Link labels are kept outside the graph in
//! [`LinkLabels`](crate::symbol::LinkLabels), so the topology is immutable
//! once built and can be shared freely between trials.
//!
//! petgraph hands back a node's edges newest-first; every accessor here
//! re-sorts them into creation order, which the assignment engine depends on.

use crate::symbol::LinkLabels;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::VecDeque;
use std::fmt::Write;

/// Index of a node within its [`Topology`].
pub type NodeId = NodeIndex;

/// Index of a link within its [`Topology`].
pub type LinkId = EdgeIndex;

/// Per-link data stored in the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Nominal transmission rate (carried, not used by the algorithms)
    pub rate: f64,
}

/// A multicast topology.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    graph: DiGraph<String, Link>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node with an opaque label.
    pub fn add_node(&mut self, label: impl Into<String>) -> NodeId {
        self.graph.add_node(label.into())
    }

    /// Append a link from `src` to `dst`.
    ///
    /// No duplicate or cycle checks; acyclicity is verified separately by
    /// [`Scenario::validate`](crate::scenario::Scenario::validate).
    pub fn create_link(&mut self, src: NodeId, dst: NodeId, rate: f64) -> LinkId {
        self.graph.add_edge(src, dst, Link { rate })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.graph.node_count()
    }

    /// Label of a node. Panics if the node does not belong to this topology.
    pub fn label(&self, node: NodeId) -> &str {
        &self.graph[node]
    }

    /// Look a node up by label.
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.graph
            .node_indices()
            .find(|&n| self.graph[n] == label)
    }

    /// All node ids in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices()
    }

    /// Outgoing links of `node`, in creation order.
    pub fn outgoing(&self, node: NodeId) -> Vec<LinkId> {
        self.links(node, Direction::Outgoing)
    }

    /// Incoming links of `node`, in creation order.
    pub fn incoming(&self, node: NodeId) -> Vec<LinkId> {
        self.links(node, Direction::Incoming)
    }

    fn links(&self, node: NodeId, direction: Direction) -> Vec<LinkId> {
        let mut links: Vec<LinkId> = self
            .graph
            .edges_directed(node, direction)
            .map(|e| e.id())
            .collect();
        links.sort();
        links
    }

    /// Destination node of a link.
    pub fn target(&self, link: LinkId) -> NodeId {
        self.endpoints(link).1
    }

    /// `(source, destination)` of a link. Panics on a foreign link id.
    pub fn endpoints(&self, link: LinkId) -> (NodeId, NodeId) {
        self.graph
            .edge_endpoints(link)
            .expect("link id belongs to this topology")
    }

    pub fn rate(&self, link: LinkId) -> f64 {
        self.graph[link].rate
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Breadth-first order of the nodes reachable from `source`.
    ///
    /// Outgoing links are followed in creation order and each node appears
    /// once. Used for display and reachability checks.
    pub fn traverse(&self, source: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut visited = vec![false; self.node_count()];
        let mut queue = VecDeque::new();

        visited[source.index()] = true;
        queue.push_back(source);

        while let Some(node) = queue.pop_front() {
            order.push(node);
            for link in self.outgoing(node) {
                let next = self.target(link);
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }

        order
    }

    /// Render the network reachable from `source`, one link per line.
    ///
    /// When `labels` is given each link also shows the symbol it carries.
    pub fn render(&self, source: NodeId, labels: Option<&LinkLabels>) -> String {
        let mut out = String::new();
        for node in self.traverse(source) {
            let outgoing = self.outgoing(node);
            if outgoing.is_empty() {
                let _ = writeln!(out, "{} (no outgoing links)", self.label(node));
                continue;
            }
            for link in outgoing {
                let _ = write!(
                    out,
                    "{} -> {} [rate {}",
                    self.label(node),
                    self.label(self.target(link)),
                    self.rate(link)
                );
                match labels {
                    Some(labels) => {
                        let _ = writeln!(out, ", symbol {}]", labels.get(link));
                    }
                    None => {
                        let _ = writeln!(out, "]");
                    }
                }
            }
        }
        out
    }
}
