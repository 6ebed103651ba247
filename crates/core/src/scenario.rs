//! A topology together with its source, sinks and packet count.
//!
//! Two checks gate every run:
//! - [`Scenario::validate`]: the graph is a single-source DAG that reaches
//!   every node, and at least one sink exists
//! - [`SupportedConfig::check`]: fan-out and packet count are in the
//!   modelled range

use crate::error::{Result, TopologyError, UnsupportedConfig};
use crate::graph::{NodeId, Topology};

/// Number of source symbols every supported configuration uses.
pub const PACKETS: usize = 2;

/// A multicast problem instance.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub topology: Topology,
    pub source: NodeId,
    pub sinks: Vec<NodeId>,
    pub num_packets: usize,
}

impl Scenario {
    pub fn new(topology: Topology, source: NodeId, sinks: Vec<NodeId>, num_packets: usize) -> Self {
        Self {
            topology,
            source,
            sinks,
            num_packets,
        }
    }

    /// Check the structural contract of the topology.
    pub fn validate(&self) -> Result<()> {
        if self.sinks.is_empty() {
            return Err(TopologyError::NoSinks.into());
        }

        for &node in std::iter::once(&self.source).chain(self.sinks.iter()) {
            if !self.topology.contains(node) {
                return Err(TopologyError::UnknownNode {
                    index: node.index(),
                }
                .into());
            }
        }

        let incoming = self.topology.incoming(self.source).len();
        if incoming > 0 {
            return Err(TopologyError::SourceHasIncoming {
                node: self.topology.label(self.source).to_string(),
                count: incoming,
            }
            .into());
        }

        if !self.topology.is_acyclic() {
            return Err(TopologyError::Cyclic.into());
        }

        let reached = self.topology.traverse(self.source);
        if reached.len() < self.topology.node_count() {
            let missing = self
                .topology
                .nodes()
                .find(|n| !reached.contains(n))
                .map(|n| self.topology.label(n).to_string())
                .unwrap_or_default();
            return Err(TopologyError::Unreachable { node: missing }.into());
        }

        Ok(())
    }

    pub fn source_out_degree(&self) -> usize {
        self.topology.outgoing(self.source).len()
    }

    pub fn sink_labels(&self) -> Vec<&str> {
        self.sinks.iter().map(|&s| self.topology.label(s)).collect()
    }
}

/// How many links leave the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFanout {
    Two,
    Three,
}

impl SourceFanout {
    pub fn links(self) -> usize {
        match self {
            SourceFanout::Two => 2,
            SourceFanout::Three => 3,
        }
    }
}

/// A scenario shape the assignment engine knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedConfig {
    pub fanout: SourceFanout,
}

impl SupportedConfig {
    /// Classify a scenario, or explain why it is out of range.
    pub fn check(scenario: &Scenario) -> std::result::Result<Self, UnsupportedConfig> {
        if scenario.num_packets != PACKETS {
            return Err(UnsupportedConfig::PacketCount {
                num_packets: scenario.num_packets,
            });
        }

        let fanout = match scenario.source_out_degree() {
            2 => SourceFanout::Two,
            3 => SourceFanout::Three,
            out_degree => return Err(UnsupportedConfig::SourceFanout { out_degree }),
        };

        Ok(Self { fanout })
    }
}
