//! Error types for the netcode-sim system.
//!
//! Simulation failures are values, never panics. An unsupported configuration
//! is reported before any trial runs so the caller can skip that topology and
//! keep going.

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Unsupported: the scenario is well-formed but outside the modelled range
/// - Topology: the graph violates the single-source DAG contract
/// - Config: application-level configuration problems
#[derive(Debug, Error)]
pub enum Error {
    /// Source fan-out or packet count outside the supported configurations
    #[error("unsupported configuration: {0}")]
    Unsupported(#[from] UnsupportedConfig),

    /// Malformed topology detected during validation or traversal
    #[error("malformed topology: {0}")]
    Topology(#[from] TopologyError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Reasons a scenario falls outside the supported configurations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsupportedConfig {
    /// The source must have exactly 2 or 3 outgoing links
    #[error("source has {out_degree} outgoing links, expected 2 or 3")]
    SourceFanout { out_degree: usize },

    /// Only two source symbols are modelled
    #[error("num_packets is {num_packets}, only 2 is supported")]
    PacketCount { num_packets: usize },
}

/// Structural problems with a topology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// The sink list is empty
    #[error("no sink nodes were designated")]
    NoSinks,

    /// A node index does not belong to this topology
    #[error("node index {index} is not part of the topology")]
    UnknownNode { index: usize },

    /// The source has incoming links
    #[error("source {node} has {count} incoming links")]
    SourceHasIncoming { node: String, count: usize },

    /// The graph contains a directed cycle
    #[error("topology contains a directed cycle")]
    Cyclic,

    /// A node cannot be reached from the source
    #[error("node {node} is unreachable from the source")]
    Unreachable { node: String },

    /// A relay was visited with no labelled incoming link
    #[error("node {node} was visited without any labelled incoming link")]
    NoLabelledInput { node: String },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
