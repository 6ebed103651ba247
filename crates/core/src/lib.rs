//! netcode-sim-core: multicast throughput with and without network coding
//!
//! This library estimates how many distinct symbols every sink of a small
//! directed acyclic network can receive per time slot:
//! - Relays either forward one received symbol per link (plain routing)
//! - Or may send the XOR of both source symbols (network coding)
//! - Many randomized trials are run and reduced by max or mean
//! - Coding's throughput gain is weighed against its extra buffering
//!
//! # Architecture
//!
//! - `graph`: Topology storage (petgraph) with creation-ordered links
//! - `symbol`: Link symbols and the per-trial label map
//! - `scenario`: Source, sinks, packet count, and validation
//! - `engine`: Breadth-first randomized symbol assignment
//! - `scorer`: Per-sink distinct-symbol counts
//! - `orchestrator`: Trial loops, reducers, efficiency ratio
//! - `metrics`: Run-wide counters and reporting
//!
//! # Design Principles
//!
//! - **Immutable topology**: Labels live in a fresh map per trial
//! - **Deterministic**: Seeded ChaCha8 streams make runs reproducible
//! - **No panics**: Unsupported or malformed scenarios are error values

pub mod engine;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod orchestrator;
pub mod scenario;
pub mod scorer;
pub mod symbol;

// Re-export commonly used types
pub use engine::Strategy;
pub use error::{Error, Result};
pub use graph::Topology;
pub use orchestrator::{compare, Comparison, Reducer, TrialConfig, TrialSummary};
pub use scenario::Scenario;
