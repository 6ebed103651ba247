//! Randomized symbol assignment for one trial.
//!
//! Both strategies share one traversal: breadth-first from the source, each
//! node handled once, outgoing links in creation order. They differ in what a
//! node may put on its outgoing links.
//!
//! # Plain (routing only)
//!
//! - Source: shuffle `{1..=n}` and pop one symbol per link, refilling when empty
//! - Relay: each outgoing link independently picks one of the distinct
//!   symbols seen on the incoming links
//! - Memory: `max(1, min(distinct inputs, outgoing links))` per relay
//!
//! # Coded (XOR allowed)
//!
//! - Source: pool `[1, 2, 1^2]` cut to the source's fan-out, popped without
//!   replacement and refilled when empty
//! - Relay with two or more distinct inputs: each outgoing link picks
//!   uniformly from `{1, 2, 1^2}`
//! - Relay with one distinct input: every outgoing link forwards it
//! - Memory: `min(distinct inputs, 2)` per relay
//!
//! The source is never counted in the memory figure.
//!
//! # Determinism
//!
//! Candidate pools are ordered sets, so all randomness comes from the caller's
//! RNG. A seeded `ChaCha8Rng` reproduces an assignment exactly.

use crate::error::{Result, TopologyError, UnsupportedConfig};
use crate::graph::{NodeId, Topology};
use crate::scenario::PACKETS;
use crate::symbol::{LinkLabels, Symbol};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;
use std::fmt;

/// Symbols a coding relay may emit when it holds both originals.
pub const CODED_ALPHABET: [Symbol; 3] = [Symbol::Original(1), Symbol::Original(2), Symbol::Xor];

/// Forwarding strategy used by relays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Relays forward one received symbol per link
    Plain,
    /// Relays may send the XOR of both originals
    Coded,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Plain => "plain",
            Strategy::Coded => "coded",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of labelling every reachable link once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub labels: LinkLabels,

    /// Buffered-symbol estimate summed over non-source nodes
    pub memory_used: u32,
}

/// Run the assignment for `strategy`.
pub fn assign<R: Rng + ?Sized>(
    strategy: Strategy,
    topology: &Topology,
    source: NodeId,
    num_packets: usize,
    rng: &mut R,
) -> Result<Assignment> {
    match strategy {
        Strategy::Plain => assign_plain(topology, source, num_packets, rng),
        Strategy::Coded => assign_coded(topology, source, num_packets, rng),
    }
}

/// Label every reachable link without coding.
pub fn assign_plain<R: Rng + ?Sized>(
    topology: &Topology,
    source: NodeId,
    num_packets: usize,
    rng: &mut R,
) -> Result<Assignment> {
    if num_packets == 0 {
        return Err(UnsupportedConfig::PacketCount { num_packets }.into());
    }

    let alphabet = (1..=num_packets).map(Symbol::Original).collect();

    walk(
        topology,
        source,
        alphabet,
        rng,
        |inputs, rng| inputs[rng.gen_range(0..inputs.len())],
        |distinct, out_degree| distinct.min(out_degree).max(1) as u32,
    )
}

/// Label every reachable link, letting relays XOR their inputs.
pub fn assign_coded<R: Rng + ?Sized>(
    topology: &Topology,
    source: NodeId,
    num_packets: usize,
    rng: &mut R,
) -> Result<Assignment> {
    // The XOR label only covers the two-symbol case
    if num_packets != PACKETS {
        return Err(UnsupportedConfig::PacketCount { num_packets }.into());
    }

    let fanout = topology.outgoing(source).len().min(CODED_ALPHABET.len());
    let alphabet = CODED_ALPHABET[..fanout].to_vec();

    walk(
        topology,
        source,
        alphabet,
        rng,
        |inputs, rng| {
            if inputs.len() > 1 {
                CODED_ALPHABET[rng.gen_range(0..CODED_ALPHABET.len())]
            } else {
                inputs[0]
            }
        },
        |distinct, _| distinct.min(2) as u32,
    )
}

/// Symbols handed out at the source: popped without replacement from a
/// shuffled copy of the alphabet, reshuffled whenever it runs dry.
struct SourcePool {
    alphabet: Vec<Symbol>,
    remaining: Vec<Symbol>,
}

impl SourcePool {
    fn new(alphabet: Vec<Symbol>) -> Self {
        Self {
            alphabet,
            remaining: Vec::new(),
        }
    }

    fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Symbol {
        if self.remaining.is_empty() {
            self.remaining = self.alphabet.clone();
            self.remaining.shuffle(rng);
        }
        self.remaining.pop().unwrap_or_default()
    }
}

/// Breadth-first labelling shared by both strategies.
///
/// `relay` picks a symbol for one outgoing link given the node's distinct
/// inputs (never empty). `memory` maps `(distinct inputs, out-degree)` to the
/// node's buffer cost.
fn walk<R, D, M>(
    topology: &Topology,
    source: NodeId,
    alphabet: Vec<Symbol>,
    rng: &mut R,
    mut relay: D,
    memory: M,
) -> Result<Assignment>
where
    R: Rng + ?Sized,
    D: FnMut(&[Symbol], &mut R) -> Symbol,
    M: Fn(usize, usize) -> u32,
{
    let mut labels = LinkLabels::unassigned(topology);
    let mut memory_used = 0u32;
    let mut pool = SourcePool::new(alphabet);

    let mut visited = vec![false; topology.node_count()];
    let mut queue = VecDeque::new();
    visited[source.index()] = true;
    queue.push_back(source);

    while let Some(node) = queue.pop_front() {
        let outgoing = topology.outgoing(node);

        if node == source {
            for &link in &outgoing {
                labels.set(link, pool.draw(&mut *rng));
            }
        } else {
            let inputs: Vec<Symbol> = labels
                .distinct(&topology.incoming(node))
                .into_iter()
                .collect();
            if inputs.is_empty() {
                return Err(TopologyError::NoLabelledInput {
                    node: topology.label(node).to_string(),
                }
                .into());
            }

            memory_used += memory(inputs.len(), outgoing.len());
            for &link in &outgoing {
                labels.set(link, relay(inputs.as_slice(), &mut *rng));
            }
        }

        for &link in &outgoing {
            let next = topology.target(link);
            if !visited[next.index()] {
                visited[next.index()] = true;
                queue.push_back(next);
            }
        }
    }

    Ok(Assignment {
        labels,
        memory_used,
    })
}
