//! Symbol labels carried on links, and the per-trial label map.
//!
//! Labels are never stored on the topology itself. Each trial starts from a
//! fresh [`LinkLabels`] where every link is [`Symbol::Unassigned`], so no
//! label from an earlier trial can leak into a later one.

use crate::graph::{LinkId, Topology};
use std::collections::BTreeSet;
use std::fmt;

/// What a single link carries during one time slot.
///
/// Ordering is derived so that pools of candidate symbols can live in a
/// `BTreeSet`, which keeps sampling reproducible for a given seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    /// Nothing assigned yet
    #[default]
    Unassigned,

    /// Original source symbol `k`, numbered from 1
    Original(usize),

    /// XOR of both original symbols (only meaningful with two packets)
    Xor,
}

impl Symbol {
    /// Integer code: 0 for unassigned, `k` for original symbol `k`, 3 for XOR.
    pub fn code(self) -> usize {
        match self {
            Symbol::Unassigned => 0,
            Symbol::Original(k) => k,
            Symbol::Xor => 3,
        }
    }

    pub fn is_assigned(self) -> bool {
        self != Symbol::Unassigned
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Unassigned => write!(f, "0"),
            Symbol::Original(k) => write!(f, "{}", k),
            Symbol::Xor => write!(f, "1^2"),
        }
    }
}

/// Symbol assigned to every link of a topology for one trial.
///
/// Indexed by [`LinkId`]; sized once from the topology it was created for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkLabels {
    labels: Vec<Symbol>,
}

impl LinkLabels {
    /// Create a map with every link unassigned.
    pub fn unassigned(topology: &Topology) -> Self {
        Self {
            labels: vec![Symbol::Unassigned; topology.link_count()],
        }
    }

    pub fn get(&self, link: LinkId) -> Symbol {
        self.labels[link.index()]
    }

    pub fn set(&mut self, link: LinkId, symbol: Symbol) {
        self.labels[link.index()] = symbol;
    }

    /// Number of links in the map.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over `(link, symbol)` pairs in link-creation order.
    pub fn iter(&self) -> impl Iterator<Item = (LinkId, Symbol)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, s)| (LinkId::new(i), *s))
    }

    /// Distinct assigned symbols among `links`. Unassigned links are ignored.
    pub fn distinct(&self, links: &[LinkId]) -> BTreeSet<Symbol> {
        links
            .iter()
            .map(|&link| self.get(link))
            .filter(|s| s.is_assigned())
            .collect()
    }

    /// Count of links still unassigned.
    pub fn unassigned_count(&self) -> usize {
        self.labels.iter().filter(|s| !s.is_assigned()).count()
    }
}
