//! Built-in topologies.
//!
//! Every link runs at unit rate. All scenarios multicast two packets.

use netcode_sim_core::graph::Topology;
use netcode_sim_core::scenario::{Scenario, PACKETS};

/// Unit link rate used by every built-in topology.
pub const R: f64 = 1.0;

/// Topology selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyChoice {
    Butterfly,
    Direct,
    ThreeBranch,
    WideStar,
    All,
}

impl TopologyChoice {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "butterfly" => Some(TopologyChoice::Butterfly),
            "direct" => Some(TopologyChoice::Direct),
            "three-branch" => Some(TopologyChoice::ThreeBranch),
            "wide-star" => Some(TopologyChoice::WideStar),
            "all" => Some(TopologyChoice::All),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TopologyChoice::Butterfly => "butterfly",
            TopologyChoice::Direct => "direct",
            TopologyChoice::ThreeBranch => "three-branch",
            TopologyChoice::WideStar => "wide-star",
            TopologyChoice::All => "all",
        }
    }

    /// Build the selected scenarios, each paired with its name.
    pub fn build(self) -> Vec<(&'static str, Scenario)> {
        match self {
            TopologyChoice::Butterfly => vec![("butterfly", butterfly())],
            TopologyChoice::Direct => vec![("direct", direct())],
            TopologyChoice::ThreeBranch => vec![("three-branch", three_branch())],
            TopologyChoice::WideStar => vec![("wide-star", wide_star())],
            TopologyChoice::All => [
                TopologyChoice::Butterfly,
                TopologyChoice::Direct,
                TopologyChoice::ThreeBranch,
                TopologyChoice::WideStar,
            ]
            .into_iter()
            .flat_map(|choice| choice.build())
            .collect(),
        }
    }
}

/// Textbook figure 5.15: S reaches sinks Y and Z through T, U and the
/// shared W -> X bottleneck.
pub fn butterfly() -> Scenario {
    let mut t = Topology::new();
    let node_s = t.add_node("S");
    let node_t = t.add_node("T");
    let node_u = t.add_node("U");
    let node_w = t.add_node("W");
    let node_x = t.add_node("X");
    let node_y = t.add_node("Y");
    let node_z = t.add_node("Z");

    t.create_link(node_s, node_t, R);
    t.create_link(node_s, node_u, R);
    t.create_link(node_t, node_w, R);
    t.create_link(node_t, node_y, R);
    t.create_link(node_u, node_w, R);
    t.create_link(node_u, node_z, R);
    t.create_link(node_x, node_y, R);
    t.create_link(node_x, node_z, R);
    t.create_link(node_w, node_x, R);

    Scenario::new(t, node_s, vec![node_y, node_z], PACKETS)
}

/// Source wired straight to two sinks, no relays.
pub fn direct() -> Scenario {
    let mut t = Topology::new();
    let node_s = t.add_node("S");
    let node_a = t.add_node("A");
    let node_b = t.add_node("B");

    t.create_link(node_s, node_a, R);
    t.create_link(node_s, node_b, R);

    Scenario::new(t, node_s, vec![node_a, node_b], PACKETS)
}

/// Three source links. P and Q meet at relay M, which serves both sinks;
/// P also reaches Y and R also reaches Z directly.
pub fn three_branch() -> Scenario {
    let mut t = Topology::new();
    let node_s = t.add_node("S");
    let node_p = t.add_node("P");
    let node_q = t.add_node("Q");
    let node_r = t.add_node("R");
    let node_m = t.add_node("M");
    let node_y = t.add_node("Y");
    let node_z = t.add_node("Z");

    t.create_link(node_s, node_p, R);
    t.create_link(node_s, node_q, R);
    t.create_link(node_s, node_r, R);
    t.create_link(node_p, node_m, R);
    t.create_link(node_q, node_m, R);
    t.create_link(node_p, node_y, R);
    t.create_link(node_m, node_y, R);
    t.create_link(node_m, node_z, R);
    t.create_link(node_r, node_z, R);

    Scenario::new(t, node_s, vec![node_y, node_z], PACKETS)
}

/// Four source links; outside the supported fan-out range.
pub fn wide_star() -> Scenario {
    let mut t = Topology::new();
    let node_s = t.add_node("S");
    let sinks = ["A", "B", "C", "D"]
        .into_iter()
        .map(|label| {
            let node = t.add_node(label);
            t.create_link(node_s, node, R);
            node
        })
        .collect();

    Scenario::new(t, node_s, sinks, PACKETS)
}
