//! Circuit representation: coordinates, the component list and its graph.
//!
//! The [`Graph`] is the engine's working form of a circuit. It is built
//! from a component slice for every analysis, classified by
//! [`classify`], and walked by [`PathFinder`].

mod graph;
mod netlist;
mod paths;
mod topology;
mod types;

pub use graph::{Edge, Graph, Node};
pub use netlist::Circuit;
pub use paths::{Loop, PathFinder};
pub use topology::{classify, BranchCount, Topology};
pub use types::*;
