//! The board model: feature kinds, tile edges, regions, and the graph
//! arena that joins them.

mod edge;
mod feature;
mod graph;
mod region;

pub use edge::Edge;
pub use feature::FeatureKind;
pub use graph::FeatureGraph;
pub use region::Region;
