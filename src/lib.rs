//! # tilegraph
//!
//! A region-connectivity and follower-arbitration engine for tile-placement
//! board games.
//!
//! ## Design Principles
//!
//! 1. **Geometry-Agnostic**: No grid, rotation, or legal-placement logic.
//!    The embedding placement layer decides which edges face each other and
//!    reports each adjacency here once.
//!
//! 2. **Arena Storage**: Edges and regions live in flat vectors addressed
//!    by `EdgeId`/`RegionId` newtypes. Merges repoint indices; nothing owns
//!    anything mutually.
//!
//! 3. **Latched State**: Region completion and the follower lock are
//!    one-way flags. `completed` never reverts; the lock resets only
//!    through an explicit follower removal.
//!
//! ## Modules
//!
//! - `core`: id newtypes, players, per-player maps
//! - `board`: feature kinds, edges, regions, and the `FeatureGraph` arena
//! - `error`: the crate error type
//!
//! ## Example
//!
//! Two road edges on neighbouring tiles become one completed region:
//!
//! ```
//! use tilegraph::{FeatureGraph, FeatureKind, PlayerId, TileId};
//!
//! let mut graph = FeatureGraph::new(2);
//! let a = graph.add_edge(TileId::new(0), FeatureKind::Road);
//! let b = graph.add_edge(TileId::new(1), FeatureKind::Road);
//!
//! let road = graph.connect(a, b)?;
//! assert!(graph.is_complete(road));
//! assert_eq!(graph.score(road), 2);
//!
//! graph.place_follower(a, PlayerId::new(0))?;
//! assert!(!graph.accepts_followers(road));
//! # Ok::<(), tilegraph::Error>(())
//! ```

pub mod board;
pub mod core;
pub mod error;

// Re-export commonly used types
pub use crate::core::{EdgeId, PlayerId, PlayerMap, RegionId, TileId};

pub use crate::board::{Edge, FeatureGraph, FeatureKind, Region};

pub use crate::error::{Error, Result};
