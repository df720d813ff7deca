//! Core engine types: arena identifiers and per-player storage.
//!
//! These are the building blocks the board model is assembled from; they
//! carry no game rules of their own.

pub mod id;
pub mod player;

pub use id::{EdgeId, RegionId, TileId};
pub use player::{PlayerId, PlayerMap};
