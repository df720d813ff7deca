//! Error types for the engine.
//!
//! Everything here is a caller-facing, recoverable failure: each variant
//! is reported before any state mutation, so a rejected call leaves the
//! graph exactly as it was. Programming errors — merging a region with
//! itself, merging across feature kinds, touching an absorbed region —
//! are bugs in the placement adapter and panic instead.

use thiserror::Error;

use crate::core::{EdgeId, PlayerId};

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur at the engine boundary.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Two edges cannot be wired as opposites: their feature kinds
    /// differ, one already has an opposite, or the pair is degenerate
    /// (same edge, or two slots of the same tile).
    #[error("invalid adjacency between {a} and {b}")]
    InvalidAdjacency { a: EdgeId, b: EdgeId },

    /// A feature-tag code the factory does not recognize.
    #[error("unknown feature tag '{0}'")]
    UnknownFeatureTag(char),

    /// A follower identity outside the match's player range.
    #[error("{player} out of range for a {player_count}-player match")]
    PlayerOutOfRange {
        player: PlayerId,
        player_count: usize,
    },

    /// The edge already carries a follower (at most one per edge).
    #[error("{0} already carries a follower")]
    EdgeOccupied(EdgeId),
}
