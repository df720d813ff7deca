//! A single tile edge: the atomic unit of board connectivity.

use serde::{Deserialize, Serialize};

use crate::core::{EdgeId, PlayerId, RegionId, TileId};

use super::FeatureKind;

/// One edge of a placed tile.
///
/// An edge carries a feature kind fixed at creation, belongs to exactly one
/// region at any time (repointed when regions merge), optionally holds one
/// follower, and is optionally wired to the facing edge of the neighbouring
/// tile. Fields are private; mutation goes through [`FeatureGraph`] so the
/// graph's invariants hold.
///
/// [`FeatureGraph`]: super::FeatureGraph
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    feature: FeatureKind,
    tile: TileId,
    region: RegionId,
    follower: Option<PlayerId>,
    opposite: Option<EdgeId>,
}

impl Edge {
    pub(crate) fn new(feature: FeatureKind, tile: TileId, region: RegionId) -> Self {
        Edge {
            feature,
            tile,
            region,
            follower: None,
            opposite: None,
        }
    }

    /// The feature kind this edge carries.
    #[must_use]
    pub fn feature(&self) -> FeatureKind {
        self.feature
    }

    /// The tile this edge belongs to.
    #[must_use]
    pub fn tile(&self) -> TileId {
        self.tile
    }

    /// The region currently containing this edge.
    #[must_use]
    pub fn region(&self) -> RegionId {
        self.region
    }

    /// The follower standing on this edge, if any.
    #[must_use]
    pub fn follower(&self) -> Option<PlayerId> {
        self.follower
    }

    /// The facing edge on the neighbouring tile, if wired.
    #[must_use]
    pub fn opposite(&self) -> Option<EdgeId> {
        self.opposite
    }

    /// Textual form for view layers: `"R"` bare, `"R:0"` with a follower.
    ///
    /// Display-only projection, not a versioned wire format.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }

    pub(crate) fn set_region(&mut self, region: RegionId) {
        self.region = region;
    }

    pub(crate) fn set_opposite(&mut self, opposite: EdgeId) {
        self.opposite = Some(opposite);
    }

    pub(crate) fn set_follower(&mut self, follower: Option<PlayerId>) {
        self.follower = follower;
    }
}

impl std::fmt::Display for Edge {
    /// Renders the tag code, plus `:N` when a follower of player N stands here.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.follower {
            Some(player) => write!(f, "{}:{}", self.feature.code(), player.index()),
            None => write!(f, "{}", self.feature.code()),
        }
    }
}
