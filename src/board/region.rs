//! A connected group of same-kind edges and its completion/follower state.
//!
//! Regions never do their own graph traversal; every scan walks the member
//! set against the edge arena passed in by [`FeatureGraph`]. Both state
//! flags are latches: `completed` only ever goes false to true, and
//! `followers_locked` is reset only by an explicit follower removal.
//!
//! [`FeatureGraph`]: super::FeatureGraph

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{EdgeId, PlayerId, PlayerMap, TileId};

use super::{Edge, FeatureKind};

/// A live region: one connected feature spanning one or more tile edges.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Region {
    kind: FeatureKind,
    members: FxHashSet<EdgeId>,
    completed: bool,
    followers_locked: bool,
}

impl Region {
    /// A fresh single-edge region. Every edge is born into one of these.
    pub(crate) fn singleton(kind: FeatureKind, seed: EdgeId) -> Self {
        let mut members = FxHashSet::default();
        members.insert(seed);
        Region {
            kind,
            members,
            completed: false,
            followers_locked: false,
        }
    }

    pub(crate) fn add_member(&mut self, edge: EdgeId) {
        self.members.insert(edge);
    }

    /// Fold an absorbed region into this one: union the member sets and OR
    /// the follower lock. The caller repoints the absorbed edges.
    pub(crate) fn absorb(&mut self, other: Region) {
        debug_assert_eq!(self.kind, other.kind, "cannot absorb a different kind");
        debug_assert!(
            !self.completed && !other.completed,
            "a completed region has no open boundary to merge across"
        );
        self.followers_locked |= other.followers_locked;
        for edge in other.members {
            self.add_member(edge);
        }
    }

    /// Whether every member edge touches a neighbouring tile.
    ///
    /// Completed regions answer from the latch without scanning; open
    /// regions scan for a member with no opposite and latch when none
    /// remains. The latch never reverts.
    pub(crate) fn is_complete(&mut self, edges: &[Edge]) -> bool {
        if self.completed {
            return true;
        }
        if self
            .members
            .iter()
            .any(|&id| edges[id.index()].opposite().is_none())
        {
            return false;
        }
        self.completed = true;
        true
    }

    /// Whether a follower may be placed on a member of this region.
    ///
    /// A locked region refuses immediately. An unlocked one rescans its
    /// members: the lock is normally set eagerly on placement, but a merge
    /// can fold in occupied edges from a graph whose lock state predates
    /// them, so a found follower latches the lock here too.
    pub(crate) fn accepts_followers(&mut self, edges: &[Edge]) -> bool {
        if self.followers_locked {
            return false;
        }
        if self
            .members
            .iter()
            .any(|&id| edges[id.index()].follower().is_some())
        {
            self.followers_locked = true;
            return false;
        }
        true
    }

    pub(crate) fn lock_followers(&mut self) {
        self.followers_locked = true;
    }

    /// Per-player tally of followers standing on member edges.
    pub(crate) fn follower_counts(&self, edges: &[Edge], player_count: usize) -> PlayerMap<u32> {
        let mut counts = PlayerMap::with_value(player_count, 0);
        for &id in &self.members {
            if let Some(player) = edges[id.index()].follower() {
                counts[player] += 1;
            }
        }
        counts
    }

    /// Clear followers on member edges and reopen the region to placement.
    ///
    /// With `color` set, only that player's followers come off; `None`
    /// clears everyone. The lock resets unconditionally; if other players'
    /// followers remain, the next `accepts_followers` rescan relatches.
    /// Returns the owning tiles of the modified edges, deduplicated, so a
    /// view layer knows what to redraw.
    pub(crate) fn remove_followers(
        &mut self,
        edges: &mut [Edge],
        color: Option<PlayerId>,
    ) -> Vec<TileId> {
        self.followers_locked = false;
        let mut seen = FxHashSet::default();
        let mut tiles = Vec::new();
        for &id in &self.members {
            let edge = &mut edges[id.index()];
            let Some(follower) = edge.follower() else {
                continue;
            };
            if color.is_some_and(|c| c != follower) {
                continue;
            }
            edge.set_follower(None);
            if seen.insert(edge.tile()) {
                tiles.push(edge.tile());
            }
        }
        tiles
    }

    /// The feature kind shared by every member edge.
    #[must_use]
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Iterate the member edge ids (unordered).
    pub fn members(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.members.iter().copied()
    }

    #[must_use]
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.members.contains(&edge)
    }

    /// The completion latch as last computed; does not scan.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn followers_locked(&self) -> bool {
        self.followers_locked
    }

    /// Score at the kind's per-edge rate, independent of completion.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.member_count() as u32 * self.kind.points_per_edge()
    }
}
