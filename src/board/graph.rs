//! The feature graph: arena storage for edges and regions, plus every
//! mutation the placement layer performs.
//!
//! One graph belongs to one match. Edges live in a flat `Vec<Edge>` indexed
//! by [`EdgeId`]; regions live in a `Vec<Option<Region>>` indexed by
//! [`RegionId`], where a `None` slot marks a region absorbed by a merge.
//! Absorbed slots are never reused and touching one panics: a stale
//! `RegionId` is a bug in the caller, not a recoverable condition.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{EdgeId, PlayerId, PlayerMap, RegionId, TileId};
use crate::error::{Error, Result};

use super::{Edge, FeatureKind, Region};

/// Region-connectivity state for a single match.
///
/// The graph does not know about grid geometry or turn order. The external
/// placement routine decides which edges face each other and calls
/// [`connect`](FeatureGraph::connect) once per touching pair; everything
/// else is queries and follower bookkeeping on the resulting regions.
///
/// There is no internal locking: the match authority serializes moves, one
/// mutation at a time. Concurrent matches each own an independent graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureGraph {
    edges: Vec<Edge>,
    regions: Vec<Option<Region>>,
    player_count: usize,
}

impl FeatureGraph {
    /// An empty graph for a match with the given number of players.
    pub fn new(player_count: usize) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");
        FeatureGraph {
            edges: Vec::new(),
            regions: Vec::new(),
            player_count,
        }
    }

    /// Create one edge of a placed tile, born into its own singleton region.
    pub fn add_edge(&mut self, tile: TileId, kind: FeatureKind) -> EdgeId {
        let edge = EdgeId::new(self.edges.len() as u32);
        let region = RegionId::new(self.regions.len() as u32);
        self.edges.push(Edge::new(kind, tile, region));
        self.regions.push(Some(Region::singleton(kind, edge)));
        edge
    }

    /// Batch form of [`add_edge`](FeatureGraph::add_edge) for one tile.
    ///
    /// Returns the new edge ids in argument order. Intra-tile wiring (one
    /// feature crossing the tile) is up to the caller via
    /// [`merge_regions`](FeatureGraph::merge_regions).
    pub fn add_tile(
        &mut self,
        tile: TileId,
        kinds: impl IntoIterator<Item = FeatureKind>,
    ) -> SmallVec<[EdgeId; 4]> {
        kinds
            .into_iter()
            .map(|kind| self.add_edge(tile, kind))
            .collect()
    }

    /// Wire two facing edges of neighbouring tiles to each other.
    ///
    /// All conditions are checked before any mutation, so a failed link
    /// leaves both edges untouched. The pair is invalid when the edges are
    /// the same edge, sit on the same tile, carry different feature kinds,
    /// or either is already wired. Linking never merges regions; use
    /// [`connect`](FeatureGraph::connect) for the full placement step.
    pub fn link(&mut self, a: EdgeId, b: EdgeId) -> Result<()> {
        if a == b {
            return Err(Error::InvalidAdjacency { a, b });
        }
        let ea = &self.edges[a.index()];
        let eb = &self.edges[b.index()];
        if ea.tile() == eb.tile()
            || ea.feature() != eb.feature()
            || ea.opposite().is_some()
            || eb.opposite().is_some()
        {
            return Err(Error::InvalidAdjacency { a, b });
        }
        self.edges[a.index()].set_opposite(b);
        self.edges[b.index()].set_opposite(a);
        Ok(())
    }

    /// The full adjacency step: [`link`](FeatureGraph::link) the edges,
    /// then merge their regions. Returns the surviving region.
    ///
    /// When both edges already share a region the feature is looping back
    /// onto itself; the link stands and the shared region is returned
    /// unchanged.
    pub fn connect(&mut self, a: EdgeId, b: EdgeId) -> Result<RegionId> {
        self.link(a, b)?;
        let ra = self.edges[a.index()].region();
        let rb = self.edges[b.index()].region();
        if ra == rb {
            return Ok(ra);
        }
        Ok(self.merge_regions(ra, rb))
    }

    /// Merge two live regions of the same kind; returns the survivor.
    ///
    /// The region with more members absorbs the other (a tie keeps `a`), so
    /// edge repointing touches the smaller side. The loser's slot becomes
    /// `None` and its id must never be used again.
    ///
    /// Panics if `a == b` or the kinds differ; both are bugs in the
    /// placement adapter, which only merges same-kind regions it just
    /// linked.
    pub fn merge_regions(&mut self, a: RegionId, b: RegionId) -> RegionId {
        assert_ne!(a, b, "cannot merge a region with itself");
        let ra = Self::live(&self.regions, a);
        let rb = Self::live(&self.regions, b);
        assert_eq!(
            ra.kind(),
            rb.kind(),
            "cannot merge regions of different kinds"
        );
        let (winner, loser) = if rb.member_count() > ra.member_count() {
            (b, a)
        } else {
            (a, b)
        };
        let absorbed = self.regions[loser.index()]
            .take()
            .unwrap_or_else(|| panic!("{loser} was absorbed by an earlier merge"));
        for edge in absorbed.members() {
            self.edges[edge.index()].set_region(winner);
        }
        Self::live_mut(&mut self.regions, winner).absorb(absorbed);
        winner
    }

    /// Whether the region's every member edge touches a neighbouring tile.
    ///
    /// Answers from the completion latch when possible; an open region
    /// scans its members and latches once no open boundary remains.
    pub fn is_complete(&mut self, region: RegionId) -> bool {
        Self::live_mut(&mut self.regions, region).is_complete(&self.edges)
    }

    /// Whether a follower may currently be placed on this region.
    pub fn accepts_followers(&mut self, region: RegionId) -> bool {
        Self::live_mut(&mut self.regions, region).accepts_followers(&self.edges)
    }

    /// Per-player follower tally over the region's members.
    #[must_use]
    pub fn follower_counts(&self, region: RegionId) -> PlayerMap<u32> {
        Self::live(&self.regions, region).follower_counts(&self.edges, self.player_count)
    }

    /// Region score at its kind's per-edge rate, regardless of completion.
    #[must_use]
    pub fn score(&self, region: RegionId) -> u32 {
        Self::live(&self.regions, region).score()
    }

    /// Put `player`'s follower on `edge` and lock the owning region.
    ///
    /// Fails if `player` is outside this match's player range or the edge
    /// already carries a follower. Checking region eligibility first via
    /// [`accepts_followers`](FeatureGraph::accepts_followers) is the
    /// caller's move-legality job; this method only guards the edge itself.
    pub fn place_follower(&mut self, edge: EdgeId, player: PlayerId) -> Result<()> {
        if player.index() >= self.player_count {
            return Err(Error::PlayerOutOfRange {
                player,
                player_count: self.player_count,
            });
        }
        if self.edges[edge.index()].follower().is_some() {
            return Err(Error::EdgeOccupied(edge));
        }
        let region = self.edges[edge.index()].region();
        self.edges[edge.index()].set_follower(Some(player));
        Self::live_mut(&mut self.regions, region).lock_followers();
        Ok(())
    }

    /// Remove whatever follower stands on `edge`, if any.
    ///
    /// Region latches are untouched; scoring cleanup that should reopen the
    /// region goes through
    /// [`remove_followers`](FeatureGraph::remove_followers) instead.
    pub fn clear_follower(&mut self, edge: EdgeId) {
        self.edges[edge.index()].set_follower(None);
    }

    /// Clear followers across the region (one player's with `Some(color)`,
    /// everyone's with `None`), reopening it to placement. Returns the
    /// owning tiles of the modified edges, deduplicated.
    pub fn remove_followers(&mut self, region: RegionId, color: Option<PlayerId>) -> Vec<TileId> {
        Self::live_mut(&mut self.regions, region).remove_followers(&mut self.edges, color)
    }

    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge.index()]
    }

    /// Borrow a live region. Panics on an absorbed slot.
    #[must_use]
    pub fn region(&self, region: RegionId) -> &Region {
        Self::live(&self.regions, region)
    }

    /// The region currently containing `edge`.
    #[must_use]
    pub fn region_of(&self, edge: EdgeId) -> RegionId {
        self.edges[edge.index()].region()
    }

    #[must_use]
    pub fn region_size(&self, region: RegionId) -> usize {
        Self::live(&self.regions, region).member_count()
    }

    #[must_use]
    pub fn region_kind(&self, region: RegionId) -> FeatureKind {
        Self::live(&self.regions, region).kind()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Regions not yet absorbed by a merge.
    #[must_use]
    pub fn live_region_count(&self) -> usize {
        self.regions.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    // Split-borrow helpers: taking the region slice as a parameter keeps
    // `self.edges` free for the same call.
    fn live(regions: &[Option<Region>], id: RegionId) -> &Region {
        regions[id.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("{id} was absorbed by an earlier merge"))
    }

    fn live_mut(regions: &mut [Option<Region>], id: RegionId) -> &mut Region {
        regions[id.index()]
            .as_mut()
            .unwrap_or_else(|| panic!("{id} was absorbed by an earlier merge"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two tiles, one road edge each, facing.
    fn two_tile_road() -> (FeatureGraph, EdgeId, EdgeId) {
        let mut graph = FeatureGraph::new(2);
        let a = graph.add_edge(TileId::new(0), FeatureKind::Road);
        let b = graph.add_edge(TileId::new(1), FeatureKind::Road);
        (graph, a, b)
    }

    #[test]
    fn test_new_graph_is_empty() {
        let graph = FeatureGraph::new(4);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.live_region_count(), 0);
        assert_eq!(graph.player_count(), 4);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_zero_players_panics() {
        FeatureGraph::new(0);
    }

    #[test]
    #[should_panic(expected = "At most 255 players supported")]
    fn test_too_many_players_panics() {
        FeatureGraph::new(256);
    }

    #[test]
    fn test_add_edge_creates_singleton_region() {
        let mut graph = FeatureGraph::new(2);
        let edge = graph.add_edge(TileId::new(3), FeatureKind::City);
        let region = graph.region_of(edge);

        assert_eq!(graph.edge(edge).tile(), TileId::new(3));
        assert_eq!(graph.edge(edge).feature(), FeatureKind::City);
        assert_eq!(graph.region_size(region), 1);
        assert_eq!(graph.region_kind(region), FeatureKind::City);
        assert!(graph.region(region).contains(edge));
    }

    #[test]
    fn test_add_tile_returns_ids_in_order() {
        let mut graph = FeatureGraph::new(2);
        let kinds = [
            FeatureKind::Road,
            FeatureKind::City,
            FeatureKind::Road,
            FeatureKind::City,
        ];
        let edges = graph.add_tile(TileId::new(0), kinds);

        assert_eq!(edges.len(), 4);
        for (edge, kind) in edges.iter().zip(kinds) {
            assert_eq!(graph.edge(*edge).feature(), kind);
            assert_eq!(graph.edge(*edge).tile(), TileId::new(0));
        }
        assert_eq!(graph.live_region_count(), 4);
    }

    #[test]
    fn test_link_wires_both_directions() {
        let (mut graph, a, b) = two_tile_road();
        graph.link(a, b).unwrap();
        assert_eq!(graph.edge(a).opposite(), Some(b));
        assert_eq!(graph.edge(b).opposite(), Some(a));
        // Linking alone does not merge.
        assert_ne!(graph.region_of(a), graph.region_of(b));
    }

    #[test]
    fn test_link_rejects_self_link() {
        let (mut graph, a, _) = two_tile_road();
        assert_eq!(graph.link(a, a), Err(Error::InvalidAdjacency { a, b: a }));
    }

    #[test]
    fn test_link_rejects_same_tile() {
        let mut graph = FeatureGraph::new(2);
        let a = graph.add_edge(TileId::new(0), FeatureKind::Road);
        let b = graph.add_edge(TileId::new(0), FeatureKind::Road);
        assert_eq!(graph.link(a, b), Err(Error::InvalidAdjacency { a, b }));
        assert_eq!(graph.edge(a).opposite(), None);
        assert_eq!(graph.edge(b).opposite(), None);
    }

    #[test]
    fn test_link_rejects_kind_mismatch() {
        let mut graph = FeatureGraph::new(2);
        let a = graph.add_edge(TileId::new(0), FeatureKind::Road);
        let b = graph.add_edge(TileId::new(1), FeatureKind::City);
        assert_eq!(graph.link(a, b), Err(Error::InvalidAdjacency { a, b }));
    }

    #[test]
    fn test_link_rejects_already_linked_edge() {
        let mut graph = FeatureGraph::new(2);
        let a = graph.add_edge(TileId::new(0), FeatureKind::Road);
        let b = graph.add_edge(TileId::new(1), FeatureKind::Road);
        let c = graph.add_edge(TileId::new(2), FeatureKind::Road);
        graph.link(a, b).unwrap();

        assert_eq!(graph.link(b, c), Err(Error::InvalidAdjacency { a: b, b: c }));
        // The failed call mutated nothing.
        assert_eq!(graph.edge(b).opposite(), Some(a));
        assert_eq!(graph.edge(c).opposite(), None);
    }

    #[test]
    fn test_connect_merges_and_wires() {
        let (mut graph, a, b) = two_tile_road();
        let survivor = graph.connect(a, b).unwrap();

        assert_eq!(graph.region_of(a), survivor);
        assert_eq!(graph.region_of(b), survivor);
        assert_eq!(graph.region_size(survivor), 2);
        assert_eq!(graph.live_region_count(), 1);
        assert_eq!(graph.edge(a).opposite(), Some(b));
    }

    #[test]
    fn test_connect_loop_keeps_shared_region() {
        // Three tiles in a triangle: two road edges each, intra-tile merged.
        let mut graph = FeatureGraph::new(2);
        let mut tiles = Vec::new();
        for t in 0..3u32 {
            let edges = graph.add_tile(TileId::new(t), [FeatureKind::Road, FeatureKind::Road]);
            graph.merge_regions(graph.region_of(edges[0]), graph.region_of(edges[1]));
            tiles.push(edges);
        }
        graph.connect(tiles[0][1], tiles[1][0]).unwrap();
        graph.connect(tiles[1][1], tiles[2][0]).unwrap();

        // Closing the loop: both ends already share a region.
        let before = graph.region_of(tiles[2][1]);
        let survivor = graph.connect(tiles[2][1], tiles[0][0]).unwrap();
        assert_eq!(survivor, before);
        assert_eq!(graph.region_size(survivor), 6);
        assert_eq!(graph.edge(tiles[2][1]).opposite(), Some(tiles[0][0]));
        assert!(graph.is_complete(survivor));
    }

    #[test]
    fn test_merge_larger_absorbs_smaller() {
        let mut graph = FeatureGraph::new(2);
        let a = graph.add_edge(TileId::new(0), FeatureKind::City);
        let b = graph.add_edge(TileId::new(1), FeatureKind::City);
        let c = graph.add_edge(TileId::new(2), FeatureKind::City);
        let big = graph.merge_regions(graph.region_of(a), graph.region_of(b));
        assert_eq!(graph.region_size(big), 2);

        let small = graph.region_of(c);
        // Passing the smaller region first still keeps the larger one.
        let survivor = graph.merge_regions(small, big);
        assert_eq!(survivor, big);
        assert_eq!(graph.region_size(survivor), 3);
        assert_eq!(graph.region_of(c), survivor);
    }

    #[test]
    fn test_merge_tie_keeps_first_argument() {
        let (mut graph, a, b) = two_tile_road();
        let ra = graph.region_of(a);
        let rb = graph.region_of(b);
        assert_eq!(graph.merge_regions(ra, rb), ra);
        assert_eq!(graph.region_of(b), ra);
    }

    #[test]
    fn test_merge_repoints_every_absorbed_edge() {
        let mut graph = FeatureGraph::new(2);
        let seed = graph.add_edge(TileId::new(0), FeatureKind::Road);
        let mut region = graph.region_of(seed);
        for t in 1..5u32 {
            let edge = graph.add_edge(TileId::new(t), FeatureKind::Road);
            region = graph.merge_regions(region, graph.region_of(edge));
        }
        for id in 0..graph.edge_count() as u32 {
            assert_eq!(graph.region_of(EdgeId::new(id)), region);
        }
        assert_eq!(graph.live_region_count(), 1);
    }

    #[test]
    fn test_merge_carries_follower_lock() {
        let (mut graph, a, b) = two_tile_road();
        graph.place_follower(a, PlayerId::new(0)).unwrap();
        let survivor = graph.merge_regions(graph.region_of(b), graph.region_of(a));
        assert!(graph.region(survivor).followers_locked());
        assert!(!graph.accepts_followers(survivor));
    }

    #[test]
    #[should_panic(expected = "cannot merge a region with itself")]
    fn test_merge_self_panics() {
        let mut graph = FeatureGraph::new(2);
        let a = graph.add_edge(TileId::new(0), FeatureKind::Road);
        let region = graph.region_of(a);
        graph.merge_regions(region, region);
    }

    #[test]
    #[should_panic(expected = "cannot merge regions of different kinds")]
    fn test_merge_kind_mismatch_panics() {
        let mut graph = FeatureGraph::new(2);
        let a = graph.add_edge(TileId::new(0), FeatureKind::Road);
        let b = graph.add_edge(TileId::new(1), FeatureKind::City);
        graph.merge_regions(graph.region_of(a), graph.region_of(b));
    }

    #[test]
    #[should_panic(expected = "was absorbed by an earlier merge")]
    fn test_stale_region_id_panics() {
        let (mut graph, a, b) = two_tile_road();
        let stale = graph.region_of(b);
        graph.merge_regions(graph.region_of(a), stale);
        graph.region_size(stale);
    }

    #[test]
    fn test_is_complete_latches() {
        let (mut graph, a, b) = two_tile_road();
        let ra = graph.region_of(a);
        assert!(!graph.is_complete(ra));
        assert!(!graph.region(ra).completed());

        let survivor = graph.connect(a, b).unwrap();
        assert!(graph.is_complete(survivor));
        assert!(graph.region(survivor).completed());

        // Unrelated mutation elsewhere cannot revert the latch.
        graph.add_edge(TileId::new(9), FeatureKind::Road);
        assert!(graph.is_complete(survivor));
    }

    #[test]
    fn test_place_follower_rejects_out_of_range_player() {
        let (mut graph, a, _) = two_tile_road();
        assert_eq!(
            graph.place_follower(a, PlayerId::new(2)),
            Err(Error::PlayerOutOfRange {
                player: PlayerId::new(2),
                player_count: 2
            })
        );
        assert_eq!(graph.edge(a).follower(), None);
        assert!(graph.accepts_followers(graph.region_of(a)));
    }

    #[test]
    fn test_place_follower_rejects_occupied_edge() {
        let (mut graph, a, _) = two_tile_road();
        graph.place_follower(a, PlayerId::new(0)).unwrap();
        assert_eq!(
            graph.place_follower(a, PlayerId::new(1)),
            Err(Error::EdgeOccupied(a))
        );
        assert_eq!(graph.edge(a).follower(), Some(PlayerId::new(0)));
    }

    #[test]
    fn test_place_follower_locks_owning_region() {
        let (mut graph, a, b) = two_tile_road();
        let survivor = graph.connect(a, b).unwrap();
        assert!(graph.accepts_followers(survivor));

        graph.place_follower(b, PlayerId::new(1)).unwrap();
        assert!(!graph.accepts_followers(survivor));
        assert_eq!(*graph.follower_counts(survivor).get(PlayerId::new(1)), 1);
    }

    #[test]
    fn test_clear_follower_leaves_lock_alone() {
        let (mut graph, a, _) = two_tile_road();
        let region = graph.region_of(a);
        graph.place_follower(a, PlayerId::new(0)).unwrap();
        graph.clear_follower(a);

        assert_eq!(graph.edge(a).follower(), None);
        assert!(graph.region(region).followers_locked());
        // The defensive rescan finds no follower but the lock stands.
        assert!(!graph.accepts_followers(region));
    }

    #[test]
    fn test_remove_followers_reopens_region() {
        let (mut graph, a, b) = two_tile_road();
        let survivor = graph.connect(a, b).unwrap();
        graph.place_follower(a, PlayerId::new(0)).unwrap();

        let mut tiles = graph.remove_followers(survivor, None);
        tiles.sort();
        assert_eq!(tiles, vec![TileId::new(0)]);
        assert!(graph.accepts_followers(survivor));
        let counts = graph.follower_counts(survivor);
        assert!(counts.iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_score_uses_kind_rate() {
        let mut graph = FeatureGraph::new(2);
        let a = graph.add_edge(TileId::new(0), FeatureKind::City);
        let b = graph.add_edge(TileId::new(1), FeatureKind::City);
        let survivor = graph.connect(a, b).unwrap();
        assert_eq!(graph.score(survivor), 4);
    }

    #[test]
    fn test_serialization() {
        let (mut graph, a, b) = two_tile_road();
        let survivor = graph.connect(a, b).unwrap();
        graph.place_follower(a, PlayerId::new(1)).unwrap();
        assert!(graph.is_complete(survivor));

        let json = serde_json::to_string(&graph).unwrap();
        let mut back: FeatureGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back.edge_count(), graph.edge_count());
        assert_eq!(back.live_region_count(), 1);
        assert_eq!(back.region_of(a), survivor);
        assert!(back.is_complete(survivor));
        assert!(!back.accepts_followers(survivor));
        assert_eq!(*back.follower_counts(survivor).get(PlayerId::new(1)), 1);
    }
}
