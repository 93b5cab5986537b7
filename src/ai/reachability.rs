//! Breadth-first reachability index over the solid grid.
//!
//! One flood fill from the player's tile serves every enemy: each enemy walks
//! predecessor links from its own tile back to the source to get its path.

use std::collections::VecDeque;

use bevy::prelude::*;
use pathfinding::matrix::Matrix;

use crate::components::TilePos;
use crate::plugins::level::LevelMap;

/// Expansion order of the flood fill: E, W, S, N, then NE, SE, NW, SW.
/// Ties between equally short paths resolve toward earlier entries.
pub const NEIGHBOURS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, -1),
    (1, 1),
    (-1, -1),
    (-1, 1),
];

/// Predecessor grid of an 8-connected BFS. `None` marks a tile that is solid
/// or was not reached; the source maps to itself.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ReachabilityIndex {
    source: TilePos,
    came_from: Matrix<Option<TilePos>>,
    reachable: usize,
}

impl Default for ReachabilityIndex {
    fn default() -> Self {
        Self {
            source: TilePos::default(),
            came_from: Matrix::new(0, 0, None),
            reachable: 0,
        }
    }
}

impl ReachabilityIndex {
    pub fn build(map: &LevelMap, source: TilePos) -> Self {
        let mut index = Self::default();
        index.rebuild(map, source);
        index
    }

    /// Recompute the whole index from `source`. A solid or off-grid source
    /// leaves nothing reachable.
    pub fn rebuild(&mut self, map: &LevelMap, source: TilePos) {
        self.source = source;
        self.came_from = Matrix::new(map.height() as usize, map.width() as usize, None);
        self.reachable = 0;
        if map.is_solid(source) {
            return;
        }

        let mut frontier = VecDeque::new();
        self.set(source, source);
        frontier.push_back(source);

        while let Some(current) = frontier.pop_front() {
            for (dx, dy) in NEIGHBOURS {
                let next = current.offset(dx, dy);
                if map.is_solid(next) || self.predecessor(next).is_some() {
                    continue;
                }
                self.set(next, current);
                frontier.push_back(next);
            }
        }
    }

    pub fn source(&self) -> TilePos {
        self.source
    }

    /// Number of tiles with a path to the source, the source included.
    pub fn reachable_count(&self) -> usize {
        self.reachable
    }

    pub fn is_reachable(&self, tile: TilePos) -> bool {
        self.predecessor(tile).is_some()
    }

    /// The tile one step closer to the source. The source returns itself.
    pub fn predecessor(&self, tile: TilePos) -> Option<TilePos> {
        if tile.x < 0 || tile.y < 0 {
            return None;
        }
        self.came_from
            .get((tile.y as usize, tile.x as usize))
            .copied()
            .flatten()
    }

    /// Tiles from the source (front) to `dest` (back), both included. Empty
    /// when `dest` is solid, off-grid or unreachable.
    pub fn path_to(&self, dest: TilePos) -> VecDeque<TilePos> {
        let mut path = VecDeque::new();
        let mut current = dest;
        loop {
            let Some(previous) = self.predecessor(current) else {
                return VecDeque::new();
            };
            path.push_front(current);
            if current == self.source {
                return path;
            }
            current = previous;
        }
    }

    fn set(&mut self, tile: TilePos, from: TilePos) {
        if let Some(slot) = self.came_from.get_mut((tile.y as usize, tile.x as usize)) {
            *slot = Some(from);
            self.reachable += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathfinding::prelude::bfs;

    fn open_grid(size: usize) -> LevelMap {
        let mut rows = vec![".".repeat(size); size];
        rows[0].replace_range(0..1, "1");
        rows[size - 1].replace_range(size - 1..size, "H");
        LevelMap::parse(&rows.join("\n"), 50).unwrap()
    }

    const WALLED: &str = "\
##########
#1...#...#
#.##.#.#.#
#..#...#.#
##.#####.#
#..#.....#
#.##.###H#
#....#...#
##########";

    #[test]
    fn open_grid_path_is_the_diagonal() {
        let map = open_grid(10);
        let index = ReachabilityIndex::build(&map, TilePos::new(0, 0));
        let path = index.path_to(TilePos::new(9, 9));
        let expected: Vec<_> = (0..10).map(|i| TilePos::new(i, i)).collect();
        assert_eq!(path.into_iter().collect::<Vec<_>>(), expected);
        assert_eq!(index.reachable_count(), 100);
    }

    #[test]
    fn path_to_source_is_just_the_source() {
        let map = open_grid(5);
        let index = ReachabilityIndex::build(&map, TilePos::new(2, 2));
        assert_eq!(index.path_to(TilePos::new(2, 2)), VecDeque::from([TilePos::new(2, 2)]));
        assert_eq!(index.predecessor(TilePos::new(2, 2)), Some(TilePos::new(2, 2)));
    }

    #[test]
    fn path_endpoints_and_steps() {
        let map = LevelMap::parse(WALLED, 50).unwrap();
        let source = TilePos::new(1, 1);
        let index = ReachabilityIndex::build(&map, source);
        let dest = TilePos::new(8, 7);
        let path = index.path_to(dest);

        assert_eq!(path.front(), Some(&source));
        assert_eq!(path.back(), Some(&dest));
        for pair in path.iter().collect::<Vec<_>>().windows(2) {
            assert!(pair[0].is_adjacent8(pair[1]));
        }
        assert!(path.iter().all(|t| !map.is_solid(*t)));
    }

    #[test]
    fn paths_are_shortest() {
        let map = LevelMap::parse(WALLED, 50).unwrap();
        let source = TilePos::new(1, 1);
        let index = ReachabilityIndex::build(&map, source);

        for y in 0..map.height() {
            for x in 0..map.width() {
                let dest = TilePos::new(x, y);
                if map.is_solid(dest) {
                    continue;
                }
                let oracle = bfs(
                    &source,
                    |t: &TilePos| {
                        NEIGHBOURS
                            .iter()
                            .map(|&(dx, dy)| t.offset(dx, dy))
                            .filter(|n| !map.is_solid(*n))
                            .collect::<Vec<_>>()
                    },
                    |t| *t == dest,
                );
                let path = index.path_to(dest);
                match oracle {
                    Some(steps) => assert_eq!(path.len(), steps.len(), "to {:?}", dest),
                    None => assert!(path.is_empty()),
                }
            }
        }
    }

    #[test]
    fn ties_prefer_east_first() {
        let map = open_grid(5);
        let index = ReachabilityIndex::build(&map, TilePos::new(0, 0));
        // (2,1) is first found from (1,0) through its SE neighbour.
        let path: Vec<_> = index.path_to(TilePos::new(2, 1)).into_iter().collect();
        assert_eq!(
            path,
            vec![TilePos::new(0, 0), TilePos::new(1, 0), TilePos::new(2, 1)]
        );
    }

    #[test]
    fn solid_off_grid_and_unreachable_give_empty_paths() {
        let map = LevelMap::parse("1.#..\n..#.H\n###..", 50).unwrap();
        let index = ReachabilityIndex::build(&map, TilePos::new(0, 0));
        assert!(index.path_to(TilePos::new(2, 0)).is_empty());
        assert!(index.path_to(TilePos::new(-1, 0)).is_empty());
        assert!(index.path_to(TilePos::new(7, 7)).is_empty());
        assert!(index.path_to(TilePos::new(4, 1)).is_empty());
        assert!(!index.is_reachable(TilePos::new(3, 0)));
        assert_eq!(index.reachable_count(), 4);
    }

    #[test]
    fn diagonal_moves_pass_between_walls() {
        // The only opening between the two rooms is a diagonal gap.
        let map = LevelMap::parse("1.#\n.#.\n#.H", 50).unwrap();
        let index = ReachabilityIndex::build(&map, TilePos::new(0, 0));
        let path = index.path_to(TilePos::new(2, 2));
        assert_eq!(path.len(), 4);
        assert!(path.contains(&TilePos::new(2, 1)) || path.contains(&TilePos::new(1, 2)));
    }

    #[test]
    fn solid_source_reaches_nothing() {
        let map = LevelMap::parse("#1\n.H", 50).unwrap();
        let index = ReachabilityIndex::build(&map, TilePos::new(0, 0));
        assert_eq!(index.reachable_count(), 0);
        assert!(index.path_to(TilePos::new(1, 1)).is_empty());
        assert!(index.path_to(TilePos::new(0, 0)).is_empty());
    }

    #[test]
    fn rebuild_replaces_previous_source() {
        let map = open_grid(4);
        let mut index = ReachabilityIndex::build(&map, TilePos::new(0, 0));
        index.rebuild(&map, TilePos::new(3, 3));
        assert_eq!(index.source(), TilePos::new(3, 3));
        assert_eq!(index.path_to(TilePos::new(3, 3)).len(), 1);
        assert_eq!(index.path_to(TilePos::new(0, 0)).front(), Some(&TilePos::new(3, 3)));
    }

    #[test]
    fn rebuild_from_same_source_is_idempotent() {
        let map = LevelMap::parse(WALLED, 50).unwrap();
        let source = TilePos::new(4, 3);
        let fresh = ReachabilityIndex::build(&map, source);

        let mut reused = ReachabilityIndex::build(&map, TilePos::new(1, 1));
        reused.rebuild(&map, source);
        assert_eq!(reused, fresh);
        reused.rebuild(&map, source);
        assert_eq!(reused, fresh);
    }
}
