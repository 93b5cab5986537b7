//! Path following for alerted enemies.

use std::collections::VecDeque;

use bevy::math::IVec2;

use crate::ai::reachability::ReachabilityIndex;
use crate::components::TilePos;
use crate::geometry::Bounds;

/// The path an enemy is walking and the waypoint it is steering at.
///
/// The path runs from the reachability source (the player's tile) at the
/// front to the tile after the enemy's own at the back, and is consumed from
/// the back.
#[derive(Debug, Clone)]
pub struct PathFollower {
    path: VecDeque<TilePos>,
    waypoint: Option<Bounds>,
    replan_interval: f32,
    since_replan: f32,
}

impl PathFollower {
    pub fn new(replan_interval: f32) -> Self {
        Self {
            path: VecDeque::new(),
            waypoint: None,
            replan_interval,
            since_replan: 0.0,
        }
    }

    pub fn replan_interval(&self) -> f32 {
        self.replan_interval
    }

    pub fn path(&self) -> &VecDeque<TilePos> {
        &self.path
    }

    pub fn waypoint(&self) -> Option<Bounds> {
        self.waypoint
    }

    /// Advance the follower by `dt` for an enemy centred at `center`.
    /// Returns the point to steer toward, or `None` to hold position.
    pub fn step(
        &mut self,
        center: IVec2,
        index: &ReachabilityIndex,
        tile_size: i32,
        waypoint_size: i32,
        dt: f32,
    ) -> Option<IVec2> {
        self.since_replan += dt;
        if self.since_replan >= self.replan_interval || self.path.is_empty() {
            self.since_replan = 0.0;
            self.replan(center, index, tile_size, waypoint_size);
        }

        if self.waypoint.is_some_and(|w| w.contains_point(center)) {
            self.path.pop_back();
            self.aim_at_back(tile_size, waypoint_size);
        }

        self.waypoint.map(|w| w.center())
    }

    fn replan(&mut self, center: IVec2, index: &ReachabilityIndex, tile_size: i32, waypoint_size: i32) {
        self.path = index.path_to(TilePos::containing(center, tile_size));
        // The back is the tile the enemy is already standing on.
        self.path.pop_back();
        self.aim_at_back(tile_size, waypoint_size);
    }

    fn aim_at_back(&mut self, tile_size: i32, waypoint_size: i32) {
        self.waypoint = self
            .path
            .back()
            .map(|tile| Bounds::centered_on(tile.center(tile_size), waypoint_size, waypoint_size));
    }
}
