use bevy::prelude::*;

use crate::geometry::Bounds;
use crate::weapons::WeaponType;

// ---------------------------------------------------------------------------
// Grid and spatial
// ---------------------------------------------------------------------------

/// Tile coordinate in the level grid. May be off-grid (negative or past the edge).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing a pixel position.
    pub fn containing(point: IVec2, tile_size: i32) -> Self {
        Self {
            x: point.x.div_euclid(tile_size),
            y: point.y.div_euclid(tile_size),
        }
    }

    /// Pixel centre of the tile.
    pub fn center(&self, tile_size: i32) -> IVec2 {
        IVec2::new(
            self.x * tile_size + tile_size / 2,
            self.y * tile_size + tile_size / 2,
        )
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// True for the 8 surrounding tiles, false for itself.
    pub fn is_adjacent8(&self, other: &TilePos) -> bool {
        let (dx, dy) = ((self.x - other.x).abs(), (self.y - other.y).abs());
        dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
    }
}

/// Collision rectangle of anything that takes up space in the level.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hitbox(pub Bounds);

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// Pixels per second, applied by the motion resolver.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec2);

/// Pixels per second.
#[derive(Component, Debug, Clone, Copy)]
pub struct MoveSpeed(pub f32);

/// Aim/facing angle in degrees (0 = +X, 90 = down).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Facing(pub f32);

// ---------------------------------------------------------------------------
// Combat state
// ---------------------------------------------------------------------------

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health(pub i32);

impl Health {
    pub fn damage(&mut self, amount: i32) {
        self.0 -= amount;
    }

    pub fn is_dead(&self) -> bool {
        self.0 <= 0
    }

    /// Add health up to `max`. Returns false, leaving health untouched, when
    /// already at or above `max`.
    pub fn heal(&mut self, amount: i32, max: i32) -> bool {
        if self.0 >= max {
            return false;
        }
        self.0 = (self.0 + amount).min(max);
        true
    }
}

// ---------------------------------------------------------------------------
// Entity markers
// ---------------------------------------------------------------------------

#[derive(Component, Debug)]
pub struct Player;

#[derive(Component, Debug)]
pub struct Enemy;

/// The kind of enemy, determining stats and fire behaviour.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Guard,
    Soldier,
    Officer,
    Elite,
}

/// The weapon an enemy carries and drops on death.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Armed(pub WeaponType);

#[derive(Component, Debug)]
pub struct Wall;

/// Static decoration left where an enemy died. Never collides.
#[derive(Component, Debug, Clone, Copy)]
pub struct Corpse {
    pub kind: EnemyKind,
    pub facing: f32,
}
