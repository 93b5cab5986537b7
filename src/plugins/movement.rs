//! Axis-separated actor motion against walls and other actors.
//!
//! Actors move by whole pixels. Each update an actor first moves along X and
//! is pushed back out of anything it now overlaps, then does the same along
//! Y. Obstacles are the solid tiles around the actor plus every other actor.

use bevy::prelude::*;
use micromegas_tracing::prelude::*;

use crate::app_state::{GameSet, PlayingState};
use crate::components::{Enemy, Facing, Hitbox, Player, Velocity};
use crate::geometry::Bounds;
use crate::plugins::level::{LevelMap, level_to_world};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            actor_motion
                .in_set(GameSet::Motion)
                .run_if(in_state(PlayingState::Playing)),
        );
        app.add_systems(
            Update,
            (sync_transform_to_hitbox, sync_rotation_to_facing).in_set(GameSet::Presentation),
        );
    }
}

/// Move `bounds` by `velocity * dt`, one axis at a time, snapping flush
/// against the first edge of any obstacle it ends up overlapping.
pub fn resolve_motion(bounds: Bounds, velocity: Vec2, dt: f32, obstacles: &[Bounds]) -> Bounds {
    let mut moved = bounds;

    moved.x += (velocity.x * dt).round() as i32;
    for obstacle in obstacles {
        if moved.intersects(obstacle) {
            if velocity.x > 0.0 {
                moved.x = obstacle.x - moved.w;
            } else if velocity.x < 0.0 {
                moved.x = obstacle.x + obstacle.w;
            }
        }
    }

    moved.y += (velocity.y * dt).round() as i32;
    for obstacle in obstacles {
        if moved.intersects(obstacle) {
            if velocity.y > 0.0 {
                moved.y = obstacle.y - moved.h;
            } else if velocity.y < 0.0 {
                moved.y = obstacle.y + obstacle.h;
            }
        }
    }

    moved
}

/// Resolve every actor in turn, the player first. Each actor sees the
/// already-moved rectangles of the actors resolved before it.
#[allow(clippy::type_complexity)]
#[span_fn]
pub fn actor_motion(
    time: Res<Time>,
    map: Option<Res<LevelMap>>,
    mut actors: Query<(Entity, &mut Hitbox, &Velocity, Has<Player>), Or<(With<Player>, With<Enemy>)>>,
) {
    let Some(map) = map else { return };
    let dt = time.delta_secs();

    let mut snapshot: Vec<(Entity, Bounds, Vec2, bool)> = actors
        .iter()
        .map(|(entity, hitbox, velocity, is_player)| (entity, hitbox.0, velocity.0, is_player))
        .collect();
    snapshot.sort_by_key(|(_, _, _, is_player)| !*is_player);

    for i in 0..snapshot.len() {
        let (_, bounds, velocity, _) = snapshot[i];
        if velocity == Vec2::ZERO {
            continue;
        }
        let mut obstacles = map.surrounding_solids(map.tile_of_point(bounds.center()));
        obstacles.extend(
            snapshot
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, (_, other, _, _))| *other),
        );
        snapshot[i].1 = resolve_motion(bounds, velocity, dt, &obstacles);
    }

    for (entity, bounds, _, _) in snapshot {
        if let Ok((_, mut hitbox, _, _)) = actors.get_mut(entity) {
            hitbox.set_if_neq(Hitbox(bounds));
        }
    }
}

/// Place sprites at the centre of their hitbox.
fn sync_transform_to_hitbox(mut query: Query<(&Hitbox, &mut Transform), Changed<Hitbox>>) {
    for (hitbox, mut transform) in &mut query {
        let world = level_to_world(hitbox.0.center());
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

/// Level space has Y pointing down, so clockwise headings become
/// counter-clockwise rotations in world space.
fn sync_rotation_to_facing(mut query: Query<(&Facing, &mut Transform), Changed<Facing>>) {
    for (facing, mut transform) in &mut query {
        transform.rotation = Quat::from_rotation_z(-facing.0.to_radians());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
