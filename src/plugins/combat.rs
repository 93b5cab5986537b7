//! Shooting, projectiles and hit resolution.

use std::collections::HashSet;

use bevy::prelude::*;
use micromegas_tracing::prelude::{imetric, info, span_fn, span_scope};
use rand::Rng;

use crate::app_state::{GameSet, PlayingState};
use crate::components::*;
use crate::config::GameConfig;
use crate::events::{EnemyKilled, WeaponFired};
use crate::geometry::{Bounds, heading_vector};
use crate::plugins::level::{LevelEntity, LevelMap, level_to_world};
use crate::plugins::pickups::{Pickup, spawn_pickup};
use crate::resources::{GameRng, GameStats};
use crate::weapons::{Arsenal, WeaponType};

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (player_shoot, advance_projectiles, projectile_collisions)
                .chain()
                .in_set(GameSet::Combat)
                .run_if(in_state(PlayingState::Playing)),
        );
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shooter {
    Player,
    Enemy,
}

/// A round in flight. The spread is baked into `angle` at creation.
#[derive(Component, Debug, Clone, Copy)]
pub struct Projectile {
    pub weapon: WeaponType,
    pub velocity: Vec2,
    pub angle: f32,
    pub owner: Shooter,
}

const CORPSE_COLOR: Color = Color::srgb(0.3, 0.08, 0.08);

// ---------------------------------------------------------------------------
// Spawning
// ---------------------------------------------------------------------------

/// Launch one shot of `weapon` from `center` along `facing`. Each pellet gets
/// its own whole-degree spread roll.
pub fn spawn_projectiles<R: Rng + ?Sized>(
    commands: &mut Commands,
    rng: &mut R,
    weapon: WeaponType,
    center: IVec2,
    facing: f32,
    owner: Shooter,
    size: i32,
) {
    let stats = weapon.stats();
    for _ in 0..stats.pellets {
        let spread = if stats.spread_deg > 0 {
            rng.gen_range(-stats.spread_deg..=stats.spread_deg)
        } else {
            0
        };
        let angle = facing + spread as f32;
        let bounds = Bounds::centered_on(center, size, size);
        commands.spawn((
            Projectile {
                weapon,
                velocity: heading_vector(angle) * stats.projectile_speed,
                angle,
                owner,
            },
            Hitbox(bounds),
            Facing(angle),
            LevelEntity,
            Sprite::from_color(stats.color, Vec2::splat(size as f32)),
            Transform::from_translation(level_to_world(center).extend(5.0)),
        ));
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn player_shoot(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut rng: ResMut<GameRng>,
    mut stats: ResMut<GameStats>,
    mut query: Query<(&Hitbox, &Facing, &mut Arsenal), With<Player>>,
) {
    let dt = time.delta_secs();
    for (hitbox, facing, mut arsenal) in &mut query {
        let Some(weapon) = arsenal.try_fire(dt) else {
            continue;
        };
        spawn_projectiles(
            &mut commands,
            &mut **rng,
            weapon,
            hitbox.0.center(),
            facing.0,
            Shooter::Player,
            config.projectile_size,
        );
        stats.shots_fired += 1;
        commands.trigger(WeaponFired {
            weapon,
            by_player: true,
        });
    }
}

/// Move every projectile by its whole-pixel displacement for this update.
fn advance_projectiles(time: Res<Time>, mut query: Query<(&Projectile, &mut Hitbox)>) {
    let dt = time.delta_secs();
    for (projectile, mut hitbox) in &mut query {
        hitbox.0.x += (projectile.velocity.x * dt).round() as i32;
        hitbox.0.y += (projectile.velocity.y * dt).round() as i32;
    }
}

/// Resolve projectile hits: walls first, then player rounds against enemies,
/// then enemy rounds against the player. Each projectile is spent on the
/// first thing it hits.
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
#[span_fn]
fn projectile_collisions(
    mut commands: Commands,
    config: Res<GameConfig>,
    map: Option<Res<LevelMap>>,
    mut stats: ResMut<GameStats>,
    mut next_state: ResMut<NextState<PlayingState>>,
    projectiles: Query<(Entity, &Projectile, &Hitbox)>,
    mut enemies: Query<
        (Entity, &EnemyKind, &Armed, &Facing, &Hitbox, &mut Health),
        (With<Enemy>, Without<Player>, Without<Projectile>),
    >,
    mut player: Query<(&Hitbox, &mut Health), (With<Player>, Without<Enemy>, Without<Projectile>)>,
) {
    let Some(map) = map else { return };
    let mut consumed: HashSet<Entity> = HashSet::new();
    let mut killed: HashSet<Entity> = HashSet::new();

    for (entity, _, hitbox) in &projectiles {
        let off_grid = !map.in_bounds(map.tile_of_point(hitbox.0.center()));
        if off_grid || map.all_solids().iter().any(|solid| hitbox.0.intersects(solid)) {
            consumed.insert(entity);
        }
    }

    for (entity, projectile, hitbox) in &projectiles {
        if projectile.owner != Shooter::Player || consumed.contains(&entity) {
            continue;
        }
        for (enemy, kind, armed, facing, enemy_box, mut health) in &mut enemies {
            if killed.contains(&enemy) || !hitbox.0.intersects(&enemy_box.0) {
                continue;
            }
            consumed.insert(entity);
            health.damage(projectile.weapon.stats().damage);
            if health.is_dead() {
                killed.insert(enemy);
                kill_enemy(&mut commands, &config, &mut stats, enemy, *kind, armed.0, facing.0, enemy_box.0);
            }
            break;
        }
    }

    let Ok((player_box, mut player_health)) = player.single_mut() else {
        despawn_all(&mut commands, &consumed);
        return;
    };
    let was_alive = !player_health.is_dead();
    for (entity, projectile, hitbox) in &projectiles {
        if projectile.owner != Shooter::Enemy || consumed.contains(&entity) {
            continue;
        }
        if hitbox.0.intersects(&player_box.0) {
            consumed.insert(entity);
            player_health.damage(projectile.weapon.stats().damage);
        }
    }
    // Checked every pass, not only on the killing hit, so a dead player
    // always ends up in `PlayerDeath`.
    if player_health.is_dead() {
        if was_alive {
            info!("player killed");
        }
        next_state.set(PlayingState::PlayerDeath);
    }

    despawn_all(&mut commands, &consumed);
}

fn despawn_all(commands: &mut Commands, entities: &HashSet<Entity>) {
    for entity in entities {
        commands.entity(*entity).despawn();
    }
}

/// Replace a dead enemy with its corpse and a pickup of its weapon.
#[allow(clippy::too_many_arguments)]
fn kill_enemy(
    commands: &mut Commands,
    config: &GameConfig,
    stats: &mut GameStats,
    enemy: Entity,
    kind: EnemyKind,
    weapon: WeaponType,
    facing: f32,
    bounds: Bounds,
) {
    commands.entity(enemy).despawn();
    commands.spawn((
        Corpse { kind, facing },
        LevelEntity,
        Sprite::from_color(CORPSE_COLOR, Vec2::new(bounds.w as f32, bounds.h as f32 * 0.5)),
        Transform::from_translation(level_to_world(bounds.center()).extend(1.5))
            .with_rotation(Quat::from_rotation_z(-facing.to_radians())),
    ));
    spawn_pickup(
        commands,
        Pickup::Weapon {
            weapon,
            ammo: weapon.stats().weapon_pickup_ammo,
        },
        bounds.center(),
        config.pickup_size,
    );

    *stats.kills_by_kind.entry(kind).or_insert(0) += 1;
    imetric!("kills", "count", stats.total_kills() as u64);
    info!("{kind:?} killed, dropped {}", weapon.stats().name);
    commands.trigger(EnemyKilled { kind, weapon });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
