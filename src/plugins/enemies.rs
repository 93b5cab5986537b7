//! Enemy spawning and the per-update AI dispatch.

use bevy::prelude::*;
use micromegas_tracing::prelude::{info, span_fn, span_scope};
use rand::Rng;

use crate::ai::reachability::ReachabilityIndex;
use crate::ai::{EnemyBrain, Senses, think};
use crate::app_state::{GameSet, PlayingState};
use crate::components::*;
use crate::config::GameConfig;
use crate::events::{EnemyAlerted, WeaponFired};
use crate::geometry::Bounds;
use crate::plugins::combat::{Shooter, spawn_projectiles};
use crate::plugins::level::{LevelEntity, LevelMap, LevelObject, level_to_world, load_level};
use crate::resources::GameRng;

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(PlayingState::LevelIntro),
            spawn_enemies.after(load_level),
        );
        app.add_systems(
            Update,
            enemy_ai
                .in_set(GameSet::Ai)
                .run_if(in_state(PlayingState::Playing)),
        );
    }
}

/// Spawn one dormant enemy per marker in the level. Each gets its own
/// re-plan interval so a group does not re-path in lockstep.
pub fn spawn_enemies(
    mut commands: Commands,
    config: Res<GameConfig>,
    map: Option<Res<LevelMap>>,
    mut rng: ResMut<GameRng>,
) {
    let Some(map) = map else { return };
    let size = config.enemy_size;
    let mut spawned = 0;
    for (object, tile) in map.objects() {
        let LevelObject::Enemy(kind) = object else {
            continue;
        };
        let profile = kind.profile();
        let center = map.tile_center(tile);
        let replan = rng.gen_range(config.replan_interval_min_secs..=config.replan_interval_max_secs);
        commands.spawn((
            Enemy,
            kind,
            Armed(profile.weapon),
            Hitbox(Bounds::centered_on(center, size, size)),
            Health(profile.health),
            MoveSpeed(profile.speed),
            Facing::default(),
            Velocity::default(),
            EnemyBrain::new(replan),
            LevelEntity,
            Sprite::from_color(profile.color, Vec2::splat(size as f32)),
            Transform::from_translation(level_to_world(center).extend(10.0)),
        ));
        spawned += 1;
    }
    info!("spawned {spawned} enemies");
}

/// Run every enemy's state machine and apply the outcome: steering, facing,
/// the alert shout, and shots.
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
#[span_fn]
fn enemy_ai(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    map: Option<Res<LevelMap>>,
    index: Res<ReachabilityIndex>,
    mut rng: ResMut<GameRng>,
    player: Query<&Hitbox, With<Player>>,
    mut enemies: Query<
        (
            Entity,
            &EnemyKind,
            &Armed,
            &Hitbox,
            &MoveSpeed,
            &mut EnemyBrain,
            &mut Velocity,
            &mut Facing,
        ),
        (With<Enemy>, Without<Player>),
    >,
) {
    let Some(map) = map else { return };
    let Ok(player_box) = player.single() else {
        return;
    };
    let dt = time.delta_secs();

    for (entity, kind, armed, hitbox, speed, mut brain, mut velocity, mut facing) in &mut enemies {
        let center = hitbox.0.center();
        let senses = Senses {
            center,
            player_center: player_box.0.center(),
            facing: facing.0,
            dt,
            solids: map.all_solids(),
            index: &index,
            tile_size: map.tile_size,
            waypoint_size: config.waypoint_size,
        };
        let mut profile = *kind.profile();
        profile.speed = speed.0;
        profile.weapon = armed.0;
        let intent = think(&mut brain, &profile, &senses, &mut **rng);

        velocity.set_if_neq(Velocity(intent.velocity));
        facing.set_if_neq(Facing(intent.facing));

        if intent.shout {
            info!("{kind:?} alerted");
            commands.trigger(EnemyAlerted {
                enemy: entity,
                kind: *kind,
            });
        }
        if intent.fire {
            spawn_projectiles(
                &mut commands,
                &mut **rng,
                armed.0,
                center,
                intent.facing,
                Shooter::Enemy,
                config.projectile_size,
            );
            commands.trigger(WeaponFired {
                weapon: armed.0,
                by_player: false,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
