//! Player spawning, placement and input handling.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use micromegas_tracing::prelude::*;

use crate::app_state::{AppState, GameSet, PlayingState};
use crate::components::*;
use crate::config::GameConfig;
use crate::geometry::{Bounds, heading_degrees};
use crate::plugins::level::{LevelMap, level_to_world, load_level};
use crate::resources::GameStats;
use crate::weapons::Arsenal;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::InGame), spawn_player);
        app.add_systems(OnExit(AppState::InGame), despawn_player);
        app.add_systems(
            OnEnter(PlayingState::LevelIntro),
            place_player.after(load_level),
        );
        app.add_systems(OnEnter(PlayingState::PlayerDeath), reset_player);
        app.add_systems(
            Update,
            (player_input, player_aim, player_weapon_cycle)
                .in_set(GameSet::Input)
                .run_if(in_state(PlayingState::Playing)),
        );
        app.add_systems(
            Update,
            leave_to_menu.run_if(in_state(AppState::InGame)),
        );
    }
}

const PLAYER_COLOR: Color = Color::srgb(0.25, 0.55, 0.95);

/// Spawn the player for a new session. The player outlives level changes and
/// is repositioned by `place_player` whenever a level starts.
pub fn spawn_player(mut commands: Commands, config: Res<GameConfig>) {
    let size = config.player_size;
    commands.spawn((
        Player,
        Hitbox(Bounds::new(0, 0, size, size)),
        Velocity::default(),
        MoveSpeed(config.player_speed),
        Facing::default(),
        Health(config.player_max_health),
        Arsenal::default(),
        Sprite::from_color(PLAYER_COLOR, Vec2::splat(size as f32)),
        Transform::from_xyz(0.0, 0.0, 10.0),
    ));
    info!("player spawned with {} hp", config.player_max_health);
}

fn despawn_player(mut commands: Commands, query: Query<Entity, With<Player>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

/// Centre the player on the level's start tile and drop any input left over
/// from the previous level.
pub fn place_player(
    map: Option<Res<LevelMap>>,
    mut query: Query<(&mut Hitbox, &mut Velocity, &mut Arsenal, &mut Transform), With<Player>>,
) {
    let Some(map) = map else { return };
    let start = map.tile_center(map.player_start());
    for (mut hitbox, mut velocity, mut arsenal, mut transform) in &mut query {
        hitbox.0 = Bounds::centered_on(start, hitbox.0.w, hitbox.0.h);
        velocity.0 = Vec2::ZERO;
        arsenal.trigger_held = false;
        let world = level_to_world(start);
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

/// Back to full health and the starting loadout after a death.
fn reset_player(
    config: Res<GameConfig>,
    mut stats: ResMut<GameStats>,
    mut query: Query<(&mut Health, &mut Arsenal, &mut Velocity), With<Player>>,
) {
    stats.deaths += 1;
    imetric!("player_deaths", "count", stats.deaths as u64);
    for (mut health, mut arsenal, mut velocity) in &mut query {
        *health = Health(config.player_max_health);
        *arsenal = Arsenal::default();
        velocity.0 = Vec2::ZERO;
    }
    info!("player died ({} deaths this session)", stats.deaths);
}

/// Velocity from the WASD/arrow keys. Opposite keys cancel out.
pub fn direction_from_keys(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let axis = |neg: [KeyCode; 2], pos: [KeyCode; 2]| -> f32 {
        let mut v = 0.0;
        if keyboard.any_pressed(neg) {
            v -= 1.0;
        }
        if keyboard.any_pressed(pos) {
            v += 1.0;
        }
        v
    };
    Vec2::new(
        axis([KeyCode::KeyA, KeyCode::ArrowLeft], [KeyCode::KeyD, KeyCode::ArrowRight]),
        // Level space has Y pointing down.
        axis([KeyCode::KeyW, KeyCode::ArrowUp], [KeyCode::KeyS, KeyCode::ArrowDown]),
    )
}

#[span_fn]
fn player_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut query: Query<(&MoveSpeed, &mut Velocity, &mut Arsenal), With<Player>>,
) {
    let direction = direction_from_keys(&keyboard);
    for (speed, mut velocity, mut arsenal) in &mut query {
        velocity.0 = direction * speed.0;
        arsenal.trigger_held = mouse.pressed(MouseButton::Left);
    }
}

/// Turn the player toward the mouse cursor.
fn player_aim(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut query: Query<(&Hitbox, &mut Facing), With<Player>>,
) {
    let Ok(window) = windows.single() else { return };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(world) = camera.viewport_to_world_2d(camera_transform, cursor) else {
        return;
    };
    let target = IVec2::new(world.x.round() as i32, (-world.y).round() as i32);
    for (hitbox, mut facing) in &mut query {
        facing.set_if_neq(Facing(heading_degrees(hitbox.0.center(), target)));
    }
}

/// Mouse wheel steps through owned weapons in pickup order.
fn player_weapon_cycle(
    mut wheel: MessageReader<MouseWheel>,
    mut query: Query<&mut Arsenal, With<Player>>,
) {
    let steps: f32 = wheel.read().map(|event| event.y).sum();
    if steps == 0.0 {
        return;
    }
    let steps = if steps > 0.0 { 1 } else { -1 };
    for mut arsenal in &mut query {
        arsenal.cycle(steps);
        info!("weapon selected: {}", arsenal.current().stats().name);
    }
}

fn leave_to_menu(keyboard: Res<ButtonInput<KeyCode>>, mut next_state: ResMut<NextState<AppState>>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        next_state.set(AppState::MainMenu);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
