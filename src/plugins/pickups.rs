//! Weapon, ammo and health pickups, and the level exit.

use bevy::color::Luminance;
use bevy::prelude::*;
use micromegas_tracing::prelude::info;

use crate::app_state::{GameSet, PlayingState};
use crate::components::{Health, Hitbox, Player};
use crate::config::GameConfig;
use crate::events::{AmmoPickedUp, HealthPickedUp, WeaponPickedUp};
use crate::geometry::Bounds;
use crate::plugins::level::{LevelEntity, LevelMap, LevelObject, level_to_world, load_level};
use crate::weapons::{Arsenal, WeaponType};

pub struct PickupPlugin;

impl Plugin for PickupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(PlayingState::LevelIntro),
            spawn_level_pickups.after(load_level),
        );
        app.add_systems(
            Update,
            (collect_pickups, reach_exit.after(collect_pickups))
                .in_set(GameSet::Pickups)
                .run_if(in_state(PlayingState::Playing)),
        );
    }
}

/// Something the player can walk over and take.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pickup {
    /// A gun plus the rounds loaded in it.
    Weapon { weapon: WeaponType, ammo: i32 },
    Ammo { weapon: WeaponType, amount: i32 },
    Health { amount: i32 },
}

impl Pickup {
    fn color(self) -> Color {
        match self {
            Pickup::Weapon { weapon, .. } => weapon.stats().color,
            Pickup::Ammo { weapon, .. } => weapon.stats().color.darker(0.25),
            Pickup::Health { .. } => Color::srgb(0.9, 0.95, 0.9),
        }
    }

    /// Hand the pickup to the player. Returns true when the loadout or
    /// health changed, in which case the pickup is used up.
    pub fn apply(self, arsenal: &mut Arsenal, health: &mut Health, max_health: i32) -> bool {
        match self {
            Pickup::Weapon { weapon, ammo } => {
                if arsenal.has_weapon(weapon) {
                    arsenal.add_ammo(weapon, ammo)
                } else {
                    arsenal.add_weapon(weapon);
                    arsenal.add_ammo(weapon, ammo);
                    true
                }
            }
            Pickup::Ammo { weapon, amount } => arsenal.add_ammo(weapon, amount),
            Pickup::Health { amount } => health.heal(amount, max_health),
        }
    }
}

#[derive(Component, Debug)]
pub struct Exit;

const EXIT_COLOR: Color = Color::srgb(0.95, 0.8, 0.2);

pub fn spawn_pickup(commands: &mut Commands, pickup: Pickup, center: IVec2, size: i32) -> Entity {
    commands
        .spawn((
            pickup,
            Hitbox(Bounds::centered_on(center, size, size)),
            LevelEntity,
            Sprite::from_color(pickup.color(), Vec2::splat(size as f32)),
            Transform::from_translation(level_to_world(center).extend(2.0)),
        ))
        .id()
}

/// Spawn the pickups and the exit placed in the level file.
fn spawn_level_pickups(mut commands: Commands, config: Res<GameConfig>, map: Option<Res<LevelMap>>) {
    let Some(map) = map else { return };
    for (object, tile) in map.objects() {
        let center = map.tile_center(tile);
        let pickup = match object {
            LevelObject::WeaponPickup(weapon) => Pickup::Weapon {
                weapon,
                ammo: weapon.stats().weapon_pickup_ammo,
            },
            LevelObject::AmmoPickup(weapon) => Pickup::Ammo {
                weapon,
                amount: weapon.stats().ammo_pickup_ammo,
            },
            LevelObject::HealthPickup => Pickup::Health {
                amount: config.health_pickup_amount,
            },
            LevelObject::Exit => {
                let size = config.exit_size;
                commands.spawn((
                    Exit,
                    Hitbox(Bounds::centered_on(center, size, size)),
                    LevelEntity,
                    Sprite::from_color(EXIT_COLOR, Vec2::splat(size as f32)),
                    Transform::from_translation(level_to_world(center).extend(1.0)),
                ));
                continue;
            }
            LevelObject::PlayerStart | LevelObject::Enemy(_) => continue,
        };
        spawn_pickup(&mut commands, pickup, center, config.pickup_size);
    }
}

/// Pick up everything the player overlaps that changes their state.
fn collect_pickups(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut player: Query<(&Hitbox, &mut Arsenal, &mut Health), With<Player>>,
    pickups: Query<(Entity, &Pickup, &Hitbox), Without<Player>>,
) {
    let Ok((player_box, mut arsenal, mut health)) = player.single_mut() else {
        return;
    };
    if health.is_dead() {
        return;
    }
    for (entity, pickup, hitbox) in &pickups {
        if !player_box.0.intersects(&hitbox.0) {
            continue;
        }
        if !pickup.apply(&mut arsenal, &mut health, config.player_max_health) {
            continue;
        }
        commands.entity(entity).despawn();
        match *pickup {
            Pickup::Weapon { weapon, .. } => {
                info!("picked up {}", weapon.stats().name);
                commands.trigger(WeaponPickedUp { weapon });
            }
            Pickup::Ammo { weapon, .. } => commands.trigger(AmmoPickedUp { weapon }),
            Pickup::Health { .. } => commands.trigger(HealthPickedUp),
        }
    }
}

/// A dead player never leaves through the exit; the death restart wins.
fn reach_exit(
    player: Query<(&Hitbox, &Health), With<Player>>,
    exits: Query<&Hitbox, (With<Exit>, Without<Player>)>,
    mut next_state: ResMut<NextState<PlayingState>>,
) {
    let Ok((player_box, health)) = player.single() else {
        return;
    };
    if health.is_dead() {
        return;
    }
    if exits.iter().any(|exit| player_box.0.intersects(&exit.0)) {
        info!("exit reached");
        next_state.set(PlayingState::LevelTransition);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
