//! Guard: the weakest enemy. Takes a potshot with the handgun whenever it is
//! ready and has the player in sight, hitting the trigger half the time.

use bevy::prelude::*;

use super::EnemyProfile;
use super::fire_control::FireProfile;
use crate::components::EnemyKind;
use crate::weapons::WeaponType;

pub const PROFILE: EnemyProfile = EnemyProfile {
    kind: EnemyKind::Guard,
    health: 30,
    speed: 150.0,
    weapon: WeaponType::Handgun,
    fire: FireProfile::Opportunistic { odds: 2 },
    color: Color::srgb(0.55, 0.5, 0.35),
};
