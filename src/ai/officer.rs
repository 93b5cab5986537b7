//! Officer: a marksman with a rifle. Fires single aimed shots, one attempt in
//! three when the rifle is ready.

use bevy::prelude::*;

use super::EnemyProfile;
use super::fire_control::FireProfile;
use crate::components::EnemyKind;
use crate::weapons::WeaponType;

pub const PROFILE: EnemyProfile = EnemyProfile {
    kind: EnemyKind::Officer,
    health: 90,
    speed: 150.0,
    weapon: WeaponType::Rifle,
    fire: FireProfile::Opportunistic { odds: 3 },
    color: Color::srgb(0.3, 0.3, 0.35),
};
