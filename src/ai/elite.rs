//! Elite trooper: the toughest enemy, with an assault rifle and the same
//! burst discipline as a soldier at longer odds.

use bevy::prelude::*;

use super::EnemyProfile;
use super::fire_control::FireProfile;
use crate::components::EnemyKind;
use crate::weapons::WeaponType;

pub const PROFILE: EnemyProfile = EnemyProfile {
    kind: EnemyKind::Elite,
    health: 150,
    speed: 150.0,
    weapon: WeaponType::AssaultRifle,
    fire: FireProfile::Burst {
        roll_interval: 1.0,
        start_odds: 4,
        stop_odds: 4,
    },
    color: Color::srgb(0.15, 0.15, 0.15),
};
