//! Game events triggered by gameplay systems and observed by audio and stats.

use bevy::prelude::*;

use crate::components::EnemyKind;
use crate::weapons::WeaponType;

/// A dormant enemy spotted the player and shouted.
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyAlerted {
    pub enemy: Entity,
    pub kind: EnemyKind,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponFired {
    pub weapon: WeaponType,
    pub by_player: bool,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyKilled {
    pub kind: EnemyKind,
    pub weapon: WeaponType,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct AmmoPickedUp {
    pub weapon: WeaponType,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponPickedUp {
    pub weapon: WeaponType,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct HealthPickedUp;
