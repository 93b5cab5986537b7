use std::collections::HashMap;

use bevy::prelude::*;
use bevy_asset_loader::prelude::*;
use bevy_kira_audio::AudioSource;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::components::EnemyKind;
use crate::weapons::WeaponType;

/// 1-based number of the level being played.
#[derive(Resource, Debug)]
pub struct CurrentLevel(pub u32);

/// Title of the loaded level, shown by the HUD and in the window title.
#[derive(Resource, Debug, Default, Clone)]
pub struct LevelTitle(pub String);

/// Every random roll in the game goes through this, so a fixed seed replays
/// a session exactly.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct GameRng(pub ChaCha8Rng);

impl GameRng {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(ChaCha8Rng::seed_from_u64(seed)),
            None => Self(ChaCha8Rng::from_entropy()),
        }
    }
}

// ---------------------------------------------------------------------------
// Game stats
// ---------------------------------------------------------------------------

#[derive(Resource, Debug, Default)]
pub struct GameStats {
    pub deaths: u32,
    pub kills_by_kind: HashMap<EnemyKind, u32>,
    pub shots_fired: u64,
    pub levels_cleared: u32,
}

impl GameStats {
    pub fn total_kills(&self) -> u32 {
        self.kills_by_kind.values().sum()
    }
}

#[derive(AssetCollection, Resource)]
pub struct AudioAssets {
    #[asset(path = "audio/music/menu_theme.ogg")]
    pub menu_theme: Handle<AudioSource>,
    #[asset(path = "audio/music/gameplay.ogg")]
    pub gameplay: Handle<AudioSource>,
    #[asset(path = "audio/sfx/handgun.ogg")]
    pub handgun: Handle<AudioSource>,
    #[asset(path = "audio/sfx/submachine_gun.ogg")]
    pub submachine_gun: Handle<AudioSource>,
    #[asset(path = "audio/sfx/rifle.ogg")]
    pub rifle: Handle<AudioSource>,
    #[asset(path = "audio/sfx/shotgun.ogg")]
    pub shotgun: Handle<AudioSource>,
    #[asset(path = "audio/sfx/assault_rifle.ogg")]
    pub assault_rifle: Handle<AudioSource>,
    #[asset(path = "audio/sfx/shout.ogg")]
    pub shout: Handle<AudioSource>,
    #[asset(path = "audio/sfx/death.ogg")]
    pub death: Handle<AudioSource>,
    #[asset(path = "audio/sfx/ammo_pickup.ogg")]
    pub ammo_pickup: Handle<AudioSource>,
    #[asset(path = "audio/sfx/weapon_pickup.ogg")]
    pub weapon_pickup: Handle<AudioSource>,
    #[asset(path = "audio/sfx/health_pickup.ogg")]
    pub health_pickup: Handle<AudioSource>,
}

impl AudioAssets {
    pub fn gunshot(&self, weapon: WeaponType) -> Handle<AudioSource> {
        match weapon {
            WeaponType::Handgun => self.handgun.clone(),
            WeaponType::SubmachineGun => self.submachine_gun.clone(),
            WeaponType::Rifle => self.rifle.clone(),
            WeaponType::Shotgun => self.shotgun.clone(),
            WeaponType::AssaultRifle => self.assault_rifle.clone(),
        }
    }
}
