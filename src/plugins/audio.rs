//! Audio: a music loop per app state, sound effects from gameplay events.

use bevy::prelude::*;
use bevy_kira_audio::prelude::*;
use micromegas_tracing::prelude::*;

use crate::app_state::{AppState, PlayingState};
use crate::events::{
    AmmoPickedUp, EnemyAlerted, EnemyKilled, HealthPickedUp, WeaponFired, WeaponPickedUp,
};
use crate::resources::AudioAssets;

#[derive(Resource)]
pub struct MusicChannel;

#[derive(Resource)]
pub struct SfxChannel;

/// Gunfire gets its own channel so a long burst never drowns pickups and shouts.
#[derive(Resource)]
pub struct GunfireChannel;

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_audio_channel::<MusicChannel>()
            .add_audio_channel::<SfxChannel>()
            .add_audio_channel::<GunfireChannel>();

        app.add_systems(OnEnter(AppState::MainMenu), start_menu_music);
        app.add_systems(OnExit(AppState::MainMenu), stop_music);
        app.add_systems(OnEnter(AppState::InGame), start_gameplay_music);
        app.add_systems(OnExit(AppState::InGame), stop_music);

        app.add_observer(on_weapon_fired);
        app.add_observer(on_enemy_alerted);
        app.add_observer(on_enemy_killed);
        app.add_observer(on_weapon_picked_up);
        app.add_observer(on_ammo_picked_up);
        app.add_observer(on_health_picked_up);

        app.add_systems(OnEnter(PlayingState::PlayerDeath), play_player_death_sfx);
    }
}

// ---------------------------------------------------------------------------
// Music
// ---------------------------------------------------------------------------

#[span_fn]
fn start_menu_music(music: Res<AudioChannel<MusicChannel>>, assets: Res<AudioAssets>) {
    music.play(assets.menu_theme.clone()).looped();
}

#[span_fn]
fn start_gameplay_music(music: Res<AudioChannel<MusicChannel>>, assets: Res<AudioAssets>) {
    music.play(assets.gameplay.clone()).looped();
}

#[span_fn]
fn stop_music(music: Res<AudioChannel<MusicChannel>>) {
    music.stop();
}

// ---------------------------------------------------------------------------
// SFX observers
// ---------------------------------------------------------------------------

#[span_fn]
fn on_weapon_fired(
    trigger: On<WeaponFired>,
    gunfire: Res<AudioChannel<GunfireChannel>>,
    assets: Res<AudioAssets>,
) {
    gunfire.play(assets.gunshot(trigger.event().weapon));
}

#[span_fn]
fn on_enemy_alerted(
    _trigger: On<EnemyAlerted>,
    sfx: Res<AudioChannel<SfxChannel>>,
    assets: Res<AudioAssets>,
) {
    sfx.play(assets.shout.clone());
}

#[span_fn]
fn on_enemy_killed(
    _trigger: On<EnemyKilled>,
    sfx: Res<AudioChannel<SfxChannel>>,
    assets: Res<AudioAssets>,
) {
    sfx.play(assets.death.clone());
}

#[span_fn]
fn on_weapon_picked_up(
    _trigger: On<WeaponPickedUp>,
    sfx: Res<AudioChannel<SfxChannel>>,
    assets: Res<AudioAssets>,
) {
    sfx.play(assets.weapon_pickup.clone());
}

#[span_fn]
fn on_ammo_picked_up(
    _trigger: On<AmmoPickedUp>,
    sfx: Res<AudioChannel<SfxChannel>>,
    assets: Res<AudioAssets>,
) {
    sfx.play(assets.ammo_pickup.clone());
}

#[span_fn]
fn on_health_picked_up(
    _trigger: On<HealthPickedUp>,
    sfx: Res<AudioChannel<SfxChannel>>,
    assets: Res<AudioAssets>,
) {
    sfx.play(assets.health_pickup.clone());
}

#[span_fn]
fn play_player_death_sfx(sfx: Res<AudioChannel<SfxChannel>>, assets: Res<AudioAssets>) {
    sfx.play(assets.death.clone());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
