pub mod ai;
pub mod app_state;
pub mod components;
pub mod config;
pub mod events;
pub mod geometry;
pub mod plugins;
pub mod resources;
pub mod weapons;

use bevy::prelude::*;
use bevy_asset_loader::prelude::*;
use bevy_kira_audio::AudioPlugin;
use micromegas_tracing::prelude::*;

use app_state::{AppState, GameSet, PlayingState};
use config::GameConfig;
use plugins::audio::GameAudioPlugin;
use plugins::camera::CameraPlugin;
use plugins::combat::CombatPlugin;
use plugins::enemies::EnemyPlugin;
use plugins::hud::HudPlugin;
use plugins::level::LevelPlugin;
use plugins::menu::MenuPlugin;
use plugins::movement::MovementPlugin;
use plugins::navigation::NavigationPlugin;
use plugins::pickups::PickupPlugin;
use plugins::player::PlayerPlugin;
use plugins::telemetry::TelemetryPlugin;
use resources::{AudioAssets, CurrentLevel, GameRng, GameStats};

pub struct BunkerAssaultPlugin;

impl Plugin for BunkerAssaultPlugin {
    fn build(&self, app: &mut App) {
        // State machine (StatesPlugin comes from DefaultPlugins)
        app.init_state::<AppState>();
        app.add_sub_state::<PlayingState>();

        // Keeps a config inserted by `main`.
        app.init_resource::<GameConfig>();
        app.init_resource::<GameStats>();

        app.configure_sets(
            Update,
            (
                GameSet::Navigation,
                GameSet::Input,
                GameSet::Ai,
                GameSet::Motion,
                GameSet::Combat,
                GameSet::Pickups,
                GameSet::Presentation,
            )
                .chain(),
        );

        app.add_plugins(AudioPlugin);

        app.add_plugins(CameraPlugin);
        app.add_plugins(LevelPlugin);
        app.add_plugins(PlayerPlugin);
        app.add_plugins(NavigationPlugin);
        app.add_plugins(EnemyPlugin);
        app.add_plugins(MovementPlugin);
        app.add_plugins(CombatPlugin);
        app.add_plugins(PickupPlugin);
        app.add_plugins(GameAudioPlugin);
        app.add_plugins(HudPlugin);
        app.add_plugins(MenuPlugin);
        app.add_plugins(TelemetryPlugin);

        app.add_systems(OnEnter(AppState::InGame), init_game_session);
        app.add_systems(OnExit(AppState::InGame), cleanup_game_session);

        app.add_loading_state(
            LoadingState::new(AppState::Loading)
                .continue_to_state(AppState::MainMenu)
                .load_collection::<AudioAssets>(),
        );
    }
}

/// Fresh per-session resources. `GameStats` outlives the session so the
/// menu can show the last run; it is reset here when the next one starts.
#[span_fn]
pub fn init_game_session(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(CurrentLevel(1));
    commands.insert_resource(GameStats::default());
    commands.insert_resource(GameRng::from_seed(config.rng_seed));
    match config.rng_seed {
        Some(seed) => info!("session started with seed {seed}"),
        None => info!("session started"),
    }
}

#[span_fn]
pub fn cleanup_game_session(mut commands: Commands, stats: Res<GameStats>) {
    info!(
        "session over: {} levels, {} kills, {} deaths, {} shots",
        stats.levels_cleared,
        stats.total_kills(),
        stats.deaths,
        stats.shots_fired
    );
    commands.remove_resource::<CurrentLevel>();
    commands.remove_resource::<GameRng>();
}
