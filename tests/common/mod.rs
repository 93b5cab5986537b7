//! Headless harness running the gameplay plugins without a window, audio or
//! asset loading.

#![allow(dead_code)]

use std::time::Duration;

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use bunker_assault::app_state::{AppState, GameSet, PlayingState};
use bunker_assault::components::{Hitbox, Player};
use bunker_assault::config::GameConfig;
use bunker_assault::geometry::Bounds;
use bunker_assault::plugins::combat::CombatPlugin;
use bunker_assault::plugins::enemies::EnemyPlugin;
use bunker_assault::plugins::hud::HudPlugin;
use bunker_assault::plugins::level::LevelPlugin;
use bunker_assault::plugins::movement::MovementPlugin;
use bunker_assault::plugins::navigation::NavigationPlugin;
use bunker_assault::plugins::pickups::PickupPlugin;
use bunker_assault::plugins::player::PlayerPlugin;
use bunker_assault::resources::GameStats;
use bunker_assault::{cleanup_game_session, init_game_session};

pub fn gameplay_app(config: GameConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(20)));
    app.init_resource::<ButtonInput<KeyCode>>();
    app.init_resource::<ButtonInput<MouseButton>>();
    app.add_message::<MouseWheel>();

    app.init_state::<AppState>();
    app.add_sub_state::<PlayingState>();
    app.insert_resource(config);
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

    app.add_plugins((
        LevelPlugin,
        PlayerPlugin,
        NavigationPlugin,
        EnemyPlugin,
        MovementPlugin,
        CombatPlugin,
        PickupPlugin,
        HudPlugin,
    ));
    app.add_systems(OnEnter(AppState::InGame), init_game_session);
    app.add_systems(OnExit(AppState::InGame), cleanup_game_session);
    app
}

pub fn seeded_config() -> GameConfig {
    GameConfig {
        rng_seed: Some(7),
        ..GameConfig::default()
    }
}

pub fn set_app_state(app: &mut App, state: AppState) {
    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(state);
    for _ in 0..5 {
        app.update();
    }
}

pub fn set_playing_state(app: &mut App, state: PlayingState) {
    app.world_mut()
        .resource_mut::<NextState<PlayingState>>()
        .set(state);
    for _ in 0..5 {
        app.update();
    }
}

pub fn playing_state(app: &App) -> PlayingState {
    *app.world().resource::<State<PlayingState>>().get()
}

pub fn app_state(app: &App) -> AppState {
    *app.world().resource::<State<AppState>>().get()
}

pub fn player(app: &mut App) -> Entity {
    app.world_mut()
        .query_filtered::<Entity, With<Player>>()
        .single(app.world())
        .unwrap()
}

pub fn count<T: Component>(app: &mut App) -> usize {
    app.world_mut().query::<&T>().iter(app.world()).count()
}

/// Put the player's hitbox centre on `center` (level pixels).
pub fn teleport_player(app: &mut App, center: IVec2) {
    let player = player(app);
    let mut hitbox = app.world_mut().get_mut::<Hitbox>(player).unwrap();
    let (w, h) = (hitbox.0.w, hitbox.0.h);
    hitbox.0 = Bounds::centered_on(center, w, h);
}
