use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, States)]
pub enum AppState {
    #[default]
    Loading,
    MainMenu,
    InGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, SubStates)]
#[source(AppState = AppState::InGame)]
pub enum PlayingState {
    #[default]
    LevelIntro,
    Playing,
    PlayerDeath,
    LevelTransition,
}

/// Per-frame ordering of gameplay systems. Configured as a chain in
/// `BunkerAssaultPlugin`; everything but `Presentation` only runs while
/// `PlayingState::Playing` is active.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    Navigation,
    Input,
    Ai,
    Motion,
    Combat,
    Pickups,
    Presentation,
}
