//! Keeps the shared reachability index pointed at the player.

use bevy::prelude::*;
use micromegas_tracing::prelude::*;

use crate::ai::reachability::ReachabilityIndex;
use crate::app_state::{GameSet, PlayingState};
use crate::components::{Hitbox, Player};
use crate::config::GameConfig;
use crate::plugins::level::{LevelMap, load_level};
use crate::plugins::player::place_player;

pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ReachabilityIndex>();
        app.add_systems(
            OnEnter(PlayingState::LevelIntro),
            seed_reachability.after(load_level).after(place_player),
        );
        app.add_systems(
            Update,
            rebuild_reachability
                .in_set(GameSet::Navigation)
                .run_if(in_state(PlayingState::Playing)),
        );
    }
}

#[derive(Resource, Deref, DerefMut)]
pub struct ReachabilityTimer(pub Timer);

/// Flood the freshly loaded level from the player's start tile.
fn seed_reachability(
    mut commands: Commands,
    config: Res<GameConfig>,
    map: Option<Res<LevelMap>>,
    mut index: ResMut<ReachabilityIndex>,
    player: Query<&Hitbox, With<Player>>,
) {
    commands.insert_resource(ReachabilityTimer(Timer::from_seconds(
        config.reachability_interval_secs,
        TimerMode::Repeating,
    )));
    let (Some(map), Ok(hitbox)) = (map, player.single()) else {
        return;
    };
    index.rebuild(&map, map.tile_of_point(hitbox.0.center()));
    imetric!("reachable_tiles", "count", index.reachable_count() as u64);
}

/// Re-flood from the player's current tile on every timer tick.
#[span_fn]
fn rebuild_reachability(
    time: Res<Time>,
    timer: Option<ResMut<ReachabilityTimer>>,
    map: Option<Res<LevelMap>>,
    mut index: ResMut<ReachabilityIndex>,
    player: Query<&Hitbox, With<Player>>,
) {
    let (Some(mut timer), Some(map)) = (timer, map) else {
        return;
    };
    timer.tick(time.delta());
    if !timer.just_finished() {
        return;
    }
    let Ok(hitbox) = player.single() else { return };
    index.rebuild(&map, map.tile_of_point(hitbox.0.center()));
    imetric!("reachable_tiles", "count", index.reachable_count() as u64);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::TilePos;
    use crate::geometry::Bounds;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    #[test]
    fn index_follows_player_on_timer() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(StatesPlugin);
        app.init_state::<crate::app_state::AppState>();
        app.add_sub_state::<PlayingState>();
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.insert_resource(GameConfig::default());
        app.insert_resource(LevelMap::parse("1....\n.....\n....H", 50).unwrap());
        app.init_resource::<ReachabilityIndex>();
        app.insert_resource(ReachabilityTimer(Timer::from_seconds(0.5, TimerMode::Repeating)));
        app.add_systems(Update, rebuild_reachability.run_if(in_state(PlayingState::Playing)));

        let player = app
            .world_mut()
            .spawn((Player, Hitbox(Bounds::centered_on(IVec2::new(75, 75), 30, 30))))
            .id();

        app.world_mut()
            .resource_mut::<NextState<crate::app_state::AppState>>()
            .set(crate::app_state::AppState::InGame);
        for _ in 0..5 {
            app.update();
        }
        app.world_mut()
            .resource_mut::<NextState<PlayingState>>()
            .set(PlayingState::Playing);
        for _ in 0..6 {
            app.update();
        }
        assert_eq!(
            app.world().resource::<ReachabilityIndex>().source(),
            TilePos::new(1, 1)
        );

        // Move the player; the index only catches up after the next tick.
        app.world_mut().entity_mut(player).insert(Hitbox(Bounds::centered_on(
            IVec2::new(225, 125),
            30,
            30,
        )));
        app.update();
        assert_eq!(
            app.world().resource::<ReachabilityIndex>().source(),
            TilePos::new(1, 1)
        );
        for _ in 0..5 {
            app.update();
        }
        let index = app.world().resource::<ReachabilityIndex>();
        assert_eq!(index.source(), TilePos::new(4, 2));
        assert_eq!(index.reachable_count(), 15);
    }
}
