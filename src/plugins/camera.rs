use bevy::prelude::*;
use micromegas_tracing::prelude::*;

use crate::app_state::{AppState, GameSet};
use crate::components::{Hitbox, Player};
use crate::plugins::level::{LevelMap, level_to_world};

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera);
        app.add_systems(
            Update,
            follow_player
                .in_set(GameSet::Presentation)
                .run_if(in_state(AppState::InGame)),
        );
        app.add_systems(OnExit(AppState::InGame), recenter_camera);
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Clamp one axis of the camera centre so the view stays inside the level.
/// A level narrower than the view is centred instead.
pub fn clamp_axis(target: f32, half_view: f32, level_min: f32, level_max: f32) -> f32 {
    if level_max - level_min <= half_view * 2.0 {
        return (level_min + level_max) / 2.0;
    }
    target.clamp(level_min + half_view, level_max - half_view)
}

/// Keep the player centred, without showing past the edge of the level.
#[span_fn]
fn follow_player(
    map: Option<Res<LevelMap>>,
    windows: Query<&Window>,
    player: Query<&Hitbox, With<Player>>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let Some(map) = map else { return };
    let Ok(hitbox) = player.single() else {
        return;
    };
    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };
    let target = level_to_world(hitbox.0.center());

    let Ok(window) = windows.single() else {
        transform.translation.x = target.x;
        transform.translation.y = target.y;
        return;
    };
    let size = map.pixel_size().as_vec2();
    transform.translation.x = clamp_axis(target.x, window.width() / 2.0, 0.0, size.x);
    // World Y runs from 0 at the top row down to -height.
    transform.translation.y = clamp_axis(target.y, window.height() / 2.0, -size.y, 0.0);
}

fn recenter_camera(mut cameras: Query<&mut Transform, With<Camera2d>>) {
    for mut transform in &mut cameras {
        transform.translation.x = 0.0;
        transform.translation.y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_inside_wide_level() {
        assert_eq!(clamp_axis(100.0, 400.0, 0.0, 1500.0), 400.0);
        assert_eq!(clamp_axis(700.0, 400.0, 0.0, 1500.0), 700.0);
        assert_eq!(clamp_axis(1400.0, 400.0, 0.0, 1500.0), 1100.0);
    }

    #[test]
    fn centres_narrow_level() {
        assert_eq!(clamp_axis(-50.0, 300.0, -400.0, 0.0), -200.0);
    }
}
