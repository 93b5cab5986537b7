//! Per-frame metrics: frame time and the size of the live battle.

use bevy::prelude::*;
use micromegas_tracing::prelude::{fmetric, imetric, span_scope};

use crate::app_state::PlayingState;
use crate::components::Enemy;
use crate::plugins::combat::Projectile;

pub struct TelemetryPlugin;

impl Plugin for TelemetryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Last, frame_telemetry);
        app.add_systems(
            Last,
            battle_telemetry.run_if(in_state(PlayingState::Playing)),
        );
    }
}

fn frame_telemetry(time: Res<Time>) {
    span_scope!("frame");
    fmetric!("frame_time_ms", "ms", time.delta_secs_f64() * 1000.0);
}

fn battle_telemetry(enemies: Query<(), With<Enemy>>, projectiles: Query<(), With<Projectile>>) {
    imetric!("live_enemies", "count", enemies.iter().count() as u64);
    imetric!("live_projectiles", "count", projectiles.iter().count() as u64);
}
