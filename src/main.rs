use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::tasks::{ComputeTaskPool, TaskPoolBuilder};
use bunker_assault::config::{DEFAULT_CONFIG_PATH, GameConfig};
use micromegas_telemetry_sink::TelemetryGuardBuilder;
use micromegas_telemetry_sink::tracing_interop::TracingCaptureLayer;
use micromegas_tracing::dispatch::{flush_thread_buffer, init_thread_stream, unregister_thread_stream};
use micromegas_tracing::levels::LevelFilter;
use micromegas_tracing::prelude::{error, info};
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;

fn main() -> AppExit {
    // Spans need MICROMEGAS_ENABLE_CPU_TRACING=true; logs and metrics always flow.
    let _telemetry_guard = match TelemetryGuardBuilder::default()
        .with_install_tracing_capture(false)
        .build()
    {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialize telemetry: {e:?}");
            return AppExit::error();
        }
    };

    // Bevy and its dependencies log through `tracing`; route those into the
    // same sink before the app starts.
    let subscriber = Registry::default().with(TracingCaptureLayer {
        max_level: LevelFilter::Info,
    });
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        error!("failed to set tracing subscriber: {e}");
        return AppExit::error();
    }

    let config = match GameConfig::load_or_default(DEFAULT_CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return AppExit::error();
        }
    };
    info!("Bunker Assault starting, levels from {}", config.levels_dir);

    // Must exist before App::new() so TaskPoolPlugin keeps this pool.
    ComputeTaskPool::get_or_init(|| {
        TaskPoolBuilder::new()
            .on_thread_spawn(|| {
                init_thread_stream();
            })
            .on_thread_destroy(|| {
                flush_thread_buffer();
                unregister_thread_stream();
            })
            .build()
    });

    App::new()
        .add_plugins(
            DefaultPlugins
                .build()
                .disable::<LogPlugin>()
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Bunker Assault".to_string(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(config)
        .add_plugins(bunker_assault::BunkerAssaultPlugin)
        .run()
}
