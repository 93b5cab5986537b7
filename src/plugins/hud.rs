//! HUD overlay: health, current weapon and ammo, level, kills.

use bevy::prelude::*;
use micromegas_tracing::prelude::*;

use crate::app_state::{AppState, GameSet};
use crate::components::{Health, Player};
use crate::resources::{CurrentLevel, GameStats, LevelTitle};
use crate::weapons::Arsenal;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::InGame), spawn_hud);
        app.add_systems(OnExit(AppState::InGame), despawn_hud);
        app.add_systems(
            Update,
            (update_player_hud, update_level_hud)
                .in_set(GameSet::Presentation)
                .run_if(in_state(AppState::InGame)),
        );
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HealthText;

#[derive(Component)]
pub struct WeaponText;

#[derive(Component)]
pub struct LevelText;

#[derive(Component)]
pub struct KillsText;

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn hud_text(marker: impl Component, text: &str, color: Color) -> impl Bundle {
    (
        marker,
        Text::new(text),
        TextColor(color),
        TextFont {
            font_size: 22.0,
            ..default()
        },
    )
}

fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Auto,
                justify_content: JustifyContent::SpaceBetween,
                padding: UiRect::all(Val::Px(12.0)),
                position_type: PositionType::Absolute,
                bottom: Val::Px(0.0),
                left: Val::Px(0.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn(hud_text(HealthText, "Health: -", Color::srgb(0.9, 0.3, 0.3)));
            parent.spawn(hud_text(WeaponText, "-", Color::WHITE));
            parent.spawn(hud_text(LevelText, "Level -", Color::srgb(0.8, 0.8, 0.6)));
            parent.spawn(hud_text(KillsText, "Kills: 0", Color::srgb(0.7, 0.7, 0.7)));
        });
}

fn despawn_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

/// Format the weapon line, e.g. `Shotgun  12/50`.
pub fn weapon_label(arsenal: &Arsenal) -> String {
    let weapon = arsenal.current();
    let stats = weapon.stats();
    format!("{}  {}/{}", stats.name, arsenal.ammo(weapon), stats.max_ammo)
}

#[allow(clippy::type_complexity)]
#[span_fn]
fn update_player_hud(
    player: Query<(&Health, &Arsenal), (With<Player>, Or<(Changed<Health>, Changed<Arsenal>)>)>,
    mut health_text: Query<&mut Text, (With<HealthText>, Without<WeaponText>)>,
    mut weapon_text: Query<&mut Text, (With<WeaponText>, Without<HealthText>)>,
) {
    let Ok((health, arsenal)) = player.single() else {
        return;
    };
    if let Ok(mut text) = health_text.single_mut() {
        **text = format!("Health: {}", health.0.max(0));
    }
    if let Ok(mut text) = weapon_text.single_mut() {
        **text = weapon_label(arsenal);
    }
}

#[allow(clippy::type_complexity)]
fn update_level_hud(
    level: Res<CurrentLevel>,
    title: Option<Res<LevelTitle>>,
    stats: Res<GameStats>,
    mut level_text: Query<&mut Text, (With<LevelText>, Without<KillsText>)>,
    mut kills_text: Query<&mut Text, (With<KillsText>, Without<LevelText>)>,
) {
    if let Ok(mut text) = level_text.single_mut() {
        let label = match title.as_deref() {
            Some(LevelTitle(title)) if !title.is_empty() => format!("Level {}: {title}", level.0),
            _ => format!("Level {}", level.0),
        };
        **text = label;
    }
    if let Ok(mut text) = kills_text.single_mut() {
        **text = format!("Kills: {}", stats.total_kills());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
