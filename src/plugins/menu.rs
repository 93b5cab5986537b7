//! Title screen: start prompt and a summary of the last session.

use bevy::prelude::*;

use crate::app_state::AppState;
use crate::resources::GameStats;

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::MainMenu), spawn_menu);
        app.add_systems(OnExit(AppState::MainMenu), despawn_menu);
        app.add_systems(
            Update,
            menu_input.run_if(in_state(AppState::MainMenu)),
        );
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

#[derive(Component)]
pub struct MenuRoot;

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// One line summarising a finished session, or `None` before the first game.
pub fn session_summary(stats: &GameStats) -> Option<String> {
    if stats.levels_cleared == 0 && stats.total_kills() == 0 && stats.deaths == 0 {
        return None;
    }
    Some(format!(
        "Last run: {} levels cleared, {} kills, {} deaths, {} shots fired",
        stats.levels_cleared,
        stats.total_kills(),
        stats.deaths,
        stats.shots_fired
    ))
}

fn spawn_menu(mut commands: Commands, stats: Option<Res<GameStats>>) {
    let summary = stats.as_deref().and_then(session_summary);
    commands
        .spawn((
            MenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(20.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.05, 0.05, 0.04)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("BUNKER ASSAULT"),
                TextColor(Color::srgb(0.85, 0.2, 0.15)),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
            ));
            if let Some(summary) = summary {
                parent.spawn((
                    Text::new(summary),
                    TextColor(Color::srgb(0.7, 0.7, 0.65)),
                    TextFont {
                        font_size: 18.0,
                        ..default()
                    },
                ));
            }
            parent.spawn((
                Text::new("Enter: start    Esc: quit"),
                TextColor(Color::WHITE),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
            ));
        });
}

fn despawn_menu(mut commands: Commands, query: Query<Entity, With<MenuRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

fn menu_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut exit: MessageWriter<AppExit>,
) {
    if keyboard.just_pressed(KeyCode::Enter) {
        next_state.set(AppState::InGame);
    } else if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::EnemyKind;
    use bevy::state::app::StatesPlugin;

    fn setup_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(StatesPlugin);
        app.init_state::<AppState>();
        app.add_sub_state::<crate::app_state::PlayingState>();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.add_plugins(MenuPlugin);
        app
    }

    fn transition_to_main_menu(app: &mut App) {
        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::MainMenu);
        for _ in 0..5 {
            app.update();
        }
    }

    fn menu_count(app: &mut App) -> usize {
        app.world_mut().query::<&MenuRoot>().iter(app.world()).count()
    }

    #[test]
    fn no_summary_before_first_game() {
        assert_eq!(session_summary(&GameStats::default()), None);

        let mut stats = GameStats::default();
        stats.levels_cleared = 1;
        stats.deaths = 2;
        stats.shots_fired = 40;
        stats.kills_by_kind.insert(EnemyKind::Soldier, 4);
        assert_eq!(
            session_summary(&stats).as_deref(),
            Some("Last run: 1 levels cleared, 4 kills, 2 deaths, 40 shots fired")
        );
    }

    #[test]
    fn menu_lives_only_in_main_menu() {
        let mut app = setup_app();
        transition_to_main_menu(&mut app);
        assert_eq!(menu_count(&mut app), 1);

        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::InGame);
        for _ in 0..5 {
            app.update();
        }
        assert_eq!(menu_count(&mut app), 0);
    }

    #[test]
    fn enter_starts_game() {
        let mut app = setup_app();
        transition_to_main_menu(&mut app);

        let mut input = ButtonInput::<KeyCode>::default();
        input.press(KeyCode::Enter);
        app.insert_resource(input);
        for _ in 0..5 {
            app.update();
        }
        assert_eq!(*app.world().resource::<State<AppState>>().get(), AppState::InGame);
    }
}
