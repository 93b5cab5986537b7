//! Level loading, the solid grid, and level-to-level flow.
//!
//! Levels are ASCII files, one character per tile. `#` is solid, `.` and
//! space are floor, and the characters `1`..`9`, `A`..`H` place objects on a
//! floor tile. An optional first line `title: <text>` names the level.

use std::path::Path;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use micromegas_tracing::prelude::{error, info, span_scope};
use pathfinding::matrix::Matrix;
use thiserror::Error;

use crate::app_state::{AppState, PlayingState};
use crate::components::{EnemyKind, TilePos, Wall};
use crate::config::GameConfig;
use crate::geometry::Bounds;
use crate::resources::{CurrentLevel, GameStats, LevelTitle};
use crate::weapons::WeaponType;

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(PlayingState::LevelIntro),
            (load_level, show_level_intro.after(load_level)),
        );
        app.add_systems(
            Update,
            level_intro_input.run_if(in_state(PlayingState::LevelIntro)),
        );
        app.add_systems(OnExit(PlayingState::LevelIntro), despawn_level_intro_ui);

        app.add_systems(
            OnEnter(PlayingState::LevelTransition),
            (despawn_level_entities, advance_level.after(despawn_level_entities)),
        );
        app.add_systems(
            OnEnter(PlayingState::PlayerDeath),
            (despawn_level_entities, restart_level.after(despawn_level_entities)),
        );

        app.add_systems(OnExit(AppState::InGame), despawn_level_entities);
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const WALL_COLOR: Color = Color::srgb(0.35, 0.33, 0.3);
const FLOOR_COLOR: Color = Color::srgb(0.12, 0.11, 0.1);

const TITLE_PREFIX: &str = "title:";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("level has no tiles")]
    Empty,
    #[error("unknown tile character '{ch}' at ({x}, {y})")]
    UnknownTile { ch: char, x: usize, y: usize },
    #[error("no player start ('1') in level")]
    MissingPlayerStart,
    #[error("second player start at ({x}, {y})")]
    MultiplePlayerStarts { x: usize, y: usize },
    #[error("no exit ('H') in level")]
    MissingExit,
}

// ---------------------------------------------------------------------------
// Level objects
// ---------------------------------------------------------------------------

/// What a marker character places on its tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelObject {
    PlayerStart,
    Enemy(EnemyKind),
    WeaponPickup(WeaponType),
    AmmoPickup(WeaponType),
    HealthPickup,
    Exit,
}

impl LevelObject {
    pub fn from_marker(c: char) -> Option<Self> {
        let weapon_at = |i: u8| WeaponType::ALL[i as usize];
        Some(match c {
            '1' => LevelObject::PlayerStart,
            '2' => LevelObject::Enemy(EnemyKind::Guard),
            '3' => LevelObject::Enemy(EnemyKind::Soldier),
            '4' => LevelObject::Enemy(EnemyKind::Officer),
            '5' => LevelObject::Enemy(EnemyKind::Elite),
            '6'..='9' => LevelObject::WeaponPickup(weapon_at(c as u8 - b'6')),
            'A' => LevelObject::WeaponPickup(WeaponType::AssaultRifle),
            'B'..='F' => LevelObject::AmmoPickup(weapon_at(c as u8 - b'B')),
            'G' => LevelObject::HealthPickup,
            'H' => LevelObject::Exit,
            _ => return None,
        })
    }

    pub fn marker(self) -> char {
        match self {
            LevelObject::PlayerStart => '1',
            LevelObject::Enemy(EnemyKind::Guard) => '2',
            LevelObject::Enemy(EnemyKind::Soldier) => '3',
            LevelObject::Enemy(EnemyKind::Officer) => '4',
            LevelObject::Enemy(EnemyKind::Elite) => '5',
            LevelObject::WeaponPickup(w) => (b'6' + w as u8) as char,
            LevelObject::AmmoPickup(w) => (b'B' + w as u8) as char,
            LevelObject::HealthPickup => 'G',
            LevelObject::Exit => 'H',
        }
    }
}

// ---------------------------------------------------------------------------
// Level map resource
// ---------------------------------------------------------------------------

/// The static solid grid of the loaded level and its object markers.
/// Immutable for the lifetime of a level.
#[derive(Resource, Debug, Clone)]
pub struct LevelMap {
    pub title: String,
    pub tile_size: i32,
    /// Indexed `(row, column)`, i.e. `(y, x)`.
    solid: Matrix<bool>,
    solid_rects: Vec<Bounds>,
    /// Row-major, so objects of one type come back in reading order.
    objects: Vec<(char, TilePos)>,
}

impl LevelMap {
    pub fn load(path: impl AsRef<Path>, tile_size: i32) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text, tile_size)
    }

    pub fn parse(text: &str, tile_size: i32) -> Result<Self, LevelError> {
        let mut lines: Vec<&str> = text.lines().collect();
        let title = match lines.first().and_then(|l| l.strip_prefix(TITLE_PREFIX)) {
            Some(rest) => {
                let title = rest.trim().to_string();
                lines.remove(0);
                title
            }
            None => String::new(),
        };
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }

        let rows = lines.len();
        let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if rows == 0 || columns == 0 {
            return Err(LevelError::Empty);
        }

        // Short rows are padded with floor.
        let mut solid = Matrix::new(rows, columns, false);
        let mut solid_rects = Vec::new();
        let mut objects = Vec::new();
        let mut player_start = None;

        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let tile = TilePos::new(x as i32, y as i32);
                match ch {
                    '#' => {
                        solid[(y, x)] = true;
                        solid_rects.push(tile_bounds(tile, tile_size));
                    }
                    '.' | ' ' => {}
                    _ => {
                        let object = LevelObject::from_marker(ch)
                            .ok_or(LevelError::UnknownTile { ch, x, y })?;
                        if object == LevelObject::PlayerStart {
                            if player_start.is_some() {
                                return Err(LevelError::MultiplePlayerStarts { x, y });
                            }
                            player_start = Some(tile);
                        }
                        objects.push((ch, tile));
                    }
                }
            }
        }

        if player_start.is_none() {
            return Err(LevelError::MissingPlayerStart);
        }
        if !objects.iter().any(|(c, _)| *c == LevelObject::Exit.marker()) {
            return Err(LevelError::MissingExit);
        }

        Ok(LevelMap {
            title,
            tile_size,
            solid,
            solid_rects,
            objects,
        })
    }

    pub fn width(&self) -> i32 {
        self.solid.columns as i32
    }

    pub fn height(&self) -> i32 {
        self.solid.rows as i32
    }

    pub fn in_bounds(&self, tile: TilePos) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width() && tile.y < self.height()
    }

    /// Off-grid tiles count as solid.
    pub fn is_solid(&self, tile: TilePos) -> bool {
        if !self.in_bounds(tile) {
            return true;
        }
        self.solid
            .get((tile.y as usize, tile.x as usize))
            .copied()
            .unwrap_or(true)
    }

    pub fn tile_bounds(&self, tile: TilePos) -> Bounds {
        tile_bounds(tile, self.tile_size)
    }

    /// Tile containing a pixel position. May be off-grid.
    pub fn tile_of_point(&self, point: IVec2) -> TilePos {
        TilePos::containing(point, self.tile_size)
    }

    pub fn tile_center(&self, tile: TilePos) -> IVec2 {
        tile.center(self.tile_size)
    }

    /// Rectangles of the solid tiles among the 8 neighbours of `tile`,
    /// including off-grid neighbours.
    pub fn surrounding_solids(&self, tile: TilePos) -> Vec<Bounds> {
        const AROUND: [(i32, i32); 8] = [
            (-1, 0),
            (1, 0),
            (0, -1),
            (0, 1),
            (-1, -1),
            (1, 1),
            (-1, 1),
            (1, -1),
        ];
        AROUND
            .iter()
            .map(|&(dx, dy)| tile.offset(dx, dy))
            .filter(|t| self.is_solid(*t))
            .map(|t| self.tile_bounds(t))
            .collect()
    }

    /// Every in-grid solid tile rectangle. Used for sight lines and
    /// projectiles, never for actor collision.
    pub fn all_solids(&self) -> &[Bounds] {
        &self.solid_rects
    }

    /// Tile rectangles of every object with the given marker, in reading order.
    pub fn objects_of_type(&self, marker: char) -> Vec<Bounds> {
        self.objects
            .iter()
            .filter(|(c, _)| *c == marker)
            .map(|(_, tile)| self.tile_bounds(*tile))
            .collect()
    }

    /// Every placed object, classified.
    pub fn objects(&self) -> impl Iterator<Item = (LevelObject, TilePos)> + '_ {
        self.objects
            .iter()
            .filter_map(|(c, tile)| LevelObject::from_marker(*c).map(|o| (o, *tile)))
    }

    pub fn player_start(&self) -> TilePos {
        self.objects()
            .find(|(o, _)| *o == LevelObject::PlayerStart)
            .map(|(_, tile)| tile)
            .unwrap_or_default()
    }

    /// Pixel size of the whole level.
    pub fn pixel_size(&self) -> IVec2 {
        IVec2::new(self.width(), self.height()) * self.tile_size
    }
}

fn tile_bounds(tile: TilePos, tile_size: i32) -> Bounds {
    Bounds::new(tile.x * tile_size, tile.y * tile_size, tile_size, tile_size)
}

// ---------------------------------------------------------------------------
// Coordinate conversion
// ---------------------------------------------------------------------------

/// Level pixel space (origin top-left, Y down) to world space (Y up).
pub fn level_to_world(point: IVec2) -> Vec2 {
    Vec2::new(point.x as f32, -(point.y as f32))
}

// ---------------------------------------------------------------------------
// Marker components
// ---------------------------------------------------------------------------

/// Marker for entities that belong to the current level (despawned on level change).
#[derive(Component, Debug)]
pub struct LevelEntity;

#[derive(Component)]
pub struct LevelIntroUI;

#[derive(Resource, Deref, DerefMut)]
pub struct LevelIntroTimer(pub Timer);

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Load the current level file, spawn its tiles and insert `LevelMap`.
/// A broken level file ends the app.
pub fn load_level(
    mut commands: Commands,
    config: Res<GameConfig>,
    level: Res<CurrentLevel>,
    mut exit: MessageWriter<AppExit>,
) {
    span_scope!("level_load");
    let path = config.level_path(level.0);
    let map = match LevelMap::load(&path, config.tile_size) {
        Ok(map) => map,
        Err(e) => {
            error!("level load failed: {e}");
            exit.write(AppExit::error());
            return;
        }
    };

    let size = map.pixel_size();
    commands.spawn((
        LevelEntity,
        Sprite::from_color(FLOOR_COLOR, size.as_vec2()),
        Transform::from_translation(level_to_world(size / 2).extend(0.0)),
    ));
    let tile = Vec2::splat(map.tile_size as f32);
    for bounds in map.all_solids() {
        commands.spawn((
            Wall,
            LevelEntity,
            Sprite::from_color(WALL_COLOR, tile),
            Transform::from_translation(level_to_world(bounds.center()).extend(1.0)),
        ));
    }

    info!(
        "level loaded: {} '{}' ({}x{}, {} solids)",
        path,
        map.title,
        map.width(),
        map.height(),
        map.all_solids().len()
    );
    commands.insert_resource(LevelTitle(map.title.clone()));
    commands.insert_resource(map);
}

/// Show the level number and title until Enter or the timer runs out.
fn show_level_intro(
    mut commands: Commands,
    level: Res<CurrentLevel>,
    title: Option<Res<LevelTitle>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    let title = title.map(|t| t.0.clone()).unwrap_or_default();
    if let Ok(mut window) = windows.single_mut() {
        window.title = if title.is_empty() {
            "Bunker Assault".to_string()
        } else {
            format!("Bunker Assault - {title}")
        };
    }

    commands.insert_resource(LevelIntroTimer(Timer::from_seconds(2.0, TimerMode::Once)));

    commands
        .spawn((
            LevelIntroUI,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(format!("Level {}", level.0)),
                TextColor(Color::srgb(0.9, 0.2, 0.2)),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
            ));
            parent.spawn((
                Text::new(title),
                TextColor(Color::srgb(0.85, 0.85, 0.85)),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
            ));
            parent.spawn((
                Text::new("Press Enter to begin"),
                TextColor(Color::srgb(0.6, 0.6, 0.6)),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
            ));
        });
}

fn level_intro_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    timer: Option<ResMut<LevelIntroTimer>>,
    mut next_state: ResMut<NextState<PlayingState>>,
) {
    let Some(mut timer) = timer else { return };
    timer.tick(time.delta());
    if timer.just_finished() || keyboard.just_pressed(KeyCode::Enter) {
        next_state.set(PlayingState::Playing);
    }
}

fn despawn_level_intro_ui(mut commands: Commands, query: Query<Entity, With<LevelIntroUI>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<LevelIntroTimer>();
}

/// Despawn everything spawned for the current level and drop its map.
fn despawn_level_entities(mut commands: Commands, query: Query<Entity, With<LevelEntity>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<LevelMap>();
}

/// Move on to the next level file, or back to the menu after the last one.
fn advance_level(
    config: Res<GameConfig>,
    mut level: ResMut<CurrentLevel>,
    mut stats: ResMut<GameStats>,
    mut next_playing: ResMut<NextState<PlayingState>>,
    mut next_app: ResMut<NextState<AppState>>,
) {
    stats.levels_cleared += 1;
    let next = level.0 + 1;
    if Path::new(&config.level_path(next)).exists() {
        info!("advancing to level {next}");
        level.0 = next;
        next_playing.set(PlayingState::LevelIntro);
    } else {
        info!("last level cleared after {} levels", stats.levels_cleared);
        next_app.set(AppState::MainMenu);
    }
}

fn restart_level(level: Res<CurrentLevel>, mut next_state: ResMut<NextState<PlayingState>>) {
    info!("restarting level {}", level.0);
    next_state.set(PlayingState::LevelIntro);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
