pub mod audio;
pub mod camera;
pub mod combat;
pub mod enemies;
pub mod hud;
pub mod level;
pub mod menu;
pub mod movement;
pub mod navigation;
pub mod pickups;
pub mod player;
pub mod telemetry;
