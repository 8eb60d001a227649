// src/game/config.rs
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

const CONFIG_PATH: &str = "assets/config.json";

// Tunables for a session. The game has no CLI surface; everything runs on
// these defaults unless an assets/config.json overrides them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub window_title: String,
    // Logic ticks per second
    pub tick_rate: u32,
    // Pixels the player moves per tick while a key is held
    pub player_speed: f32,
    // Base enemy speed in pixels per tick, before the level multiplier
    pub enemy_speed: f32,
    // The player is pinned at window_height - bottom_margin
    pub bottom_margin: f32,
    // Enemies reverse at left_margin and window_width - right_margin
    pub left_margin: f32,
    pub right_margin: f32,
    // How long the final win/lose frame stays on screen
    pub end_hold_seconds: f32,
    pub assets_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 800,
            window_title: "Cross Da Road".to_string(),
            tick_rate: 60,
            player_speed: 10.0,
            enemy_speed: 10.0,
            bottom_margin: 40.0,
            left_margin: 20.0,
            right_margin: 40.0,
            end_hold_seconds: 1.0,
            assets_dir: PathBuf::from("assets"),
        }
    }
}

// Read the optional config file. A missing file means defaults; a file that
// exists but fails to parse is a startup error.
pub fn load_config() -> anyhow::Result<GameConfig> {
    let path = Path::new(CONFIG_PATH);
    if !path.exists() {
        return Ok(GameConfig::default());
    }
    let file = File::open(path).with_context(|| format!("failed to open {CONFIG_PATH}"))?;
    let reader = BufReader::new(file);
    let config =
        serde_json::from_reader(reader).with_context(|| format!("failed to parse {CONFIG_PATH}"))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_scenario() {
        let config = GameConfig::default();
        assert_eq!(config.window_width, 800);
        assert_eq!(config.window_height, 800);
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.player_speed, 10.0);
        assert_eq!(config.enemy_speed, 10.0);
        assert_eq!(config.bottom_margin, 40.0);
        assert_eq!(config.left_margin, 20.0);
        assert_eq!(config.right_margin, 40.0);
        assert_eq!(config.end_hold_seconds, 1.0);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"enemy_speed": 12.5, "window_title": "Test"}"#).unwrap();
        assert_eq!(config.enemy_speed, 12.5);
        assert_eq!(config.window_title, "Test");
        assert_eq!(config.player_speed, 10.0);
        assert_eq!(config.window_width, 800);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config: GameConfig = serde_json::from_str(r#"{"does_not_exist": 1}"#).unwrap();
        assert_eq!(config.window_width, 800);
    }
}
