//! Stage configuration resource.
//!
//! Tunables for stage geometry, player physics and hitbox composition,
//! loaded from an INI file. Defaults are used for anything missing, so a
//! stage always starts even without a config file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [stage]
//! tile_size = 30
//! width = 1200
//! height = 720
//!
//! [player]
//! max_speed = 3.0
//! gravity = 9.8
//! jump_power = -3.0
//! min_scale = 0.5
//!
//! [composer]
//! tile_point_epsilon = 2.0
//! line_epsilon = 0.00001
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_TILE_SIZE: f64 = 30.0;
const DEFAULT_WIDTH: u32 = 1200;
const DEFAULT_HEIGHT: u32 = 720;
const DEFAULT_MAX_SPEED: f64 = 3.0;
const DEFAULT_GRAVITY: f64 = 9.8;
const DEFAULT_JUMP_POWER: f64 = -3.0;
const DEFAULT_MIN_PLAYER_SCALE: f64 = 0.5;
const DEFAULT_TILE_POINT_EPSILON: f64 = 2.0;
const DEFAULT_LINE_EPSILON: f64 = 0.00001;
const DEFAULT_CONFIG_PATH: &str = "./stage.ini";

/// Stage configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct StageConfig {
    /// Edge length of one tile in world units.
    pub tile_size: f64,
    /// Playable area width; the stage root sits at its centre.
    pub width: u32,
    /// Playable area height.
    pub height: u32,
    /// Horizontal speed cap (world units per update).
    pub player_max_speed: f64,
    /// Vertical speed gained per second of falling.
    pub player_gravity: f64,
    /// Vertical speed set by a jump (negative is up).
    pub player_jump_power: f64,
    /// A player whose world scale drops below this is out of the round.
    pub min_player_scale: f64,
    /// Point epsilon when simplifying a piece's fused tiles.
    pub tile_point_epsilon: f64,
    /// Line epsilon for every simplification pass.
    pub line_epsilon: f64,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StageConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            player_max_speed: DEFAULT_MAX_SPEED,
            player_gravity: DEFAULT_GRAVITY,
            player_jump_power: DEFAULT_JUMP_POWER,
            min_player_scale: DEFAULT_MIN_PLAYER_SCALE,
            tile_point_epsilon: DEFAULT_TILE_POINT_EPSILON,
            line_epsilon: DEFAULT_LINE_EPSILON,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        let float = |section: &str, key: &str| config.getfloat(section, key).ok().flatten();

        // [stage] section
        if let Some(tile_size) = float("stage", "tile_size") {
            self.tile_size = tile_size;
        }
        if let Some(width) = config.getuint("stage", "width").ok().flatten() {
            self.width = width as u32;
        }
        if let Some(height) = config.getuint("stage", "height").ok().flatten() {
            self.height = height as u32;
        }

        // [player] section
        if let Some(max_speed) = float("player", "max_speed") {
            self.player_max_speed = max_speed;
        }
        if let Some(gravity) = float("player", "gravity") {
            self.player_gravity = gravity;
        }
        if let Some(jump_power) = float("player", "jump_power") {
            self.player_jump_power = jump_power;
        }
        if let Some(min_scale) = float("player", "min_scale") {
            self.min_player_scale = min_scale;
        }

        // [composer] section
        if let Some(eps) = float("composer", "tile_point_epsilon") {
            self.tile_point_epsilon = eps;
        }
        if let Some(eps) = float("composer", "line_epsilon") {
            self.line_epsilon = eps;
        }

        info!(
            "Loaded config: tile={} area={}x{} speed={} gravity={} jump={}",
            self.tile_size,
            self.width,
            self.height,
            self.player_max_speed,
            self.player_gravity,
            self.player_jump_power
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("stage", "tile_size", Some(self.tile_size.to_string()));
        config.set("stage", "width", Some(self.width.to_string()));
        config.set("stage", "height", Some(self.height.to_string()));

        config.set("player", "max_speed", Some(self.player_max_speed.to_string()));
        config.set("player", "gravity", Some(self.player_gravity.to_string()));
        config.set("player", "jump_power", Some(self.player_jump_power.to_string()));
        config.set("player", "min_scale", Some(self.min_player_scale.to_string()));

        config.set(
            "composer",
            "tile_point_epsilon",
            Some(self.tile_point_epsilon.to_string()),
        );
        config.set("composer", "line_epsilon", Some(self.line_epsilon.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Playable area size in world units.
    pub fn area_size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("shardstage-{}-{}.ini", name, std::process::id()))
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let mut config = StageConfig::with_path(temp_path("missing"));
        assert!(config.load_from_file().is_err());
        assert_eq!(config.tile_size, DEFAULT_TILE_SIZE);
    }

    #[test]
    fn saved_values_load_back() {
        let path = temp_path("saved");
        let mut config = StageConfig::with_path(&path);
        config.tile_size = 24.0;
        config.player_gravity = 12.5;
        config.width = 960;
        config.save_to_file().unwrap();

        let mut loaded = StageConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn partial_file_only_overrides_present_keys() {
        let path = temp_path("partial");
        std::fs::write(&path, "[player]\njump_power = -4.5\n").unwrap();

        let mut config = StageConfig::with_path(&path);
        config.load_from_file().unwrap();
        assert_eq!(config.player_jump_power, -4.5);
        assert_eq!(config.player_max_speed, DEFAULT_MAX_SPEED);
        let _ = std::fs::remove_file(path);
    }
}
