/// Game configuration: every tunable the simulation reads.
///
/// Built once at startup (defaults, optionally overlaid by a JSON file and
/// command-line flags) and then only ever borrowed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // ── Logical canvas ───────────────────────────────────────────────────────
    pub canvas_width: i32,
    pub canvas_height: i32,

    /// Frames per second the driver paces itself to.
    pub framerate: u32,

    // ── Motion (pixels per frame) ────────────────────────────────────────────
    pub player_speed: i32,
    pub alien_speed: i32,
    /// Vertical push applied to the whole wave on every edge bounce.
    pub alien_drop: i32,
    pub extra_speed: i32,
    pub laser_speed: i32,
    pub alien_laser_speed: i32,

    // ── Timing (milliseconds) ────────────────────────────────────────────────
    pub laser_cooldown_ms: u64,
    pub alien_fire_interval_ms: u64,
    pub extra_spawn_min_ms: u64,
    pub extra_spawn_max_ms: u64,

    // ── Episode ──────────────────────────────────────────────────────────────
    pub lives: u32,
    pub wave_rows: usize,
    pub wave_cols: usize,

    // ── Persistence ──────────────────────────────────────────────────────────
    pub leaderboard_cap: usize,
    pub save_file: PathBuf,
    pub player_name: String,

    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_width: 600,
            canvas_height: 600,
            framerate: 60,
            player_speed: 5,
            alien_speed: 2,
            alien_drop: 1,
            extra_speed: 2,
            laser_speed: 5,
            alien_laser_speed: 3,
            laser_cooldown_ms: 600,
            alien_fire_interval_ms: 800,
            extra_spawn_min_ms: 4_000,
            extra_spawn_max_ms: 8_000,
            lives: 3,
            wave_rows: 6,
            wave_cols: 8,
            leaderboard_cap: 10,
            save_file: PathBuf::from("save.json"),
            player_name: "player".to_string(),
            seed: None,
        }
    }
}

impl Config {
    /// Read a JSON config file; absent keys fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width <= 0 || self.canvas_height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.framerate == 0 {
            return Err(ConfigError::Invalid("framerate must be at least 1".into()));
        }
        if self.extra_spawn_min_ms > self.extra_spawn_max_ms {
            return Err(ConfigError::Invalid(format!(
                "extra spawn window is inverted: {}ms > {}ms",
                self.extra_spawn_min_ms, self.extra_spawn_max_ms
            )));
        }
        if self.wave_rows == 0 || self.wave_cols == 0 {
            return Err(ConfigError::Invalid("alien wave needs at least one row and column".into()));
        }
        if self.lives == 0 {
            return Err(ConfigError::Invalid("lives must be at least 1".into()));
        }
        let speeds = [
            ("player_speed", self.player_speed),
            ("alien_speed", self.alien_speed),
            ("extra_speed", self.extra_speed),
            ("laser_speed", self.laser_speed),
            ("alien_laser_speed", self.alien_laser_speed),
        ];
        if let Some((name, value)) = speeds.iter().find(|(_, v)| *v <= 0) {
            return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
        }
        if self.alien_drop < 0 {
            return Err(ConfigError::Invalid(format!(
                "alien_drop must not be negative, got {}",
                self.alien_drop
            )));
        }
        if self.leaderboard_cap == 0 {
            return Err(ConfigError::Invalid("leaderboard_cap must be at least 1".into()));
        }
        Ok(())
    }

    /// Duration of one frame at the configured rate.
    pub fn frame_budget(&self) -> std::time::Duration {
        std::time::Duration::from_micros(1_000_000 / u64::from(self.framerate.max(1)))
    }
}
