use std::fs;
use std::time::Duration;

use space_invaders::config::Config;
use space_invaders::error::ConfigError;

#[test]
fn defaults_are_valid() {
    let config = Config::default();
    config.validate().unwrap();
    assert_eq!((config.canvas_width, config.canvas_height), (600, 600));
    assert_eq!(config.frame_budget(), Duration::from_micros(16_666));
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "lives": 5, "player_name": "ann", "seed": 7 }"#).unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.lives, 5);
    assert_eq!(config.player_name, "ann");
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.alien_fire_interval_ms, 800);
    assert_eq!(config.wave_rows, 6);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ lives: ").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        Config { canvas_width: 0, ..Config::default() },
        Config { framerate: 0, ..Config::default() },
        Config { extra_spawn_min_ms: 9_000, ..Config::default() },
        Config { wave_cols: 0, ..Config::default() },
        Config { lives: 0, ..Config::default() },
        Config { player_speed: 0, ..Config::default() },
        Config { alien_speed: -2, ..Config::default() },
        Config { alien_speed: 0, ..Config::default() },
        Config { extra_speed: 0, ..Config::default() },
        Config { laser_speed: 0, ..Config::default() },
        Config { alien_laser_speed: 0, ..Config::default() },
        Config { alien_drop: -1, ..Config::default() },
        Config { leaderboard_cap: 0, ..Config::default() },
    ];
    for config in cases {
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}

#[test]
fn load_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "lives": 0 }"#).unwrap();
    assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));
}
