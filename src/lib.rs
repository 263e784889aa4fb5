pub mod canvas;
pub mod clock;
pub mod config;
pub mod entities;
pub mod error;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod menu;
pub mod states;
pub mod timers;
pub mod wave;
pub mod world;

pub use config::Config;
pub use game::{Context, Game};
