/// The game driver: owns the state stack and everything shared across states.
///
/// One call to [`Game::update`] per frame feeds the active state; one call to
/// [`Game::render`] produces the frame's canvas without touching game state.

use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::canvas::Canvas;
use crate::clock::Clock;
use crate::config::Config;
use crate::input::{FrameInput, GameEvent};
use crate::leaderboard::Leaderboard;
use crate::states::{MainMenu, State, StateStack};
use crate::timers::Timers;

/// Shared, driver-owned data every state may read or mutate during update.
pub struct Context {
    pub config: Config,
    /// Points collected in the current episode.
    pub score: u32,
    pub leaderboard: Leaderboard,
    pub timers: Timers,
    pub rng: StdRng,
    clock: Box<dyn Clock>,
}

impl Context {
    pub fn new(config: &Config, clock: Box<dyn Clock>, rng: StdRng) -> Self {
        Self {
            config: config.clone(),
            score: 0,
            leaderboard: Leaderboard::new(config.save_file.clone(), config.leaderboard_cap),
            timers: Timers::default(),
            rng,
            clock,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    pub fn add_score(&mut self, value: u32) {
        self.score += value;
    }

    /// Write the current score under the configured player name. Failures are
    /// logged and otherwise ignored so the frame loop keeps running.
    pub fn persist_score(&mut self) {
        let name = self.config.player_name.clone();
        if let Err(err) = self.leaderboard.save(&name, self.score) {
            warn!(error = %err, score = self.score, "score not persisted");
        }
    }
}

/// A frame slower than this many budgets counts as a hitch.
pub const HITCH_FACTOR: f32 = 2.0;

pub struct Game {
    stack: StateStack,
    ctx: Context,
    running: bool,
    frame: u64,
    hitches: u64,
}

impl Game {
    /// Start at the main menu.
    pub fn new(config: &Config, clock: Box<dyn Clock>, rng: StdRng) -> Self {
        Self {
            stack: StateStack::new(State::MainMenu(MainMenu::new(config))),
            ctx: Context::new(config, clock, rng),
            running: true,
            frame: 0,
            hitches: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frames that took more than [`HITCH_FACTOR`] times the frame budget.
    pub fn hitches(&self) -> u64 {
        self.hitches
    }

    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut StateStack {
        &mut self.stack
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    /// Advance one frame. Due timers are appended to the frame's events.
    pub fn update(&mut self, mut input: FrameInput) {
        if !self.running {
            return;
        }
        self.frame += 1;
        let budget = self.ctx.config.frame_budget().as_secs_f32();
        if input.dt > budget * HITCH_FACTOR {
            self.hitches += 1;
            debug!(
                frame = self.frame,
                dt_ms = input.dt * 1_000.0,
                budget_ms = budget * 1_000.0,
                "frame hitch"
            );
        }
        let fired = self.ctx.timers.poll(self.ctx.now_ms());
        if !fired.is_empty() {
            debug!(frame = self.frame, ?fired, "timers fired");
        }
        input.events.extend(fired);

        if input.events.contains(&GameEvent::Quit) {
            debug!(frame = self.frame, state = self.stack.top().name(), "quit requested");
        }
        self.running = self.stack.update(&input, &mut self.ctx);
    }

    pub fn render(&self) -> Canvas {
        let mut canvas = Canvas::new(self.ctx.config.canvas_width, self.ctx.config.canvas_height);
        self.stack.render(&mut canvas, &self.ctx);
        canvas
    }
}
