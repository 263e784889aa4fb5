/// The playing field: player, alien wave, obstacles and the bonus extra.
///
/// Per frame: handle events, move everything, check the win condition,
/// resolve collisions, then pick at most one state transition.

use rand::Rng;
use tracing::info;

use crate::canvas::{Anchor, Canvas, Sprite, TEXT_COLOR};
use crate::config::Config;
use crate::entities::{Block, Extra, Obstacle, Player, Rect, Side, PLAYER_SIZE};
use crate::game::Context;
use crate::input::{FrameInput, GameEvent, Key};
use crate::states::{EndScreen, PauseMenu, State, Transition};
use crate::timers::TimerId;
use crate::wave::AlienWave;

pub const OBSTACLE_BLOCK_SIZE: i32 = 5;
pub const OBSTACLE_XS: [i32; 3] = [75, 225, 375];

const SCORE_POS: (i32, i32) = (10, 4);
const LIVES_Y: i32 = 8;
const LIVES_GAP: i32 = 10;

#[derive(Clone, Debug)]
pub struct GameWorld {
    pub obstacles: Vec<Block>,
    pub player: Player,
    pub wave: AlienWave,
    /// At most one extra crosses the screen at a time.
    pub extra: Option<Extra>,
    pub go_to_pause: bool,
    pub go_to_fail: bool,
    pub go_to_win: bool,
}

impl GameWorld {
    /// A fresh episode: score reset, entities rebuilt, timers armed.
    pub fn new(ctx: &mut Context) -> Self {
        let world = Self::build(&ctx.config);
        world.begin_episode(ctx);
        world
    }

    fn build(config: &Config) -> Self {
        let mut obstacles = Vec::new();
        let ys = vec![3 * config.canvas_height / 4; OBSTACLE_XS.len()];
        Obstacle::new(OBSTACLE_BLOCK_SIZE).create_many(&mut obstacles, &OBSTACLE_XS, &ys);

        let mut wave = AlienWave::new(config);
        wave.create(config.wave_rows, config.wave_cols);

        Self {
            obstacles,
            player: Player::new(config),
            wave,
            extra: None,
            go_to_pause: false,
            go_to_fail: false,
            go_to_win: false,
        }
    }

    /// Back to a fresh episode after a loss, a win or a restart from pause.
    pub fn reset(&mut self, ctx: &mut Context) {
        *self = Self::build(&ctx.config);
        self.begin_episode(ctx);
    }

    fn begin_episode(&self, ctx: &mut Context) {
        ctx.reset_score();
        let now = ctx.now_ms();
        ctx.timers.arm(TimerId::AlienFire, ctx.config.alien_fire_interval_ms, now);
        let extra_in = ctx.rng.gen_range(ctx.config.extra_spawn_min_ms..=ctx.config.extra_spawn_max_ms);
        ctx.timers.arm(TimerId::ExtraSpawn, extra_in, now);

        info!(
            aliens = self.wave.aliens.len(),
            blocks = self.obstacles.len(),
            lives = self.player.lives,
            "episode started"
        );
    }

    pub fn update(&mut self, input: &FrameInput, ctx: &mut Context) -> Transition {
        for event in &input.events {
            match event {
                GameEvent::KeyDown(Key::Cancel) => self.go_to_pause = true,
                GameEvent::AlienFire => self.wave.shoot_laser(&mut ctx.rng),
                GameEvent::ExtraSpawn => self.spawn_extra(ctx),
                GameEvent::Quit => return Transition::Quit,
                GameEvent::KeyDown(_) => {}
            }
        }

        let (width, height) = (ctx.config.canvas_width, ctx.config.canvas_height);
        self.wave.update();
        if let Some(extra) = self.extra.as_mut() {
            extra.update();
            if extra.has_exited(width) {
                self.extra = None;
            }
        }
        self.player.update(&input.controls, ctx.now_ms(), height);

        if !self.wave.still_remaining() {
            self.go_to_win = true;
        }

        self.check_collisions(ctx);
        self.transition(ctx)
    }

    fn spawn_extra(&mut self, ctx: &mut Context) {
        let side = if ctx.rng.gen_bool(0.5) { Side::Right } else { Side::Left };
        self.extra = Some(Extra::new(side, ctx.config.canvas_width, ctx.config.extra_speed));

        let next = ctx.rng.gen_range(ctx.config.extra_spawn_min_ms..=ctx.config.extra_spawn_max_ms);
        let now = ctx.now_ms();
        ctx.timers.arm(TimerId::ExtraSpawn, next, now);
    }

    /// Every laser acts on at most one target group per frame; obstacles are
    /// checked before aliens, aliens before the extra.
    pub fn check_collisions(&mut self, ctx: &mut Context) {
        // ── Player lasers ────────────────────────────────────────────────────
        for laser in &mut self.player.lasers {
            if hit_blocks(&laser.rect, &mut self.obstacles) {
                laser.alive = false;
                continue;
            }

            let mut gained = 0;
            for alien in self.wave.aliens.iter_mut().filter(|a| a.alive) {
                if alien.rect.intersects(&laser.rect) {
                    alien.alive = false;
                    gained += alien.value;
                    laser.alive = false;
                }
            }
            if !laser.alive {
                ctx.add_score(gained);
                continue;
            }

            if let Some(extra) = self.extra.as_mut().filter(|e| e.alive) {
                if extra.rect.intersects(&laser.rect) {
                    extra.alive = false;
                    laser.alive = false;
                    ctx.add_score(extra.value);
                }
            }
        }
        self.player.lasers.retain(|l| l.alive);
        self.wave.aliens.retain(|a| a.alive);
        if self.extra.as_ref().is_some_and(|e| !e.alive) {
            self.extra = None;
        }

        // ── Aliens ───────────────────────────────────────────────────────────
        for alien in &self.wave.aliens {
            hit_blocks(&alien.rect, &mut self.obstacles);
            if alien.rect.intersects(&self.player.rect) {
                self.go_to_fail = true;
            }
        }

        // ── Alien lasers ─────────────────────────────────────────────────────
        for laser in &mut self.wave.lasers {
            if hit_blocks(&laser.rect, &mut self.obstacles) {
                laser.alive = false;
                continue;
            }
            if laser.rect.intersects(&self.player.rect) {
                laser.alive = false;
                if !self.player.take_hit() {
                    self.go_to_fail = true;
                }
            }
        }
        self.wave.lasers.retain(|l| l.alive);
        self.obstacles.retain(|b| b.alive);
    }

    /// Failure outranks pausing, pausing outranks winning.
    fn transition(&mut self, ctx: &mut Context) -> Transition {
        if self.go_to_fail {
            self.go_to_fail = false;
            info!(score = ctx.score, "episode lost");
            ctx.persist_score();
            self.obstacles.clear();
            self.wave.clear();
            Transition::Push(State::FailedMenu(EndScreen::failed()))
        } else if self.go_to_pause {
            self.go_to_pause = false;
            Transition::Push(State::PauseMenu(PauseMenu::new(&ctx.config)))
        } else if self.go_to_win {
            self.go_to_win = false;
            info!(score = ctx.score, "episode won");
            Transition::Push(State::WinState(EndScreen::won()))
        } else {
            Transition::None
        }
    }

    /// Foreground only; the caller lays down the background first.
    pub fn render(&self, canvas: &mut Canvas, ctx: &Context) {
        for block in &self.obstacles {
            canvas.fill(block.rect, block.color);
        }
        for alien in &self.wave.aliens {
            canvas.sprite(Sprite::Alien(alien.value), alien.rect);
        }
        for laser in &self.wave.lasers {
            canvas.sprite(Sprite::AlienLaser, laser.rect);
        }
        if let Some(extra) = &self.extra {
            canvas.sprite(Sprite::Extra, extra.rect);
        }
        canvas.text(
            format!("score: {}", ctx.score),
            TEXT_COLOR,
            SCORE_POS.0,
            SCORE_POS.1,
            Anchor::TopLeft,
        );
        self.render_lives(canvas, ctx.config.canvas_width);
        canvas.sprite(Sprite::Player, self.player.rect);
        for laser in &self.player.lasers {
            canvas.sprite(Sprite::PlayerLaser, laser.rect);
        }
    }

    /// One icon per life beyond the current one, right-aligned.
    fn render_lives(&self, canvas: &mut Canvas, canvas_width: i32) {
        let (w, h) = PLAYER_SIZE;
        let x_offset = canvas_width - (w * 2 + 20);
        for life in 0..self.player.lives.saturating_sub(1) as i32 {
            let x = x_offset + life * (w + LIVES_GAP);
            canvas.sprite(Sprite::LifeIcon, Rect::new(x, LIVES_Y, w, h));
        }
    }
}

/// Destroy every live block overlapping `rect`. Returns whether any was hit.
fn hit_blocks(rect: &Rect, blocks: &mut [Block]) -> bool {
    let mut hit = false;
    for block in blocks.iter_mut().filter(|b| b.alive) {
        if block.rect.intersects(rect) {
            block.alive = false;
            hit = true;
        }
    }
    hit
}
