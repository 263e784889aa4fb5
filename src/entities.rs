/// Game entity types and their self-contained behaviour.
///
/// Every entity owns an axis-aligned [`Rect`] in logical canvas pixels and a
/// liveness flag. Collections drop dead entities before the frame ends.

use crossterm::style::Color;

use crate::config::Config;
use crate::input::Controls;

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(cx: i32, cy: i32, w: i32, h: i32) -> Self {
        Self::new(cx - w / 2, cy - h / 2, w, h)
    }

    pub fn from_midbottom(cx: i32, bottom: i32, w: i32, h: i32) -> Self {
        Self::new(cx - w / 2, bottom - h, w, h)
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    /// Strict overlap: rectangles that merely share an edge do not collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

// ── Sizes (logical pixels) ────────────────────────────────────────────────────

pub const PLAYER_SIZE: (i32, i32) = (60, 32);
pub const ALIEN_SIZE: (i32, i32) = (40, 32);
pub const EXTRA_SIZE: (i32, i32) = (48, 24);
pub const LASER_SIZE: (i32, i32) = (4, 20);

// ── Lasers ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaserOwner {
    Player,
    Alien,
}

#[derive(Clone, Debug)]
pub struct Laser {
    pub owner: LaserOwner,
    pub rect: Rect,
    /// Signed vertical speed; negative travels up.
    pub velocity: i32,
    pub alive: bool,
}

impl Laser {
    pub fn new(owner: LaserOwner, cx: i32, cy: i32, velocity: i32) -> Self {
        Self {
            owner,
            rect: Rect::from_center(cx, cy, LASER_SIZE.0, LASER_SIZE.1),
            velocity,
            alive: true,
        }
    }

    /// Advance one frame; dies once fully outside the play area vertically.
    pub fn update(&mut self, canvas_height: i32) {
        self.rect.y += self.velocity;
        if self.rect.bottom() <= 0 || self.rect.y >= canvas_height {
            self.alive = false;
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    pub lives: u32,
    /// False while the laser is recharging.
    pub ready: bool,
    /// Clock reading of the last shot.
    pub fired_at_ms: u64,
    pub lasers: Vec<Laser>,
    speed: i32,
    laser_speed: i32,
    cooldown_ms: u64,
    x_range: (i32, i32),
}

impl Player {
    /// Craft standing on the bottom edge, centred horizontally.
    pub fn new(config: &Config) -> Self {
        Self {
            rect: Rect::from_midbottom(
                config.canvas_width / 2,
                config.canvas_height,
                PLAYER_SIZE.0,
                PLAYER_SIZE.1,
            ),
            lives: config.lives,
            ready: true,
            fired_at_ms: 0,
            lasers: Vec::new(),
            speed: config.player_speed,
            laser_speed: config.laser_speed,
            cooldown_ms: config.laser_cooldown_ms,
            x_range: (0, config.canvas_width),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// Lose one life. Returns whether the player survives.
    pub fn take_hit(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.is_alive()
    }

    pub fn update(&mut self, controls: &Controls, now_ms: u64, canvas_height: i32) {
        self.recharge(now_ms);

        if controls.right {
            self.rect.x += self.speed;
        }
        if controls.left {
            self.rect.x -= self.speed;
        }
        self.clamp_to_range();

        if controls.fire && self.ready {
            self.shoot(now_ms);
        }

        for laser in &mut self.lasers {
            laser.update(canvas_height);
        }
        self.lasers.retain(|l| l.alive);
    }

    fn clamp_to_range(&mut self) {
        if self.rect.x <= self.x_range.0 {
            self.rect.x = self.x_range.0;
        }
        if self.rect.right() >= self.x_range.1 {
            self.rect.x = self.x_range.1 - self.rect.w;
        }
    }

    fn shoot(&mut self, now_ms: u64) {
        self.lasers.push(Laser::new(
            LaserOwner::Player,
            self.rect.center_x(),
            self.rect.y,
            -self.laser_speed,
        ));
        self.ready = false;
        self.fired_at_ms = now_ms;
    }

    fn recharge(&mut self, now_ms: u64) {
        if !self.ready && now_ms.saturating_sub(self.fired_at_ms) > self.cooldown_ms {
            self.ready = true;
        }
    }
}

// ── Aliens ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Alien {
    pub rect: Rect,
    /// Points awarded when shot.
    pub value: u32,
    pub alive: bool,
}

impl Alien {
    pub fn new(x: i32, y: i32, value: u32) -> Self {
        Self {
            rect: Rect::new(x, y, ALIEN_SIZE.0, ALIEN_SIZE.1),
            value,
            alive: true,
        }
    }

    /// Top row is worth most, the next two rows less, the rest least.
    pub fn value_for_row(row: usize) -> u32 {
        match row {
            0 => 300,
            1..=2 => 200,
            _ => 100,
        }
    }

    pub fn move_down(&mut self, offset: i32) {
        self.rect.y += offset;
    }

    pub fn shift(&mut self, direction: i32, speed: i32) {
        self.rect.x += direction * speed;
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

pub const BLOCK_COLOR: Color = Color::Rgb { r: 241, g: 79, b: 80 };

/// Each `x` becomes one destructible block.
pub const OBSTACLE_SHAPE: [&str; 7] = [
    "  xxxxxx  ",
    " xxxxxxxx ",
    " xxxxxxxx ",
    "xxxxxxxxxx",
    "xxxxxxxxxx",
    "xxx    xxx",
    "xx      xx",
];

#[derive(Clone, Debug)]
pub struct Block {
    pub rect: Rect,
    pub color: Color,
    pub alive: bool,
}

impl Block {
    pub fn new(size: i32, x: i32, y: i32) -> Self {
        Self {
            rect: Rect::new(x, y, size, size),
            color: BLOCK_COLOR,
            alive: true,
        }
    }
}

/// Stamps [`OBSTACLE_SHAPE`] into a block collection.
#[derive(Clone, Copy, Debug)]
pub struct Obstacle {
    pub block_size: i32,
}

impl Obstacle {
    pub fn new(block_size: i32) -> Self {
        Self { block_size }
    }

    pub fn create(&self, blocks: &mut Vec<Block>, x_start: i32, y_start: i32) {
        for (row_index, row) in OBSTACLE_SHAPE.iter().enumerate() {
            for (col_index, cell) in row.chars().enumerate() {
                if cell == 'x' {
                    let x = x_start + col_index as i32 * self.block_size;
                    let y = y_start + row_index as i32 * self.block_size;
                    blocks.push(Block::new(self.block_size, x, y));
                }
            }
        }
    }

    /// One obstacle per `(x, y)` pair; extra coordinates on either side are ignored.
    pub fn create_many(&self, blocks: &mut Vec<Block>, xs: &[i32], ys: &[i32]) {
        for (&x, &y) in xs.iter().zip(ys) {
            self.create(blocks, x, y);
        }
    }

    pub fn blocks_per_obstacle() -> usize {
        OBSTACLE_SHAPE
            .iter()
            .map(|row| row.chars().filter(|&c| c == 'x').count())
            .sum()
    }
}

// ── Extra ─────────────────────────────────────────────────────────────────────

pub const EXTRA_VALUE: u32 = 500;
const EXTRA_SPAWN_MARGIN: i32 = 50;
const EXTRA_ROW_Y: i32 = 60;

/// Edge an extra enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct Extra {
    pub rect: Rect,
    /// Signed horizontal speed, pointing away from the spawn edge.
    pub speed: i32,
    pub value: u32,
    pub alive: bool,
}

impl Extra {
    pub fn new(side: Side, canvas_width: i32, speed: i32) -> Self {
        let (x, speed) = match side {
            Side::Left => (-EXTRA_SPAWN_MARGIN, speed.abs()),
            Side::Right => (canvas_width + EXTRA_SPAWN_MARGIN, -speed.abs()),
        };
        Self {
            rect: Rect::new(x, EXTRA_ROW_Y, EXTRA_SIZE.0, EXTRA_SIZE.1),
            speed,
            value: EXTRA_VALUE,
            alive: true,
        }
    }

    pub fn update(&mut self) {
        self.rect.x += self.speed;
    }

    /// True once the extra has fully left through the edge opposite its spawn.
    pub fn has_exited(&self, canvas_width: i32) -> bool {
        if self.speed > 0 {
            self.rect.x >= canvas_width
        } else {
            self.rect.right() <= 0
        }
    }
}
