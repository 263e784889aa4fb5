/// The alien wave: a grid of aliens sharing one horizontal direction, plus
/// the lasers they fire.

use rand::Rng;

use crate::config::Config;
use crate::entities::{Alien, Laser, LaserOwner};

/// Grid layout in logical pixels.
pub const WAVE_X_DIST: i32 = 60;
pub const WAVE_Y_DIST: i32 = 48;
pub const WAVE_X_START: i32 = 70;
pub const WAVE_Y_START: i32 = 100;

#[derive(Clone, Debug)]
pub struct AlienWave {
    /// +1 moving right, −1 moving left.
    pub direction: i32,
    pub aliens: Vec<Alien>,
    pub lasers: Vec<Laser>,
    speed: i32,
    drop: i32,
    laser_speed: i32,
    canvas_width: i32,
    canvas_height: i32,
}

impl AlienWave {
    /// An empty wave heading right.
    pub fn new(config: &Config) -> Self {
        Self {
            direction: 1,
            aliens: Vec::new(),
            lasers: Vec::new(),
            speed: config.alien_speed,
            drop: config.alien_drop,
            laser_speed: config.alien_laser_speed,
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
        }
    }

    /// Lay out `rows × cols` aliens, valued by row.
    pub fn create(&mut self, rows: usize, cols: usize) {
        for row in 0..rows {
            for col in 0..cols {
                let x = col as i32 * WAVE_X_DIST + WAVE_X_START;
                let y = row as i32 * WAVE_Y_DIST + WAVE_Y_START;
                self.aliens.push(Alien::new(x, y, Alien::value_for_row(row)));
            }
        }
    }

    pub fn update(&mut self) {
        self.bounce_off_edges();
        for alien in &mut self.aliens {
            alien.shift(self.direction, self.speed);
        }
        for laser in &mut self.lasers {
            laser.update(self.canvas_height);
        }
        self.lasers.retain(|l| l.alive);
    }

    /// Flip and drop the whole wave once if any alien has reached the edge it
    /// is heading toward. Runs before the horizontal step.
    fn bounce_off_edges(&mut self) {
        let width = self.canvas_width;
        let breached = match self.direction {
            d if d > 0 => self.aliens.iter().any(|a| a.rect.right() >= width),
            _ => self.aliens.iter().any(|a| a.rect.x <= 0),
        };
        if breached {
            self.direction = -self.direction;
            self.move_down(self.drop);
        }
    }

    pub fn move_down(&mut self, offset: i32) {
        for alien in &mut self.aliens {
            alien.move_down(offset);
        }
    }

    /// A random alien fires downward from its centre. No-op on an empty wave.
    pub fn shoot_laser(&mut self, rng: &mut impl Rng) {
        if self.aliens.is_empty() {
            return;
        }
        let shooter = &self.aliens[rng.gen_range(0..self.aliens.len())];
        self.lasers.push(Laser::new(
            LaserOwner::Alien,
            shooter.rect.center_x(),
            shooter.rect.center_y(),
            self.laser_speed,
        ));
    }

    /// Whether any alien is still at or above the bottom of the canvas.
    /// False for an empty wave: nothing is left to survive.
    pub fn still_remaining(&self) -> bool {
        self.aliens.iter().any(|a| a.rect.y <= self.canvas_height)
    }

    pub fn clear(&mut self) {
        self.aliens.clear();
        self.lasers.clear();
    }
}
