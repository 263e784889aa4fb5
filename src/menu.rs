/// Vertical text menu with a square cursor.

use crossterm::style::Color;

use crate::canvas::{Anchor, Canvas};
use crate::entities::Rect;
use crate::input::Key;

const CURSOR_SIZE: i32 = 30;

#[derive(Clone, Debug)]
pub struct TextMenu<T> {
    options: Vec<(T, &'static str)>,
    index: usize,
    slots: Vec<i32>,
    x_range: (i32, i32),
    color: Color,
}

impl<T: Copy> TextMenu<T> {
    /// Options are spread over `y_range`; labels are centred in `x_range`.
    pub fn new(options: Vec<(T, &'static str)>, y_range: (i32, i32), x_range: (i32, i32)) -> Self {
        let slots = slot_positions(options.len(), y_range);
        Self {
            options,
            index: 0,
            slots,
            x_range,
            color: Color::White,
        }
    }

    /// Up/Down move the cursor, wrapping at either end.
    pub fn handle_key(&mut self, key: Key) {
        let k = self.options.len();
        if k == 0 {
            return;
        }
        match key {
            Key::Down => self.index = (self.index + 1) % k,
            Key::Up => self.index = (self.index + k - 1) % k,
            _ => {}
        }
    }

    pub fn selected(&self) -> T {
        self.options[self.index].0
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn render(&self, canvas: &mut Canvas) {
        let cx = (self.x_range.0 + self.x_range.1) / 2;
        for ((_, label), &y) in self.options.iter().zip(&self.slots) {
            canvas.text(*label, self.color, cx, y, Anchor::Center);
        }
        if let Some(&y) = self.slots.get(self.index) {
            let x = (self.x_range.1 - self.x_range.0) / 4;
            canvas.fill(Rect::new(x, y - CURSOR_SIZE / 2, CURSOR_SIZE, CURSOR_SIZE), self.color);
        }
    }
}

/// Centre line of each option. Odd counts leave a wider bottom margin.
fn slot_positions(k: usize, (y_min, y_max): (i32, i32)) -> Vec<i32> {
    let divisor = (if k % 2 == 1 { k + 2 } else { k + 1 }) as f32;
    let span = (y_max - y_min) as f32;
    (0..k)
        .map(|i| y_min + ((i + 1) as f32 * span / divisor) as i32)
        .collect()
}
