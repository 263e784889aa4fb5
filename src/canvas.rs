/// Logical render target.
///
/// States draw into a fixed-size [`Canvas`] by recording commands in logical
/// pixels; the presenter later scales them onto whatever output grid is
/// available. Nothing here touches the terminal.

use crossterm::style::Color;

use crate::entities::Rect;

pub const BACKGROUND_COLOR: Color = Color::Rgb { r: 30, g: 30, b: 30 };
pub const TEXT_COLOR: Color = Color::White;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Center,
    TopLeft,
}

/// Everything with a fixed look. The presenter decides the glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Player,
    /// Alien of the given point value.
    Alien(u32),
    Extra,
    PlayerLaser,
    AlienLaser,
    LifeIcon,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    /// Box frame around the whole canvas.
    Border(Color),
    Fill { rect: Rect, color: Color },
    Sprite { sprite: Sprite, rect: Rect },
    Text {
        text: String,
        color: Color,
        x: i32,
        y: i32,
        anchor: Anchor,
    },
}

#[derive(Clone, Debug)]
pub struct Canvas {
    pub width: i32,
    pub height: i32,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Clearing drops everything recorded so far; it would be overdrawn anyway.
    pub fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    pub fn border(&mut self, color: Color) {
        self.commands.push(DrawCommand::Border(color));
    }

    pub fn fill(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    pub fn sprite(&mut self, sprite: Sprite, rect: Rect) {
        self.commands.push(DrawCommand::Sprite { sprite, rect });
    }

    pub fn text(&mut self, text: impl Into<String>, color: Color, x: i32, y: i32, anchor: Anchor) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            color,
            x,
            y,
            anchor,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// All text drawn this frame, in order. Handy for assertions.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn count_sprites(&self, wanted: Sprite) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { sprite, .. } if *sprite == wanted))
            .count()
    }
}

/// Output grid the canvas is scaled onto (terminal columns and rows).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    /// Map a logical point to an output cell, clamped inside the grid.
    pub fn to_cell(&self, canvas: &Canvas, x: i32, y: i32) -> (u16, u16) {
        let sx = self.cols as f32 / canvas.width as f32;
        let sy = self.rows as f32 / canvas.height as f32;
        let col = (x as f32 * sx).floor().clamp(0.0, self.cols.saturating_sub(1) as f32);
        let row = (y as f32 * sy).floor().clamp(0.0, self.rows.saturating_sub(1) as f32);
        (col as u16, row as u16)
    }

    /// Cells covered by a logical rectangle, as `(col, row, width, height)`.
    /// Anything non-empty covers at least one cell.
    pub fn to_cells(&self, canvas: &Canvas, rect: &Rect) -> (u16, u16, u16, u16) {
        let (c0, r0) = self.to_cell(canvas, rect.x, rect.y);
        let (c1, r1) = self.to_cell(canvas, rect.right() - 1, rect.bottom() - 1);
        (c0, r0, c1.saturating_sub(c0) + 1, r1.saturating_sub(r0) + 1)
    }

    /// Whether a logical rectangle overlaps the canvas at all.
    pub fn is_visible(canvas: &Canvas, rect: &Rect) -> bool {
        rect.right() > 0 && rect.x < canvas.width && rect.bottom() > 0 && rect.y < canvas.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_origin_maps_to_first_cell() {
        let canvas = Canvas::new(600, 600);
        let vp = Viewport { cols: 120, rows: 40 };
        assert_eq!(vp.to_cell(&canvas, 0, 0), (0, 0));
    }

    #[test]
    fn canvas_far_corner_maps_to_last_cell() {
        let canvas = Canvas::new(600, 600);
        let vp = Viewport { cols: 120, rows: 40 };
        assert_eq!(vp.to_cell(&canvas, 599, 599), (119, 39));
        // Off-canvas points clamp rather than overflow
        assert_eq!(vp.to_cell(&canvas, 900, -40), (119, 0));
    }

    #[test]
    fn small_rect_still_covers_one_cell() {
        let canvas = Canvas::new(600, 600);
        let vp = Viewport { cols: 120, rows: 40 };
        let (_, _, w, h) = vp.to_cells(&canvas, &Rect::new(300, 300, 4, 4));
        assert_eq!((w, h), (1, 1));
    }

    #[test]
    fn clear_discards_previous_commands() {
        let mut canvas = Canvas::new(600, 600);
        canvas.text("a", TEXT_COLOR, 0, 0, Anchor::Center);
        canvas.clear(BACKGROUND_COLOR);
        assert_eq!(canvas.commands().len(), 1);
        assert_eq!(canvas.texts().count(), 0);
    }
}
