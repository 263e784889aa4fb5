/// Rendering layer: all terminal I/O lives here.
///
/// Receives a finished [`Canvas`] in logical pixels and scales every command
/// onto the terminal grid. No game logic is performed.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use space_invaders::canvas::{Anchor, Canvas, DrawCommand, Sprite, Viewport};
use space_invaders::entities::Rect;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLAYER: Color = Color::White;
const C_ALIEN_TOP: Color = Color::Yellow;
const C_ALIEN_MID: Color = Color::Green;
const C_ALIEN_LOW: Color = Color::Red;
const C_EXTRA: Color = Color::Magenta;
const C_LASER_PLAYER: Color = Color::Cyan;
const C_LASER_ALIEN: Color = Color::Magenta;
const C_LIFE: Color = Color::Red;

// ── Public entry point ────────────────────────────────────────────────────────

/// Present one complete frame.
pub fn present<W: Write>(out: &mut W, canvas: &Canvas, viewport: Viewport) -> std::io::Result<()> {
    for command in canvas.commands() {
        match command {
            DrawCommand::Clear(color) => {
                out.queue(style::SetBackgroundColor(*color))?;
                out.queue(terminal::Clear(terminal::ClearType::All))?;
            }
            DrawCommand::Border(color) => draw_border(out, viewport, *color)?,
            DrawCommand::Fill { rect, color } => draw_fill(out, canvas, viewport, rect, *color)?,
            DrawCommand::Sprite { sprite, rect } => {
                draw_sprite(out, canvas, viewport, *sprite, rect)?
            }
            DrawCommand::Text {
                text,
                color,
                x,
                y,
                anchor,
            } => draw_text(out, canvas, viewport, text, *color, (*x, *y), *anchor)?,
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, viewport.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, viewport: Viewport, color: Color) -> std::io::Result<()> {
    let w = viewport.cols as usize;
    let h = viewport.rows;
    if w < 2 || h < 2 {
        return Ok(());
    }

    out.queue(style::SetForegroundColor(color))?;

    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w - 2))))?;

    out.queue(cursor::MoveTo(0, h - 1))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w - 2))))?;

    // Side walls
    for row in 1..h - 1 {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(viewport.cols - 1, row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── Shapes ────────────────────────────────────────────────────────────────────

fn draw_fill<W: Write>(
    out: &mut W,
    canvas: &Canvas,
    viewport: Viewport,
    rect: &Rect,
    color: Color,
) -> std::io::Result<()> {
    if !Viewport::is_visible(canvas, rect) {
        return Ok(());
    }
    let (col, row, w, h) = viewport.to_cells(canvas, rect);
    out.queue(style::SetForegroundColor(color))?;
    let line = "█".repeat(w as usize);
    for r in row..row + h {
        out.queue(cursor::MoveTo(col, r))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

/// Glyphs for each sprite, drawn centred in the sprite's scaled box.
///
///   /▲\    player          (◉)  top-row alien (300)
///   <▼>    mid-row alien    {▾}  low-row alien
///   <=◎=>  extra            ║ ↓  player / alien laser
fn glyph(sprite: Sprite) -> (&'static str, Color) {
    match sprite {
        Sprite::Player => ("/▲\\", C_PLAYER),
        Sprite::Alien(value) if value >= 300 => ("(◉)", C_ALIEN_TOP),
        Sprite::Alien(value) if value >= 200 => ("<▼>", C_ALIEN_MID),
        Sprite::Alien(_) => ("{▾}", C_ALIEN_LOW),
        Sprite::Extra => ("<=◎=>", C_EXTRA),
        Sprite::PlayerLaser => ("║", C_LASER_PLAYER),
        Sprite::AlienLaser => ("↓", C_LASER_ALIEN),
        Sprite::LifeIcon => ("▲", C_LIFE),
    }
}

fn draw_sprite<W: Write>(
    out: &mut W,
    canvas: &Canvas,
    viewport: Viewport,
    sprite: Sprite,
    rect: &Rect,
) -> std::io::Result<()> {
    if !Viewport::is_visible(canvas, rect) {
        return Ok(());
    }
    let (col, row, w, h) = viewport.to_cells(canvas, rect);
    let (text, color) = glyph(sprite);
    let len = text.chars().count() as u16;
    let col = (col + w / 2).saturating_sub(len / 2);
    let col = col.min(viewport.cols.saturating_sub(len));
    out.queue(cursor::MoveTo(col, row + h / 2))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Text ──────────────────────────────────────────────────────────────────────

fn draw_text<W: Write>(
    out: &mut W,
    canvas: &Canvas,
    viewport: Viewport,
    text: &str,
    color: Color,
    (x, y): (i32, i32),
    anchor: Anchor,
) -> std::io::Result<()> {
    let (col, row) = viewport.to_cell(canvas, x, y);
    let len = text.chars().count() as u16;
    let col = match anchor {
        Anchor::Center => col.saturating_sub(len / 2),
        Anchor::TopLeft => col,
    };
    // Clip instead of letting the terminal wrap onto the next row
    let room = viewport.cols.saturating_sub(col) as usize;
    let clipped: String = text.chars().take(room).collect();
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(clipped))?;
    Ok(())
}
