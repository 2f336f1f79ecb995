/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// session.  No game logic is performed; this module only maps world
/// coordinates (800×600, y-up) onto terminal cells (y-down) and translates
/// state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use sky_raider::entities::{Frame, Phase, Session};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_CLOUD: Color = Color::White;
const C_ENEMY: Color = Color::Red;
const C_EXPLOSION: Color = Color::Yellow;
const C_PLAYER: Color = Color::Cyan;
const C_SCORE_SHADOW: Color = Color::DarkGrey;
const C_SCORE: Color = Color::White;
const C_HEALTH_OK: Color = Color::Green;
const C_HEALTH_LOW: Color = Color::Red;
const C_HEALTH_TRACK: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;
const C_PAUSED: Color = Color::Yellow;

/// Width of the health bar track in cells.
const HEALTH_BAR_CELLS: i32 = 20;

// ── World → terminal mapping ──────────────────────────────────────────────────

struct Viewport {
    cols: u16,
    rows: u16,
    world_w: f32,
    world_h: f32,
}

impl Viewport {
    /// Terminal cell under a world-space point.  The world's y axis points
    /// up, the terminal's points down.
    fn cell(&self, x: f32, y: f32) -> (i32, i32) {
        let col = x / self.world_w * self.cols as f32;
        let row = (1.0 - y / self.world_h) * self.rows as f32;
        (col as i32, row as i32)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &Session,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let view = Viewport {
        cols,
        rows,
        world_w: state.config.width,
        world_h: state.config.height,
    };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    // Back-to-front: clouds behind everything, player on top.
    for cloud in &state.clouds {
        let (cx, cy) = view.cell(cloud.body.x, cloud.body.y);
        draw_frame(out, &state.sprites.cloud.frames[0], cx, cy, C_CLOUD, &view)?;
    }
    for enemy in &state.enemies {
        let (cx, cy) = view.cell(enemy.body.x, enemy.body.y);
        draw_frame(out, enemy.anim.current(), cx, cy, C_ENEMY, &view)?;
    }
    for explosion in &state.explosions {
        let (cx, cy) = view.cell(explosion.body.x, explosion.body.y);
        draw_frame(out, explosion.anim.current(), cx, cy, C_EXPLOSION, &view)?;
    }
    let (px, py) = view.cell(state.player.body.x, state.player.body.y);
    draw_frame(out, state.player.anim.current(), px, py, C_PLAYER, &view)?;

    draw_health_bar(out, state)?;
    draw_score(out, state, rows)?;
    draw_controls_hint(out, rows)?;

    if state.phase == Phase::Paused {
        draw_paused(out, cols, rows)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Draw one frame of cell art centred on `(cx, cy)`, clipped to the
/// viewport.  Spaces are transparent so overlapping sprites read cleanly.
fn draw_frame<W: Write>(
    out: &mut W,
    frame: &Frame,
    cx: i32,
    cy: i32,
    color: Color,
    view: &Viewport,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(color))?;
    let top = cy - frame.rows.len() as i32 / 2;
    for (i, text) in frame.rows.iter().enumerate() {
        let row = top + i as i32;
        if row < 0 || row >= view.rows as i32 {
            continue;
        }
        let left = cx - text.chars().count() as i32 / 2;
        for (j, ch) in text.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let col = left + j as i32;
            if col < 0 || col >= view.cols as i32 {
                continue;
            }
            out.queue(cursor::MoveTo(col as u16, row as u16))?;
            out.queue(Print(ch))?;
        }
    }
    Ok(())
}

// ── HUD ───────────────────────────────────────────────────────────────────────

/// Health bar, top-left: a filled track proportional to current health.
fn draw_health_bar<W: Write>(out: &mut W, state: &Session) -> std::io::Result<()> {
    let filled =
        (state.health as f32 / state.config.max_health as f32 * HEALTH_BAR_CELLS as f32).ceil()
            as i32;
    let filled = filled.clamp(0, HEALTH_BAR_CELLS);

    let fill_color = if state.health * 4 <= state.config.max_health {
        C_HEALTH_LOW
    } else {
        C_HEALTH_OK
    };

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_SCORE))?;
    out.queue(Print("HP "))?;
    out.queue(style::SetForegroundColor(fill_color))?;
    out.queue(Print("█".repeat(filled as usize)))?;
    out.queue(style::SetForegroundColor(C_HEALTH_TRACK))?;
    out.queue(Print("░".repeat((HEALTH_BAR_CELLS - filled) as usize)))?;
    Ok(())
}

/// Score, lower-left, drawn twice for the shadow effect.
fn draw_score<W: Write>(out: &mut W, state: &Session, rows: u16) -> std::io::Result<()> {
    let text = format!("Score: {}", state.score);
    let row = rows.saturating_sub(2);
    out.queue(cursor::MoveTo(3, row))?;
    out.queue(style::SetForegroundColor(C_SCORE_SHADOW))?;
    out.queue(Print(&text))?;
    out.queue(cursor::MoveTo(2, row))?;
    out.queue(style::SetForegroundColor(C_SCORE))?;
    out.queue(Print(&text))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("↑↓←→ / I K J L : Move   P : Pause   Q : Quit"))?;
    Ok(())
}

// ── Pause overlay ─────────────────────────────────────────────────────────────

fn draw_paused<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let msg = "║  P A U S E D  ║";
    let col = (cols / 2).saturating_sub(msg.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, rows / 2))?;
    out.queue(style::SetForegroundColor(C_PAUSED))?;
    out.queue(Print(msg))?;
    Ok(())
}
