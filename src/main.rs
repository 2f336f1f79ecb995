mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
    ExecutableCommand,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sky_raider::assets::load_sprites;
use sky_raider::compute::{new_session, press_dir, release_dir, tick, toggle_pause};
use sky_raider::entities::{Cue, Dir, PausePolicy, Phase, Session, SessionConfig};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "sky_raider", about = "Side-scrolling arcade dodger")]
struct Args {
    /// Root of the sprite asset tree (jet/, missile/, explosion/, cloud/).
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Seed the session RNG for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Clear the pause flag every tick instead of latching it, so a pause
    /// press freezes exactly one frame.
    #[arg(long)]
    single_tick_pause: bool,
}

// ── Held-key bookkeeping ──────────────────────────────────────────────────────

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Both physical bindings for each direction (letters plus arrows).
fn bindings(dir: Dir) -> [KeyCode; 3] {
    match dir {
        Dir::Up => [KeyCode::Up, KeyCode::Char('i'), KeyCode::Char('I')],
        Dir::Down => [KeyCode::Down, KeyCode::Char('k'), KeyCode::Char('K')],
        Dir::Left => [KeyCode::Left, KeyCode::Char('j'), KeyCode::Char('J')],
        Dir::Right => [KeyCode::Right, KeyCode::Char('l'), KeyCode::Char('L')],
    }
}

fn dir_held(key_frame: &HashMap<KeyCode, u64>, dir: Dir, frame: u64) -> bool {
    bindings(dir)
        .iter()
        .any(|key| is_held(key_frame, key, frame))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the session ends or the player quits; returns the final score.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we derive which directions are still
/// "fresh" (within `HOLD_WINDOW` frames) and feed the edges into the pure
/// `press_dir` / `release_dir` transitions.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after `HOLD_WINDOW` frames of
///   silence, which is shorter than the OS repeat interval, so the key stays
///   live while it is actively generating repeats.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut Session,
    rx: &mpsc::Receiver<Event>,
    rng: &mut ChaCha8Rng,
) -> Result<u64> {
    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut held: HashMap<Dir, bool> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                // Press: record key + handle one-shot actions
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(state.score);
                        }
                        KeyCode::Char('c')
                            if modifiers.contains(KeyModifiers::CONTROL) =>
                        {
                            return Ok(state.score);
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => {
                            *state = toggle_pause(state);
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Turn held-key edges into press/release transitions ────────────────
        for dir in [Dir::Up, Dir::Down, Dir::Left, Dir::Right] {
            let now_held = dir_held(&key_frame, dir, frame);
            let was_held = *held.get(&dir).unwrap_or(&false);
            if now_held && !was_held {
                *state = press_dir(state, dir);
            } else if !now_held && was_held {
                *state = release_dir(state, dir);
            }
            held.insert(dir, now_held);
        }

        // ── Advance the session by measured elapsed time ──────────────────────
        let dt = last_tick.elapsed().as_secs_f32();
        last_tick = Instant::now();
        let (next, cues) = tick(state, dt, rng);
        *state = next;

        for cue in cues {
            match cue {
                // Collision sound, reduced to its terminal equivalent.
                Cue::Collision => out.write_all(b"\x07")?,
            }
        }

        let (cols, rows) = terminal::size()?;
        display::render(out, state, cols, rows)?;

        if state.phase == Phase::Ended {
            return Ok(state.score);
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    // Load assets before touching the terminal so failures print normally.
    let sprites = load_sprites(&args.assets)
        .with_context(|| format!("loading sprites from {}", args.assets.display()))?;

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let config = SessionConfig {
        pause_policy: if args.single_tick_pause {
            PausePolicy::SingleTick
        } else {
            PausePolicy::Latched
        },
        ..SessionConfig::default()
    };
    let mut state = new_session(config, sprites, &mut rng);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = game_loop(&mut out, &mut state, &rx, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    drop(out);

    let score = result?;
    println!("Final score: {score}");
    Ok(())
}
