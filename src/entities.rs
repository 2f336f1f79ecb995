/// All game entity types — pure data, no update logic.
///
/// The world is a continuous 800×600 plane with y pointing up (the bottom
/// of the visible area is y = 0).  Everything that flies carries a `Body`;
/// everything that flaps carries an `Animation` on top of that.

use std::sync::Arc;

// ── Bodies ────────────────────────────────────────────────────────────────────

/// A positioned, moving, axis-aligned box.  Position is the box centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub w: f32,
    pub h: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Body { x, y, dx: 0.0, dy: 0.0, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x - self.w / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y - self.h / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Position after `dt` seconds: exactly `position + velocity * dt`.
    pub fn advanced(self, dt: f32) -> Body {
        Body {
            x: self.x + self.dx * dt,
            y: self.y + self.dy * dt,
            ..self
        }
    }

    /// Axis-aligned overlap test.
    pub fn overlaps(&self, other: &Body) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.bottom() < other.top()
            && other.bottom() < self.top()
    }

    /// True once the box has fully exited the left side of the visible area.
    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }

    /// Body shifted the minimum distance so the whole box sits inside
    /// `0..width` × `0..height`.
    pub fn clamped_to(self, width: f32, height: f32) -> Body {
        let mut b = self;
        if b.top() > height {
            b.y = height - b.h / 2.0;
        }
        if b.right() > width {
            b.x = width - b.w / 2.0;
        }
        if b.bottom() < 0.0 {
            b.y = b.h / 2.0;
        }
        if b.left() < 0.0 {
            b.x = b.w / 2.0;
        }
        b
    }
}

// ── Animation frames ──────────────────────────────────────────────────────────

/// One drawable frame: rows of terminal cell art.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub rows: Vec<String>,
}

/// An ordered, non-empty frame sequence.  Shared between every entity spawned
/// from it via `Arc` — per-instance state lives in `Animation`, never here.
#[derive(Debug, PartialEq)]
pub struct FrameSet {
    pub frames: Vec<Frame>,
}

impl FrameSet {
    /// Panics on an empty frame list — a frame set without frames is a
    /// construction bug, not a runtime condition.
    pub fn new(frames: Vec<Frame>) -> Self {
        assert!(!frames.is_empty(), "FrameSet must hold at least one frame");
        FrameSet { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Playback state over a shared `FrameSet`.
///
/// The timer accumulates elapsed time; each time it exceeds `change_per` it
/// resets and the frame index advances.  Looping animations wrap to frame 0;
/// one-shot animations instead set `finished` on the crossing that would
/// wrap, so frame 0 is never displayed a second time.
#[derive(Clone, Debug)]
pub struct Animation {
    pub frames: Arc<FrameSet>,
    pub frame_index: usize,
    pub timer: f32,
    pub change_per: f32,
    pub looped: bool,
    pub finished: bool,
}

impl Animation {
    pub fn new(frames: Arc<FrameSet>, change_per: f32, looped: bool) -> Self {
        assert!(!frames.is_empty(), "Animation requires a non-empty FrameSet");
        Animation {
            frames,
            frame_index: 0,
            timer: 0.0,
            change_per,
            looped,
            finished: false,
        }
    }

    /// Playback state after `dt` seconds.
    pub fn advanced(&self, dt: f32) -> Animation {
        let mut a = self.clone();
        if a.finished {
            return a;
        }
        a.timer += dt;
        if a.timer > a.change_per {
            a.timer = 0.0;
            if a.frame_index + 1 < a.frames.len() {
                a.frame_index += 1;
            } else if a.looped {
                a.frame_index = 0;
            } else {
                a.finished = true;
            }
        }
        a
    }

    pub fn current(&self) -> &Frame {
        &self.frames.frames[self.frame_index]
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub anim: Animation,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub body: Body,
    pub anim: Animation,
    /// Health subtracted from the player on collision.
    pub damage: i32,
}

/// Decorative only — never collides.
#[derive(Clone, Debug)]
pub struct Cloud {
    pub body: Body,
}

/// One-shot effect left behind by a consumed enemy.  Drifts with the
/// enemy's horizontal velocity and removes itself after a single pass
/// through its frame sequence.
#[derive(Clone, Debug)]
pub struct Explosion {
    pub body: Body,
    pub anim: Animation,
}

// ── Session state machine ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Running,
    Paused,
    /// Health hit zero; the death effect plays out until the grace period
    /// elapses, then the session ends.
    Terminating,
    Ended,
}

/// How the pause flag behaves across ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PausePolicy {
    /// P toggles pause on and off; the session stays frozen until unpaused.
    Latched,
    /// The pause flag clears itself every tick, freezing exactly one tick
    /// per press.  Compatibility mode for the alternate historical behavior.
    SingleTick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

/// Side effects the core asks the shell to perform.  The core itself never
/// touches audio or the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cue {
    /// Play the collision sound.
    Collision,
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub width: f32,
    pub height: f32,
    pub max_health: i32,
    pub enemy_damage: i32,
    /// Seconds between enemy spawns.
    pub enemy_spawn_every: f32,
    /// Seconds between cloud spawns.
    pub cloud_spawn_every: f32,
    /// Seconds between health depletion and session end.
    pub grace_period: f32,
    pub pause_policy: PausePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            width: 800.0,
            height: 600.0,
            max_health: 100,
            enemy_damage: 20,
            enemy_spawn_every: 0.1,
            cloud_spawn_every: 4.0,
            grace_period: 1.0,
            pause_policy: PausePolicy::Latched,
        }
    }
}

/// Shared drawable handles for everything the session can spawn.  Cloning
/// the library clones `Arc`s, never frame data.
#[derive(Clone, Debug)]
pub struct SpriteLibrary {
    pub player: Arc<FrameSet>,
    pub enemy: Arc<FrameSet>,
    pub explosion: Arc<FrameSet>,
    pub cloud: Arc<FrameSet>,
}

// ── Master session state ──────────────────────────────────────────────────────

/// The entire session state.  Cloneable so pure update functions can return
/// a new copy without mutating the original; frame data is behind `Arc`, so
/// clones stay cheap.
#[derive(Clone, Debug)]
pub struct Session {
    pub config: SessionConfig,
    pub sprites: SpriteLibrary,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub clouds: Vec<Cloud>,
    pub explosions: Vec<Explosion>,
    /// Incremented once per tick while health is above zero.
    pub score: u64,
    /// Clamped to `[0, max_health]`.
    pub health: i32,
    pub phase: Phase,
    pub enemy_spawn_timer: f32,
    pub cloud_spawn_timer: f32,
    /// Time accumulated since health depletion, compared against
    /// `grace_period` while `Terminating`.
    pub terminal_timer: f32,
}
