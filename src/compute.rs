/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `Session` (and, where needed, an RNG handle plus the elapsed time) and
/// returns a brand-new `Session`.  Side effects are limited to the injected
/// RNG; anything the shell must do on the session's behalf comes back as a
/// `Cue`.

use rand::Rng;

use crate::entities::{
    Animation, Body, Cloud, Cue, Dir, Enemy, Explosion, Phase, PausePolicy, Player, Session,
    SessionConfig, SpriteLibrary,
};

// ── World constants ──────────────────────────────────────────────────────────

/// Player velocity while a direction key is held, in world units per second.
pub const PLAYER_SPEED: f32 = 250.0;

/// Leftward enemy speed range.
const ENEMY_SPEED_MIN: f32 = 100.0;
const ENEMY_SPEED_MAX: f32 = 600.0;

/// Leftward cloud speed range — clouds drift, enemies dive.
const CLOUD_SPEED_MIN: f32 = 10.0;
const CLOUD_SPEED_MAX: f32 = 50.0;

/// Fresh spawns place their left edge inside `width .. width + SPAWN_BAND`,
/// just past the right border.
const SPAWN_BAND: f32 = 10.0;

/// Spawn top edges stay this far away from the top and bottom borders.
const SPAWN_MARGIN: f32 = 10.0;

/// Seconds between animation frames for the player and enemies.
pub const SPRITE_FRAME_EVERY: f32 = 0.03;

/// Seconds between animation frames for explosions.
pub const EXPLOSION_FRAME_EVERY: f32 = 0.05;

// Bounding-box sizes in world units.
const PLAYER_SIZE: (f32, f32) = (60.0, 30.0);
const ENEMY_SIZE: (f32, f32) = (50.0, 20.0);
const CLOUD_SIZE: (f32, f32) = (80.0, 30.0);
const EXPLOSION_SIZE: (f32, f32) = (50.0, 20.0);

/// Clouds already drifting when the session opens.
const INITIAL_CLOUDS: usize = 5;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session: player parked near the left edge at mid-height,
/// a few clouds pre-seeded on screen, everything else empty.
pub fn new_session(
    config: SessionConfig,
    sprites: SpriteLibrary,
    rng: &mut impl Rng,
) -> Session {
    assert!(config.max_health > 0, "max_health must be positive");

    let (pw, ph) = PLAYER_SIZE;
    let body = Body::new(SPAWN_BAND + pw / 2.0, config.height / 2.0, pw, ph);
    let player = Player {
        body,
        anim: Animation::new(sprites.player.clone(), SPRITE_FRAME_EVERY, true),
    };

    let mut session = Session {
        health: config.max_health,
        config,
        sprites,
        player,
        enemies: Vec::new(),
        clouds: Vec::new(),
        explosions: Vec::new(),
        score: 0,
        phase: Phase::Running,
        enemy_spawn_timer: 0.0,
        cloud_spawn_timer: 0.0,
        terminal_timer: 0.0,
    };
    for _ in 0..INITIAL_CLOUDS {
        session = spawn_cloud(&session, rng, true);
    }
    session
}

// ── Entity factories ─────────────────────────────────────────────────────────
// Instances share their frame sets through the sprite library; only the
// per-instance state (body, frame index, timer) is built here.

fn make_enemy(config: &SessionConfig, sprites: &SpriteLibrary, rng: &mut impl Rng) -> Enemy {
    let (w, h) = ENEMY_SIZE;
    let left = rng.gen_range(config.width..config.width + SPAWN_BAND);
    let top = rng.gen_range(SPAWN_MARGIN..config.height - SPAWN_MARGIN);
    let mut body = Body::new(left + w / 2.0, top - h / 2.0, w, h);
    body.dx = -rng.gen_range(ENEMY_SPEED_MIN..=ENEMY_SPEED_MAX);
    Enemy {
        body,
        anim: Animation::new(sprites.enemy.clone(), SPRITE_FRAME_EVERY, true),
        damage: config.enemy_damage,
    }
}

// Clouds are plain bodies — their static art comes straight from the sprite
// library at draw time, so no per-instance animation state is built.
fn make_cloud(config: &SessionConfig, rng: &mut impl Rng, on_screen: bool) -> Cloud {
    let (w, h) = CLOUD_SIZE;
    let left = if on_screen {
        rng.gen_range(0.0..config.width)
    } else {
        rng.gen_range(config.width..config.width + SPAWN_BAND)
    };
    let top = rng.gen_range(SPAWN_MARGIN..config.height - SPAWN_MARGIN);
    let mut body = Body::new(left + w / 2.0, top - h / 2.0, w, h);
    body.dx = -rng.gen_range(CLOUD_SPEED_MIN..=CLOUD_SPEED_MAX);
    Cloud { body }
}

// ── Spawners ─────────────────────────────────────────────────────────────────

/// Register a new enemy off the right edge.  No-op while paused.
pub fn spawn_enemy(state: &Session, rng: &mut impl Rng) -> Session {
    if state.phase == Phase::Paused {
        return state.clone();
    }
    let mut enemies = state.enemies.clone();
    enemies.push(make_enemy(&state.config, &state.sprites, rng));
    Session {
        enemies,
        ..state.clone()
    }
}

/// Register a new cloud — off the right edge, or anywhere on screen for the
/// pre-seeded ones.  No-op while paused.
pub fn spawn_cloud(state: &Session, rng: &mut impl Rng, on_screen: bool) -> Session {
    if state.phase == Phase::Paused {
        return state.clone();
    }
    let mut clouds = state.clouds.clone();
    clouds.push(make_cloud(&state.config, rng, on_screen));
    Session {
        clouds,
        ..state.clone()
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Holding a direction key pins the matching velocity axis to
/// `PLAYER_SPEED`.
pub fn press_dir(state: &Session, dir: Dir) -> Session {
    let mut body = state.player.body;
    match dir {
        Dir::Up => body.dy = PLAYER_SPEED,
        Dir::Down => body.dy = -PLAYER_SPEED,
        Dir::Left => body.dx = -PLAYER_SPEED,
        Dir::Right => body.dx = PLAYER_SPEED,
    }
    Session {
        player: Player {
            body,
            anim: state.player.anim.clone(),
        },
        ..state.clone()
    }
}

/// Releasing a direction key zeroes that axis.
pub fn release_dir(state: &Session, dir: Dir) -> Session {
    let mut body = state.player.body;
    match dir {
        Dir::Up | Dir::Down => body.dy = 0.0,
        Dir::Left | Dir::Right => body.dx = 0.0,
    }
    Session {
        player: Player {
            body,
            anim: state.player.anim.clone(),
        },
        ..state.clone()
    }
}

/// Flip between `Running` and `Paused`.  Has no effect once the session is
/// terminating or ended.
pub fn toggle_pause(state: &Session) -> Session {
    let phase = match state.phase {
        Phase::Running => Phase::Paused,
        Phase::Paused => Phase::Running,
        other => other,
    };
    Session {
        phase,
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the session by `dt` seconds.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// Returns the next state plus the cues the shell should act on.
pub fn tick(state: &Session, dt: f32, rng: &mut impl Rng) -> (Session, Vec<Cue>) {
    match state.phase {
        Phase::Ended => (state.clone(), Vec::new()),
        Phase::Paused => tick_paused(state),
        Phase::Terminating => tick_terminating(state, dt),
        Phase::Running => tick_running(state, dt, rng),
    }
}

/// A paused tick freezes everything.  Under the `SingleTick` policy the
/// pause flag does not survive the tick, so a pause press freezes exactly
/// one frame.
fn tick_paused(state: &Session) -> (Session, Vec<Cue>) {
    let phase = match state.config.pause_policy {
        PausePolicy::Latched => Phase::Paused,
        PausePolicy::SingleTick => Phase::Running,
    };
    (
        Session {
            phase,
            ..state.clone()
        },
        Vec::new(),
    )
}

/// Grace period after health depletion: positions freeze, animations keep
/// playing so the death explosion finishes, and once the grace period
/// elapses the session ends.
fn tick_terminating(state: &Session, dt: f32) -> (Session, Vec<Cue>) {
    let player = Player {
        body: state.player.body,
        anim: state.player.anim.advanced(dt),
    };
    let enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .map(|e| Enemy {
            body: e.body,
            anim: e.anim.advanced(dt),
            damage: e.damage,
        })
        .collect();
    let explosions: Vec<Explosion> = state
        .explosions
        .iter()
        .map(|x| Explosion {
            body: x.body,
            anim: x.anim.advanced(dt),
        })
        .filter(|x| !x.anim.finished)
        .collect();

    let terminal_timer = state.terminal_timer + dt;
    let phase = if terminal_timer > state.config.grace_period {
        Phase::Ended
    } else {
        Phase::Terminating
    };

    (
        Session {
            player,
            enemies,
            explosions,
            terminal_timer,
            phase,
            ..state.clone()
        },
        Vec::new(),
    )
}

fn tick_running(state: &Session, dt: f32, rng: &mut impl Rng) -> (Session, Vec<Cue>) {
    let config = &state.config;

    // ── 1. Advance positions; keep the player fully on screen ───────────────
    let player_body = state
        .player
        .body
        .advanced(dt)
        .clamped_to(config.width, config.height);
    let player = Player {
        body: player_body,
        anim: state.player.anim.advanced(dt),
    };

    let mut enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .map(|e| Enemy {
            body: e.body.advanced(dt),
            anim: e.anim.advanced(dt),
            damage: e.damage,
        })
        .filter(|e| !e.body.is_off_screen())
        .collect();

    let clouds: Vec<Cloud> = state
        .clouds
        .iter()
        .map(|c| Cloud {
            body: c.body.advanced(dt),
        })
        .filter(|c| !c.body.is_off_screen())
        .collect();

    let mut explosions: Vec<Explosion> = state
        .explosions
        .iter()
        .map(|x| Explosion {
            body: x.body.advanced(dt),
            anim: x.anim.advanced(dt),
        })
        .filter(|x| !x.body.is_off_screen() && !x.anim.finished)
        .collect();

    // ── 2. Periodic spawning ─────────────────────────────────────────────────
    let mut enemy_spawn_timer = state.enemy_spawn_timer + dt;
    if enemy_spawn_timer >= config.enemy_spawn_every {
        enemy_spawn_timer -= config.enemy_spawn_every;
        enemies.push(make_enemy(config, &state.sprites, rng));
    }

    let mut clouds = clouds;
    let mut cloud_spawn_timer = state.cloud_spawn_timer + dt;
    if cloud_spawn_timer >= config.cloud_spawn_every {
        cloud_spawn_timer -= config.cloud_spawn_every;
        clouds.push(make_cloud(config, rng, false));
    }

    // ── 3. Collision: player ↔ first overlapping enemy (spawn order) ────────
    let mut cues = Vec::new();
    let mut health = state.health;

    if let Some(hit) = enemies.iter().position(|e| e.body.overlaps(&player.body)) {
        let enemy = enemies.remove(hit);
        health = (health - enemy.damage).max(0);

        let mut body = Body::new(
            enemy.body.x,
            enemy.body.y,
            EXPLOSION_SIZE.0,
            EXPLOSION_SIZE.1,
        );
        body.dx = enemy.body.dx;
        explosions.push(Explosion {
            body,
            anim: Animation::new(state.sprites.explosion.clone(), EXPLOSION_FRAME_EVERY, false),
        });
        cues.push(Cue::Collision);
    }

    // ── 4. Score & terminal transition ───────────────────────────────────────
    let score = if health > 0 {
        state.score + 1
    } else {
        state.score
    };
    let (phase, terminal_timer) = if health <= 0 {
        (Phase::Terminating, 0.0)
    } else {
        (Phase::Running, state.terminal_timer)
    };

    (
        Session {
            player,
            enemies,
            clouds,
            explosions,
            score,
            health,
            phase,
            enemy_spawn_timer,
            cloud_spawn_timer,
            terminal_timer,
            ..state.clone()
        },
        cues,
    )
}
