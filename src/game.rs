//! Game controller: the falling-word round state machine.
//!
//! All mutable round state lives here (score, level, speed, active words,
//! typed buffer). The controller is deliberately free of browser APIs: time
//! and viewport geometry are passed into each operation, randomness comes in
//! through [`Randomness`], and the two side-effecting collaborators (audio
//! cues, high-score persistence) are injected capabilities. The wasm shell in
//! `app.rs` drives `spawn_tick` from an interval timer and `frame_tick` from
//! the animation-frame loop; native tests drive both directly.

/// Round lifecycle. `Ended` re-enters `Running` via `start()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Ended,
}

/// One falling word. Owned exclusively by the controller's word list;
/// the renderer only ever sees borrows.
#[derive(Clone, Debug)]
pub struct ActiveWord {
    pub text: &'static str,
    pub x: f64,
    pub y: f64,
    pub id: u64,
    pub matched: bool,
    /// Timestamp of the successful match; meaningful only while `matched`.
    /// Removal happens in `frame_tick` once the grace window elapses, so an
    /// end-of-round inside the window can never act on a stale word.
    pub matched_at_ms: f64,
}

/// Tuning knobs. Viewport dimensions are not part of the config because the
/// shell re-reads them from the window on every spawn and frame tick.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub ground_margin: f64,
    pub word_box_w: f64,
    pub initial_speed: f64,
    pub speed_increment: f64,
    pub level_step: u32,
    pub grace_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ground_margin: 80.0,
            word_box_w: 200.0,
            initial_speed: 0.8,
            speed_increment: 0.2,
            level_step: 5,
            grace_ms: 300.0,
        }
    }
}

/// Sound cues the controller emits. Playback is fire-and-forget; failures
/// never reach the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    WordPopped,
    GameOver,
}

pub trait AudioPlayer {
    fn play(&self, cue: Cue);
    /// Looping background track: on while the round runs, off (and rewound
    /// by the implementation) otherwise.
    fn music(&self, on: bool);
}

/// Persistent scalar store for the high score.
pub trait ScoreStore {
    fn load(&self) -> Option<u32>;
    fn save(&self, score: u32);
}

/// Uniform randomness source; `unit()` yields a value in `[0, 1)`.
pub trait Randomness {
    fn unit(&mut self) -> f64;
}

/// Result of feeding one input-field value to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    /// Not running; input is ignored entirely.
    Ignored,
    /// Buffer updated, no word consumed.
    NoMatch,
    /// Exactly one word consumed. `leveled_up` tells the shell to reschedule
    /// the spawn interval with the shorter period.
    Matched { leveled_up: bool },
}

pub struct Game {
    config: GameConfig,
    phase: Phase,
    score: u32,
    high_score: u32,
    level: u32,
    speed: f64,
    typed: String,
    words: Vec<ActiveWord>,
    next_id: u64,
    audio: Box<dyn AudioPlayer>,
    store: Box<dyn ScoreStore>,
}

impl Game {
    pub fn new(config: GameConfig, audio: Box<dyn AudioPlayer>, store: Box<dyn ScoreStore>) -> Self {
        let high_score = store.load().unwrap_or(0);
        Self {
            config,
            phase: Phase::Idle,
            score: 0,
            high_score,
            level: 1,
            speed: config.initial_speed,
            typed: String::new(),
            words: Vec::new(),
            next_id: 0,
            audio,
            store,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn high_score(&self) -> u32 {
        self.high_score
    }
    pub fn level(&self) -> u32 {
        self.level
    }
    pub fn speed(&self) -> f64 {
        self.speed
    }
    pub fn typed(&self) -> &str {
        &self.typed
    }
    pub fn words(&self) -> &[ActiveWord] {
        &self.words
    }
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Word-bank tier for the current level, capped at the highest tier.
    pub fn tier(&self) -> u32 {
        self.level.min(crate::TIER_COUNT)
    }

    /// Spawn cadence in milliseconds: shrinks with level, floored at 400.
    pub fn spawn_period_ms(&self) -> f64 {
        (1500.0 - 200.0 * self.level as f64).max(400.0)
    }

    /// Idle/Ended -> Running. Resets the round and starts the music.
    pub fn start(&mut self) {
        if self.phase == Phase::Running {
            return;
        }
        self.score = 0;
        self.level = 1;
        self.speed = self.config.initial_speed;
        self.words.clear();
        self.typed.clear();
        self.phase = Phase::Running;
        self.audio.music(true);
    }

    /// One spawn-timer firing: appends a fresh word at the top edge.
    /// Word choice is uniform with replacement from the tier's bank; the
    /// horizontal position is uniform over the space a word box can occupy.
    pub fn spawn_tick(&mut self, viewport_w: f64, rng: &mut dyn Randomness) {
        if self.phase != Phase::Running {
            return;
        }
        let bank = crate::bank_for_tier(self.tier());
        let idx = ((rng.unit() * bank.len() as f64) as usize).min(bank.len() - 1);
        let span = (viewport_w - self.config.word_box_w).max(0.0);
        let x = rng.unit() * span;
        self.words.push(ActiveWord {
            text: bank[idx],
            x,
            y: 0.0,
            id: self.next_id,
            matched: false,
            matched_at_ms: 0.0,
        });
        self.next_id += 1;
    }

    /// One animation-frame firing: drop expired matched words, advance every
    /// word by the per-frame speed, then evaluate ground collision. Movement
    /// and the collision check use a single read of `speed` and happen within
    /// this call, so a word is never observable past the ground line in a
    /// still-running round. Returns `true` when this tick ended the round.
    pub fn frame_tick(&mut self, now: f64, viewport_h: f64) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let grace = self.config.grace_ms;
        self.words
            .retain(|w| !w.matched || now - w.matched_at_ms < grace);
        let speed = self.speed;
        for w in &mut self.words {
            w.y += speed;
        }
        let ground = viewport_h - self.config.ground_margin;
        if self.words.iter().any(|w| w.y > ground) {
            self.end();
            return true;
        }
        false
    }

    /// Applies one input-field value. First exact match in list (spawn)
    /// order wins; at most one word is consumed per call. A match marks the
    /// word for grace-delayed removal, bumps the score and clears the
    /// buffer; anything else just retains the typed value.
    pub fn submit_input(&mut self, value: &str, now: f64) -> InputOutcome {
        if self.phase != Phase::Running {
            return InputOutcome::Ignored;
        }
        self.typed.clear();
        self.typed.push_str(value);
        let hit = self
            .words
            .iter_mut()
            .find(|w| !w.matched && w.text == value);
        let Some(word) = hit else {
            return InputOutcome::NoMatch;
        };
        word.matched = true;
        word.matched_at_ms = now;
        self.typed.clear();
        self.score += 1;
        self.audio.play(Cue::WordPopped);
        let leveled_up = self.score % self.config.level_step == 0;
        if leveled_up {
            self.level += 1;
            self.speed += self.config.speed_increment;
        }
        InputOutcome::Matched { leveled_up }
    }

    /// Running -> Ended: clears the field, stops the music, plays the
    /// game-over cue and persists a new high score if the round set one.
    fn end(&mut self) {
        self.phase = Phase::Ended;
        self.words.clear();
        self.audio.music(false);
        self.audio.play(Cue::GameOver);
        if self.score > self.high_score {
            self.high_score = self.score;
            self.store.save(self.high_score);
        }
    }
}
