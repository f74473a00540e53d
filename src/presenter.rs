//! Word presenter: pure mapping from a word's state to visual attributes.
//!
//! No state and no side effects; the canvas renderer in `app.rs` consumes
//! the attributes produced here, and native tests can assert on them
//! directly.

use crate::game::ActiveWord;

/// Level palette. Levels beyond the palette saturate at the last entry.
pub const PALETTE: [&str; 5] = ["#00f6ff", "#ff00ff", "#00ff00", "#ffff00", "#ff4500"];

/// Base glyph size in CSS pixels; matched words scale up from this.
pub const BASE_FONT_PX: f64 = 26.0;

/// Everything the renderer needs to draw one word.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordVisual {
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
    /// Font scale factor; 1.0 for a plain falling word, grows while the
    /// matched pop effect plays out.
    pub scale: f64,
    /// Opacity in [0, 1]; matched words fade over the grace window.
    pub alpha: f64,
}

pub fn level_color(level: u32) -> &'static str {
    let idx = (level.saturating_sub(1) as usize).min(PALETTE.len() - 1);
    PALETTE[idx]
}

/// Visual attributes for one word at time `now`. `grace_ms` is the match
/// grace window; the pop effect runs over exactly that span.
pub fn word_visual(word: &ActiveWord, level: u32, now: f64, grace_ms: f64) -> WordVisual {
    let (scale, alpha) = if word.matched {
        let t = ((now - word.matched_at_ms) / grace_ms).clamp(0.0, 1.0);
        (1.0 + 0.4 * t, 1.0 - t)
    } else {
        (1.0, 1.0)
    };
    WordVisual {
        x: word.x,
        y: word.y,
        color: level_color(level),
        scale,
        alpha,
    }
}
