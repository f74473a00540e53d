//! Type Fast core crate.
//!
//! Arcade typing game for the browser: words fall from the top of the
//! viewport and the player types them to pop them before one lands. The
//! round state machine lives in [`game`] (pure Rust, natively testable), the
//! color/effect mapping in [`presenter`], and the wasm/DOM shell in `app`,
//! exposed to JS through `start_game()`.

use wasm_bindgen::prelude::*;

mod app;
pub mod game;
pub mod presenter;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Word bank: one list per difficulty tier, fixed at compile time.
// Tier selection is `min(level, TIER_COUNT)`, so high levels keep drawing
// from the hardest list.
// -----------------------------------------------------------------------------

pub const WORDS_TIER1: &[&str] = &["cat", "dog", "sun", "cup", "pen", "box"];
pub const WORDS_TIER2: &[&str] = &["water", "mouse", "phone", "sharp", "black", "green"];
pub const WORDS_TIER3: &[&str] = &["reactor", "battery", "fantasy", "monitor", "charger"];
pub const WORDS_TIER4: &[&str] = &["javascript", "developer", "processor", "algorithm"];
pub const WORDS_TIER5: &[&str] = &[
    "application",
    "integration",
    "synchronization",
    "architecture",
];

pub const TIER_COUNT: u32 = 5;

/// Word list for a difficulty tier; out-of-range tiers clamp into 1..=5.
pub fn bank_for_tier(tier: u32) -> &'static [&'static str] {
    match tier.clamp(1, TIER_COUNT) {
        1 => WORDS_TIER1,
        2 => WORDS_TIER2,
        3 => WORDS_TIER3,
        4 => WORDS_TIER4,
        _ => WORDS_TIER5,
    }
}

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    app::mount()
}
