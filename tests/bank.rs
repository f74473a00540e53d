// Integration tests for word-bank invariants.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

#[test]
fn every_tier_is_nonempty_and_clean() {
    for tier in 1..=typefast::TIER_COUNT {
        let bank = typefast::bank_for_tier(tier);
        assert!(!bank.is_empty(), "tier {} has no words", tier);
        let mut seen = HashSet::new();
        for w in bank {
            assert!(seen.insert(*w), "duplicate word '{}' in tier {}", w, tier);
            assert!(!w.is_empty(), "empty word in tier {}", tier);
            for c in w.chars() {
                assert!(
                    c.is_ascii_lowercase(),
                    "invalid char '{}' in word '{}' (tier {})",
                    c,
                    w,
                    tier
                );
            }
        }
    }
}

#[test]
fn tiers_grow_in_word_length() {
    // Harder tiers hold longer words on average; the minimum length of each
    // tier should never shrink.
    let mut prev_min = 0;
    for tier in 1..=typefast::TIER_COUNT {
        let min = typefast::bank_for_tier(tier)
            .iter()
            .map(|w| w.len())
            .min()
            .unwrap();
        assert!(
            min >= prev_min,
            "tier {} minimum word length {} dropped below previous {}",
            tier,
            min,
            prev_min
        );
        prev_min = min;
    }
}

#[test]
fn tier_lookup_clamps_out_of_range() {
    assert_eq!(typefast::bank_for_tier(0), typefast::WORDS_TIER1);
    assert_eq!(typefast::bank_for_tier(99), typefast::WORDS_TIER5);
}
