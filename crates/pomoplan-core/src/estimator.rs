//! Heuristic pomodoro estimation for free-text tasks.
//!
//! Maps a task title and optional description to an estimated number of
//! work intervals. Word count gives a base estimate, and a small set of
//! complexity keywords scale it up or down. Purely deterministic, no I/O.

/// Minimum estimate returned for any input, including empty text.
pub const MIN_POMODOROS: u32 = 1;
/// Cap on the estimate for very long or very "complex" descriptions.
pub const MAX_POMODOROS: u32 = 8;

/// Words counted per base pomodoro.
const WORDS_PER_POMODORO: f64 = 20.0;

/// Keyword sets with their complexity weights. A set contributes its weight
/// to the running multiplier when ANY of its keywords occurs as a substring
/// of the combined text; multiple sets stack multiplicatively.
///
/// Substring matching is intentional: "hardware" matches "hard". Changing
/// this to whole-word matching would change estimates for existing tasks.
const COMPLEXITY_FACTORS: &[(&[&str], f64)] = &[
    (
        &["complex", "difficult", "challenging", "hard", "complicated"],
        1.5,
    ),
    (&["research", "analyze", "investigate", "study"], 1.3),
    (&["create", "develop", "build", "implement"], 1.2),
    (&["review", "check", "test", "verify"], 0.8),
    (&["quick", "simple", "easy", "small"], 0.6),
];

/// Estimate how many pomodoros a task will take.
///
/// Always returns a value in `[MIN_POMODOROS, MAX_POMODOROS]`; empty input
/// floors at 1.
pub fn estimate(title: &str, description: Option<&str>) -> u32 {
    let combined = format!("{} {}", title, description.unwrap_or("")).to_lowercase();

    let word_count = combined.split_whitespace().count();
    let base = (word_count as f64 / WORDS_PER_POMODORO).ceil();

    let mut multiplier = 1.0;
    for (keywords, weight) in COMPLEXITY_FACTORS {
        if keywords.iter().any(|k| combined.contains(k)) {
            multiplier *= weight;
        }
    }

    (base * multiplier).ceil().clamp(MIN_POMODOROS as f64, MAX_POMODOROS as f64) as u32
}
