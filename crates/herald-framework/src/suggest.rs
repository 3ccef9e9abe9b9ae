//! Fuzzy "did you mean" suggestions for unresolved identifiers.
//!
//! Every registered identifier is scored against the input on a `0..=1000`
//! scale. Match tiers, best first:
//!
//! | tier | score |
//! |---|---|
//! | exact | `1000` |
//! | input fuzzy-matches the candidate (skim) | `400..=999` |
//! | edit distance | `0..=399` |
//!
//! The skim tier ranks prefixes and contiguous runs above scattered
//! subsequences. Edit distance only scores candidates skim rejects, such as
//! `bam` against `ban`.
//!
//! Candidates scoring strictly above the threshold are kept, best first.

use std::sync::LazyLock;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

static MATCHER: LazyLock<SkimMatcherV2> = LazyLock::new(SkimMatcherV2::default);

const FUZZY_FLOOR: i64 = 400;
const FUZZY_CEILING: i64 = 999;
const EDIT_CEILING: usize = 399;

/// Scores at or below this are dropped by default.
pub const DEFAULT_THRESHOLD: u32 = 200;

/// Highest possible score.
pub const MAX_SCORE: u32 = 1000;

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// The registered identifier.
    pub identifier: String,
    /// How close it is to the input.
    pub score: u32,
}

/// Ranks registered identifiers against an unresolved one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggester {
    threshold: u32,
}

impl Default for Suggester {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl Suggester {
    /// Creates a suggester keeping scores strictly above `threshold`.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.min(MAX_SCORE),
        }
    }

    /// Returns the threshold.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Returns the near matches for `input`, best first.
    ///
    /// Ties keep the order of `candidates`. An empty input yields nothing.
    pub fn suggest<'a>(
        &self,
        input: &str,
        candidates: impl IntoIterator<Item = &'a str>,
    ) -> Vec<Suggestion> {
        if input.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<Suggestion> = candidates
            .into_iter()
            .map(|candidate| Suggestion {
                identifier: candidate.to_string(),
                score: score(input, candidate),
            })
            .filter(|s| s.score > self.threshold)
            .collect();

        // Stable, so equal scores keep candidate order.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }
}

/// Scores how close `candidate` is to `input`.
pub fn score(input: &str, candidate: &str) -> u32 {
    if input.is_empty() || candidate.is_empty() {
        return 0;
    }

    if input == candidate {
        return MAX_SCORE;
    }

    match fuzzy_score(input, candidate) {
        Some(score) => score,
        None => edit_similarity(input, candidate),
    }
}

/// Skim score relative to the input matching itself, scaled to `400..=999`.
fn fuzzy_score(input: &str, candidate: &str) -> Option<u32> {
    let raw = MATCHER.fuzzy_match(candidate, input)?.max(0);
    let perfect = MATCHER.fuzzy_match(input, input).unwrap_or(raw).max(1);

    let span = FUZZY_CEILING - FUZZY_FLOOR;
    let scaled = FUZZY_FLOOR + raw.min(perfect) * span / perfect;
    Some(scaled as u32)
}

/// Edit-distance similarity scaled to `0..=399`.
fn edit_similarity(input: &str, candidate: &str) -> u32 {
    let max_len = input.chars().count().max(candidate.chars().count());
    if max_len == 0 {
        return 0;
    }
    let distance = levenshtein(input, candidate).min(max_len);
    ((max_len - distance) * EDIT_CEILING / max_len) as u32
}

/// Levenshtein distance over characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let n = b_chars.len();

    let mut prev_row: Vec<usize> = (0..=n).collect();
    let mut curr_row = vec![0usize; n + 1];

    for (i, a_ch) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_ch) in b_chars.iter().enumerate() {
            let cost = usize::from(a_ch != b_ch);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[n]
}

/// Renders the "did you mean" message, or `None` if there is nothing to say.
pub fn render_suggestions(delimiter: &str, suggestions: &[Suggestion]) -> Option<String> {
    if suggestions.is_empty() {
        return None;
    }

    let lines: Vec<String> = suggestions
        .iter()
        .map(|s| format!("✔ {delimiter}{}", s.identifier))
        .collect();

    Some(format!("↓ ↓ ↓\n\n★ Did you mean: ★\n{}", lines.join("\n")))
}
