//! Sentence alignment
//!
//! Reconciles two segmentations of the same text stream: the original
//! timestamped fragments (correct timing, arbitrary boundaries) and the
//! externally produced sentences (correct boundaries, no timing). For each
//! sentence a fuzzy sliding-window search finds the best-matching
//! contiguous fragment run; the run is merged, broken at large silence
//! gaps, and split again if the resulting line is over the word budget.

use subalign_types::Fragment;

use crate::grouping::{group_by_gap, DEFAULT_MAX_GAP_MS};
use crate::similarity::ratio;
use crate::splitting::split_overlong;
use crate::text::{count_words, normalize};

/// Default search-window slack from the cursor
pub const BASE_SHIFT: usize = 30;
/// Widened slack used to recover after a miss
pub const WIDENED_SHIFT: usize = 100;
/// Minimum similarity for accepting a match
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;
/// Default maximum words on one subtitle line
pub const DEFAULT_MAX_LINE_WORDS: usize = 16;

/// Tunables for one alignment pass
#[derive(Debug, Clone)]
pub struct AlignConfig {
    /// Minimum similarity ratio to accept a sentence match
    pub similarity_threshold: f64,
    /// Search-window slack from the cursor
    pub base_shift: usize,
    /// Slack after a failed match, to help recovery
    pub widened_shift: usize,
    /// Maximum silence inside one subtitle, in milliseconds
    pub max_gap_ms: f64,
    /// Maximum words on one subtitle line
    pub max_line_words: usize,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            base_shift: BASE_SHIFT,
            widened_shift: WIDENED_SHIFT,
            max_gap_ms: DEFAULT_MAX_GAP_MS,
            max_line_words: DEFAULT_MAX_LINE_WORDS,
        }
    }
}

/// Best candidate window for one sentence
struct Candidate {
    start: usize,
    window: usize,
    ratio: f64,
}

/// Merge fragments along the sentence boundaries.
///
/// Sentences are processed in order; the cursor tracks the first
/// not-yet-consumed fragment and only moves forward. A sentence whose best
/// candidate stays under the similarity threshold is logged and skipped:
/// the cursor still advances past the examined span, and the search window
/// widens for the next sentence. Output order follows sentence order, which
/// the caller re-sorts by start time.
pub fn align_sentences(
    fragments: &[Fragment],
    sentences: &[String],
    config: &AlignConfig,
) -> Vec<Fragment> {
    let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();

    let mut cursor = 0usize;
    let mut max_shift = config.base_shift;
    let mut merged: Vec<Fragment> = Vec::new();

    for sentence in sentences {
        let best = find_best_window(&texts, cursor, max_shift, sentence);

        match best {
            Some(candidate) if candidate.ratio >= config.similarity_threshold => {
                tracing::debug!(
                    "matched sentence at fragments {}..{} (ratio {:.2}): {}",
                    candidate.start,
                    candidate.start + candidate.window,
                    candidate.ratio,
                    sentence
                );
                let span = &fragments[candidate.start..candidate.start + candidate.window];
                emit_groups(span, config, &mut merged);
                max_shift = config.base_shift;
                cursor = candidate.start + candidate.window;
            }
            Some(candidate) => {
                tracing::warn!(
                    "no acceptable match (best ratio {:.2}) for sentence: {}",
                    candidate.ratio,
                    sentence
                );
                max_shift = config.widened_shift;
                cursor = candidate.start + candidate.window;
            }
            None => {
                tracing::warn!("no candidate window for sentence: {}", sentence);
                max_shift = config.widened_shift;
            }
        }
    }

    merged
}

/// Slide windows of plausible sizes from the cursor and keep the best
/// similarity. Window sizes closest to the sentence word count are tried
/// first; an exact match short-circuits both loops.
fn find_best_window(
    texts: &[&str],
    cursor: usize,
    max_shift: usize,
    sentence: &str,
) -> Option<Candidate> {
    let n = texts.len();
    let sentence_norm = normalize(sentence);
    let word_count = count_words(&sentence_norm);

    let remaining = n.saturating_sub(cursor);
    let max_window = (word_count * 2).min(remaining);
    let min_window = (word_count / 2).max(1);
    if max_window < min_window {
        return None;
    }

    let mut window_sizes: Vec<usize> = (min_window..=max_window).collect();
    window_sizes.sort_by_key(|size| size.abs_diff(word_count));

    let mut best: Option<Candidate> = None;

    'sizes: for window in window_sizes {
        let max_start = (cursor + max_shift + 1).min(n - window + 1);
        for start in cursor..max_start {
            let candidate_text: String = texts[start..start + window].concat();
            let r = ratio(&sentence_norm, &normalize(&candidate_text));
            if best.as_ref().map_or(true, |b| r > b.ratio) {
                best = Some(Candidate {
                    start,
                    window,
                    ratio: r,
                });
            }
            if r == 1.0 {
                break 'sizes;
            }
        }
    }

    best
}

/// Merge an accepted span into output lines: break at large gaps, then
/// route over-long lines through the splitter.
fn emit_groups(span: &[Fragment], config: &AlignConfig, merged: &mut Vec<Fragment>) {
    for group in group_by_gap(span, config.max_gap_ms) {
        let text: String = group.iter().map(|f| f.text.as_str()).collect();
        if count_words(&text) > config.max_line_words {
            merged.extend(split_overlong(&text, group, config.max_line_words));
        } else {
            merged.push(Fragment::new(
                text,
                group[0].start_ms,
                group[group.len() - 1].end_ms,
            ));
        }
    }
}
