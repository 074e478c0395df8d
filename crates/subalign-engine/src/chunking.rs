//! Word-budget chunking
//!
//! Splits the full fragment sequence into roughly equal-sized chunks for
//! independent sentence extraction. Cut points start at even word-count
//! spacing and snap to the largest nearby time gap so a chunk boundary
//! never lands mid-utterance.

use subalign_types::Fragment;

use crate::text::count_words;

/// How many fragments around a target index to search for the best gap
const SPLIT_SEARCH_RANGE: usize = 30;

/// Number of chunks for a given total word count: one chunk per
/// `threshold` words, any remainder adding one more, at least 1.
pub fn determine_num_chunks(word_count: usize, threshold: usize) -> usize {
    let mut chunks = word_count / threshold.max(1);
    if word_count % threshold.max(1) > 0 {
        chunks += 1;
    }
    chunks.max(1)
}

/// Partition fragments into `num_chunks` contiguous chunks, cut at the
/// largest time gap within [`SPLIT_SEARCH_RANGE`] fragments of each evenly
/// spaced target. Duplicate cut points collapse, so fewer chunks than
/// requested can come back. Every fragment lands in exactly one chunk.
pub fn chunk_fragments(fragments: &[Fragment], num_chunks: usize) -> Vec<&[Fragment]> {
    let n = fragments.len();
    if num_chunks <= 1 || n <= num_chunks {
        return vec![fragments];
    }

    let total_words: usize = fragments.iter().map(|f| count_words(&f.text)).sum();
    let words_per_chunk = total_words / num_chunks;

    let mut cut_indices: Vec<usize> = Vec::with_capacity(num_chunks - 1);
    for k in 1..num_chunks {
        let target = (k * words_per_chunk).min(n - 1);
        let lo = target.saturating_sub(SPLIT_SEARCH_RANGE);
        let hi = (target + SPLIT_SEARCH_RANGE).min(n - 1);

        let mut best_index = target;
        let mut best_gap = f64::NEG_INFINITY;
        for j in lo..hi {
            let gap = fragments[j + 1].start_ms - fragments[j].end_ms;
            if gap > best_gap {
                best_gap = gap;
                best_index = j;
            }
        }
        cut_indices.push(best_index);
    }

    cut_indices.sort_unstable();
    cut_indices.dedup();

    let mut chunks = Vec::with_capacity(cut_indices.len() + 1);
    let mut prev = 0;
    for cut in cut_indices {
        if cut + 1 > prev {
            chunks.push(&fragments[prev..=cut]);
            prev = cut + 1;
        }
    }
    if prev < n {
        chunks.push(&fragments[prev..]);
    }

    tracing::debug!("chunked {} fragments into {} chunk(s)", n, chunks.len());
    chunks
}
