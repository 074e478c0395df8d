//! Micro-segment optimization
//!
//! Final pass that folds very short lines into their predecessor when the
//! two are nearly adjacent in time, so a stray word or two never lingers
//! on screen alone.

use subalign_types::Fragment;

use crate::text::count_words;

/// Merge only when the lines are closer than this, in milliseconds
const MERGE_GAP_MS: f64 = 300.0;
/// A line must have fewer words than this to be folded into its predecessor
const TAIL_WORD_LIMIT: usize = 5;
/// The folded result must stay within this many words
const MERGED_WORD_LIMIT: usize = 12;

/// Fold short trailing lines into their predecessors.
///
/// Scans from the last fragment to the second so that a chain of tiny
/// neighbours collapses in one pass without index invalidation.
pub fn optimize_fragments(mut fragments: Vec<Fragment>) -> Vec<Fragment> {
    let mut i = fragments.len();
    while i > 1 {
        i -= 1;

        let gap = (fragments[i].start_ms - fragments[i - 1].end_ms).abs();
        let current_words = count_words(&fragments[i].text);
        let merged_words = current_words + count_words(&fragments[i - 1].text);

        if gap < MERGE_GAP_MS && current_words < TAIL_WORD_LIMIT && merged_words <= MERGED_WORD_LIMIT
        {
            let absorbed = fragments.remove(i);
            let prev = &mut fragments[i - 1];
            tracing::debug!(
                "folding '{}' into '{}' ({}ms apart)",
                absorbed.text.trim(),
                prev.text.trim(),
                gap
            );
            prev.text.push_str(&absorbed.text);
            prev.start_ms = prev.start_ms.min(absorbed.start_ms);
            prev.end_ms = prev.end_ms.max(absorbed.end_ms);
        }
    }
    fragments
}
