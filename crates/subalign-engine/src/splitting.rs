//! Length-bounded splitting of over-long merged fragments
//!
//! An accepted sentence can merge into a line with more words than fit on
//! screen. The splitter cuts such a line at the most informative time gap
//! and recurses until every piece is within the budget.

use subalign_types::Fragment;

use crate::text::count_words;

/// Tolerance for treating two floating-point gaps as equal
const GAP_EPSILON: f64 = 1e-6;

/// Recursively split an over-long merged line at its best gap point.
///
/// `text` is the concatenation of `fragments` texts. Each returned fragment
/// spans its constituents and is within `max_words`, except when a single
/// source fragment is itself over the budget (it cannot be split further).
pub fn split_overlong(text: &str, fragments: &[Fragment], max_words: usize) -> Vec<Fragment> {
    if fragments.is_empty() {
        return Vec::new();
    }

    if count_words(text) <= max_words || fragments.len() == 1 {
        return vec![Fragment::new(
            text.trim(),
            fragments[0].start_ms,
            fragments[fragments.len() - 1].end_ms,
        )];
    }

    let n = fragments.len();
    let gaps: Vec<f64> = fragments
        .windows(2)
        .map(|pair| pair[1].start_ms - pair[0].end_ms)
        .collect();
    let all_equal = gaps.iter().all(|g| (g - gaps[0]).abs() < GAP_EPSILON);

    let split_index = if all_equal {
        // Uniform timing carries no information; cut in the middle.
        n / 2
    } else {
        // Search the middle two-thirds for the largest gap, keeping the
        // first and last sixths intact to avoid slivers at the edges.
        let lo = n / 6;
        let hi = (5 * n) / 6;
        let mut best_index = n / 2;
        let mut best_gap = f64::NEG_INFINITY;
        for i in lo..hi {
            if gaps[i] > best_gap {
                best_gap = gaps[i];
                best_index = i;
            }
        }
        best_index
    };
    // Both halves must be non-empty for the recursion to shrink.
    let split_index = split_index.min(n - 2);

    let first = &fragments[..=split_index];
    let second = &fragments[split_index + 1..];
    let first_text: String = first.iter().map(|f| f.text.as_str()).collect();
    let second_text: String = second.iter().map(|f| f.text.as_str()).collect();

    tracing::debug!(
        "splitting {}-word line after fragment {} of {}",
        count_words(text),
        split_index,
        n
    );

    let mut result = split_overlong(&first_text, first, max_words);
    result.extend(split_overlong(&second_text, second, max_words));
    result
}
