//! Character-level sequence similarity
//!
//! Ratcliff/Obershelp matching: repeatedly take the longest common
//! contiguous block and recurse into the unmatched remainders on both
//! sides. The ratio is `2 * matched / (len(a) + len(b))`, in [0, 1].

/// Similarity ratio between two strings. Identical inputs give 1.0,
/// fully disjoint inputs give 0.0. Two empty strings count as identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matched_chars(&a, &b) as f64 / total as f64
}

fn matched_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (a_start, b_start, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matched_chars(&a[..a_start], &b[..b_start])
        + matched_chars(&a[a_start + len..], &b[b_start + len..])
}

/// Longest common contiguous block, earliest occurrence on ties.
/// Returns (start in a, start in b, length).
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev_row = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        let mut row = vec![0usize; b.len() + 1];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let run = prev_row[j] + 1;
                row[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        prev_row = row;
    }

    best
}
