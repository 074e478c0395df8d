//! Multilingual word counting and comparison normalization
//!
//! Word counting treats each character of a character-counted script (CJK,
//! kana, hangul, Thai, Arabic, Cyrillic, Hebrew, Vietnamese Latin) as one
//! unit; whatever remains is whitespace-split and counted per token.

/// Character-counted script ranges, checked in order. A code point matching
/// a range counts as one unit and is erased before the residual word split,
/// so a character can never be counted twice.
const SCRIPT_RANGES: [(char, char); 10] = [
    ('\u{4e00}', '\u{9fff}'), // CJK unified ideographs
    ('\u{3040}', '\u{309f}'), // hiragana
    ('\u{30a0}', '\u{30ff}'), // katakana
    ('\u{ac00}', '\u{d7af}'), // hangul syllables
    ('\u{0e00}', '\u{0e7f}'), // Thai
    ('\u{0600}', '\u{06ff}'), // Arabic
    ('\u{0400}', '\u{04ff}'), // Cyrillic
    ('\u{0590}', '\u{05ff}'), // Hebrew
    ('\u{1e00}', '\u{1eff}'), // Latin extended additional (Vietnamese)
    ('\u{3130}', '\u{318f}'), // hangul compatibility jamo
];

/// Count word units in mixed-language text
pub fn count_words(text: &str) -> usize {
    let mut script_units = 0usize;
    let mut residual = String::with_capacity(text.len());

    for c in text.chars() {
        if SCRIPT_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&c)) {
            script_units += 1;
            residual.push(' ');
        } else {
            residual.push(c);
        }
    }

    script_units + residual.split_whitespace().count()
}

/// Normalize text for similarity comparison: lowercase, whitespace runs
/// collapsed to single spaces, ends trimmed. Output text keeps its
/// original casing; this is for matching only.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
