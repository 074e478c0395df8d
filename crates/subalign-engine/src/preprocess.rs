//! Fragment preprocessing
//!
//! Recognition output arrives with punctuation-only fragments and
//! word-level Latin fragments carrying no separators. Before alignment,
//! punctuation-only fragments are dropped and plain Latin words are
//! lowercased with a trailing space so that window concatenation stays
//! whitespace-separated and comparable against normalized sentences.

use std::sync::OnceLock;

use regex::Regex;
use subalign_types::Fragment;

fn word_char_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w").expect("valid regex"))
}

fn latin_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z']+$").expect("valid regex"))
}

/// True when the text contains no word character in any script
pub fn is_pure_punctuation(text: &str) -> bool {
    !word_char_re().is_match(text)
}

/// Drop punctuation-only fragments and normalize plain Latin words to
/// `lowercase + trailing space`
pub fn preprocess_fragments(fragments: Vec<Fragment>) -> Vec<Fragment> {
    fragments
        .into_iter()
        .filter_map(|mut fragment| {
            if is_pure_punctuation(&fragment.text) {
                tracing::debug!("dropping punctuation-only fragment '{}'", fragment.text);
                return None;
            }
            let trimmed = fragment.text.trim();
            if latin_word_re().is_match(trimmed) {
                fragment.text = format!("{} ", trimmed.to_lowercase());
            }
            Some(fragment)
        })
        .collect()
}
