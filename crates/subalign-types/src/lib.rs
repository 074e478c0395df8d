//! Shared types for subalign
//!
//! This crate contains the data model shared across the subalign
//! workspace: timestamped caption fragments and the tracks that hold them.

use serde::{Deserialize, Serialize};

/// A single timestamped caption fragment from the recognition output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Caption text
    pub text: String,
    /// Start time in milliseconds
    pub start_ms: f64,
    /// End time in milliseconds
    pub end_ms: f64,
}

impl Fragment {
    pub fn new(text: impl Into<String>, start_ms: f64, end_ms: f64) -> Self {
        Self {
            text: text.into(),
            start_ms,
            end_ms,
        }
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.end_ms - self.start_ms
    }
}

/// An ordered sequence of fragments: one subtitle track
///
/// Insertion order is chronological by convention; call [`Track::sort_by_start`]
/// to enforce it after out-of-order edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub fragments: Vec<Fragment>,
}

impl Track {
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self { fragments }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Concatenated fragment text with newlines removed
    pub fn to_text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<String>()
            .replace('\n', "")
    }

    pub fn sort_by_start(&mut self) {
        self.fragments
            .sort_by(|a, b| a.start_ms.total_cmp(&b.start_ms));
    }

    /// Heuristic check for word-level timestamps: most fragments carry at
    /// most one whitespace-delimited token.
    pub fn is_word_level(&self) -> bool {
        if self.fragments.is_empty() {
            return false;
        }
        let single_token = self
            .fragments
            .iter()
            .filter(|f| f.text.split_whitespace().count() <= 1)
            .count();
        single_token * 5 >= self.fragments.len() * 4
    }
}
