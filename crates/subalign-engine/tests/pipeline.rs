//! Pipeline integration tests with a scripted sentence splitter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use subalign_engine::{merge_by_sentences, normalize, PipelineConfig, SentenceSplitter};
use subalign_types::{Fragment, Track};

/// Splitter that breaks its input on periods, with optional per-call delay
/// and failure injection. Counts calls so tests can assert dispatch.
struct ScriptedSplitter {
    calls: AtomicUsize,
    delay_first_call_ms: u64,
    fail_on_call: Option<usize>,
}

impl ScriptedSplitter {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay_first_call_ms: 0,
            fail_on_call: None,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentenceSplitter for ScriptedSplitter {
    async fn split(&self, text: &str, _use_cache: bool) -> Result<Vec<String>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on_call == Some(call) {
            bail!("scripted failure");
        }
        if call == 0 && self.delay_first_call_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_first_call_ms)).await;
        }
        Ok(text
            .split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }
}

fn word_track(words: &[(&str, f64, f64)]) -> Track {
    Track::new(
        words
            .iter()
            .map(|&(text, start, end)| Fragment::new(text, start, end))
            .collect(),
    )
}

fn texts(track: &Track) -> Vec<String> {
    track.fragments.iter().map(|f| normalize(&f.text)).collect()
}

#[tokio::test]
async fn aligns_word_level_captions_to_sentences() {
    // The whole caption matches one extracted sentence, but the 1600ms
    // silence before "jumps" forces two output lines.
    let track = word_track(&[
        ("The", 0.0, 100.0),
        ("quick", 100.0, 200.0),
        ("fox", 600.0, 700.0),
        ("jumps", 2300.0, 2400.0),
    ]);
    let splitter = ScriptedSplitter::new();
    let out = merge_by_sentences(track, &splitter, &PipelineConfig::default())
        .await
        .unwrap();

    assert_eq!(texts(&out), vec!["the quick fox", "jumps"]);
    assert_eq!(out.fragments[0].start_ms, 0.0);
    assert_eq!(out.fragments[0].end_ms, 700.0);
    assert_eq!(out.fragments[1].start_ms, 2300.0);
}

#[tokio::test]
async fn output_is_sorted_by_start_time() {
    let track = word_track(&[
        ("alpha", 0.0, 100.0),
        ("beta", 500.0, 600.0),
        ("gamma", 1000.0, 1100.0),
        ("delta", 1500.0, 1600.0),
    ]);
    let splitter = ScriptedSplitter::new();
    let out = merge_by_sentences(track, &splitter, &PipelineConfig::default())
        .await
        .unwrap();

    let starts: Vec<f64> = out.fragments.iter().map(|f| f.start_ms).collect();
    let mut sorted = starts.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(starts, sorted);
}

const TWELVE_WORDS: [&str; 12] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu",
];

/// Twelve one-word fragments with a long silence before the seventh.
fn twelve_word_track() -> Track {
    Track::new(
        TWELVE_WORDS
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let t = i as f64 * 110.0 + if i >= 6 { 5000.0 } else { 0.0 };
                Fragment::new(*text, t, t + 100.0)
            })
            .collect(),
    )
}

#[tokio::test]
async fn chunk_order_is_preserved_under_concurrency() {
    // Two chunks; the first chunk's extraction finishes last. Sentence
    // order (and therefore alignment) must still follow chunk order.
    let splitter = ScriptedSplitter {
        calls: AtomicUsize::new(0),
        delay_first_call_ms: 50,
        fail_on_call: None,
    };
    let config = PipelineConfig {
        chunk_word_threshold: 6,
        max_line_words: 6,
        ..PipelineConfig::default()
    };
    let out = merge_by_sentences(twelve_word_track(), &splitter, &config)
        .await
        .unwrap();

    assert_eq!(splitter.call_count(), 2);
    let all_text = out
        .fragments
        .iter()
        .map(|f| f.text.clone())
        .collect::<String>();
    assert_eq!(normalize(&all_text), TWELVE_WORDS.join(" "));
}

#[tokio::test]
async fn failing_chunk_fails_the_whole_merge() {
    let track = twelve_word_track();

    let splitter = ScriptedSplitter {
        calls: AtomicUsize::new(0),
        delay_first_call_ms: 0,
        fail_on_call: Some(1),
    };
    let config = PipelineConfig {
        chunk_word_threshold: 6,
        ..PipelineConfig::default()
    };
    let err = merge_by_sentences(track, &splitter, &config)
        .await
        .unwrap_err();
    assert!(format!("{:#}", err).contains("sentence extraction failed"));
}

#[tokio::test]
async fn empty_track_returns_unchanged_without_splitter_calls() {
    let splitter = ScriptedSplitter::new();
    let out = merge_by_sentences(Track::default(), &splitter, &PipelineConfig::default())
        .await
        .unwrap();
    assert!(out.is_empty());
    assert_eq!(splitter.call_count(), 0);
}

#[tokio::test]
async fn punctuation_only_track_returns_unchanged() {
    let track = word_track(&[("...", 0.0, 100.0), ("!!", 100.0, 200.0)]);
    let splitter = ScriptedSplitter::new();
    let out = merge_by_sentences(track, &splitter, &PipelineConfig::default())
        .await
        .unwrap();
    assert!(out.is_empty());
    assert_eq!(splitter.call_count(), 0);
}
