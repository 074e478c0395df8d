//! The merge pipeline
//!
//! Drives the full re-segmentation: preprocess fragments, chunk the text,
//! extract sentences for every chunk concurrently, align the sentences
//! back onto the original fragments, sort, and optimize.

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use subalign_types::Track;

use crate::aligner::{align_sentences, AlignConfig, DEFAULT_MAX_LINE_WORDS};
use crate::chunking::{chunk_fragments, determine_num_chunks};
use crate::grouping::DEFAULT_MAX_GAP_MS;
use crate::optimizer::optimize_fragments;
use crate::preprocess::preprocess_fragments;
use crate::text::count_words;
use crate::traits::SentenceSplitter;

/// Words per chunk handed to the sentence splitter
pub const DEFAULT_CHUNK_WORD_THRESHOLD: usize = 1000;
/// Concurrent sentence-extraction requests
pub const DEFAULT_WORKERS: usize = 4;

/// Tunables for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Words per chunk handed to the sentence splitter
    pub chunk_word_threshold: usize,
    /// Concurrent sentence-extraction requests
    pub workers: usize,
    /// Maximum words on one subtitle line
    pub max_line_words: usize,
    /// Maximum silence inside one subtitle, in milliseconds
    pub max_gap_ms: f64,
    /// Minimum similarity ratio to accept a sentence match
    pub similarity_threshold: f64,
    /// Let the splitter reuse replies for repeated chunk text
    pub use_cache: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_word_threshold: DEFAULT_CHUNK_WORD_THRESHOLD,
            workers: DEFAULT_WORKERS,
            max_line_words: DEFAULT_MAX_LINE_WORDS,
            max_gap_ms: DEFAULT_MAX_GAP_MS,
            similarity_threshold: crate::aligner::DEFAULT_SIMILARITY_THRESHOLD,
            use_cache: true,
        }
    }
}

/// Re-segment a track along externally extracted sentence boundaries.
///
/// A chunk whose sentence extraction fails aborts the whole merge: dropping
/// one chunk's sentences silently would desynchronize alignment for every
/// chunk after it. Degenerate inputs (nothing left after preprocessing, or
/// zero countable words) come back unchanged without any splitter call.
pub async fn merge_by_sentences(
    track: Track,
    splitter: &dyn SentenceSplitter,
    config: &PipelineConfig,
) -> Result<Track> {
    let fragments = preprocess_fragments(track.fragments);
    let flattened = fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<String>()
        .replace('\n', "");
    let total_words = count_words(&flattened);

    if fragments.is_empty() || total_words == 0 {
        tracing::info!("nothing to merge, returning input unchanged");
        return Ok(Track::new(fragments));
    }

    let num_chunks = determine_num_chunks(total_words, config.chunk_word_threshold);
    tracing::info!(
        "{} words across {} fragments, {} chunk(s)",
        total_words,
        fragments.len(),
        num_chunks
    );

    let chunks = chunk_fragments(&fragments, num_chunks);
    let chunk_texts: Vec<String> = chunks
        .iter()
        .map(|chunk| {
            chunk
                .iter()
                .map(|f| f.text.as_str())
                .collect::<String>()
                .replace('\n', "")
        })
        .collect();

    let use_cache = config.use_cache;
    let sentence_lists: Vec<Vec<String>> = stream::iter(
        chunk_texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| async move {
                splitter
                    .split(&text, use_cache)
                    .await
                    .with_context(|| format!("sentence extraction failed for chunk {}", index))
            }),
    )
    .buffered(config.workers.max(1))
    .try_collect()
    .await?;

    let sentences: Vec<String> = sentence_lists.into_iter().flatten().collect();
    tracing::info!("extracted {} sentences in total", sentences.len());

    let align_config = AlignConfig {
        similarity_threshold: config.similarity_threshold,
        max_gap_ms: config.max_gap_ms,
        max_line_words: config.max_line_words,
        ..AlignConfig::default()
    };
    let merged = align_sentences(&fragments, &sentences, &align_config);

    let mut result = Track::new(merged);
    result.sort_by_start();
    Ok(Track::new(optimize_fragments(result.fragments)))
}
