//! Alignment engine for subalign
//!
//! Re-segments timestamped caption fragments into sentence-aligned
//! subtitle lines: word counting, fuzzy window matching, gap grouping,
//! length-bounded splitting, chunked sentence extraction, and the final
//! micro-segment optimizer.

pub mod aligner;
pub mod chunking;
pub mod grouping;
pub mod llm;
pub mod optimizer;
pub mod pipeline;
pub mod preprocess;
pub mod similarity;
pub mod splitting;
pub mod text;
pub mod traits;

pub use aligner::{align_sentences, AlignConfig};
pub use chunking::{chunk_fragments, determine_num_chunks};
pub use grouping::{group_by_gap, DEFAULT_MAX_GAP_MS};
pub use llm::{LlmSentenceSplitter, SplitterConfig};
pub use optimizer::optimize_fragments;
pub use pipeline::{merge_by_sentences, PipelineConfig};
pub use preprocess::{is_pure_punctuation, preprocess_fragments};
pub use similarity::ratio;
pub use splitting::split_overlong;
pub use text::{count_words, normalize};
pub use traits::SentenceSplitter;
