//! subalign command-line tool
//!
//! Reads an SRT file, re-segments it along LLM-extracted sentence
//! boundaries, and writes the aligned SRT next to the input.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use subalign_engine::{merge_by_sentences, LlmSentenceSplitter, PipelineConfig, SplitterConfig};
use subalign_srt::{load_track, save_track};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "subalign", version, about = "Re-segment ASR captions into sentence-aligned subtitles")]
struct Args {
    /// Input subtitle file (SRT)
    input: PathBuf,

    /// Output path (default: input with an .aligned.srt suffix)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Chat model used for sentence extraction
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,

    /// Base URL of the chat-completions API
    #[arg(long, default_value = "https://api.openai.com/v1")]
    api_url: String,

    /// API key (default: the OPENAI_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Concurrent sentence-extraction requests
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Maximum words per subtitle line
    #[arg(long, default_value_t = 16)]
    max_words: usize,

    /// Maximum silence inside one subtitle, in milliseconds
    #[arg(long, default_value_t = 1500.0)]
    max_gap_ms: f64,

    /// Bypass the sentence cache
    #[arg(long)]
    no_cache: bool,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let track = load_track(&args.input)?;
    tracing::info!(
        "loaded {} fragments from {} (word-level: {})",
        track.len(),
        args.input.display(),
        track.is_word_level()
    );

    let api_key = args
        .api_key
        .or_else(|| std::env::var("OPENAI_API_KEY").ok());
    let splitter = LlmSentenceSplitter::new(SplitterConfig {
        model: args.model,
        api_url: args.api_url,
        api_key,
        max_line_words: args.max_words,
        ..SplitterConfig::default()
    })
    .context("failed to set up the sentence splitter")?;

    let config = PipelineConfig {
        workers: args.workers,
        max_line_words: args.max_words,
        max_gap_ms: args.max_gap_ms,
        use_cache: !args.no_cache,
        ..PipelineConfig::default()
    };

    let merged = merge_by_sentences(track, &splitter, &config).await?;

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("aligned.srt"));
    save_track(&output, &merged)?;
    tracing::info!("wrote {} subtitles to {}", merged.len(), output.display());

    Ok(())
}
