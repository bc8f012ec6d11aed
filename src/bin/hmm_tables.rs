// Batch front-end: builds the HMM tables from a tagged corpus file.
// Run with: cargo run --bin hmm_tables -- corpus.json [--json]
use clap::Parser;
use pos_core::corpus::load_corpus;
use pos_core::report;
use pos_core::{SessionConfig, TaggingSession};
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "hmm_tables")]
#[command(about = "Print emission and transition tables for a tagged corpus")]
struct Args {
    /// JSON array of {"words": [...], "tags": {"0": "Noun", ...}}
    corpus: PathBuf,

    /// Print the tables as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Use the per-sentence transition counter instead of recounting
    #[arg(long)]
    incremental: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let corpus = load_corpus(&args.corpus)?;

    // Any non-empty corpus is enough here; the interactive threshold does not apply.
    let config = SessionConfig::default()
        .with_min_sentences(1)
        .with_incremental_transitions(args.incremental);
    let mut session = TaggingSession::with_config(config);
    session.load_corpus(corpus)?;
    let tables = session.compute_tables()?;

    if args.json {
        println!("{}", report::to_json(&tables)?);
    } else {
        for table in report::reports(&tables) {
            println!("{}", table.render_plain());
        }
    }
    Ok(())
}
