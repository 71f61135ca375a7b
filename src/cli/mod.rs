// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses the command line with clap, hands a plain config to
// the matching use case and prints the result. No data logic
// lives here.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BuildVocabArgs, Commands, EmbeddingsArgs, InspectArgs, RetrieveArgs};

#[derive(Parser, Debug)]
#[command(
    name = "qa-data-prep",
    version,
    about = "Vocabulary, embedding and dataset preparation for QA experiments, plus passage retrieval."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::BuildVocab(args) => run_build_vocab(args),
            Commands::Embeddings(args) => run_embeddings(args),
            Commands::Inspect(args)    => run_inspect(args),
            Commands::Retrieve(args)   => run_retrieve(args),
        }
    }
}

fn run_build_vocab(args: BuildVocabArgs) -> Result<()> {
    use crate::application::build_vocab_use_case::BuildVocabUseCase;

    tracing::info!("Building vocabularies from '{}'", args.data_dir);
    let pair = BuildVocabUseCase::new(args.into()).execute()?;

    println!("words: {}  relations: {}", pair.words.len(), pair.relations.len());
    Ok(())
}

fn run_embeddings(args: EmbeddingsArgs) -> Result<()> {
    use crate::application::embeddings_use_case::EmbeddingsUseCase;

    let summary = EmbeddingsUseCase::new(args.into()).execute()?;
    println!(
        "vectors: {}  dim: {}  oov tokens: {}",
        summary.vectors, summary.dim, summary.oov_count
    );
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let report = InspectUseCase::new(args.into()).execute()?;
    for split in &report.splits {
        println!(
            "{:<16} {:>8} examples  sort key {}..={}",
            split.name, split.examples, split.min_sort_key, split.max_sort_key
        );
    }
    println!("vocabulary: {}", report.vocab_size);
    if let (Some(oov), Some([rows, dim])) = (report.oov_rows, report.tensor_shape) {
        println!("embeddings: [{rows}, {dim}] tensor, {oov} rows without a pretrained vector");
    }
    Ok(())
}

fn run_retrieve(args: RetrieveArgs) -> Result<()> {
    use crate::application::retrieve_use_case::{RetrievalConfig, RetrieveUseCase};
    use crate::infra::retrieval::CommandRetriever;

    let config    = RetrievalConfig::from(&args);
    let retriever = CommandRetriever::new(&args.command, &config)?;
    let use_case  = RetrieveUseCase::new(config, Box::new(retriever));

    for result in use_case.execute()? {
        println!("{}", "*".repeat(30));
        println!("{}", result.query);
        for (rank, p) in result.passages.iter().enumerate() {
            println!("{:>3}. [{:.4}] {}", rank + 1, p.score, p.passage);
        }
    }

    if args.term_idf {
        println!("{}", use_case.term_idf_json()?);
    }
    Ok(())
}
