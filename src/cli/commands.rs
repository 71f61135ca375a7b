// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands and all their flags:
//
//   build-vocab — word + relation vocabularies for SimpleQuestions
//   embeddings  — pretrained vector coverage of a corpus
//   inspect     — load a corpus' splits and summarise them
//   retrieve    — ranked passages from the external engine
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{
    build_vocab_use_case::BuildVocabConfig,
    embeddings_use_case::EmbeddingsConfig,
    inspect_use_case::InspectConfig,
    retrieve_use_case::RetrievalConfig,
};
use crate::data::corpora::CorpusKind;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build word and relation vocabularies from annotated question files
    BuildVocab(BuildVocabArgs),

    /// Load a word-vector file and report corpus tokens it does not cover
    Embeddings(EmbeddingsArgs),

    /// Load the train/dev/test splits of a corpus and summarise them
    Inspect(InspectArgs),

    /// Fetch ranked passages for a query from the external retrieval engine
    Retrieve(RetrieveArgs),
}

#[derive(Args, Debug)]
pub struct BuildVocabArgs {
    /// Directory containing annotated*.txt files
    #[arg(long, default_value = "data/SimpleQuestions_v2")]
    pub data_dir: String,

    /// Output file; defaults to <data-dir>/vocab.json
    #[arg(long)]
    pub output: Option<String>,

    /// File name prefix of the annotated files
    #[arg(long, default_value = "annotated")]
    pub prefix: String,
}

impl From<BuildVocabArgs> for BuildVocabConfig {
    fn from(a: BuildVocabArgs) -> Self {
        let output_path = a.output.unwrap_or_else(|| {
            std::path::Path::new(&a.data_dir)
                .join("vocab.json")
                .to_string_lossy()
                .into_owned()
        });
        BuildVocabConfig {
            data_dir:    a.data_dir,
            output_path,
            file_prefix: a.prefix,
        }
    }
}

#[derive(Args, Debug)]
pub struct EmbeddingsArgs {
    /// Word-vector file, one `token v1 ... vD` line per row
    #[arg(long)]
    pub vectors: String,

    /// Training corpus, one sentence per line
    #[arg(long)]
    pub corpus: String,

    /// Write a JSON summary with the full OOV list here
    #[arg(long)]
    pub report: Option<String>,
}

impl From<EmbeddingsArgs> for EmbeddingsConfig {
    fn from(a: EmbeddingsArgs) -> Self {
        EmbeddingsConfig {
            vectors: a.vectors,
            corpus:  a.corpus,
            report:  a.report,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CorpusArg {
    Sick,
    Trecqa,
    Sst,
}

impl From<CorpusArg> for CorpusKind {
    fn from(c: CorpusArg) -> Self {
        match c {
            CorpusArg::Sick   => CorpusKind::Sick,
            CorpusArg::Trecqa => CorpusKind::TrecQa,
            CorpusArg::Sst    => CorpusKind::Sst,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Which corpus layout to expect
    #[arg(long, value_enum)]
    pub kind: CorpusArg,

    /// Corpus root directory
    #[arg(long)]
    pub path: String,

    /// Word-vector file to align with the text vocabulary
    #[arg(long)]
    pub vectors: Option<String>,

    /// Seed for random OOV vectors
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl From<InspectArgs> for InspectConfig {
    fn from(a: InspectArgs) -> Self {
        InspectConfig {
            kind:    a.kind.into(),
            path:    a.path,
            vectors: a.vectors,
            seed:    a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct RetrieveArgs {
    /// Search index
    #[arg(long)]
    pub index: String,

    /// Word-vector index for embedding-based scorers
    #[arg(long)]
    pub embeddings: Option<String>,

    /// File with one query per line
    #[arg(long)]
    pub topics: Option<String>,

    /// A single query
    #[arg(long)]
    pub query: Option<String>,

    /// Maximum number of documents to fetch
    #[arg(long, default_value_t = 100)]
    pub hits: usize,

    /// Passage scoring strategy
    #[arg(long, default_value = "Idf")]
    pub scorer: String,

    /// Number of passages to return per query
    #[arg(long, default_value_t = 1)]
    pub k: usize,

    /// Also print the term-IDF summary of the last query
    #[arg(long)]
    pub term_idf: bool,

    /// Retrieval program and its arguments, after `--`
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

impl From<&RetrieveArgs> for RetrievalConfig {
    fn from(a: &RetrieveArgs) -> Self {
        RetrievalConfig {
            index:      a.index.clone(),
            embeddings: a.embeddings.clone(),
            topics:     a.topics.clone(),
            query:      a.query.clone(),
            hits:       a.hits,
            scorer:     a.scorer.clone(),
            k:          a.k,
        }
    }
}
