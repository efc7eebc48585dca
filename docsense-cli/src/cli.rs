//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use docsense_rag::Granularity;

/// Semantic search and Q&A over your documents
#[derive(Debug, Parser)]
#[command(name = "docsense", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub embedder: EmbedderArgs,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Which embedding provider to use and how to reach it.
#[derive(Debug, Clone, Args)]
pub struct EmbedderArgs {
    /// Embedding provider
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = EmbedderKind::Hash,
        env = "DOCSENSE_EMBEDDER"
    )]
    pub embedder: EmbedderKind,

    /// Vector dimensions for the hash and remote embedders
    #[arg(long, global = true, env = "DOCSENSE_DIMENSIONS")]
    pub dimensions: Option<usize>,

    /// Base URL of an OpenAI-compatible embeddings API
    #[arg(long, global = true, env = "DOCSENSE_EMBEDDINGS_URL")]
    pub embeddings_url: Option<String>,

    /// Model name sent to the remote embeddings API
    #[arg(long, global = true, env = "DOCSENSE_MODEL")]
    pub model: Option<String>,

    /// API key for the remote embeddings API
    #[arg(long, global = true, env = "DOCSENSE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmbedderKind {
    /// Deterministic word hashing, no model required
    Hash,
    /// Local sentence-embedding model (build with `--features fastembed`)
    Fastembed,
    /// OpenAI-compatible HTTP endpoint (build with `--features remote`)
    Remote,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Answer a question with the single best-matching line
    Ask {
        #[command(flatten)]
        input: InputArgs,

        /// The question to answer
        #[arg(short, long)]
        query: String,

        /// Minimum cosine similarity for an answer
        #[arg(long)]
        threshold: Option<f32>,
    },

    /// Rank whole documents against a query
    Search {
        #[command(flatten)]
        input: InputArgs,

        /// The search query
        #[arg(short, long)]
        query: String,

        /// Number of documents to list (default: all)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Ask questions interactively
    Chat {
        #[command(flatten)]
        input: InputArgs,

        /// Answer with single lines or ranked documents
        #[arg(long, value_enum, default_value_t = Mode::Fragment)]
        mode: Mode,

        /// Number of documents to list in document mode
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Files or directories to index (pdf, docx, txt)
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Fragment,
    Document,
}

impl From<Mode> for Granularity {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Fragment => Granularity::Fragment,
            Mode::Document => Granularity::Document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_ask_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "docsense", "ask", "a.txt", "b.pdf", "--query", "battery", "--dimensions", "64",
        ])
        .unwrap();
        assert_eq!(cli.embedder.dimensions, Some(64));
        let Command::Ask { input, query, threshold } = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(input.paths, vec![PathBuf::from("a.txt"), PathBuf::from("b.pdf")]);
        assert_eq!(query, "battery");
        assert_eq!(threshold, None);
    }

    #[test]
    fn search_defaults_to_text_output() {
        let cli =
            Cli::try_parse_from(["docsense", "search", "docs", "-q", "tripod", "-k", "2"]).unwrap();
        let Command::Search { top_k, format, .. } = cli.command else {
            panic!("expected search");
        };
        assert_eq!(top_k, Some(2));
        assert_eq!(format, OutputFormat::Text);
    }

    #[test]
    fn chat_mode_maps_to_granularity() {
        let cli = Cli::try_parse_from(["docsense", "chat", "docs", "--mode", "document"]).unwrap();
        let Command::Chat { mode, .. } = cli.command else {
            panic!("expected chat");
        };
        assert_eq!(Granularity::from(mode), Granularity::Document);
    }

    #[test]
    fn paths_are_required() {
        assert!(Cli::try_parse_from(["docsense", "ask", "--query", "x"]).is_err());
    }
}
