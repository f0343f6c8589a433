use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "pdfseek",
    about = "Semantic search over a folder of PDF documents"
)]
pub struct Cli {
    /// Folder containing the PDF documents to search
    #[arg(short = 'd', long, default_value = ".", global = true)]
    pub dir: PathBuf,

    /// API key for the embeddings endpoint (falls back to OPENAI_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Override the embedding model ID
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the folder's PDFs with a natural-language question
    Search(SearchArgs),
    /// Rebuild the vector index regardless of freshness
    Rebuild,
    /// Show index freshness and folder statistics
    Status(StatusArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The question to search with; brief and precise works best
    pub query: String,

    /// Number of passages to return
    #[arg(short = 'n', long, default_value = "4")]
    pub count: usize,

    /// Minimum similarity score threshold
    #[arg(long, default_value = "0.0")]
    pub min_score: f32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Output only file paths (one per line)
    #[arg(long)]
    pub files: bool,
}

// -- Status --

#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "pdfseek",
            &mut std::io::stdout(),
        );
    }
}
