//! kwtree CLI
//!
//! Command-line interface for building, persisting and searching keyword
//! trees.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use kwtree_core::{KeywordTree, KwTreeConfig};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "kwtree")]
#[command(about = "kwtree - first-match multi-keyword search", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a keyword tree from a keyword list and save it
    Build {
        /// Keyword list, one keyword per line
        #[arg(short, long)]
        keywords: PathBuf,

        /// Output file (gzip-compressed JSON)
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        options: TreeOptions,
    },

    /// Report the first keyword occurrence in a text
    Search {
        #[command(flatten)]
        source: TreeSource,

        #[command(flatten)]
        options: TreeOptions,

        #[command(flatten)]
        input: TextInput,
    },

    /// Print a saved keyword tree
    Inspect {
        /// Saved tree file
        #[arg(short, long)]
        tree: PathBuf,
    },
}

#[derive(Args)]
struct TreeOptions {
    /// Match keywords regardless of case
    #[arg(short = 'i', long)]
    case_insensitive: bool,

    /// Maximum keyword length in characters (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_keyword_length: usize,

    /// Maximum number of states (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    max_states: usize,
}

impl TreeOptions {
    fn config(&self) -> KwTreeConfig {
        KwTreeConfig {
            case_insensitive: self.case_insensitive,
            max_keyword_length: self.max_keyword_length,
            max_states: self.max_states,
        }
    }
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct TreeSource {
    /// Saved tree file
    #[arg(short, long)]
    tree: Option<PathBuf>,

    /// Keyword list to build a tree from on the fly
    #[arg(short, long)]
    keywords: Option<PathBuf>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct TextInput {
    /// Text file to scan
    #[arg(long)]
    text: Option<PathBuf>,

    /// Text given on the command line
    #[arg(short, long)]
    query: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    match cli.command {
        Commands::Build {
            keywords,
            output,
            options,
        } => {
            let tree = build_tree(&keywords, options.config())?;
            kwtree_store::save(&tree, &output)
                .with_context(|| format!("Failed to save tree to {}", output.display()))?;
        }
        Commands::Search {
            source,
            options,
            input,
        } => {
            let tree = resolve_tree(&source, options.config())?;
            let text = resolve_text(&input)?;
            println!("{}", search_json(&tree, &text)?);
        }
        Commands::Inspect { tree } => {
            let tree = kwtree_store::open(&tree)?;
            print!("{}", tree);
        }
    }

    Ok(())
}

fn setup_logging(level: &str) -> Result<()> {
    let level = level.parse::<Level>().unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    Ok(())
}

fn build_tree(keywords_path: &Path, config: KwTreeConfig) -> Result<KeywordTree> {
    let keywords = kwtree_store::read_keyword_list(keywords_path)?;

    let mut tree = KeywordTree::with_config(config);
    tree.add_all(&keywords)
        .with_context(|| format!("Failed to add keywords from {}", keywords_path.display()))?;
    tree.finalize()?;

    info!(
        keywords = keywords.len(),
        state_count = tree.state_count(),
        "Keyword tree built"
    );
    Ok(tree)
}

fn resolve_tree(source: &TreeSource, config: KwTreeConfig) -> Result<KeywordTree> {
    match (&source.tree, &source.keywords) {
        (Some(path), _) => Ok(kwtree_store::open(path)?),
        (None, Some(path)) => build_tree(path, config),
        (None, None) => anyhow::bail!("Either --tree or --keywords is required"),
    }
}

fn resolve_text(input: &TextInput) -> Result<String> {
    match (&input.text, &input.query) {
        (Some(path), _) => Ok(kwtree_store::read_text(path)?),
        (None, Some(query)) => Ok(query.clone()),
        (None, None) => anyhow::bail!("Either --text or --query is required"),
    }
}

/// First match as a JSON object, or `null`
fn search_json(tree: &KeywordTree, text: &str) -> Result<String> {
    let found = tree.search(text)?;
    Ok(serde_json::to_string(&found)?)
}
