//! CLI entry point for ollama-bridge.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Filter used by `--verbose` when `RUST_LOG` is unset.
pub const VERBOSE_FILTER: &str = "ollama_bridge=debug";

/// Ollama bridge CLI
#[derive(Parser, Debug)]
#[command(name = "ollama-bridge", version, about = "Stream Ollama chats as reasoning, text and XML tool calls")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with a model served by Ollama
    Chat(ChatArgs),
    /// Print the supported tool vocabulary and alias table
    Tools,
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Model to use (defaults to OLLAMA_MODEL)
    #[arg(short, long)]
    pub model: Option<String>,

    /// System prompt
    #[arg(short, long, default_value = "")]
    pub system: String,

    /// Ollama base URL (defaults to OLLAMA_BASE_URL or http://localhost:11434)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Connect-phase timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Ask the model to return its thinking
    #[arg(long)]
    pub think: bool,

    /// Retry attempts for opening the stream
    #[arg(long, default_value_t = 1)]
    pub attempts: u32,

    /// Log diagnostics via tracing
    #[arg(short, long)]
    pub verbose: bool,

    /// User prompt (positional)
    pub prompt: Option<String>,
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(VERBOSE_FILTER))
}

/// Install a stderr `fmt` subscriber when `verbose` is set.
///
/// Returns whether a subscriber was installed. Stdout carries model text
/// only, so logs never go there.
pub fn init_tracing(verbose: bool) -> bool {
    if !verbose {
        return false;
    }
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
