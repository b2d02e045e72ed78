//! ollama-bridge CLI binary entry point.

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use futures::StreamExt;
use ollama_bridge::cli::{init_tracing, ChatArgs, Cli, Commands};
use ollama_bridge::config::{timeout_from_millis, OllamaConfig};
use ollama_bridge::diagnostics::TracingSink;
use ollama_bridge::provider::{ApiHandler, OllamaHandler, RetryingHandler};
use ollama_bridge::tools::{SupportedTool, TOOL_ALIASES};
use ollama_bridge::types::{ChatMessage, StreamEvent};
use ollama_bridge::util::retry::RetryPolicy;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chat(chat_args) => handle_chat(chat_args).await,
        Commands::Tools => {
            handle_tools();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_chat(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let prompt = match args.prompt {
        Some(p) => p,
        None => {
            eprintln!("Usage: ollama-bridge chat \"your prompt here\"");
            std::process::exit(1);
        }
    };

    let mut config = OllamaConfig::from_env();
    if let Some(model) = args.model {
        config.model_id = model;
    }
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(ms) = args.timeout_ms {
        config.request_timeout = timeout_from_millis(ms);
    }
    config.think |= args.think;

    let mut handler = OllamaHandler::new(config);
    if init_tracing(args.verbose) {
        handler = handler.with_sink(Arc::new(TracingSink));
    }
    let policy = RetryPolicy {
        max_attempts: args.attempts.max(1),
        ..RetryPolicy::retry_all()
    };
    let handler = RetryingHandler::new(handler, policy);

    let mut events = handler
        .create_message(&args.system, &[ChatMessage::user(prompt)])
        .await?;

    // Reasoning goes to stderr so stdout stays pipeable.
    while let Some(event) = events.next().await {
        match event? {
            StreamEvent::Reasoning { reasoning } => {
                eprint!("{reasoning}");
                let _ = std::io::stderr().flush();
            }
            StreamEvent::Text { text } => {
                print!("{text}");
                let _ = std::io::stdout().flush();
            }
        }
    }

    println!();
    Ok(())
}

fn handle_tools() {
    println!("Supported tools: {}", SupportedTool::vocabulary());
    println!();
    println!("Aliases:");
    for (alias, tool) in TOOL_ALIASES {
        println!("  {alias} -> {tool}");
    }
}
