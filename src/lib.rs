//! ollama-bridge: streaming Ollama chat for XML-driven agent loops.
//!
//! Consumes the newline-delimited JSON stream of Ollama's `/api/chat` and turns
//! it into a lazy sequence of [`StreamEvent`](types::StreamEvent)s: reasoning
//! text, answer text, and tool calls re-encoded into the XML tool-invocation
//! grammar a text-based agent parser expects.
//!
//! # Quick Start
//!
//! ```no_run
//! use futures::StreamExt;
//! use ollama_bridge::prelude::*;
//!
//! # async fn example() -> ollama_bridge::error::Result<()> {
//! let config = OllamaConfig::builder().model_id("gpt-oss:20b").build();
//! let handler = OllamaHandler::new(config);
//!
//! let mut events = handler
//!     .create_message("You are a careful engineer.", &[ChatMessage::user("List the files.")])
//!     .await?;
//! while let Some(event) = events.next().await {
//!     match event? {
//!         StreamEvent::Reasoning { reasoning } => eprint!("{reasoning}"),
//!         StreamEvent::Text { text } => print!("{text}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod stream;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
