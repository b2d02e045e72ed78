//! Diagnostic hooks for the request and read loop.
//!
//! The stream core never logs on its own. Everything worth reporting goes
//! through a [`DiagnosticSink`]; the default [`NoopSink`] discards it and
//! [`TracingSink`] forwards it to `tracing`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::BridgeError;
use crate::stream::{Chunk, DecodeError};

/// Receives diagnostics from one handler. Every method defaults to a no-op.
pub trait DiagnosticSink: Send + Sync {
    fn request_sent(&self, _url: &str, _model: &str) {}

    fn response_received(&self, _status: u16) {}

    /// Non-success status; `body` is the response text captured for diagnosis.
    fn http_error(&self, _status: u16, _body: &str) {}

    fn chunk_received(&self, _chunk: &Chunk) {}

    /// A line was skipped because it did not decode.
    fn malformed_line(&self, _error: &DecodeError) {}

    /// Tool call arguments were not a mapping and were replaced by an empty one.
    fn malformed_arguments(&self, _tool: &str, _arguments: &Value) {}

    /// An argument key could not be used as an element name and was dropped.
    fn dropped_argument_key(&self, _tool: &str, _key: &str) {}

    /// A tool name fell through to the clarification fallback.
    fn unknown_tool(&self, _name: &str) {}

    /// The `done` chunk was honoured.
    fn stream_complete(&self, _chunk: &Chunk) {}

    fn request_failed(&self, _error: &BridgeError) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn request_sent(&self, url: &str, model: &str) {
        debug!(url, model, "Sending Ollama chat request");
    }

    fn response_received(&self, status: u16) {
        debug!(status, "Received Ollama response");
    }

    fn http_error(&self, status: u16, body: &str) {
        error!(status, body, "Ollama HTTP error");
    }

    fn chunk_received(&self, chunk: &Chunk) {
        debug!(
            thinking = chunk.thinking().is_some(),
            content = chunk.content().is_some(),
            tool_calls = chunk.tool_calls().len(),
            done = chunk.is_done(),
            "Received chunk"
        );
    }

    fn malformed_line(&self, err: &DecodeError) {
        warn!(error = %err.source, line = %err.line, "Skipping malformed stream line");
    }

    fn malformed_arguments(&self, tool: &str, arguments: &Value) {
        warn!(tool, %arguments, "Tool arguments are not an object; encoding without arguments");
    }

    fn dropped_argument_key(&self, tool: &str, key: &str) {
        warn!(tool, key, "Dropping argument key that is not a valid tag name");
    }

    fn unknown_tool(&self, name: &str) {
        warn!(tool = name, "Unsupported tool; asking for clarification");
    }

    fn stream_complete(&self, chunk: &Chunk) {
        debug!(
            done_reason = chunk.done_reason.as_deref().unwrap_or("unknown"),
            prompt_eval_count = chunk.prompt_eval_count,
            eval_count = chunk.eval_count,
            "Stream complete"
        );
    }

    fn request_failed(&self, err: &BridgeError) {
        error!(error = %err, "Ollama request failed");
    }
}

/// Shared no-op sink.
pub fn noop() -> Arc<dyn DiagnosticSink> {
    Arc::new(NoopSink)
}
