//! Shared test helpers.

#![allow(dead_code)]

use std::sync::Mutex;

use serde_json::Value;

use ollama_bridge::diagnostics::DiagnosticSink;
use ollama_bridge::error::BridgeError;
use ollama_bridge::stream::{Chunk, DecodeError};

/// A sink that records every callback as a short string.
#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.entries().iter().any(|e| e.starts_with(prefix))
    }

    fn push(&self, entry: String) {
        self.entries.lock().unwrap().push(entry);
    }
}

impl DiagnosticSink for RecordingSink {
    fn request_sent(&self, url: &str, model: &str) {
        self.push(format!("request_sent:{url}:{model}"));
    }

    fn response_received(&self, status: u16) {
        self.push(format!("response_received:{status}"));
    }

    fn http_error(&self, status: u16, body: &str) {
        self.push(format!("http_error:{status}:{body}"));
    }

    fn malformed_line(&self, error: &DecodeError) {
        self.push(format!("malformed_line:{}", error.line));
    }

    fn malformed_arguments(&self, tool: &str, arguments: &Value) {
        self.push(format!("malformed_arguments:{tool}:{arguments}"));
    }

    fn dropped_argument_key(&self, tool: &str, key: &str) {
        self.push(format!("dropped_argument_key:{tool}:{key}"));
    }

    fn unknown_tool(&self, name: &str) {
        self.push(format!("unknown_tool:{name}"));
    }

    fn stream_complete(&self, chunk: &Chunk) {
        self.push(format!(
            "stream_complete:{}",
            chunk.done_reason.as_deref().unwrap_or("-")
        ));
    }

    fn request_failed(&self, error: &BridgeError) {
        self.push(format!("request_failed:{error}"));
    }
}

/// Join NDJSON lines into a response body.
pub fn ndjson(lines: &[Value]) -> String {
    lines
        .iter()
        .map(|line| format!("{line}\n"))
        .collect()
}
