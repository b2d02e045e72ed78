//! Decoding of a single NDJSON line from `/api/chat`.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::tools::ToolArguments;

/// One decoded line of the response stream.
///
/// Every field is optional and each one is an independent signal: a single
/// chunk may carry thinking, content, tool calls and the completion marker at
/// once, or none of them.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Chunk {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub message: Option<ChunkMessage>,
    #[serde(default)]
    pub done: Option<bool>,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    #[serde(default)]
    pub eval_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ChunkMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub thinking: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallRaw>>,
}

/// A tool call exactly as the model sent it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToolCallRaw {
    pub function: ToolFunction,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ToolFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl Chunk {
    /// Non-empty thinking text.
    pub fn thinking(&self) -> Option<&str> {
        self.message
            .as_ref()?
            .thinking
            .as_deref()
            .filter(|t| !t.is_empty())
    }

    /// Non-empty answer text.
    pub fn content(&self) -> Option<&str> {
        self.message
            .as_ref()?
            .content
            .as_deref()
            .filter(|c| !c.is_empty())
    }

    pub fn tool_calls(&self) -> &[ToolCallRaw] {
        self.message
            .as_ref()
            .and_then(|m| m.tool_calls.as_deref())
            .unwrap_or_default()
    }

    pub fn is_done(&self) -> bool {
        self.done == Some(true)
    }
}

impl ToolCallRaw {
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Arguments as a key/value mapping.
    ///
    /// Objects pass through, `null` and blank strings are an empty mapping, and a
    /// string holding a JSON object is unwrapped. Anything else yields `None`.
    pub fn arguments(&self) -> Option<ToolArguments> {
        match &self.function.arguments {
            Value::Object(map) => Some(map.clone()),
            Value::Null => Some(ToolArguments::new()),
            Value::String(s) if s.trim().is_empty() => Some(ToolArguments::new()),
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A line that could not be decoded into a [`Chunk`].
#[derive(Debug, Error)]
#[error("malformed chunk ({source}): {line}")]
pub struct DecodeError {
    /// The offending line, verbatim.
    pub line: String,
    pub source: serde_json::Error,
}

/// Decode one NDJSON line.
pub fn decode(line: &str) -> Result<Chunk, DecodeError> {
    serde_json::from_str(line).map_err(|source| DecodeError {
        line: line.to_string(),
        source,
    })
}
