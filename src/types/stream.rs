//! Streaming types.

use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Lazy, finite, non-restartable sequence of events for one request.
pub type EventStream = BoxStream<'static, Result<StreamEvent, BridgeError>>;

/// An event handed to the agent loop while a response streams in.
///
/// Tool calls never appear as a separate variant: they arrive as [`StreamEvent::Text`]
/// carrying the XML tool-invocation grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Model "thinking" text.
    Reasoning { reasoning: String },
    /// Answer text or an encoded tool invocation.
    Text { text: String },
}

impl StreamEvent {
    pub fn reasoning(reasoning: impl Into<String>) -> Self {
        Self::Reasoning {
            reasoning: reasoning.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The carried text, whichever variant this is.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Reasoning { reasoning } => reasoning,
            Self::Text { text } => text,
        }
    }

    pub fn is_reasoning(&self) -> bool {
        matches!(self, Self::Reasoning { .. })
    }
}
