//! Convenience re-exports for common use.

pub use crate::config::OllamaConfig;
pub use crate::diagnostics::{DiagnosticSink, NoopSink, TracingSink};
pub use crate::error::{BridgeError, Result};
pub use crate::models::ModelInfo;
pub use crate::provider::{ApiHandler, OllamaHandler, RetryingHandler};
pub use crate::tools::{ResolvedToolName, SupportedTool};
pub use crate::types::{ChatMessage, EventStream, Role, StreamEvent};
pub use crate::util::retry::RetryPolicy;
