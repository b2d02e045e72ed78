//! Model metadata used for context planning.

use serde::{Deserialize, Serialize};

/// What the agent loop needs to know about the served model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    /// Tokens the server was asked to allocate (`num_ctx`).
    pub context_window: u32,
}
