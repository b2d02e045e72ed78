//! Core types for ollama-bridge.

pub mod message;
pub mod stream;

pub use message::*;
pub use stream::*;
