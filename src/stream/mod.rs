//! NDJSON stream decoding and translation into [`StreamEvent`](crate::types::StreamEvent)s.

pub mod chunk;
pub mod line_buffer;
pub mod translator;

pub use chunk::{decode, Chunk, ChunkMessage, DecodeError, ToolCallRaw, ToolFunction};
pub use line_buffer::LineBuffer;
pub use translator::{StreamTranslator, TranslatorState};
