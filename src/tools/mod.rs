//! Tool-call name resolution and XML encoding.

pub mod names;
pub mod xml;

pub use names::{resolve, ResolvedToolName, SupportedTool, TOOL_ALIASES};
pub use xml::{diff_block, encode, is_tag_name, ToolArguments};
