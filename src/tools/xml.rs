//! XML tool-invocation grammar.
//!
//! Every tool call becomes one element named after the tool, one child element
//! per argument:
//!
//! ```text
//! <read_file>
//! <path>src/main.rs</path>
//! </read_file>
//! ```
//!
//! A few tools have a fixed shape with multi-line bodies and get a dedicated
//! template instead. Values are emitted raw: the consumer splits on tags, and
//! the diff-block markers below must reach it byte for byte. Tag names are a
//! different matter. An argument key that is not a plain identifier is
//! dropped, and the unresolved name quoted in a clarification request has its
//! angle brackets escaped, so model-chosen text can never open or close an
//! element.

use serde_json::{Map, Value};

use super::names::{ResolvedToolName, SupportedTool};

/// Opening line of a diff block.
pub const DIFF_BLOCK_START: &str = "-------";
/// Second line of a diff block (note the leading space).
pub const DIFF_SEARCH_MARKER: &str = " SEARCH";
/// Separates the original content from its replacement.
pub const DIFF_DIVIDER: &str = "=======";
/// Closing line of a diff block.
pub const DIFF_REPLACE_MARKER: &str = "+++++++ REPLACE";

/// Tool used to ask the operator for help when a call cannot be resolved.
pub const FALLBACK_TOOL: SupportedTool = SupportedTool::AskFollowupQuestion;

/// Argument mapping of a single tool call.
pub type ToolArguments = Map<String, Value>;

type ToolTemplate = fn(SupportedTool, &ToolArguments) -> String;

/// Encode a resolved tool call. Unknown tools become a clarification request.
pub fn encode(resolved: &ResolvedToolName, args: &ToolArguments) -> String {
    match resolved {
        ResolvedToolName::Supported(tool) => template_for(*tool)(*tool, args),
        ResolvedToolName::Unknown(name) => clarification(name),
    }
}

/// One SEARCH/REPLACE block for `replace_in_file`.
pub fn diff_block(search: &str, replace: &str) -> String {
    format!(
        "{DIFF_BLOCK_START}\n{DIFF_SEARCH_MARKER}\n{search}\n{DIFF_DIVIDER}\n{replace}\n{DIFF_REPLACE_MARKER}"
    )
}

fn template_for(tool: SupportedTool) -> ToolTemplate {
    match tool {
        SupportedTool::WriteToFile => write_to_file,
        SupportedTool::ReplaceInFile => replace_in_file,
        SupportedTool::ExecuteCommand => execute_command,
        SupportedTool::UseMcpTool => use_mcp_tool,
        SupportedTool::ReadFile
        | SupportedTool::SearchFiles
        | SupportedTool::ListFiles
        | SupportedTool::ListCodeDefinitionNames
        | SupportedTool::BrowserAction
        | SupportedTool::AccessMcpResource
        | SupportedTool::AskFollowupQuestion
        | SupportedTool::AttemptCompletion
        | SupportedTool::NewTask
        | SupportedTool::PlanModeRespond
        | SupportedTool::LoadMcpDocumentation => generic,
    }
}

fn generic(tool: SupportedTool, args: &ToolArguments) -> String {
    let name = tool.as_str();
    let mut lines = Vec::with_capacity(args.len() + 2);
    lines.push(format!("<{name}>"));
    for (key, value) in args.iter().filter(|(key, _)| is_tag_name(key)) {
        lines.push(element(key, &value_text(value)));
    }
    lines.push(format!("</{name}>"));
    lines.join("\n")
}

fn write_to_file(tool: SupportedTool, args: &ToolArguments) -> String {
    let name = tool.as_str();
    format!(
        "<{name}>\n{}\n\n{}\n\n</{name}>",
        element("path", &string_arg(args, "path")),
        string_arg(args, "content"),
    )
}

fn replace_in_file(tool: SupportedTool, args: &ToolArguments) -> String {
    let name = tool.as_str();
    format!(
        "<{name}>\n{}\n<diff>\n{}\n</diff>\n</{name}>",
        element("path", &string_arg(args, "path")),
        string_arg(args, "diff"),
    )
}

fn execute_command(tool: SupportedTool, args: &ToolArguments) -> String {
    let name = tool.as_str();
    format!(
        "<{name}>\n{}\n{}\n</{name}>",
        element("command", &string_arg(args, "command")),
        element(
            "requires_approval",
            &requires_approval(args.get("requires_approval")).to_string()
        ),
    )
}

fn use_mcp_tool(tool: SupportedTool, args: &ToolArguments) -> String {
    let name = tool.as_str();
    let arguments = match args.get("arguments") {
        Some(Value::String(blob)) => blob.clone(),
        Some(Value::Null) | None => "{}".to_string(),
        Some(other) => other.to_string(),
    };
    format!(
        "<{name}>\n{}\n{}\n<arguments>\n{arguments}\n</arguments>\n</{name}>",
        element("server_name", &string_arg(args, "server_name")),
        element("tool_name", &string_arg(args, "tool_name")),
    )
}

fn clarification(unresolved: &str) -> String {
    let quoted = escape_angle_brackets(unresolved);
    let question = format!(
        "The tool \"{quoted}\" is not supported. Please retry using one of the supported tools: {}.",
        SupportedTool::vocabulary()
    );
    let name = FALLBACK_TOOL.as_str();
    format!("<{name}>\n{}\n</{name}>", element("question", &question))
}

/// Whether `key` can be used verbatim as an element name: ASCII letters,
/// digits and `_`, non-empty.
pub fn is_tag_name(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn escape_angle_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn element(key: &str, value: &str) -> String {
    format!("<{key}>{value}</{key}>")
}

fn string_arg(args: &ToolArguments, key: &str) -> String {
    args.get(key).map(value_text).unwrap_or_default()
}

/// Strings verbatim, everything else as JSON text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Approval defaults to required when the model omits it or sends something odd.
fn requires_approval(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.trim().eq_ignore_ascii_case("false"),
        _ => true,
    }
}
