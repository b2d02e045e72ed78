//! Supported tool vocabulary and name resolution.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Tools the downstream agent parser understands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum SupportedTool {
    ExecuteCommand,
    ReadFile,
    WriteToFile,
    ReplaceInFile,
    SearchFiles,
    ListFiles,
    ListCodeDefinitionNames,
    BrowserAction,
    UseMcpTool,
    AccessMcpResource,
    AskFollowupQuestion,
    AttemptCompletion,
    NewTask,
    PlanModeRespond,
    LoadMcpDocumentation,
}

impl SupportedTool {
    /// Tag name used in the XML grammar.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Comma-separated vocabulary, in declaration order.
    pub fn vocabulary() -> String {
        Self::iter().map(Self::as_str).collect::<Vec<_>>().join(", ")
    }
}

/// Namespaced identifiers emitted by some models, mapped onto the vocabulary.
pub const TOOL_ALIASES: &[(&str, SupportedTool)] = &[
    ("repo_browser.open_file", SupportedTool::ReadFile),
    ("repo_browser.read_file", SupportedTool::ReadFile),
    ("repo_browser.print_tree", SupportedTool::ListFiles),
    ("repo_browser.search_files", SupportedTool::SearchFiles),
    (
        "repo_browser.list_code_definition_names",
        SupportedTool::ListCodeDefinitionNames,
    ),
];

/// Outcome of resolving a model-issued tool name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedToolName {
    Supported(SupportedTool),
    /// No vocabulary or alias match; carries the name as the model sent it.
    Unknown(String),
}

impl ResolvedToolName {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

/// Resolve a raw tool name: exact vocabulary match first, then the alias table.
pub fn resolve(raw: &str) -> ResolvedToolName {
    if let Ok(tool) = raw.parse::<SupportedTool>() {
        return ResolvedToolName::Supported(tool);
    }
    TOOL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == raw)
        .map(|(_, tool)| ResolvedToolName::Supported(*tool))
        .unwrap_or_else(|| ResolvedToolName::Unknown(raw.to_string()))
}
