//! Tool group definitions.
//!
//! Groups are the unit modes grant tools by. They can also be referenced
//! with `group:name` syntax wherever a list of tool names is accepted.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use modegate_types::{ToolGroup, ToolName};

use crate::error::PolicyResult;

/// All built-in tool group definitions.
pub static TOOL_GROUPS: Lazy<HashMap<ToolGroup, &'static [ToolName]>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        ToolGroup::Read,
        &[
            ToolName::ReadFile,
            ToolName::FetchInstructions,
            ToolName::SearchFiles,
            ToolName::ListFiles,
            ToolName::ListCodeDefinitionNames,
            ToolName::CodebaseSearch,
        ][..],
    );
    m.insert(
        ToolGroup::Edit,
        &[
            ToolName::ApplyDiff,
            ToolName::EditFile,
            ToolName::WriteToFile,
            ToolName::InsertContent,
            ToolName::SearchAndReplace,
        ][..],
    );
    m.insert(ToolGroup::Browser, &[ToolName::BrowserAction][..]);
    m.insert(ToolGroup::Command, &[ToolName::ExecuteCommand][..]);
    m.insert(
        ToolGroup::Mcp,
        &[ToolName::UseMcpTool, ToolName::AccessMcpResource][..],
    );
    m.insert(ToolGroup::Modes, &[ToolName::SwitchMode, ToolName::NewTask][..]);
    m
});

/// Tools granted by `group`.
///
/// A group missing from the table grants nothing.
pub fn group_tools(group: ToolGroup) -> &'static [ToolName] {
    match TOOL_GROUPS.get(&group) {
        Some(tools) => tools,
        None => {
            tracing::warn!(group = %group, "Tool group has no registry entry, granting no tools");
            &[]
        }
    }
}

/// Tools granted by the group named `name`.
pub fn group_tools_by_name(name: &str) -> PolicyResult<&'static [ToolName]> {
    let group: ToolGroup = name.parse()?;
    Ok(group_tools(group))
}

/// Groups that grant `tool`, in [`ToolGroup::ALL`] order.
pub fn groups_for_tool(tool: ToolName) -> Vec<ToolGroup> {
    ToolGroup::ALL
        .into_iter()
        .filter(|group| group_tools(*group).contains(&tool))
        .collect()
}

/// Expand a single name that may be a `group:xxx` reference.
pub fn expand_name(name: &str) -> PolicyResult<Vec<ToolName>> {
    if let Some(group_name) = name.strip_prefix("group:") {
        return Ok(group_tools_by_name(group_name)?.to_vec());
    }
    Ok(vec![name.parse::<ToolName>()?])
}

/// Expand a list of names, resolving any `group:xxx` references.
pub fn expand_names(names: &[String]) -> PolicyResult<Vec<ToolName>> {
    let mut result = Vec::new();
    for name in names {
        result.extend(expand_name(name)?);
    }
    Ok(result)
}
