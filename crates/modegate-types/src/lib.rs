use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ──────────────────── Identifier Types ────────────────────

/// Errors raised when a string does not name a known tool or group.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("unknown tool group: {0}")]
    UnknownGroup(String),
}

/// A single capability an agent can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    ReadFile,
    FetchInstructions,
    SearchFiles,
    ListFiles,
    ListCodeDefinitionNames,
    CodebaseSearch,
    ApplyDiff,
    EditFile,
    WriteToFile,
    InsertContent,
    SearchAndReplace,
    BrowserAction,
    ExecuteCommand,
    UseMcpTool,
    AccessMcpResource,
    SwitchMode,
    NewTask,
}

impl ToolName {
    /// Every known tool, in declaration order.
    pub const ALL: [ToolName; 17] = [
        ToolName::ReadFile,
        ToolName::FetchInstructions,
        ToolName::SearchFiles,
        ToolName::ListFiles,
        ToolName::ListCodeDefinitionNames,
        ToolName::CodebaseSearch,
        ToolName::ApplyDiff,
        ToolName::EditFile,
        ToolName::WriteToFile,
        ToolName::InsertContent,
        ToolName::SearchAndReplace,
        ToolName::BrowserAction,
        ToolName::ExecuteCommand,
        ToolName::UseMcpTool,
        ToolName::AccessMcpResource,
        ToolName::SwitchMode,
        ToolName::NewTask,
    ];

    /// Wire name of the tool (e.g. `"read_file"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::ReadFile => "read_file",
            ToolName::FetchInstructions => "fetch_instructions",
            ToolName::SearchFiles => "search_files",
            ToolName::ListFiles => "list_files",
            ToolName::ListCodeDefinitionNames => "list_code_definition_names",
            ToolName::CodebaseSearch => "codebase_search",
            ToolName::ApplyDiff => "apply_diff",
            ToolName::EditFile => "edit_file",
            ToolName::WriteToFile => "write_to_file",
            ToolName::InsertContent => "insert_content",
            ToolName::SearchAndReplace => "search_and_replace",
            ToolName::BrowserAction => "browser_action",
            ToolName::ExecuteCommand => "execute_command",
            ToolName::UseMcpTool => "use_mcp_tool",
            ToolName::AccessMcpResource => "access_mcp_resource",
            ToolName::SwitchMode => "switch_mode",
            ToolName::NewTask => "new_task",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| IdError::UnknownTool(s.to_string()))
    }
}

/// A named bundle of tools, the unit modes grant access by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolGroup {
    Read,
    Edit,
    Browser,
    Command,
    Mcp,
    Modes,
}

impl ToolGroup {
    pub const ALL: [ToolGroup; 6] = [
        ToolGroup::Read,
        ToolGroup::Edit,
        ToolGroup::Browser,
        ToolGroup::Command,
        ToolGroup::Mcp,
        ToolGroup::Modes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolGroup::Read => "read",
            ToolGroup::Edit => "edit",
            ToolGroup::Browser => "browser",
            ToolGroup::Command => "command",
            ToolGroup::Mcp => "mcp",
            ToolGroup::Modes => "modes",
        }
    }
}

impl fmt::Display for ToolGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolGroup {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolGroup::ALL
            .into_iter()
            .find(|group| group.as_str() == s)
            .ok_or_else(|| IdError::UnknownGroup(s.to_string()))
    }
}

/// Per-call tool availability. `false` disables a tool regardless of mode.
pub type ToolRequirements = HashMap<ToolName, bool>;

// ──────────────────── Mode Types ────────────────────

/// Extra constraints attached to a group reference.
///
/// Unknown keys are rejected so a misspelled restriction cannot load as an
/// unrestricted grant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupOptions {
    /// Edit tools may only touch paths matching this regex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_regex: Option<String>,
    /// Human-readable explanation of the restriction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A group reference inside a mode definition.
///
/// Serialized either as a bare name (`"read"`) or as a pair
/// (`["edit", { "file_regex": "\\.md$" }]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupEntry {
    Plain(ToolGroup),
    WithOptions(ToolGroup, GroupOptions),
}

impl GroupEntry {
    pub fn group(&self) -> ToolGroup {
        match self {
            GroupEntry::Plain(group) | GroupEntry::WithOptions(group, _) => *group,
        }
    }

    pub fn options(&self) -> Option<&GroupOptions> {
        match self {
            GroupEntry::Plain(_) => None,
            GroupEntry::WithOptions(_, options) => Some(options),
        }
    }
}

impl From<ToolGroup> for GroupEntry {
    fn from(group: ToolGroup) -> Self {
        GroupEntry::Plain(group)
    }
}

/// Where a custom mode definition was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeSource {
    /// User-wide modes file (`~/.modegate/modes.json5`).
    Global,
    /// Workspace-local modes file (`./.modegate/modes.json5`).
    Project,
}

/// A named operating profile granting a set of tool groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeConfig {
    /// Unique identifier (e.g. "architect").
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Role text handed to the agent. Not interpreted here.
    pub role_definition: String,
    /// Granted groups, in declaration order.
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
    /// Hint for when an orchestrator should pick this mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_to_use: Option<String>,
    /// Additional instructions appended to the role text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<String>,
    /// Origin of a custom mode; `None` for built-ins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ModeSource>,
}

impl ModeConfig {
    /// Build a mode with plain group references.
    pub fn new(
        slug: impl Into<String>,
        name: impl Into<String>,
        role_definition: impl Into<String>,
        groups: impl IntoIterator<Item = ToolGroup>,
    ) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            role_definition: role_definition.into(),
            groups: groups.into_iter().map(GroupEntry::from).collect(),
            when_to_use: None,
            custom_instructions: None,
            source: None,
        }
    }

    /// The entry for `group`, if this mode references it.
    pub fn group_entry(&self, group: ToolGroup) -> Option<&GroupEntry> {
        self.groups.iter().find(|entry| entry.group() == group)
    }

    /// Check the structural rules every mode must satisfy.
    pub fn validate(&self) -> Result<(), ModeValidationError> {
        if !SLUG_PATTERN.is_match(&self.slug) {
            return Err(ModeValidationError::InvalidSlug(self.slug.clone()));
        }
        if self.name.trim().is_empty() {
            return Err(ModeValidationError::EmptyName(self.slug.clone()));
        }
        if self.role_definition.trim().is_empty() {
            return Err(ModeValidationError::EmptyRoleDefinition(self.slug.clone()));
        }

        let mut seen = Vec::with_capacity(self.groups.len());
        for entry in &self.groups {
            let group = entry.group();
            if seen.contains(&group) {
                return Err(ModeValidationError::DuplicateGroup {
                    slug: self.slug.clone(),
                    group,
                });
            }
            seen.push(group);

            if let Some(pattern) = entry.options().and_then(|o| o.file_regex.as_deref()) {
                // Only edit tools are path-restricted.
                if group != ToolGroup::Edit {
                    return Err(ModeValidationError::FileRegexOnNonEditGroup {
                        slug: self.slug.clone(),
                        group,
                    });
                }
                Regex::new(pattern).map_err(|e| ModeValidationError::InvalidFileRegex {
                    slug: self.slug.clone(),
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })?;
            }
        }

        Ok(())
    }
}

static SLUG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9-]+$").expect("slug pattern compiles"));

/// Reasons a mode definition is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModeValidationError {
    #[error("invalid mode slug {0:?}: only letters, digits and dashes are allowed")]
    InvalidSlug(String),
    #[error("mode {0} has an empty name")]
    EmptyName(String),
    #[error("mode {0} has an empty role definition")]
    EmptyRoleDefinition(String),
    #[error("mode {slug} references group {group} more than once")]
    DuplicateGroup { slug: String, group: ToolGroup },
    #[error("mode {slug} has an invalid file_regex {pattern:?}: {reason}")]
    InvalidFileRegex {
        slug: String,
        pattern: String,
        reason: String,
    },
    #[error("mode {slug} sets file_regex on group {group}; only the edit group can be restricted")]
    FileRegexOnNonEditGroup { slug: String, group: ToolGroup },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_name_round_trip() {
        for tool in ToolName::ALL {
            assert_eq!(tool.as_str().parse::<ToolName>().unwrap(), tool);
        }
    }

    #[test]
    fn test_unknown_tool_rejected() {
        let err = "rm_rf".parse::<ToolName>().unwrap_err();
        assert_eq!(err, IdError::UnknownTool("rm_rf".into()));
    }

    #[test]
    fn test_unknown_group_rejected() {
        let err = "network".parse::<ToolGroup>().unwrap_err();
        assert_eq!(err.to_string(), "unknown tool group: network");
    }

    #[test]
    fn test_tool_name_serde_matches_as_str() {
        let json = serde_json::to_string(&ToolName::ListCodeDefinitionNames).unwrap();
        assert_eq!(json, "\"list_code_definition_names\"");
    }

    #[test]
    fn test_mode_config_json_with_group_options() {
        let json = r#"{
            "slug": "docs-writer",
            "name": "Docs Writer",
            "role_definition": "You write documentation.",
            "groups": ["read", ["edit", {"file_regex": "\\.md$", "description": "Markdown only"}]]
        }"#;
        let mode: ModeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(mode.groups.len(), 2);
        assert_eq!(mode.groups[0], GroupEntry::Plain(ToolGroup::Read));
        let edit = mode.group_entry(ToolGroup::Edit).unwrap();
        let options = edit.options().unwrap();
        assert_eq!(options.file_regex.as_deref(), Some("\\.md$"));
        assert_eq!(options.description.as_deref(), Some("Markdown only"));
        assert!(mode.source.is_none());
    }

    #[test]
    fn test_mode_config_rejects_unknown_group() {
        let json = r#"{"slug": "x", "name": "X", "role_definition": "r", "groups": ["network"]}"#;
        assert!(serde_json::from_str::<ModeConfig>(json).is_err());
    }

    #[test]
    fn test_mode_config_toml() {
        let toml_str = r#"
slug = "reviewer"
name = "Reviewer"
role_definition = "You review code."
groups = ["read", "mcp"]
source = "project"
"#;
        let mode: ModeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(mode.slug, "reviewer");
        assert_eq!(mode.source, Some(ModeSource::Project));
        assert!(mode.group_entry(ToolGroup::Edit).is_none());
    }

    #[test]
    fn test_requirements_keyed_by_tool_name() {
        let json = r#"{"edit_file": false, "read_file": true}"#;
        let reqs: ToolRequirements = serde_json::from_str(json).unwrap();
        assert_eq!(reqs.get(&ToolName::EditFile), Some(&false));
        assert_eq!(reqs.get(&ToolName::ReadFile), Some(&true));
    }

    #[test]
    fn test_validate_accepts_well_formed_mode() {
        let mode = ModeConfig::new("my-mode-2", "Mine", "role", [ToolGroup::Read, ToolGroup::Edit]);
        assert!(mode.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_slug() {
        let mode = ModeConfig::new("my mode", "Mine", "role", []);
        assert_eq!(
            mode.validate(),
            Err(ModeValidationError::InvalidSlug("my mode".into()))
        );
    }

    #[test]
    fn test_validate_rejects_empty_role() {
        let mode = ModeConfig::new("m", "Mine", "  ", []);
        assert_eq!(
            mode.validate(),
            Err(ModeValidationError::EmptyRoleDefinition("m".into()))
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_group() {
        let mode = ModeConfig::new("m", "Mine", "role", [ToolGroup::Read, ToolGroup::Read]);
        assert!(matches!(
            mode.validate(),
            Err(ModeValidationError::DuplicateGroup {
                group: ToolGroup::Read,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_regex() {
        let mut mode = ModeConfig::new("m", "Mine", "role", [ToolGroup::Read]);
        mode.groups.push(GroupEntry::WithOptions(
            ToolGroup::Edit,
            GroupOptions {
                file_regex: Some("([".into()),
                description: None,
            },
        ));
        assert!(matches!(
            mode.validate(),
            Err(ModeValidationError::InvalidFileRegex { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_file_regex_on_read_group() {
        let mut mode = ModeConfig::new("m", "Mine", "role", []);
        mode.groups.push(GroupEntry::WithOptions(
            ToolGroup::Read,
            GroupOptions {
                file_regex: Some(r"\.md$".into()),
                description: None,
            },
        ));
        assert_eq!(
            mode.validate(),
            Err(ModeValidationError::FileRegexOnNonEditGroup {
                slug: "m".into(),
                group: ToolGroup::Read,
            })
        );
    }

    #[test]
    fn test_group_options_reject_unknown_keys() {
        let json = r#"["edit", {"fileRegex": "\\.md$"}]"#;
        assert!(serde_json::from_str::<GroupEntry>(json).is_err());

        let json = r#"["edit", {"file_regex": "\\.md$"}]"#;
        assert!(serde_json::from_str::<GroupEntry>(json).is_ok());
    }
}
