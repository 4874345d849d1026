//! Tool permission evaluation and enforcement.
//!
//! Decision chain: `requirements → resolve mode → group membership`
//!
//! A `false` requirement always wins. Evaluation never fails: unknown tools
//! and unknown modes are denied. Only [`ToolPolicy::enforce`] turns a denial
//! into an error.

use regex::Regex;

use modegate_types::{ModeConfig, ModeValidationError, ToolGroup, ToolName, ToolRequirements};

use crate::error::{PolicyError, PolicyResult};
use crate::groups;
use crate::modes::ModeRegistry;

/// Permission checks against an injected mode registry.
#[derive(Debug, Clone, Copy)]
pub struct ToolPolicy<'r> {
    registry: &'r ModeRegistry,
}

impl ToolPolicy<'static> {
    /// Policy backed by the built-in modes.
    pub fn builtin() -> Self {
        Self::new(ModeRegistry::builtin())
    }
}

impl Default for ToolPolicy<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'r> ToolPolicy<'r> {
    pub fn new(registry: &'r ModeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r ModeRegistry {
        self.registry
    }

    /// Whether `tool` may be used in `mode_slug`.
    ///
    /// Steps:
    /// 1. Unknown tool names are denied.
    /// 2. A `false` requirement denies; `true` or absent falls through.
    /// 3. An unresolvable mode denies.
    /// 4. Allowed iff some group of the resolved mode grants the tool.
    pub fn is_tool_allowed(
        &self,
        tool: &str,
        mode_slug: &str,
        custom_modes: &[ModeConfig],
        requirements: Option<&ToolRequirements>,
    ) -> bool {
        let Ok(tool_name) = tool.parse::<ToolName>() else {
            tracing::debug!(tool, mode = mode_slug, "Denied: unknown tool");
            return false;
        };

        if requirements.and_then(|reqs| reqs.get(&tool_name)) == Some(&false) {
            tracing::debug!(tool, mode = mode_slug, "Denied: tool disabled by requirement");
            return false;
        }

        let mode = match self.registry.resolve(mode_slug, custom_modes) {
            Ok(mode) => mode,
            Err(e) => {
                tracing::debug!(tool, mode = mode_slug, "Denied: {e}");
                return false;
            }
        };

        let allowed = mode
            .groups
            .iter()
            .any(|entry| groups::group_tools(entry.group()).contains(&tool_name));
        if !allowed {
            tracing::debug!(tool, mode = mode_slug, "Denied: no group grants tool");
        }
        allowed
    }

    /// Fail with [`PolicyError::PermissionDenied`] when `tool` is not allowed.
    pub fn enforce(
        &self,
        tool: &str,
        mode_slug: &str,
        custom_modes: &[ModeConfig],
        requirements: Option<&ToolRequirements>,
    ) -> PolicyResult<()> {
        if self.is_tool_allowed(tool, mode_slug, custom_modes, requirements) {
            return Ok(());
        }
        Err(PolicyError::PermissionDenied {
            tool: tool.to_string(),
            mode: mode_slug.to_string(),
        })
    }

    /// Every tool currently allowed in `mode_slug`, in [`ToolName::ALL`] order.
    pub fn allowed_tools(
        &self,
        mode_slug: &str,
        custom_modes: &[ModeConfig],
        requirements: Option<&ToolRequirements>,
    ) -> Vec<ToolName> {
        ToolName::ALL
            .into_iter()
            .filter(|tool| {
                self.is_tool_allowed(tool.as_str(), mode_slug, custom_modes, requirements)
            })
            .collect()
    }

    /// Role text of the effective mode, if it resolves.
    pub fn role_definition<'a>(
        &'a self,
        mode_slug: &str,
        custom_modes: &'a [ModeConfig],
    ) -> Option<&'a str> {
        self.registry
            .resolve(mode_slug, custom_modes)
            .ok()
            .map(|mode| mode.role_definition.as_str())
    }

    /// Check a file path against the mode's `edit` group restriction.
    ///
    /// Only edit tools are restricted. Modes without an `edit` group, or with
    /// an unrestricted one, pass; whether the tool is allowed at all is
    /// [`Self::is_tool_allowed`]'s concern.
    pub fn check_file_access(
        &self,
        tool: &str,
        mode_slug: &str,
        custom_modes: &[ModeConfig],
        path: &str,
    ) -> PolicyResult<()> {
        let tool_name: ToolName = tool.parse()?;
        if !groups::group_tools(ToolGroup::Edit).contains(&tool_name) {
            return Ok(());
        }

        let mode = self.registry.resolve(mode_slug, custom_modes)?;
        let Some(options) = mode
            .group_entry(ToolGroup::Edit)
            .and_then(|entry| entry.options())
        else {
            return Ok(());
        };
        let Some(pattern) = options.file_regex.as_deref() else {
            return Ok(());
        };

        // Custom modes arrive unvalidated, so the pattern may not compile.
        let regex = Regex::new(pattern).map_err(|e| {
            PolicyError::InvalidMode(ModeValidationError::InvalidFileRegex {
                slug: mode.slug.clone(),
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
        })?;

        if regex.is_match(path) {
            return Ok(());
        }

        tracing::debug!(tool, mode = mode_slug, path, pattern, "File outside edit restriction");
        Err(PolicyError::FileRestricted {
            tool: tool.to_string(),
            mode: mode_slug.to_string(),
            pattern: pattern.to_string(),
            description: options.description.clone(),
            path: path.to_string(),
        })
    }
}

/// Whether `tool` may be used in `mode_slug`, using the built-in modes.
pub fn is_tool_allowed(
    tool: &str,
    mode_slug: &str,
    custom_modes: &[ModeConfig],
    requirements: Option<&ToolRequirements>,
) -> bool {
    ToolPolicy::builtin().is_tool_allowed(tool, mode_slug, custom_modes, requirements)
}

/// Fail with `Tool "<tool>" is not allowed in <mode> mode.` when denied.
pub fn enforce(
    tool: &str,
    mode_slug: &str,
    custom_modes: &[ModeConfig],
    requirements: Option<&ToolRequirements>,
) -> PolicyResult<()> {
    ToolPolicy::builtin().enforce(tool, mode_slug, custom_modes, requirements)
}
