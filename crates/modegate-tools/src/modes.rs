//! Built-in mode registry and custom mode resolution.
//!
//! Resolution order for a slug: caller-supplied custom modes (first match),
//! then the built-in registry. A custom mode sharing a built-in slug replaces
//! the built-in definition entirely; groups are never merged.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use modegate_types::{ModeConfig, ToolGroup, ToolName};

use crate::error::{PolicyError, PolicyResult};
use crate::groups;

/// Mode used when a caller has not picked one.
pub const DEFAULT_MODE_SLUG: &str = "code";

static BUILTIN_MODES: Lazy<ModeRegistry> = Lazy::new(|| {
    ModeRegistry::new(builtin_modes()).expect("built-in mode table is valid")
});

fn builtin_modes() -> Vec<ModeConfig> {
    use ToolGroup::*;

    let mut code = ModeConfig::new(
        "code",
        "Code",
        "You are a highly skilled software engineer with extensive knowledge in many \
         programming languages, frameworks, design patterns, and best practices.",
        [Read, Edit, Browser, Command, Mcp, Modes],
    );
    code.when_to_use =
        Some("Writing, modifying, or refactoring code in any language or framework.".into());

    let mut architect = ModeConfig::new(
        "architect",
        "Architect",
        "You are an experienced technical leader who is inquisitive and an excellent planner. \
         Your goal is to gather information and get context to create a detailed plan.",
        [Read, Browser, Mcp, Modes],
    );
    architect.when_to_use =
        Some("Planning, designing, or strategizing before implementation.".into());

    let mut ask = ModeConfig::new(
        "ask",
        "Ask",
        "You are a knowledgeable technical assistant focused on answering questions and \
         providing information about software development, technology, and related topics.",
        [Read, Browser, Mcp, Modes],
    );
    ask.when_to_use = Some("Explanations, documentation, or answers to technical questions.".into());

    let mut debug = ModeConfig::new(
        "debug",
        "Debug",
        "You are an expert software debugger specializing in systematic problem diagnosis \
         and resolution.",
        [Read, Edit, Browser, Command, Mcp, Modes],
    );
    debug.when_to_use = Some("Troubleshooting issues, investigating errors, or diagnosing problems.".into());

    let mut orchestrator = ModeConfig::new(
        "orchestrator",
        "Orchestrator",
        "You are a strategic workflow orchestrator who coordinates complex tasks by \
         delegating them to appropriate specialized modes.",
        [Modes],
    );
    orchestrator.when_to_use =
        Some("Complex, multi-step work that spans several specialties.".into());

    vec![code, architect, ask, debug, orchestrator]
}

/// An immutable, validated set of mode definitions.
#[derive(Debug, Clone)]
pub struct ModeRegistry {
    modes: Vec<ModeConfig>,
}

impl ModeRegistry {
    /// Build a registry, validating every mode and rejecting duplicate slugs.
    pub fn new(modes: Vec<ModeConfig>) -> PolicyResult<Self> {
        let mut seen = HashSet::new();
        for mode in &modes {
            mode.validate()?;
            if !seen.insert(mode.slug.as_str()) {
                return Err(PolicyError::DuplicateMode(mode.slug.clone()));
            }
        }
        Ok(Self { modes })
    }

    /// The process-wide built-in registry.
    pub fn builtin() -> &'static ModeRegistry {
        &BUILTIN_MODES
    }

    /// Registered modes, in registration order.
    pub fn modes(&self) -> &[ModeConfig] {
        &self.modes
    }

    /// Look up a registered mode by slug.
    pub fn lookup(&self, slug: &str) -> Option<&ModeConfig> {
        self.modes.iter().find(|mode| mode.slug == slug)
    }

    /// Resolve the effective definition of `slug`.
    ///
    /// The first custom mode with a matching slug wins; otherwise the
    /// registered mode is used. No fallback mode is substituted.
    pub fn resolve<'a>(
        &'a self,
        slug: &str,
        custom_modes: &'a [ModeConfig],
    ) -> PolicyResult<&'a ModeConfig> {
        if let Some(custom) = custom_modes.iter().find(|mode| mode.slug == slug) {
            tracing::trace!(mode = %slug, "Resolved custom mode");
            return Ok(custom);
        }
        self.lookup(slug)
            .ok_or_else(|| PolicyError::UnknownMode(slug.to_string()))
    }

    /// Every effective mode: registered modes in order (custom overrides
    /// substituted in place), followed by new custom modes in caller order.
    pub fn all_modes(&self, custom_modes: &[ModeConfig]) -> Vec<ModeConfig> {
        let mut seen = HashSet::new();
        let mut result = Vec::with_capacity(self.modes.len() + custom_modes.len());

        for builtin in &self.modes {
            let effective = custom_modes
                .iter()
                .find(|mode| mode.slug == builtin.slug)
                .unwrap_or(builtin);
            seen.insert(builtin.slug.as_str());
            result.push(effective.clone());
        }

        for custom in custom_modes {
            if seen.insert(custom.slug.as_str()) {
                result.push(custom.clone());
            }
        }

        result
    }
}

/// Look up a built-in mode by slug.
pub fn lookup_mode(slug: &str) -> Option<&'static ModeConfig> {
    ModeRegistry::builtin().lookup(slug)
}

/// Union of the tools granted by `mode`'s groups, in group order, without duplicates.
pub fn tools_for_mode(mode: &ModeConfig) -> Vec<ToolName> {
    let mut tools = Vec::new();
    for entry in &mode.groups {
        for tool in groups::group_tools(entry.group()) {
            if !tools.contains(tool) {
                tools.push(*tool);
            }
        }
    }
    tools
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(slug: &str, groups: impl IntoIterator<Item = ToolGroup>) -> ModeConfig {
        ModeConfig::new(slug, slug, "Custom role", groups)
    }

    #[test]
    fn test_builtin_registry() {
        let slugs: Vec<&str> = ModeRegistry::builtin()
            .modes()
            .iter()
            .map(|m| m.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["code", "architect", "ask", "debug", "orchestrator"]);
        assert!(lookup_mode(DEFAULT_MODE_SLUG).is_some());
    }

    #[test]
    fn test_lookup_mode() {
        let architect = lookup_mode("architect").unwrap();
        assert_eq!(architect.name, "Architect");
        assert!(architect.group_entry(ToolGroup::Edit).is_none());
        assert!(lookup_mode("nonexistent").is_none());
    }

    #[test]
    fn test_registry_rejects_duplicate_slug() {
        let result = ModeRegistry::new(vec![custom("a", []), custom("a", [ToolGroup::Read])]);
        assert_eq!(result.unwrap_err(), PolicyError::DuplicateMode("a".into()));
    }

    #[test]
    fn test_registry_rejects_invalid_mode() {
        let result = ModeRegistry::new(vec![custom("bad slug", [])]);
        assert!(matches!(result, Err(PolicyError::InvalidMode(_))));
    }

    #[test]
    fn test_resolve_builtin() {
        let registry = ModeRegistry::builtin();
        let mode = registry.resolve("ask", &[]).unwrap();
        assert_eq!(mode.slug, "ask");
    }

    #[test]
    fn test_resolve_custom_replaces_builtin() {
        let registry = ModeRegistry::builtin();
        let overrides = vec![custom("code", [ToolGroup::Read])];
        let mode = registry.resolve("code", &overrides).unwrap();
        assert_eq!(mode.groups.len(), 1);
        assert_eq!(mode.role_definition, "Custom role");
    }

    #[test]
    fn test_resolve_first_custom_match_wins() {
        let registry = ModeRegistry::builtin();
        let overrides = vec![custom("dup", [ToolGroup::Read]), custom("dup", [ToolGroup::Edit])];
        let mode = registry.resolve("dup", &overrides).unwrap();
        assert_eq!(mode.groups[0].group(), ToolGroup::Read);
    }

    #[test]
    fn test_resolve_unknown_mode() {
        let registry = ModeRegistry::builtin();
        assert_eq!(
            registry.resolve("nonexistent", &[]).unwrap_err(),
            PolicyError::UnknownMode("nonexistent".into())
        );
    }

    #[test]
    fn test_all_modes_substitutes_and_appends() {
        let registry = ModeRegistry::builtin();
        let overrides = vec![
            custom("reviewer", [ToolGroup::Read]),
            custom("ask", [ToolGroup::Read]),
            custom("reviewer", [ToolGroup::Edit]),
        ];
        let all = registry.all_modes(&overrides);
        let slugs: Vec<&str> = all.iter().map(|m| m.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec!["code", "architect", "ask", "debug", "orchestrator", "reviewer"]
        );
        assert_eq!(all[2].role_definition, "Custom role");
        assert_eq!(all[5].groups[0].group(), ToolGroup::Read);
    }

    #[test]
    fn test_tools_for_mode() {
        let architect = lookup_mode("architect").unwrap();
        let tools = tools_for_mode(architect);
        assert!(tools.contains(&ToolName::ReadFile));
        assert!(tools.contains(&ToolName::BrowserAction));
        assert!(!tools.contains(&ToolName::WriteToFile));
        assert_eq!(tools[0], ToolName::ReadFile);
    }

    #[test]
    fn test_tools_for_empty_mode() {
        assert!(tools_for_mode(&custom("empty", [])).is_empty());
    }
}
