use anyhow::Context;

use modegate_tools::groups;
use modegate_tools::{PolicyResult, ToolPolicy};
use modegate_types::{ModeConfig, ToolRequirements};

/// Build a requirement map marking every named tool unavailable.
pub fn disabled_requirements(disable: &[String]) -> PolicyResult<ToolRequirements> {
    let tools = groups::expand_names(disable)?;
    Ok(tools.into_iter().map(|tool| (tool, false)).collect())
}

/// Enforce `tool` in `mode`, then the file restriction when `path` is given.
pub fn run_check(
    mode: &str,
    tool: &str,
    path: Option<&str>,
    disable: &[String],
    custom_modes: &[ModeConfig],
) -> anyhow::Result<()> {
    let requirements = disabled_requirements(disable).context("Invalid --disable value")?;
    let policy = ToolPolicy::builtin();

    policy.enforce(tool, mode, custom_modes, Some(&requirements))?;
    if let Some(path) = path {
        policy.check_file_access(tool, mode, custom_modes, path)?;
    }
    Ok(())
}
