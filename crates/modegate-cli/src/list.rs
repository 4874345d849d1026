use std::path::Path;

use anyhow::Context;

use modegate_tools::{ModeRegistry, ToolPolicy, groups, tools_for_mode};
use modegate_types::{ModeConfig, ModeSource, ToolGroup};

use crate::check::disabled_requirements;

/// Load custom modes from the global and workspace config files.
pub fn load_modes(workspace: Option<&Path>) -> anyhow::Result<Vec<ModeConfig>> {
    let modes =
        modegate_config::load_custom_modes(workspace).context("Failed to load custom modes")?;
    tracing::debug!(count = modes.len(), "Custom modes loaded");
    Ok(modes)
}

pub fn print_modes(custom_modes: &[ModeConfig]) {
    for mode in ModeRegistry::builtin().all_modes(custom_modes) {
        let origin = match mode.source {
            Some(ModeSource::Global) => "global",
            Some(ModeSource::Project) => "project",
            None => "built-in",
        };
        let group_names: Vec<&str> = mode.groups.iter().map(|g| g.group().as_str()).collect();
        println!("{} ({}) [{}]", mode.slug, origin, group_names.join(", "));
        println!("  {}", mode.name);
        if let Some(when) = &mode.when_to_use {
            println!("  when: {when}");
        }
        println!("  tools: {}", tools_for_mode(&mode).len());
    }
}

pub fn print_tools(
    mode: &str,
    disable: &[String],
    custom_modes: &[ModeConfig],
) -> anyhow::Result<()> {
    let policy = ToolPolicy::builtin();
    policy.registry().resolve(mode, custom_modes)?;

    let requirements = disabled_requirements(disable).context("Invalid --disable value")?;
    for tool in policy.allowed_tools(mode, custom_modes, Some(&requirements)) {
        println!("{tool}");
    }
    Ok(())
}

pub fn print_groups() {
    for group in ToolGroup::ALL {
        let tools: Vec<&str> = groups::group_tools(group).iter().map(|t| t.as_str()).collect();
        println!("{group}: {}", tools.join(", "));
    }
}
