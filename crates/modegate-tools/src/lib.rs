//! modegate-tools: Mode-based tool authorization.
//!
//! Provides:
//! - Tool group registry (read, edit, browser, command, mcp, modes)
//! - Built-in mode registry and custom mode resolution
//! - Permission evaluation (`is_tool_allowed`) and enforcement (`enforce`)
//! - Per-mode file restrictions for edit tools

pub mod error;
pub mod groups;
pub mod modes;
pub mod policy;

pub use error::{PolicyError, PolicyResult};
pub use modes::{DEFAULT_MODE_SLUG, ModeRegistry, lookup_mode, tools_for_mode};
pub use policy::{ToolPolicy, enforce, is_tool_allowed};
