mod check;
mod list;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "modegate", about = "Mode-based tool authorization")]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Workspace whose .modegate/modes.json5 supplies project modes
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a tool may be used in a mode
    Check {
        /// Mode slug (e.g. "architect")
        #[arg(short, long, default_value = modegate_tools::DEFAULT_MODE_SLUG)]
        mode: String,

        /// Tool name (e.g. "write_to_file")
        #[arg(short, long)]
        tool: String,

        /// File the tool would edit, checked against the mode's file restriction
        #[arg(short, long)]
        path: Option<String>,

        /// Tools to mark unavailable; accepts `group:name`
        #[arg(short, long)]
        disable: Vec<String>,
    },
    /// List effective modes (built-in and custom)
    Modes,
    /// List the tools allowed in a mode
    Tools {
        /// Mode slug
        #[arg(short, long, default_value = modegate_tools::DEFAULT_MODE_SLUG)]
        mode: String,

        /// Tools to mark unavailable; accepts `group:name`
        #[arg(short, long)]
        disable: Vec<String>,
    },
    /// Print the tool group table
    Groups,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let workspace = cli.workspace.as_deref();

    match cli.command {
        Commands::Check {
            mode,
            tool,
            path,
            disable,
        } => {
            let custom_modes = list::load_modes(workspace)?;
            check::run_check(&mode, &tool, path.as_deref(), &disable, &custom_modes)?;
            println!("allowed");
        }
        Commands::Modes => {
            let custom_modes = list::load_modes(workspace)?;
            list::print_modes(&custom_modes);
        }
        Commands::Tools { mode, disable } => {
            let custom_modes = list::load_modes(workspace)?;
            list::print_tools(&mode, &disable, &custom_modes)?;
        }
        Commands::Groups => list::print_groups(),
    }

    Ok(())
}
