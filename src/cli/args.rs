//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Scriptforge - run source snippets as cached toolchain projects
///
/// Compiles and executes a script inside an ephemeral generated project,
/// reusing the project across invocations when nothing relevant changed.
#[derive(Parser, Debug)]
#[command(name = "scriptforge")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SCRIPTFORGE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile and execute a script
    Run(RunArgs),

    /// Check the installed toolchain against the supported-version policy
    Status,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Script source file to compile and run
    #[arg(short, long)]
    pub script: PathBuf,

    /// JSON file mapping package name to version (null = latest)
    #[arg(short, long)]
    pub packages: Option<PathBuf>,

    /// Monotonically increasing build identifier
    #[arg(short = 'n', long, env = "SCRIPTFORGE_BUILD_NUMBER", default_value_t = 1)]
    pub build_number: u64,

    /// Workspace root holding the project cache (defaults to current directory)
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,
}
