//! Status command - report the installed toolchain version

use crate::config::Config;
use crate::error::{ForgeError, ForgeResult};
use crate::facade::PROJECT_DIR_NAME;
use crate::toolchain::{CommandLineToolchain, Toolchain};
use console::style;
use std::collections::HashMap;
use std::env;

/// Execute the status command
pub async fn execute(config: &Config) -> ForgeResult<()> {
    let cwd = env::current_dir().map_err(|e| ForgeError::io("getting current directory", e))?;
    let toolchain =
        CommandLineToolchain::new(&config.toolchain, cwd, PROJECT_DIR_NAME, HashMap::new())?;

    let version = toolchain.version().await?;
    println!("Toolchain: {}", config.toolchain.program);
    println!("Version:   {}", version);

    if toolchain.validate_version().await? {
        println!(
            "Policy:    {} ({})",
            style("supported").green(),
            config.toolchain.minimum_version
        );
        Ok(())
    } else {
        println!(
            "Policy:    {} ({})",
            style("unsupported").red(),
            config.toolchain.minimum_version
        );
        Err(ForgeError::UnsupportedToolchain { version })
    }
}
