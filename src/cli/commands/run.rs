//! Run command - compile and execute a script

use crate::cli::args::RunArgs;
use crate::config::Config;
use crate::error::{ForgeError, ForgeResult};
use crate::facade::ForgeInvocation;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Execute the run command
pub async fn execute(args: RunArgs, config: &Config) -> ForgeResult<()> {
    let script = fs::read_to_string(&args.script)
        .await
        .map_err(|e| ForgeError::io(format!("reading script {}", args.script.display()), e))?;

    let packages_json = match &args.packages {
        Some(path) => fs::read_to_string(path)
            .await
            .map_err(|e| ForgeError::io(format!("reading packages {}", path.display()), e))?,
        None => "{}".to_string(),
    };

    let workspace = resolve_workspace(&args)?;
    debug!("Workspace: {}", workspace.display());

    let host_env: HashMap<String, String> = env::vars().collect();
    let invocation = ForgeInvocation::new(workspace, host_env, args.build_number, config.clone());

    let environment = invocation.run_all(&script, &packages_json).await?;
    for (key, value) in &environment {
        println!("{}={}", key, value);
    }

    Ok(())
}

fn resolve_workspace(args: &RunArgs) -> ForgeResult<PathBuf> {
    match &args.workspace {
        Some(path) => Ok(path.clone()),
        None => env::current_dir().map_err(|e| ForgeError::io("getting current directory", e)),
    }
}
