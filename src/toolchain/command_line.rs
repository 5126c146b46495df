//! Command-line toolchain runner
//!
//! Executes the guest toolchain as a child process in the cache entry
//! directory, inheriting the caller-supplied environment map and streaming
//! output straight to the job log. Each call blocks until the process exits;
//! pipeline steps never overlap.

use crate::config::ToolchainConfig;
use crate::error::{ForgeError, ForgeResult};
use crate::toolchain::runner::Toolchain;
use async_trait::async_trait;
use semver::{Version, VersionReq};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};

/// Toolchain runner backed by an external executable
pub struct CommandLineToolchain {
    program: String,
    minimum_version: VersionReq,
    workspace: PathBuf,
    project_name: String,
    env: HashMap<String, String>,
}

impl CommandLineToolchain {
    /// Create a runner rooted at the given cache entry directory
    pub fn new(
        config: &ToolchainConfig,
        workspace: PathBuf,
        project_name: impl Into<String>,
        env: HashMap<String, String>,
    ) -> ForgeResult<Self> {
        let minimum_version = VersionReq::parse(&config.minimum_version).map_err(|e| {
            ForgeError::Internal(format!(
                "invalid minimum_version requirement '{}': {}",
                config.minimum_version, e
            ))
        })?;

        Ok(Self {
            program: config.program.clone(),
            minimum_version,
            workspace,
            project_name: project_name.into(),
            env,
        })
    }

    /// Directory of the generated project inside the workspace
    pub fn project_dir(&self) -> PathBuf {
        self.workspace.join(&self.project_name)
    }

    fn require_project_dir(&self) -> ForgeResult<PathBuf> {
        let dir = self.project_dir();
        if !dir.exists() {
            return Err(ForgeError::ProjectDirMissing(dir));
        }
        Ok(dir)
    }

    /// Run one toolchain subcommand to completion, streaming output to the log
    async fn exec(&self, step: &str, args: &[&str], cwd: &Path) -> ForgeResult<()> {
        debug!("Executing: {} {:?} in {}", self.program, args, cwd.display());

        let status = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ForgeError::command_failed(format!("{} {:?}", self.program, args), e))?;

        if status.success() {
            Ok(())
        } else {
            Err(ForgeError::toolchain(step, status.code().unwrap_or(-1)))
        }
    }
}

/// Check a raw version report against a supported-version requirement
///
/// Only the first non-blank line is considered; an unparseable report counts
/// as unsupported rather than an error.
pub fn version_satisfies(raw: &str, requirement: &VersionReq) -> bool {
    let Some(line) = raw.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return false;
    };

    match Version::parse(line) {
        Ok(version) => requirement.matches(&version),
        Err(e) => {
            warn!("Unparseable toolchain version '{}': {}", line, e);
            false
        }
    }
}

#[async_trait]
impl Toolchain for CommandLineToolchain {
    async fn create_project(&self) -> ForgeResult<()> {
        let target = self.project_dir();

        // A stray file or a stale directory at the target would corrupt the
        // scaffold, so the slate is cleared first.
        if target.is_dir() {
            fs::remove_dir_all(&target)
                .await
                .map_err(|e| ForgeError::io(format!("removing {}", target.display()), e))?;
        } else if target.exists() {
            fs::remove_file(&target)
                .await
                .map_err(|e| ForgeError::io(format!("removing {}", target.display()), e))?;
        }

        self.exec(
            "create",
            &["new", "console", "-n", &self.project_name],
            &self.workspace,
        )
        .await
    }

    async fn add_package(&self, name: &str, version: Option<&str>) -> ForgeResult<()> {
        let dir = self.require_project_dir()?;
        match version {
            Some(version) => {
                self.exec("add-package", &["add", "package", name, "-v", version], &dir)
                    .await
            }
            None => self.exec("add-package", &["add", "package", name], &dir).await,
        }
    }

    async fn restore(&self) -> ForgeResult<()> {
        let dir = self.require_project_dir()?;
        self.exec("restore", &["restore"], &dir).await
    }

    async fn build(&self) -> ForgeResult<()> {
        let dir = self.require_project_dir()?;
        self.exec("build", &["build"], &dir).await
    }

    async fn run(&self) -> ForgeResult<()> {
        let dir = self.require_project_dir()?;
        self.exec("run", &["run"], &dir).await
    }

    async fn version(&self) -> ForgeResult<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ForgeError::command_failed(format!("{} --version", self.program), e))?;

        if !output.status.success() {
            return Err(ForgeError::toolchain(
                "version",
                output.status.code().unwrap_or(-1),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn validate_version(&self) -> ForgeResult<bool> {
        let reported = self.version().await?;
        Ok(version_satisfies(&reported, &self.minimum_version))
    }
}
