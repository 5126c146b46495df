//! Toolchain abstraction
//!
//! One trait method per external invocation. Every non-query operation fails
//! with `ForgeError::ToolchainCommand { step, code }` on a non-zero exit, and
//! is never retried: a failing step is the script's or manifest's fault and
//! must surface to the caller unchanged.

use crate::error::ForgeResult;
use async_trait::async_trait;

/// Abstract guest toolchain interface
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Scaffold a fresh project, removing anything at the target path first
    async fn create_project(&self) -> ForgeResult<()>;

    /// Add a package reference; `None` version uses the toolchain's "latest" form
    async fn add_package(&self, name: &str, version: Option<&str>) -> ForgeResult<()>;

    /// Restore declared dependencies
    async fn restore(&self) -> ForgeResult<()>;

    /// Compile the project
    async fn build(&self) -> ForgeResult<()>;

    /// Execute the compiled project
    async fn run(&self) -> ForgeResult<()>;

    /// Query the installed toolchain version
    ///
    /// Read once per invocation, never cached process-wide, so a toolchain
    /// upgrade between invocations is always observed.
    async fn version(&self) -> ForgeResult<String>;

    /// Whether the installed toolchain satisfies the supported-version policy
    async fn validate_version(&self) -> ForgeResult<bool>;
}
