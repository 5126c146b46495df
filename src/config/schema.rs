//! Configuration schema

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Toolchain settings
    #[serde(default)]
    pub toolchain: ToolchainConfig,

    /// Project scaffolding settings
    #[serde(default)]
    pub project: ProjectConfig,
}

/// External toolchain settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Executable name of the guest toolchain
    #[serde(default = "default_program")]
    pub program: String,

    /// Minimum toolchain version accepted, as a semver requirement
    #[serde(default = "default_minimum_version")]
    pub minimum_version: String,
}

/// Generated-project settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Packages added to every manifest (version left unpinned)
    #[serde(default = "default_baseline_packages")]
    pub baseline_packages: Vec<String>,
}

fn default_program() -> String {
    "dotnet".to_string()
}

fn default_minimum_version() -> String {
    ">=2.0.0".to_string()
}

fn default_baseline_packages() -> Vec<String> {
    vec!["Newtonsoft.Json".to_string()]
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            minimum_version: default_minimum_version(),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            baseline_packages: default_baseline_packages(),
        }
    }
}
