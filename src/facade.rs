//! Invocation entry point
//!
//! Wires the manifest, toolchain runner, orchestrator and result bridge into
//! one `run_all` call: script text plus manifest JSON in, captured
//! environment map out. The cache entry directory is derived from the script
//! fingerprint, so each distinct script gets its own disposable project.

use crate::config::Config;
use crate::error::{ForgeError, ForgeResult};
use crate::fingerprint::fingerprint;
use crate::manifest::PackageManifest;
use crate::project::{GeneratedFile, ProjectOrchestrator};
use crate::results;
use crate::toolchain::CommandLineToolchain;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Directory under the workspace root holding all cache entries
pub const CACHE_DIR_NAME: &str = ".scriptforge";

/// Name of the generated project directory inside a cache entry
pub const PROJECT_DIR_NAME: &str = "project";

/// File name the submitted script is written to inside the project
pub const SCRIPT_FILE_NAME: &str = "TargetCode.cs";

/// One complete run of a script against a workspace
pub struct ForgeInvocation {
    workspace: PathBuf,
    env: HashMap<String, String>,
    build_number: u64,
    config: Config,
    companion_files: Vec<GeneratedFile>,
}

impl ForgeInvocation {
    pub fn new(
        workspace: PathBuf,
        env: HashMap<String, String>,
        build_number: u64,
        config: Config,
    ) -> Self {
        Self {
            workspace,
            env,
            build_number,
            config,
            companion_files: Vec::new(),
        }
    }

    /// Register an extra file to scaffold next to the script, e.g. a host
    /// support shim the script compiles against
    pub fn add_companion_file(&mut self, relative_path: impl Into<PathBuf>, content: impl Into<String>) {
        self.companion_files.push(GeneratedFile {
            relative_path: relative_path.into(),
            content: content.into(),
        });
    }

    /// Cache entry directory for the given script text
    pub fn cache_entry_dir(&self, script: &str) -> PathBuf {
        self.workspace
            .join(CACHE_DIR_NAME)
            .join(fingerprint(script.as_bytes()))
    }

    /// Compile and execute the script, returning the captured environment map
    pub async fn run_all(
        &self,
        script: &str,
        packages_json: &str,
    ) -> ForgeResult<BTreeMap<String, String>> {
        let manifest = PackageManifest::parse(packages_json)?;

        let cache_entry = self.cache_entry_dir(script);
        fs::create_dir_all(&cache_entry)
            .await
            .map_err(|e| ForgeError::io(format!("creating {}", cache_entry.display()), e))?;
        debug!("Cache entry: {}", cache_entry.display());

        let toolchain = CommandLineToolchain::new(
            &self.config.toolchain,
            cache_entry.clone(),
            PROJECT_DIR_NAME,
            self.env.clone(),
        )?;
        let project_dir = cache_entry.join(PROJECT_DIR_NAME);

        let mut orchestrator = ProjectOrchestrator::new(
            toolchain,
            manifest,
            project_dir.clone(),
            self.build_number,
            self.config.project.baseline_packages.clone(),
        );

        for file in &self.companion_files {
            orchestrator.add_generated_file(file.relative_path.clone(), file.content.clone());
        }
        orchestrator.add_generated_file(SCRIPT_FILE_NAME, script);

        orchestrator.prepare().await?;
        orchestrator.build().await?;
        orchestrator.run().await?;

        self.bridge_results(&project_dir).await
    }

    async fn bridge_results(&self, project_dir: &Path) -> ForgeResult<BTreeMap<String, String>> {
        let Some(document) = results::read_result_file(project_dir).await? else {
            info!("No result artifact emitted by the script");
            return Ok(BTreeMap::new());
        };

        let environment = results::extract_environment(&document)?;
        if environment.is_empty() {
            info!("Result artifact has no {} section", results::SAVED_ENVIRONMENT_KEY);
        } else {
            info!("Captured {} environment variables", environment.len());
        }
        Ok(environment)
    }
}
