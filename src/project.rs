//! Project lifecycle orchestration
//!
//! Owns one cache entry for the duration of one invocation and decides
//! whether the generated project can be reused or must be rebuilt from
//! scratch. Reuse and rebuild are mutually exclusive; a rebuild always nukes
//! the prior project subtree first so no mixed-version artifacts survive.
//!
//! There is no internal locking. Exactly one orchestrator may operate on a
//! given cache entry at a time; concurrent invocations against the same
//! script fingerprint are a precondition violation on the caller.

use crate::error::{ForgeError, ForgeResult};
use crate::manifest::PackageManifest;
use crate::metadata::MetadataStore;
use crate::toolchain::Toolchain;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

/// A file materialized verbatim under the project directory during rebuild
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub relative_path: PathBuf,
    pub content: String,
}

/// Drives the create/add-package/restore/write/build/run pipeline
pub struct ProjectOrchestrator<T: Toolchain> {
    toolchain: T,
    manifest: PackageManifest,
    project_dir: PathBuf,
    metadata: MetadataStore,
    build_number: u64,
    baseline_packages: Vec<String>,
    generated_files: Vec<GeneratedFile>,
    // Filled by prepare(); build() refuses to run without them so metadata is
    // only ever saved against the version actually gate-checked.
    toolchain_version: Option<String>,
    manifest_fingerprint: Option<String>,
}

impl<T: Toolchain> ProjectOrchestrator<T> {
    pub fn new(
        toolchain: T,
        manifest: PackageManifest,
        project_dir: PathBuf,
        build_number: u64,
        baseline_packages: Vec<String>,
    ) -> Self {
        let metadata = MetadataStore::for_project(&project_dir);
        Self {
            toolchain,
            manifest,
            project_dir,
            metadata,
            build_number,
            baseline_packages,
            generated_files: Vec::new(),
            toolchain_version: None,
            manifest_fingerprint: None,
        }
    }

    /// Register a file to create inside the project on the rebuild path
    ///
    /// Files are written in registration order. They are not replayed when a
    /// cached project is reused: generated files are immutable once the
    /// project has been accepted as valid.
    pub fn add_generated_file(&mut self, relative_path: impl Into<PathBuf>, content: impl Into<String>) {
        self.generated_files.push(GeneratedFile {
            relative_path: relative_path.into(),
            content: content.into(),
        });
    }

    /// Manifest as it stands, including any injected baseline packages
    pub fn manifest(&self) -> &PackageManifest {
        &self.manifest
    }

    /// Gate on the toolchain version, then reuse or rebuild the project
    pub async fn prepare(&mut self) -> ForgeResult<()> {
        let version = self.toolchain.version().await?;
        if !self.toolchain.validate_version().await? {
            return Err(ForgeError::UnsupportedToolchain { version });
        }
        debug!("Toolchain version {}", version);

        // Injection mutates the manifest and therefore its fingerprint, so a
        // change to the baseline set is itself cache-invalidating.
        for name in self.baseline_packages.clone() {
            if !self.manifest.contains(&name) {
                self.manifest.put(name, None);
            }
        }
        let fingerprint = self.manifest.fingerprint();

        let reuse = self.project_dir.exists()
            && self.metadata.exists()
            && !self.metadata.needs_rebuild(&fingerprint, &version).await;

        if reuse {
            info!("Reusing cached project at {}", self.project_dir.display());
        } else {
            info!("Rebuilding project at {}", self.project_dir.display());
            self.rebuild().await?;
        }

        self.toolchain_version = Some(version);
        self.manifest_fingerprint = Some(fingerprint);
        Ok(())
    }

    /// Compile the project and, on success, persist fresh build metadata
    ///
    /// A build failure propagates without touching metadata, so the next
    /// invocation retries with a full rebuild instead of trusting a stale
    /// project.
    pub async fn build(&mut self) -> ForgeResult<()> {
        let version = self
            .toolchain_version
            .clone()
            .ok_or_else(|| ForgeError::Internal("build invoked before prepare".to_string()))?;
        let fingerprint = self
            .manifest_fingerprint
            .clone()
            .ok_or_else(|| ForgeError::Internal("build invoked before prepare".to_string()))?;

        self.toolchain.build().await?;
        self.metadata.save(self.build_number, fingerprint, version).await
    }

    /// Execute the built project
    ///
    /// Failure surfaces to the caller; metadata stays intact because a built
    /// project with a failing run is still a reusable cache entry.
    pub async fn run(&self) -> ForgeResult<()> {
        self.toolchain.run().await
    }

    async fn rebuild(&mut self) -> ForgeResult<()> {
        if self.project_dir.exists() {
            fs::remove_dir_all(&self.project_dir).await.map_err(|e| {
                ForgeError::io(format!("removing {}", self.project_dir.display()), e)
            })?;
        }
        fs::create_dir_all(&self.project_dir).await.map_err(|e| {
            ForgeError::io(format!("creating {}", self.project_dir.display()), e)
        })?;

        self.toolchain.create_project().await?;

        for (name, version) in self.manifest.entries() {
            self.toolchain.add_package(name, version).await?;
        }

        self.toolchain.restore().await?;
        self.write_generated_files().await
    }

    async fn write_generated_files(&self) -> ForgeResult<()> {
        for file in &self.generated_files {
            let target = self.project_dir.join(&file.relative_path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ForgeError::io(format!("creating {}", parent.display()), e))?;
            }
            fs::write(&target, &file.content)
                .await
                .map_err(|e| ForgeError::io(format!("writing {}", target.display()), e))?;
            debug!("Wrote generated file {}", target.display());
        }
        Ok(())
    }
}
