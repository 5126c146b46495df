//! Persisted build metadata gating rebuild decisions
//!
//! A small JSON marker file lives inside the generated project directory and
//! records what the last successful build was made from. It is written only
//! after a build fully succeeds, which is the system's sole consistency
//! mechanism: any interrupted or failed pipeline leaves the marker absent or
//! stale, and the next invocation forces a clean rebuild.

use crate::error::{ForgeError, ForgeResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// File name of the metadata marker inside the project directory
pub const METADATA_FILE_NAME: &str = ".build-metadata.json";

/// Record of the last successful build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildMetadata {
    /// Build identifier supplied by the caller
    pub build_number: u64,

    /// Fingerprint of the canonical package manifest the build used
    pub manifest_fingerprint: String,

    /// Toolchain version the build ran against
    pub toolchain_version: String,

    /// When the build completed
    pub built_at: DateTime<Utc>,
}

/// Store managing the metadata marker file
///
/// Loads lazily: one rebuild decision does at most one read, tracked by the
/// `loaded` flag.
#[derive(Debug)]
pub struct MetadataStore {
    path: PathBuf,
    loaded: bool,
    record: Option<BuildMetadata>,
}

impl MetadataStore {
    /// Create a store for the marker at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: false,
            record: None,
        }
    }

    /// Store for the conventional marker location inside a project directory
    pub fn for_project(project_dir: &Path) -> Self {
        Self::new(project_dir.join(METADATA_FILE_NAME))
    }

    /// Whether the marker file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Last loaded record, if any
    pub fn record(&self) -> Option<&BuildMetadata> {
        self.record.as_ref()
    }

    /// Read and parse the marker file
    ///
    /// Malformed content is `MetadataCorrupt`, which callers treat as
    /// "rebuild needed" rather than a fatal condition.
    pub async fn reload(&mut self) -> ForgeResult<()> {
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ForgeError::io(format!("reading {}", self.path.display()), e))?;

        let record: BuildMetadata =
            serde_json::from_str(&content).map_err(|e| ForgeError::MetadataCorrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        self.record = Some(record);
        self.loaded = true;
        Ok(())
    }

    /// Decide whether the project must be rebuilt from scratch
    ///
    /// True when the marker is absent, unreadable, or records a different
    /// manifest fingerprint or toolchain version than the current invocation.
    /// False only when everything matches.
    pub async fn needs_rebuild(
        &mut self,
        current_fingerprint: &str,
        current_toolchain_version: &str,
    ) -> bool {
        if !self.exists() {
            debug!("Build metadata marker does not exist");
            return true;
        }

        if !self.loaded {
            if let Err(e) = self.reload().await {
                warn!("Forcing rebuild, metadata unreadable: {}", e);
                return true;
            }
        }

        let Some(record) = &self.record else {
            return true;
        };

        if record.manifest_fingerprint.is_empty() {
            debug!("Stored manifest fingerprint is empty");
            return true;
        }

        if record.manifest_fingerprint != current_fingerprint {
            debug!(
                "Manifest fingerprint {} differs from {}",
                record.manifest_fingerprint, current_fingerprint
            );
            return true;
        }

        if record.toolchain_version != current_toolchain_version {
            debug!(
                "Toolchain version {} differs from {}",
                record.toolchain_version, current_toolchain_version
            );
            return true;
        }

        false
    }

    /// Overwrite the marker with a fresh record
    ///
    /// Writes to a temp sibling and renames it over the marker, so a reader
    /// never observes a partially written record.
    pub async fn save(
        &mut self,
        build_number: u64,
        manifest_fingerprint: impl Into<String>,
        toolchain_version: impl Into<String>,
    ) -> ForgeResult<()> {
        let record = BuildMetadata {
            build_number,
            manifest_fingerprint: manifest_fingerprint.into(),
            toolchain_version: toolchain_version.into(),
            built_at: Utc::now(),
        };

        let content = serde_json::to_string_pretty(&record)?;
        let tmp = self.path.with_file_name(format!("{}.tmp", METADATA_FILE_NAME));

        fs::write(&tmp, &content)
            .await
            .map_err(|e| ForgeError::io(format!("writing {}", tmp.display()), e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| ForgeError::io(format!("renaming {}", tmp.display()), e))?;

        debug!("Saved build metadata to {}", self.path.display());
        self.record = Some(record);
        self.loaded = true;
        Ok(())
    }
}
