//! Manifest parsing for project configuration files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use transync_fs::{ConfigStore, NormalizedPath};

use crate::mapping::{DEFAULT_POOTLE_MAPPING, PathMapping};
use crate::{Error, Result};

fn default_pootle_mapping() -> String {
    DEFAULT_POOTLE_MAPPING.to_string()
}

fn default_state_dir() -> String {
    ".transync".to_string()
}

/// Project identity
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectSection {
    /// Project code, substituted for `<project_code>` in mappings
    #[serde(default)]
    pub code: String,
}

/// Backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FsSection {
    /// Registered backend type: "localfs" or "git"
    #[serde(rename = "type", default)]
    pub fs_type: String,

    /// Backend location; relative paths resolve against the manifest directory
    #[serde(default)]
    pub url: String,

    /// Backend-side path template
    #[serde(default)]
    pub translation_mapping: String,

    /// Store-side path template
    #[serde(default = "default_pootle_mapping")]
    pub pootle_mapping: String,
}

impl FsSection {
    pub fn new(fs_type: impl Into<String>, url: impl Into<String>, translation_mapping: impl Into<String>) -> Self {
        Self {
            fs_type: fs_type.into(),
            url: url.into(),
            translation_mapping: translation_mapping.into(),
            pootle_mapping: default_pootle_mapping(),
        }
    }

    fn is_configured(&self) -> bool {
        !self.fs_type.trim().is_empty() && !self.url.trim().is_empty()
    }
}

/// Tracking store location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackingSection {
    /// Directory holding the tracking store and the project lock
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
}

impl Default for TrackingSection {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
        }
    }
}

/// Parsed project manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs: Option<FsSection>,

    #[serde(default)]
    pub tracking: TrackingSection,
}

impl ProjectConfig {
    /// Parse a manifest from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let config: ProjectConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load a manifest, detecting its format from the extension
    pub fn load(path: &Path) -> Result<Self> {
        let config = ConfigStore::new().load(&NormalizedPath::new(path))?;
        Ok(config)
    }

    /// Write the manifest back atomically in the format of its extension
    pub fn save(&self, path: &Path) -> Result<()> {
        ConfigStore::new().save(&NormalizedPath::new(path), self)?;
        Ok(())
    }

    /// The backend section, if it names both a type and a location
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] naming `manifest_path` otherwise.
    pub fn fs_section(&self, manifest_path: &Path) -> Result<&FsSection> {
        match &self.fs {
            Some(fs) if fs.is_configured() && !fs.translation_mapping.trim().is_empty() => Ok(fs),
            _ => Err(Error::NotConfigured {
                path: manifest_path.to_path_buf(),
            }),
        }
    }

    /// Build the path mapping for this project
    pub fn mapping(&self, manifest_path: &Path) -> Result<PathMapping> {
        let fs = self.fs_section(manifest_path)?;
        PathMapping::new(&self.project.code, &fs.translation_mapping, &fs.pootle_mapping)
    }

    /// Point the project at another backend.
    ///
    /// Keeps the existing mappings. Returns whether the type or location
    /// actually changed.
    pub fn set_fs(&mut self, fs_type: &str, url: &str) -> bool {
        match &mut self.fs {
            Some(fs) => {
                let changed = fs.fs_type != fs_type || fs.url != url;
                fs.fs_type = fs_type.to_string();
                fs.url = url.to_string();
                changed
            }
            None => {
                self.fs = Some(FsSection::new(fs_type, url, ""));
                true
            }
        }
    }

    /// Directory of the tracking store, resolved against `base_dir`
    pub fn state_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.tracking.state_dir)
    }
}
