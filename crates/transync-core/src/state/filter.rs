//! Path filters for state and sync commands

use glob::Pattern;

use crate::{Error, Result};

fn compile(pattern: Option<&str>) -> Result<Option<Pattern>> {
    pattern
        .map(|p| {
            Pattern::new(p).map_err(|e| Error::InvalidPattern {
                pattern: p.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
}

/// Glob patterns over store paths and backend paths
///
/// An absent pattern matches every path. A pairing passes the filter when
/// each given pattern matches its own side.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    pootle_path: Option<Pattern>,
    fs_path: Option<Pattern>,
}

impl PathFilter {
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] for a malformed glob.
    pub fn new(pootle_path: Option<&str>, fs_path: Option<&str>) -> Result<Self> {
        Ok(Self {
            pootle_path: compile(pootle_path)?,
            fs_path: compile(fs_path)?,
        })
    }

    /// Filter that matches everything
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.pootle_path.is_none() && self.fs_path.is_none()
    }

    pub fn matches(&self, pootle_path: &str, fs_path: &str) -> bool {
        let side = |pattern: &Option<Pattern>, path: &str| {
            pattern.as_ref().map(|p| p.matches(path)).unwrap_or(true)
        };
        side(&self.pootle_path, pootle_path) && side(&self.fs_path, fs_path)
    }
}
