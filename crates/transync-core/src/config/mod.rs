//! Project configuration
//!
//! A project is described by one manifest file, TOML by default. JSON and
//! YAML manifests are accepted by extension.
//!
//! # Example
//!
//! ```toml
//! [project]
//! code = "proj"
//!
//! [fs]
//! type = "git"
//! url = "../translations"
//! translation_mapping = "/<language_code>/<filename>.<ext>"
//!
//! [tracking]
//! state_dir = ".transync"
//! ```

mod manifest;

pub use manifest::{FsSection, ProjectConfig, ProjectSection, TrackingSection};
