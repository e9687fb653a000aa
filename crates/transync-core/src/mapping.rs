//! Path mapping between store paths and backend paths
//!
//! A mapping is a pair of templates, one per side, built from placeholders
//! such as `<language_code>` or `<filename>`. A path translates to the other
//! side by matching it against its own template and rendering the captured
//! values into the other one.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

/// Store-side template used when a project does not configure one
pub const DEFAULT_POOTLE_MAPPING: &str = "/<language_code>/<project_code>/<dir_path><filename>.<ext>";

const DIR_PATH: &str = "dir_path";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<([a-z_]+)>").unwrap());

fn placeholder_pattern(name: &str) -> &'static str {
    match name {
        DIR_PATH => "(?:[^/]+/)*",
        "ext" => "[^/.]+",
        "filename" => "[^/]+?",
        _ => "[^/]+",
    }
}

#[derive(Debug, Clone)]
enum Part {
    Literal(String),
    Placeholder(String),
}

/// One side of a mapping
#[derive(Debug, Clone)]
struct Template {
    source: String,
    parts: Vec<Part>,
    matcher: Regex,
}

impl Template {
    fn parse(source: &str, project_code: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidMapping {
            template: source.to_string(),
            reason,
        };
        let expanded = source.replace("<project_code>", project_code);

        let mut parts = Vec::new();
        let mut seen = BTreeSet::new();
        let mut pattern = String::from("^");
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(&expanded) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let literal = &expanded[last..whole.start()];
            if !literal.is_empty() {
                pattern.push_str(&regex::escape(literal));
                parts.push(Part::Literal(literal.to_string()));
            }
            let name = name.as_str();
            if !seen.insert(name.to_string()) {
                return Err(invalid(format!("placeholder <{}> appears more than once", name)));
            }
            pattern.push_str(&format!("(?P<{}>{})", name, placeholder_pattern(name)));
            parts.push(Part::Placeholder(name.to_string()));
            last = whole.end();
        }
        let tail = &expanded[last..];
        if !tail.is_empty() {
            pattern.push_str(&regex::escape(tail));
            parts.push(Part::Literal(tail.to_string()));
        }
        pattern.push('$');

        if !expanded.starts_with('/') {
            return Err(invalid("template must start with '/'".to_string()));
        }

        let matcher = Regex::new(&pattern).map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            source: source.to_string(),
            parts,
            matcher,
        })
    }

    fn placeholders(&self) -> BTreeSet<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Placeholder(name) => Some(name.as_str()),
                Part::Literal(_) => None,
            })
            .collect()
    }

    fn has(&self, name: &str) -> bool {
        self.placeholders().contains(name)
    }

    fn capture(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let caps = self.matcher.captures(path)?;
        let values = self
            .placeholders()
            .into_iter()
            .map(|name| {
                let value = caps.name(name).map(|m| m.as_str()).unwrap_or_default();
                (name.to_string(), value.to_string())
            })
            .collect();
        Some(values)
    }

    fn render(&self, values: &BTreeMap<String, String>) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Literal(text) => text.as_str(),
                Part::Placeholder(name) => values.get(name).map(String::as_str).unwrap_or(""),
            })
            .collect()
    }
}

/// Bidirectional translation between store paths and backend paths
#[derive(Debug, Clone)]
pub struct PathMapping {
    fs: Template,
    pootle: Template,
}

impl PathMapping {
    /// Build a mapping from a backend template and a store template.
    ///
    /// `<project_code>` is substituted in both templates before matching.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMapping`] if a template repeats a placeholder
    /// or the two templates use different placeholders. `<dir_path>` may be
    /// used on one side only.
    pub fn new(project_code: &str, translation_mapping: &str, pootle_mapping: &str) -> Result<Self> {
        let fs = Template::parse(translation_mapping, project_code)?;
        let pootle = Template::parse(pootle_mapping, project_code)?;

        let fs_names: BTreeSet<&str> = fs.placeholders().into_iter().filter(|n| *n != DIR_PATH).collect();
        let pootle_names: BTreeSet<&str> =
            pootle.placeholders().into_iter().filter(|n| *n != DIR_PATH).collect();
        if fs_names != pootle_names {
            let missing: Vec<String> = fs_names
                .symmetric_difference(&pootle_names)
                .map(|n| format!("<{}>", n))
                .collect();
            return Err(Error::InvalidMapping {
                template: translation_mapping.to_string(),
                reason: format!(
                    "placeholders differ from '{}': {}",
                    pootle_mapping,
                    missing.join(", ")
                ),
            });
        }

        Ok(Self { fs, pootle })
    }

    pub fn translation_mapping(&self) -> &str {
        &self.fs.source
    }

    pub fn pootle_mapping(&self) -> &str {
        &self.pootle.source
    }

    /// Store path paired with a backend path, if the path matches the
    /// backend template.
    pub fn fs_to_pootle(&self, fs_path: &str) -> Option<String> {
        Self::translate(&self.fs, &self.pootle, fs_path)
    }

    /// Backend path paired with a store path, if the path matches the store
    /// template.
    pub fn pootle_to_fs(&self, pootle_path: &str) -> Option<String> {
        Self::translate(&self.pootle, &self.fs, pootle_path)
    }

    fn translate(from: &Template, to: &Template, path: &str) -> Option<String> {
        let values = from.capture(path)?;
        let dir_path = values.get(DIR_PATH).map(String::as_str).unwrap_or("");
        if !dir_path.is_empty() && !to.has(DIR_PATH) {
            return None;
        }
        Some(to.render(&values))
    }
}
