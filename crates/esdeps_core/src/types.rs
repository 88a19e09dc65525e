use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};

/// Sentinel token for default imports and exports.
pub const DEFAULT_TOKEN: &str = "default";

/// Sentinel token for namespace imports and aggregate re-exports.
pub const NAMESPACE_TOKEN: &str = "*";

/// Import and export facts extracted from a single module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleFacts {
    /// Names the module exports, in declaration order.
    pub exports: Vec<String>,
    /// Specifier to name tokens, in first-seen order.
    pub imports: Vec<(String, Vec<String>)>,
}

impl ModuleFacts {
    /// Appends `tokens` to the entry for `specifier`, creating it if needed.
    pub fn add_imports<I>(&mut self, specifier: &str, tokens: I)
    where
        I: IntoIterator<Item = String>,
    {
        match self.imports.iter_mut().find(|(s, _)| s == specifier) {
            Some((_, existing)) => existing.extend(tokens),
            None => self.imports.push((specifier.to_string(), tokens.into_iter().collect())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exports.is_empty() && self.imports.is_empty()
    }
}

/// Which shape a finished walk is reported in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Imports, exports, loaded files and soft failures.
    #[default]
    Full,
    /// Only the import map and loaded files.
    Dependencies,
}

/// The merged result of a dependency walk.
///
/// Every list is sorted, and map keys iterate in path order, so two walks over
/// the same tree serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGraph {
    pub imports: BTreeMap<PathBuf, Vec<String>>,
    pub exports: BTreeMap<PathBuf, Vec<String>>,
    pub loaded_files: BTreeSet<PathBuf>,
    pub stats: Vec<String>,
}

/// Reduced projection without per-file export attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencySummary {
    pub dependencies: BTreeMap<PathBuf, Vec<String>>,
    pub loaded_files: BTreeSet<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GraphOutput {
    Full(DependencyGraph),
    Dependencies(DependencySummary),
}

impl DependencyGraph {
    pub fn into_summary(self) -> DependencySummary {
        DependencySummary { dependencies: self.imports, loaded_files: self.loaded_files }
    }

    pub fn into_output(self, mode: OutputMode) -> GraphOutput {
        match mode {
            OutputMode::Full => GraphOutput::Full(self),
            OutputMode::Dependencies => GraphOutput::Dependencies(self.into_summary()),
        }
    }
}
