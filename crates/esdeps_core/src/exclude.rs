use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log::{debug, trace};
use std::path::Path;

use crate::error::{GraphError, GraphResult};

/// Decides which files are skipped before they are read.
///
/// A pattern containing `*` is a glob matched against the whole path (`*`
/// stays within one path segment, `**` crosses them); any other pattern must
/// equal the path exactly. `*` also matches names starting with a dot.
#[derive(Debug, Clone, Default)]
pub struct ExcludeFilter {
    exact: Vec<String>,
    globs: Option<GlobSet>,
}

impl ExcludeFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> GraphResult<Self> {
        let mut exact = Vec::new();
        let mut builder = GlobSetBuilder::new();
        let mut glob_count = 0;

        for pattern in patterns.iter().map(AsRef::as_ref) {
            if !pattern.contains('*') {
                exact.push(pattern.to_string());
                continue;
            }
            let glob = GlobBuilder::new(pattern).literal_separator(true).build().map_err(|source| {
                GraphError::InvalidPattern { pattern: pattern.to_string(), source }
            })?;
            builder.add(glob);
            glob_count += 1;
        }

        let globs = if glob_count == 0 {
            None
        } else {
            Some(builder.build().map_err(|source| GraphError::InvalidPattern {
                pattern: patterns.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", "),
                source,
            })?)
        };

        debug!("Exclude filter: {} exact paths, {} globs", exact.len(), glob_count);
        Ok(Self { exact, globs })
    }

    /// Like [`ExcludeFilter::new`], with relative patterns anchored at `base`.
    ///
    /// Globs starting with `**` already match anywhere and are kept as written.
    pub fn with_base<S: AsRef<str>>(patterns: &[S], base: &Path) -> GraphResult<Self> {
        let anchored: Vec<String> = patterns.iter().map(|p| anchor(p.as_ref(), base)).collect();
        Self::new(&anchored)
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.globs.is_none()
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.is_empty() {
            return false;
        }
        let excluded = self.globs.as_ref().is_some_and(|g| g.is_match(path))
            || self.exact.iter().any(|p| Path::new(p) == path);
        if excluded {
            trace!("Excluded: {}", path.display());
        }
        excluded
    }
}

fn anchor(pattern: &str, base: &Path) -> String {
    if Path::new(pattern).is_absolute() || pattern.starts_with("**") {
        return pattern.to_string();
    }
    if !pattern.contains('*') {
        return path_clean::clean(base.join(pattern)).to_string_lossy().to_string();
    }
    let base = globset::escape(&base.to_string_lossy());
    let anchored = format!("{}/{}", base.trim_end_matches('/'), pattern.trim_start_matches("./"));
    trace!("Anchored exclude pattern '{}' as '{}'", pattern, anchored);
    anchored
}

/// One-off check of `path` against `patterns`.
pub fn is_excluded<S: AsRef<str>>(path: &Path, patterns: &[S]) -> GraphResult<bool> {
    Ok(ExcludeFilter::new(patterns)?.is_excluded(path))
}
