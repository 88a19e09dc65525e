use ignore::WalkBuilder;
use log::{debug, trace};
use std::{
    io,
    path::{Path, PathBuf},
};

use crate::{
    constants::MODULE_EXTENSIONS,
    error::{GraphError, GraphResult},
};

/// Expand a list of paths into entry files.
///
/// Files are kept as given, even when their extension is not a module
/// extension. Directories are walked (honoring `.gitignore`) for module files,
/// skipping `*.test.*` and `*.spec.*`, and contribute them in sorted order.
pub fn collect_entries(paths: &[PathBuf]) -> GraphResult<Vec<PathBuf>> {
    debug!("Collecting entry files from {} paths", paths.len());
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(collect_dir(path)?);
        } else {
            files.push(path.clone());
        }
    }

    debug!("Collected {} entry files", files.len());
    Ok(files)
}

fn collect_dir(root: &Path) -> GraphResult<Vec<PathBuf>> {
    debug!("Walking directory tree from root: {}", root.display());
    let walker = WalkBuilder::new(root).hidden(false).ignore(true).git_ignore(true).build();
    let mut files = Vec::new();

    for res in walker {
        let dent = res.map_err(|e| GraphError::Io { path: root.to_path_buf(), source: io::Error::other(e) })?;
        let p = dent.path();
        if !p.is_file() {
            continue;
        }

        let path_str = p.to_string_lossy();
        if path_str.contains(".test.") || path_str.contains(".spec.") {
            trace!("Skipping test file: {}", path_str);
            continue;
        }

        if let Some(ext) = p.extension().and_then(|e| e.to_str())
            && MODULE_EXTENSIONS.contains(&ext)
        {
            trace!("Found entry file: {}", p.display());
            files.push(p.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}
