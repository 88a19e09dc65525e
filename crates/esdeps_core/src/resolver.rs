use async_trait::async_trait;
use log::trace;
use oxc_resolver::{AliasValue, ResolveError, Resolver};
use std::{
    fmt,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use crate::{config::ResolveOptions, error::ResolveFailure};

/// Maps a module specifier to the file it refers to.
#[async_trait]
pub trait SpecifierResolver: Send + Sync + fmt::Debug {
    /// Resolve `specifier` as written in a file located in `base_dir`.
    async fn resolve(&self, specifier: &str, base_dir: &Path) -> Result<PathBuf, ResolveFailure>;
}

/// Node-style resolution backed by `oxc_resolver`.
///
/// Built-in modules resolve to the specifier as written (`fs` stays `fs`,
/// `node:fs` stays `node:fs`). That is never an absolute path, so built-ins
/// are always treated as external.
#[derive(Debug, Clone)]
pub struct NodeResolver {
    resolver: Arc<Resolver>,
}

impl NodeResolver {
    pub fn new(options: &ResolveOptions) -> Self {
        let alias = options
            .alias
            .iter()
            .map(|(name, targets)| {
                (name.clone(), targets.iter().cloned().map(AliasValue::Path).collect())
            })
            .collect();

        let resolver = Resolver::new(oxc_resolver::ResolveOptions {
            extensions: options.extensions.clone(),
            modules: options.modules.clone(),
            main_fields: options.main_fields.clone(),
            condition_names: options.condition_names.clone(),
            alias,
            builtin_modules: true,
            ..Default::default()
        });
        Self { resolver: Arc::new(resolver) }
    }
}

impl Default for NodeResolver {
    fn default() -> Self {
        Self::new(&ResolveOptions::default())
    }
}

#[async_trait]
impl SpecifierResolver for NodeResolver {
    async fn resolve(&self, specifier: &str, base_dir: &Path) -> Result<PathBuf, ResolveFailure> {
        let resolver = Arc::clone(&self.resolver);
        let dir = base_dir.to_path_buf();
        let request = specifier.to_string();

        // oxc_resolver hits the filesystem synchronously
        let result = tokio::task::spawn_blocking(move || resolver.resolve(&dir, &request))
            .await
            .map_err(|e| ResolveFailure::new(format!("resolver task failed: {}", e)))?;

        match result {
            Ok(resolution) => {
                trace!("Resolved '{}' to {}", specifier, resolution.path().display());
                Ok(resolution.into_path_buf())
            }
            Err(ResolveError::Builtin { resolved, .. }) => {
                // oxc_resolver reports `fs` as `node:fs`
                trace!("'{}' is a builtin module ({})", specifier, resolved);
                Ok(PathBuf::from(specifier))
            }
            Err(e) => Err(ResolveFailure::new(e.to_string())),
        }
    }
}

/// Whether `resolved`, imported from `from_file`, lives in a library directory.
///
/// The relative path from the importing file must climb out through `..`
/// components and then enter one of `library_dirs` directly, as in
/// `../../node_modules/lodash/lodash.js`. Paths that are not absolute
/// (built-in modules) always count as libraries.
pub fn is_library_path(from_file: &Path, resolved: &Path, library_dirs: &[String]) -> bool {
    if !resolved.is_absolute() {
        return true;
    }
    let Some(rel) = make_relative(resolved, from_file) else {
        return false;
    };

    let mut components = rel.components().peekable();
    let mut climbed = false;
    while let Some(Component::CurDir | Component::ParentDir) = components.peek() {
        climbed = true;
        components.next();
    }
    climbed
        && matches!(
            components.next(),
            Some(Component::Normal(name)) if library_dirs.iter().any(|d| name == d.as_str())
        )
}

/// Create a relative path from `base` to `target`.
///
/// Both paths are compared component by component; `None` when they do not
/// share a root.
pub fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();

    if target_parts.first() != base_parts.first() {
        return None;
    }

    let common = target_parts.iter().zip(&base_parts).take_while(|(t, b)| t == b).count();

    let mut result = PathBuf::new();
    for _ in &base_parts[common..] {
        result.push("..");
    }
    for component in &target_parts[common..] {
        match component {
            Component::Normal(p) => result.push(p),
            Component::ParentDir => result.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}
