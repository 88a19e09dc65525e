use futures::future::try_join_all;
use log::{debug, info, trace, warn};
use std::{
    collections::{BTreeSet, HashMap, HashSet},
    env, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    config::GraphOptions,
    error::{GraphError, GraphResult},
    exclude::ExcludeFilter,
    fs::{FileSystem, NativeFileSystem},
    parser::{ModuleParser, OxcModuleParser, ParseFailure, parse_module},
    resolver::{NodeResolver, SpecifierResolver, is_library_path},
    types::{DependencyGraph, GraphOutput},
};

/// Walk the dependency graph of `options.files` with the default parser,
/// resolver and filesystem.
pub async fn get_dependencies(options: GraphOptions) -> GraphResult<DependencyGraph> {
    DependencyWalker::new(options)?.walk().await
}

/// Like [`get_dependencies`], projected into the configured output mode.
pub async fn get_dependency_output(options: GraphOptions) -> GraphResult<GraphOutput> {
    let mode = options.output;
    Ok(get_dependencies(options).await?.into_output(mode))
}

/// Facts accumulated while walking. Only one visit runs at a time, so the
/// walker owns this outright and hands it to each visit in turn.
#[derive(Debug, Default)]
struct GraphState {
    imports: HashMap<PathBuf, BTreeSet<String>>,
    exports: HashMap<PathBuf, Vec<String>>,
    loaded_files: HashSet<PathBuf>,
    /// Files that failed to parse softly; never retried, never reported as loaded.
    soft_failed: HashSet<PathBuf>,
    stats: Vec<String>,
}

impl GraphState {
    fn is_done(&self, file: &Path) -> bool {
        self.loaded_files.contains(file) || self.soft_failed.contains(file)
    }

    fn merge(&mut self, file: PathBuf, exports: Vec<String>, resolved: Vec<(PathBuf, Vec<String>)>) {
        for (path, tokens) in resolved {
            self.imports.entry(path).or_default().extend(tokens);
        }
        self.exports.insert(file.clone(), exports);
        self.loaded_files.insert(file);
    }

    fn record_soft_failure(&mut self, file: &Path, failure: &ParseFailure) {
        self.stats.push(format!("Failed to parse {}: {}", file.display(), failure));
        self.soft_failed.insert(file.to_path_buf());
    }

    fn into_graph(self) -> DependencyGraph {
        DependencyGraph {
            imports: self
                .imports
                .into_iter()
                .map(|(path, tokens)| (path, tokens.into_iter().collect()))
                .collect(),
            exports: self
                .exports
                .into_iter()
                .map(|(path, mut names)| {
                    names.sort();
                    (path, names)
                })
                .collect(),
            loaded_files: self.loaded_files.into_iter().collect(),
            stats: self.stats,
        }
    }
}

/// Walks entry files depth-first, following only local imports.
///
/// Each file is read and parsed at most once per walk. All specifiers of the
/// file being visited are resolved concurrently; files themselves are visited
/// one after another.
#[derive(Debug, Clone)]
pub struct DependencyWalker {
    options: GraphOptions,
    exclude: ExcludeFilter,
    parser: Arc<dyn ModuleParser>,
    resolver: Arc<dyn SpecifierResolver>,
    fs: Arc<dyn FileSystem>,
    /// Base for relative entry files and exclude patterns
    cwd: PathBuf,
}

impl DependencyWalker {
    /// Fails when an exclude glob does not compile or the current directory
    /// cannot be determined.
    pub fn new(options: GraphOptions) -> GraphResult<Self> {
        let cwd = env::current_dir().map_err(|source| GraphError::Io { path: ".".into(), source })?;
        let exclude = ExcludeFilter::with_base(&options.exclude, &cwd)?;
        let parser = Arc::new(OxcModuleParser::new(options.parser_options.clone()));
        let resolver = Arc::new(NodeResolver::new(&options.resolve_options));
        Ok(Self { options, exclude, parser, resolver, fs: Arc::new(NativeFileSystem), cwd })
    }

    /// Resolve relative entries and exclude patterns against `cwd` instead of
    /// the process working directory.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> GraphResult<Self> {
        self.cwd = cwd.into();
        self.exclude = ExcludeFilter::with_base(&self.options.exclude, &self.cwd)?;
        Ok(self)
    }

    pub fn with_parser(mut self, parser: impl ModuleParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    pub fn with_resolver(mut self, resolver: impl SpecifierResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn with_file_system(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Arc::new(fs);
        self
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    pub async fn walk(&self) -> GraphResult<DependencyGraph> {
        info!(
            "Walking {} entry files (recurse: {})",
            self.options.files.len(),
            self.options.recurse
        );
        let mut state = GraphState::default();

        for entry in &self.options.files {
            let entry = absolutize(entry, &self.cwd);
            let local = self.visit(&entry, &mut state).await?;
            if !self.options.recurse {
                continue;
            }

            let mut stack: Vec<PathBuf> = local.into_iter().rev().collect();
            while let Some(file) = stack.pop() {
                let local = self.visit(&file, &mut state).await?;
                stack.extend(local.into_iter().rev());
            }
        }

        info!(
            "Loaded {} files, {} imported modules, {} soft failures",
            state.loaded_files.len(),
            state.imports.len(),
            state.stats.len()
        );
        Ok(state.into_graph())
    }

    /// Process one file and return its local imports in declaration order.
    async fn visit(&self, file: &Path, state: &mut GraphState) -> GraphResult<Vec<PathBuf>> {
        if state.is_done(file) {
            trace!("Already processed: {}", file.display());
            return Ok(Vec::new());
        }
        if self.exclude.is_excluded(file) {
            debug!("Skipping excluded file: {}", file.display());
            return Ok(Vec::new());
        }

        debug!("Visiting {}", file.display());
        let source = self.fs.read_to_string(file).await.map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => GraphError::MissingFile { path: file.to_path_buf() },
            _ => GraphError::Io { path: file.to_path_buf(), source },
        })?;

        let facts = match parse_module(self.parser.as_ref(), &source, file) {
            Ok(facts) => facts,
            Err(failure) if self.options.is_strict(file) => {
                return Err(GraphError::Parse { path: file.to_path_buf(), message: failure.message });
            }
            Err(failure) => {
                warn!("Failed to parse {}: {}", file.display(), failure);
                state.record_soft_failure(file, &failure);
                return Ok(Vec::new());
            }
        };

        let base_dir = file.parent().unwrap_or(file);
        let resolved = try_join_all(facts.imports.into_iter().map(|(specifier, tokens)| async move {
            trace!("Resolving '{}' from {}", specifier, file.display());
            match self.resolver.resolve(&specifier, base_dir).await {
                Ok(path) => Ok((path, tokens)),
                Err(e) => Err(GraphError::Resolution {
                    specifier,
                    from: file.to_path_buf(),
                    reason: e.reason,
                }),
            }
        }))
        .await?;

        let mut seen = HashSet::new();
        let local: Vec<PathBuf> = resolved
            .iter()
            .map(|(path, _)| path)
            .filter(|path| !is_library_path(file, path, &self.options.library_dirs))
            .filter(|path| seen.insert(path.as_path()))
            .cloned()
            .collect();

        debug!(
            "{}: {} exports, {} dependencies ({} local)",
            file.display(),
            facts.exports.len(),
            resolved.len(),
            local.len()
        );
        state.merge(file.to_path_buf(), facts.exports, resolved);
        Ok(local)
    }
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() { path_clean::clean(path) } else { path_clean::clean(cwd.join(path)) }
}
