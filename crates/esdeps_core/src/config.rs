use log::{debug, trace};
use serde::{Deserialize, Deserializer};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    constants::{CONDITION_NAMES, LIBRARY_DIRS, MAIN_FIELDS, RESOLVE_EXTENSIONS, STRICT_EXTENSIONS},
    error::{GraphError, GraphResult},
    types::OutputMode,
};

/// Options for a dependency walk.
///
/// Deserializes from the same camelCase JSON shape the CLI accepts through
/// `--config`; every field falls back to its default when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphOptions {
    /// Entry files, visited in order
    #[serde(deserialize_with = "one_or_many")]
    pub files: Vec<PathBuf>,

    /// Descend into local imports of the entry files
    pub recurse: bool,

    /// Exact paths or globs (anything containing `*`) that are never read;
    /// relative ones are anchored at the working directory
    #[serde(deserialize_with = "one_or_many")]
    pub exclude: Vec<String>,

    pub parser_options: ParserOptions,

    pub resolve_options: ResolveOptions,

    /// Extensions (without the dot) whose parse failures are fatal
    pub strict_extensions: Vec<String>,

    /// Directory names marking a resolved path as an external library
    pub library_dirs: Vec<String>,

    pub output: OutputMode,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            recurse: true,
            exclude: Vec::new(),
            parser_options: ParserOptions::default(),
            resolve_options: ResolveOptions::default(),
            strict_extensions: to_strings(STRICT_EXTENSIONS),
            library_dirs: to_strings(LIBRARY_DIRS),
            output: OutputMode::default(),
        }
    }
}

impl GraphOptions {
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { files: files.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    /// Load options from a JSON file.
    pub fn from_json_file(path: &Path) -> GraphResult<Self> {
        debug!("Loading options from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => GraphError::MissingFile { path: path.to_path_buf() },
            _ => GraphError::Io { path: path.to_path_buf(), source },
        })?;
        Self::from_json_str(&content)
            .map_err(|source| GraphError::Config { path: path.to_path_buf(), source })
    }

    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Whether a parse failure in `path` should abort the walk.
    pub fn is_strict(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.strict_extensions.iter().any(|s| s == ext))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Module,
    Script,
}

/// Language options handed to the parser.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserOptions {
    pub source_type: SourceKind,
    pub jsx: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self { source_type: SourceKind::Module, jsx: true }
    }
}

/// Options for Node-style specifier resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolveOptions {
    /// Extensions tried for extensionless specifiers, with the leading dot
    pub extensions: Vec<String>,
    /// Directory names searched for bare specifiers
    pub modules: Vec<String>,
    pub main_fields: Vec<String>,
    pub condition_names: Vec<String>,
    /// Prefix aliases, e.g. `@components` -> `["/repo/src/components"]`
    pub alias: BTreeMap<String, Vec<String>>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            extensions: to_strings(RESOLVE_EXTENSIONS),
            modules: to_strings(LIBRARY_DIRS),
            main_fields: to_strings(MAIN_FIELDS),
            condition_names: to_strings(CONDITION_NAMES),
            alias: BTreeMap::new(),
        }
    }
}

/// Collect `compilerOptions.paths` aliases from every tsconfig.json under `root`.
///
/// Wildcard suffixes are dropped on both sides, so `"@ui/*": ["src/ui/*"]`
/// becomes the prefix alias `@ui` -> `<tsconfig dir>/<baseUrl>/src/ui`.
pub fn read_tsconfig_paths(root: &Path) -> BTreeMap<String, Vec<String>> {
    debug!("Reading tsconfig paths from root: {}", root.display());
    let mut paths = BTreeMap::new();

    let walker = ignore::WalkBuilder::new(root).hidden(false).git_ignore(true).build();
    let tsconfigs: Vec<PathBuf> = walker
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name() == "tsconfig.json")
        .map(|e| e.into_path())
        .collect();
    debug!("Found {} tsconfig.json files", tsconfigs.len());

    for tsconfig in &tsconfigs {
        let Ok(content) = fs::read_to_string(tsconfig) else {
            trace!("Unreadable tsconfig: {}", tsconfig.display());
            continue;
        };
        // tsconfig allows line comments; serde_json does not
        let stripped: String = content
            .lines()
            .map(|line| line.find("//").map_or(line, |idx| &line[..idx]))
            .collect::<Vec<_>>()
            .join("\n");

        let Ok(json) = serde_json::from_str::<serde_json::Value>(&stripped) else {
            trace!("Skipping tsconfig that is not plain JSON: {}", tsconfig.display());
            continue;
        };
        let Some(compiler_options) = json.get("compilerOptions") else {
            continue;
        };
        let Some(aliases) = compiler_options.get("paths").and_then(|p| p.as_object()) else {
            continue;
        };

        let base_url = compiler_options.get("baseUrl").and_then(|b| b.as_str()).unwrap_or(".");
        let base = tsconfig.parent().unwrap_or(root).join(base_url);

        for (alias, targets) in aliases {
            let targets: Vec<String> = targets
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|t| t.as_str())
                .map(|t| path_clean::clean(base.join(t.trim_end_matches("/*"))))
                .map(|p| p.to_string_lossy().to_string())
                .collect();
            if targets.is_empty() {
                continue;
            }
            let key = alias.trim_end_matches("/*").to_string();
            trace!("tsconfig alias '{}' -> {:?}", key, targets);
            paths.insert(key, targets);
        }
    }

    debug!("Loaded {} tsconfig path aliases", paths.len());
    paths
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        One(T),
        Many(Vec<T>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(v) => vec![v],
        OneOrMany::Many(v) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    #[test]
    fn test_defaults() {
        let opts = GraphOptions::default();
        assert!(opts.files.is_empty());
        assert!(opts.recurse);
        assert!(opts.exclude.is_empty());
        assert_eq!(opts.parser_options.source_type, SourceKind::Module);
        assert!(opts.parser_options.jsx);
        assert_eq!(opts.strict_extensions, vec!["js"]);
        assert_eq!(opts.library_dirs, vec!["node_modules"]);
        assert_eq!(opts.output, OutputMode::Full);
        assert!(opts.resolve_options.extensions.contains(&".js".to_string()));
    }

    #[test]
    fn test_json_accepts_single_strings() {
        let opts = GraphOptions::from_json_str(
            r#"{ "files": "src/index.js", "exclude": "src/vendor/**/*.js", "recurse": false }"#,
        )
        .unwrap();
        assert_eq!(opts.files, vec![PathBuf::from("src/index.js")]);
        assert_eq!(opts.exclude, vec!["src/vendor/**/*.js"]);
        assert!(!opts.recurse);
        // untouched fields keep their defaults
        assert!(opts.parser_options.jsx);
    }

    #[test]
    fn test_json_nested_options() {
        let opts = GraphOptions::from_json_str(
            r#"{
                "files": ["a.js", "b.js"],
                "parserOptions": { "sourceType": "script", "jsx": false },
                "resolveOptions": { "extensions": [".es6", ".js"] },
                "strictExtensions": ["js", "mjs"],
                "output": "dependencies"
            }"#,
        )
        .unwrap();
        assert_eq!(opts.files.len(), 2);
        assert_eq!(opts.parser_options, ParserOptions { source_type: SourceKind::Script, jsx: false });
        assert_eq!(opts.resolve_options.extensions, vec![".es6", ".js"]);
        assert_eq!(opts.resolve_options.modules, vec!["node_modules"]);
        assert_eq!(opts.strict_extensions, vec!["js", "mjs"]);
        assert_eq!(opts.output, OutputMode::Dependencies);
    }

    #[test]
    fn test_from_json_file_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            GraphOptions::from_json_file(&missing),
            Err(GraphError::MissingFile { .. })
        ));

        let bad = create_test_file(temp_dir.path(), "bad.json", "{ not json");
        assert!(matches!(GraphOptions::from_json_file(&bad), Err(GraphError::Config { .. })));
    }

    #[test]
    fn test_is_strict_compares_extension() {
        let opts = GraphOptions::default();
        assert!(opts.is_strict(Path::new("/src/index.js")));
        assert!(!opts.is_strict(Path::new("/src/index.jsx")));
        assert!(!opts.is_strict(Path::new("/src/index.es6")));
        assert!(!opts.is_strict(Path::new("/src/.js")));
        assert!(!opts.is_strict(Path::new("/src/Makefile")));
    }

    #[test]
    fn test_read_tsconfig_paths() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        create_test_file(
            root,
            "tsconfig.json",
            r#"
{
  // comment
  "compilerOptions": {
    "baseUrl": "src",
    "paths": {
      "@components/*": ["components/*"], // trailing comment
      "@utils": ["utils"]
    }
  }
}
"#,
        );
        create_test_file(
            root,
            "apps/web/tsconfig.json",
            r#"{ "compilerOptions": { "target": "ES2020" } }"#,
        );

        let paths = read_tsconfig_paths(root);
        assert_eq!(paths.len(), 2);
        assert!(!paths.contains_key("@components/*"));
        let components = &paths["@components"];
        assert_eq!(components.len(), 1);
        assert!(components[0].ends_with("src/components"));
        assert!(paths["@utils"][0].ends_with("src/utils"));
    }

    #[test]
    fn test_read_tsconfig_paths_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_tsconfig_paths(temp_dir.path()).is_empty());
    }
}
