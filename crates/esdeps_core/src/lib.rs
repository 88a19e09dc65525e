//! Dependency graphs for ES modules.
//!
//! Starting from entry files, the walker parses each module, records which
//! names it exports and which names it pulls from every module it imports,
//! and follows local imports depth-first. Library code (anything resolved into
//! `node_modules`, plus built-in modules) is recorded as a dependency but never
//! opened.
//!
//! - Parsing and declaration extraction with oxc
//! - Node-style specifier resolution with oxc_resolver
//! - Glob and exact-path exclusion
//! - Two output shapes: the full graph or a per-file dependency summary

mod collector;
mod config;
mod constants;
mod error;
mod exclude;
mod extractor;
mod fs;
mod parser;
mod resolver;
mod types;
mod walker;

// Re-export public API
pub use collector::collect_entries;
pub use config::{GraphOptions, ParserOptions, ResolveOptions, SourceKind, read_tsconfig_paths};
pub use constants::{LIBRARY_DIRS, MODULE_EXTENSIONS, RESOLVE_EXTENSIONS, STRICT_EXTENSIONS};
pub use error::{GraphError, GraphResult, ResolveFailure};
pub use exclude::{ExcludeFilter, is_excluded};
pub use extractor::extract_facts;
pub use fs::{FileSystem, NativeFileSystem};
pub use parser::{ModuleParser, OxcModuleParser, ParseFailure, parse_module};
pub use resolver::{NodeResolver, SpecifierResolver, is_library_path, make_relative};
pub use types::{
    DEFAULT_TOKEN, DependencyGraph, DependencySummary, GraphOutput, ModuleFacts, NAMESPACE_TOKEN,
    OutputMode,
};
pub use walker::{DependencyWalker, get_dependencies, get_dependency_output};
