//! Constants for file extensions and resolution defaults.
//!
//! Extension handling lives here so parsing, resolution and entry collection
//! agree on what counts as a module file.
//!
//! ## Extension lists
//!
//! - `MODULE_EXTENSIONS` are bare (no dot) and drive entry collection.
//! - `RESOLVE_EXTENSIONS` carry the leading dot because `oxc_resolver` expects it.
//! - `TYPESCRIPT_EXTENSIONS` switch the parser into TypeScript mode.

/// File extensions treated as module sources when expanding directories
pub const MODULE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

/// Extensions that enable TypeScript syntax in the parser
pub const TYPESCRIPT_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

/// Extensions that always enable JSX, whatever the parser options say
pub const JSX_EXTENSIONS: &[&str] = &["jsx", "tsx"];

/// Extensions to try when resolving module imports (in priority order)
pub const RESOLVE_EXTENSIONS: &[&str] =
    &[".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx", ".mts", ".cts", ".json"];

/// Extensions whose parse failures abort the whole run
pub const STRICT_EXTENSIONS: &[&str] = &["js"];

/// Directory names that mark a resolved path as an external library
pub const LIBRARY_DIRS: &[&str] = &["node_modules"];

/// package.json fields consulted for a package entry point
pub const MAIN_FIELDS: &[&str] = &["module", "main"];

/// Export conditions honoured when a package declares an `exports` map
pub const CONDITION_NAMES: &[&str] = &["import", "module", "default"];
