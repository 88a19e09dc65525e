use log::trace;
use oxc_allocator::Allocator;
use oxc_ast::ast::{Program, Statement};
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use std::{fmt, path::Path};

use crate::{
    config::{ParserOptions, SourceKind},
    constants::{JSX_EXTENSIONS, TYPESCRIPT_EXTENSIONS},
    extractor::extract_facts,
    types::ModuleFacts,
};

/// Syntax errors reported by a [`ModuleParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub message: String,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Turns module source text into an oxc syntax tree.
///
/// The tree borrows from `allocator` and `source`, so it lives only as long as
/// the caller keeps both around.
pub trait ModuleParser: Send + Sync + fmt::Debug {
    fn parse<'a>(
        &self,
        allocator: &'a Allocator,
        source: &'a str,
        path: &Path,
    ) -> Result<Program<'a>, ParseFailure>;
}

/// [`ModuleParser`] backed by `oxc_parser`.
///
/// Any diagnostic, recoverable or not, counts as a failure.
#[derive(Debug, Clone, Default)]
pub struct OxcModuleParser {
    options: ParserOptions,
}

impl OxcModuleParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }
}

impl ModuleParser for OxcModuleParser {
    fn parse<'a>(
        &self,
        allocator: &'a Allocator,
        source: &'a str,
        path: &Path,
    ) -> Result<Program<'a>, ParseFailure> {
        let st = source_type_for(path, &self.options);
        trace!("Parsing {} as {:?}", path.display(), st);
        let ParserReturn { program, errors, panicked, .. } =
            OxcParser::new(allocator, source, st).parse();

        if panicked || !errors.is_empty() {
            let message = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ParseFailure {
                message: if message.is_empty() { "unrecoverable syntax error".into() } else { message },
            });
        }
        // oxc accepts import/export in scripts without a diagnostic
        if st.is_script() && program.body.iter().any(is_module_declaration) {
            return Err(ParseFailure {
                message: "'import' and 'export' may appear only with sourceType: module".into(),
            });
        }
        Ok(program)
    }
}

/// Parse `source` and extract its facts, dropping the syntax tree before returning.
pub fn parse_module(
    parser: &dyn ModuleParser,
    source: &str,
    path: &Path,
) -> Result<ModuleFacts, ParseFailure> {
    let allocator = Allocator::default();
    let program = parser.parse(&allocator, source, path)?;
    Ok(extract_facts(&program))
}

fn is_module_declaration(stmt: &Statement) -> bool {
    matches!(
        stmt,
        Statement::ImportDeclaration(_)
            | Statement::ExportAllDeclaration(_)
            | Statement::ExportDefaultDeclaration(_)
            | Statement::ExportNamedDeclaration(_)
            | Statement::TSExportAssignment(_)
            | Statement::TSNamespaceExportDeclaration(_)
    )
}

fn source_type_for(path: &Path, options: &ParserOptions) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

    let st = SourceType::default()
        .with_jsx(options.jsx || JSX_EXTENSIONS.contains(&ext))
        .with_typescript(TYPESCRIPT_EXTENSIONS.contains(&ext));

    match options.source_type {
        SourceKind::Module => st.with_module(true),
        SourceKind::Script => st.with_script(true),
    }
}
