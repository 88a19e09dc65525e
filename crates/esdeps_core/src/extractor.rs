//! Import and export facts from a module's top-level declarations.
//!
//! Only ES module syntax is considered. `require()` and dynamic `import()` are
//! ignored, and TypeScript-only constructs (type imports, `export type`,
//! interfaces, `declare` statements) contribute nothing because they are
//! erased before the module runs.

use log::trace;
use oxc_ast::ast::*;

use crate::types::{DEFAULT_TOKEN, ModuleFacts, NAMESPACE_TOKEN};

/// Collect local exports and the name tokens pulled from each specifier.
///
/// Tokens for a specifier referenced by several declarations are concatenated
/// in source order; duplicates are left for the merge step to collapse.
pub fn extract_facts(program: &Program) -> ModuleFacts {
    let mut facts = ModuleFacts::default();

    for stmt in &program.body {
        match stmt {
            Statement::ImportDeclaration(decl) => import_declaration(decl, &mut facts),
            Statement::ExportDefaultDeclaration(_) => {
                facts.exports.push(DEFAULT_TOKEN.to_string());
            }
            Statement::ExportAllDeclaration(decl) => export_all_declaration(decl, &mut facts),
            Statement::ExportNamedDeclaration(decl) => export_named_declaration(decl, &mut facts),
            _ => {}
        }
    }

    trace!(
        "Extracted {} exports and {} specifiers",
        facts.exports.len(),
        facts.imports.len()
    );
    facts
}

fn import_declaration(decl: &ImportDeclaration, facts: &mut ModuleFacts) {
    if decl.import_kind.is_type() {
        return;
    }
    let source = decl.source.value.as_str();

    let Some(specifiers) = &decl.specifiers else {
        // import './polyfills'
        facts.add_imports(source, Vec::new());
        return;
    };

    let tokens: Vec<String> = specifiers
        .iter()
        .filter_map(|spec| match spec {
            ImportDeclarationSpecifier::ImportSpecifier(s) if s.import_kind.is_type() => None,
            ImportDeclarationSpecifier::ImportSpecifier(s) => Some(s.imported.name().to_string()),
            ImportDeclarationSpecifier::ImportDefaultSpecifier(_) => Some(DEFAULT_TOKEN.to_string()),
            ImportDeclarationSpecifier::ImportNamespaceSpecifier(_) => {
                Some(NAMESPACE_TOKEN.to_string())
            }
        })
        .collect();

    // import { type A, type B } from './types'
    if tokens.is_empty() && !specifiers.is_empty() {
        return;
    }
    facts.add_imports(source, tokens);
}

fn export_all_declaration(decl: &ExportAllDeclaration, facts: &mut ModuleFacts) {
    if decl.export_kind.is_type() {
        return;
    }
    let local = match &decl.exported {
        Some(name) => name.name().to_string(),
        None => NAMESPACE_TOKEN.to_string(),
    };
    facts.exports.push(local);
    facts.add_imports(decl.source.value.as_str(), vec![NAMESPACE_TOKEN.to_string()]);
}

fn export_named_declaration(decl: &ExportNamedDeclaration, facts: &mut ModuleFacts) {
    if decl.export_kind.is_type() {
        return;
    }

    if let Some(declaration) = &decl.declaration {
        facts.exports.extend(declared_names(declaration));
        return;
    }

    let specifiers = decl.specifiers.iter().filter(|s| !s.export_kind.is_type());
    match &decl.source {
        None => facts.exports.extend(specifiers.map(|s| s.exported.name().to_string())),
        Some(source) => {
            let (exported, local): (Vec<String>, Vec<String>) = specifiers
                .map(|s| (s.exported.name().to_string(), s.local.name().to_string()))
                .unzip();
            facts.exports.extend(exported);
            facts.add_imports(source.value.as_str(), local);
        }
    }
}

fn declared_names(declaration: &Declaration) -> Vec<String> {
    if declaration.is_typescript_syntax() {
        return Vec::new();
    }
    match declaration {
        Declaration::FunctionDeclaration(f) => f.id.iter().map(|id| id.name.to_string()).collect(),
        Declaration::ClassDeclaration(c) => c.id.iter().map(|id| id.name.to_string()).collect(),
        Declaration::VariableDeclaration(vd) => vd
            .declarations
            .iter()
            .flat_map(|d| d.id.get_binding_identifiers())
            .map(|id| id.name.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::ParserOptions, parser::OxcModuleParser, parser::parse_module};
    use crate::types::ModuleFacts;
    use std::path::Path;

    fn facts_for(file: &str, source: &str) -> ModuleFacts {
        let parser = OxcModuleParser::new(ParserOptions::default());
        parse_module(&parser, source, Path::new(file)).expect("source should parse")
    }

    fn facts(source: &str) -> ModuleFacts {
        facts_for("test.js", source)
    }

    fn imports_of<'a>(facts: &'a ModuleFacts, specifier: &str) -> Option<&'a Vec<String>> {
        facts.imports.iter().find(|(s, _)| s == specifier).map(|(_, t)| t)
    }

    #[test]
    fn test_no_module_syntax() {
        let f = facts("const x = 42;\nfunction run() { return x; }");
        assert!(f.is_empty());
    }

    #[test]
    fn test_default_import() {
        let f = facts("import foo from './foo';");
        assert_eq!(imports_of(&f, "./foo").unwrap(), &vec!["default"]);
        assert!(f.exports.is_empty());
    }

    #[test]
    fn test_namespace_import() {
        let f = facts("import * as utils from './utils';");
        assert_eq!(imports_of(&f, "./utils").unwrap(), &vec!["*"]);
    }

    #[test]
    fn test_named_import_uses_imported_name() {
        let f = facts("import { map, filter as keep } from 'lodash';");
        assert_eq!(imports_of(&f, "lodash").unwrap(), &vec!["map", "filter"]);
    }

    #[test]
    fn test_default_and_named_in_one_declaration() {
        let f = facts("import React, { useState } from 'react';");
        assert_eq!(imports_of(&f, "react").unwrap(), &vec!["default", "useState"]);
    }

    #[test]
    fn test_duplicate_declarations_are_concatenated() {
        let f = facts("import { map } from 'lodash';\nimport { filter, map as m } from 'lodash';");
        assert_eq!(f.imports.len(), 1);
        assert_eq!(imports_of(&f, "lodash").unwrap(), &vec!["map", "filter", "map"]);
    }

    #[test]
    fn test_side_effect_import_registers_specifier() {
        let f = facts("import './polyfills';");
        assert_eq!(imports_of(&f, "./polyfills").unwrap(), &Vec::<String>::new());
    }

    #[test]
    fn test_specifier_order_is_first_seen() {
        let f = facts("import b from './b';\nimport a from './a';\nimport { x } from './b';");
        let order: Vec<&str> = f.imports.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(order, vec!["./b", "./a"]);
    }

    #[test]
    fn test_export_default() {
        let f = facts("export default function () {}");
        assert_eq!(f.exports, vec!["default"]);
        assert!(f.imports.is_empty());
    }

    #[test]
    fn test_export_declarations() {
        let f = facts(
            "export function run() {}\nexport class Task {}\nexport const a = 1, b = 2;\nexport let { c, d: [e] } = obj;",
        );
        assert_eq!(f.exports, vec!["run", "Task", "a", "b", "c", "e"]);
    }

    #[test]
    fn test_export_specifiers_use_exported_name() {
        let f = facts("const x = 1, y = 2;\nexport { x, y as why };");
        assert_eq!(f.exports, vec!["x", "why"]);
        assert!(f.imports.is_empty());
    }

    #[test]
    fn test_export_from_registers_local_names() {
        let f = facts("export { map, filter as filt } from 'lodash';");
        assert_eq!(f.exports, vec!["map", "filt"]);
        assert_eq!(imports_of(&f, "lodash").unwrap(), &vec!["map", "filter"]);
    }

    #[test]
    fn test_export_default_from() {
        let f = facts("export { default } from './a';\nexport { default as B } from './b';");
        assert_eq!(f.exports, vec!["default", "B"]);
        assert_eq!(imports_of(&f, "./a").unwrap(), &vec!["default"]);
        assert_eq!(imports_of(&f, "./b").unwrap(), &vec!["default"]);
    }

    #[test]
    fn test_export_all() {
        let f = facts("export * from 'lodash';");
        assert_eq!(f.exports, vec!["*"]);
        assert_eq!(imports_of(&f, "lodash").unwrap(), &vec!["*"]);
    }

    #[test]
    fn test_export_all_as_namespace() {
        let f = facts("export * as _ from 'lodash';");
        assert_eq!(f.exports, vec!["_"]);
        assert_eq!(imports_of(&f, "lodash").unwrap(), &vec!["*"]);
    }

    #[test]
    fn test_import_and_export_from_same_specifier_merge() {
        let f = facts("import { map } from 'lodash';\nexport { filter } from 'lodash';");
        assert_eq!(f.imports.len(), 1);
        assert_eq!(imports_of(&f, "lodash").unwrap(), &vec!["map", "filter"]);
        assert_eq!(f.exports, vec!["filter"]);
    }

    #[test]
    fn test_require_and_dynamic_import_ignored() {
        let f = facts("const fs = require('fs');\nimport('./lazy');");
        assert!(f.is_empty());
    }

    #[test]
    fn test_type_only_imports_skipped() {
        let f = facts_for(
            "test.ts",
            "import type { Foo } from './types';\nimport { type Bar } from './bar';\nimport { type Baz, qux } from './mixed';",
        );
        assert!(imports_of(&f, "./types").is_none());
        assert!(imports_of(&f, "./bar").is_none());
        assert_eq!(imports_of(&f, "./mixed").unwrap(), &vec!["qux"]);
    }

    #[test]
    fn test_typescript_only_exports_ignored() {
        let f = facts_for(
            "test.ts",
            "export interface Props { a: string }\nexport type Id = string;\nexport declare const env: string;\nexport type { Props as P } from './props';\nexport const real = 1;",
        );
        assert_eq!(f.exports, vec!["real"]);
        assert!(f.imports.is_empty());
    }

    #[test]
    fn test_string_module_export_names() {
        let f = facts("import { 'a-b' as ab } from './names';\nexport { ab as 'c-d' };");
        assert_eq!(imports_of(&f, "./names").unwrap(), &vec!["a-b"]);
        assert_eq!(f.exports, vec!["c-d"]);
    }
}
