//! Parse Module for the function bundler
//!
//! Parses an ES module with oxc and lowers its top-level statements into an
//! owned `SyntaxTree`. The oxc arena lives only for the duration of
//! `parse_module`; everything downstream works on plain owned data.

use oxc_allocator::Allocator;
use oxc_ast::ast::{
    BindingPattern, Declaration, ExportDefaultDeclarationKind, FormalParameters,
    ImportDeclarationSpecifier, ModuleExportName, Statement,
};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use serde::{Deserialize, Serialize};

use crate::error::{line_column, CompilerError, ErrorKind};

// ═══════════════════════════════════════════════════════════════════════════════
// SYNTAX TREE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// Byte range `[start, end)` into the module source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        Self {
            start: span.start as usize,
            end: span.end as usize,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ImportBinding {
    /// `import { imported as local } from "..."`
    Named { imported: String, local: String },
    /// `import local from "..."`
    Default { local: String },
    /// `import * as local from "..."`
    Namespace { local: String },
}

/// Export shapes the dispatcher cannot route to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "shape")]
pub enum ExportShape {
    Variable,
    Class,
    DefaultExport,
    ExportList,
    StarReExport,
    AnonymousFunction,
    /// A named function with a destructured or rest parameter.
    NonIdentifierParameter { function: String },
    Other,
}

impl ExportShape {
    pub fn describe(&self) -> String {
        match self {
            ExportShape::Variable => "exported variable".to_string(),
            ExportShape::Class => "exported class".to_string(),
            ExportShape::DefaultExport => "default export".to_string(),
            ExportShape::ExportList => "export list or re-export".to_string(),
            ExportShape::StarReExport => "star re-export".to_string(),
            ExportShape::AnonymousFunction => "anonymous exported function".to_string(),
            ExportShape::NonIdentifierParameter { function } => format!(
                "function `{}` with a destructured or rest parameter",
                function
            ),
            ExportShape::Other => "unsupported exported declaration".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DeclarationKind {
    ExportedFunction {
        name: String,
        params: Vec<String>,
        /// Span of the inner function declaration, without the `export` keyword.
        function_span: SourceSpan,
    },
    Import {
        source: String,
        bindings: Vec<ImportBinding>,
    },
    UnsupportedExport {
        shape: ExportShape,
    },
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLevelDeclaration {
    pub kind: DeclarationKind,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub declarations: Vec<TopLevelDeclaration>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSING
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse module source text into a `SyntaxTree` of top-level declarations.
pub fn parse_module(source: &str) -> Result<SyntaxTree, CompilerError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();

    // Duplicate exports come from oxc's module record, after a complete parse.
    // The classifier reports them as duplicate routes with both locations.
    let errors: Vec<_> = ret
        .errors
        .iter()
        .filter(|e| !e.message.starts_with("Duplicated export"))
        .collect();

    if let Some(first) = errors.first() {
        let offset = first
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| label.offset());
        let (line, column) = offset
            .map(|offset| line_column(source, offset))
            .unwrap_or((0, 0));
        return Err(CompilerError::with_context(
            ErrorKind::Syntax,
            &format!("Failed to parse module: {}", first),
            line,
            column,
            Some(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        ));
    }
    if ret.panicked {
        return Err(CompilerError::new(
            ErrorKind::Syntax,
            "Failed to parse module: parser aborted",
            0,
            0,
        ));
    }

    let declarations = ret
        .program
        .body
        .iter()
        .map(|stmt| TopLevelDeclaration {
            kind: lower_statement(stmt),
            span: stmt.span().into(),
        })
        .collect();

    Ok(SyntaxTree { declarations })
}

fn lower_statement(stmt: &Statement) -> DeclarationKind {
    match stmt {
        Statement::ExportNamedDeclaration(export) => match &export.declaration {
            Some(Declaration::FunctionDeclaration(func)) => {
                let Some(id) = &func.id else {
                    return DeclarationKind::UnsupportedExport {
                        shape: ExportShape::AnonymousFunction,
                    };
                };
                let name = id.name.to_string();
                match parameter_names(&func.params) {
                    Some(params) => DeclarationKind::ExportedFunction {
                        name,
                        params,
                        function_span: func.span.into(),
                    },
                    None => DeclarationKind::UnsupportedExport {
                        shape: ExportShape::NonIdentifierParameter { function: name },
                    },
                }
            }
            Some(Declaration::VariableDeclaration(_)) => DeclarationKind::UnsupportedExport {
                shape: ExportShape::Variable,
            },
            Some(Declaration::ClassDeclaration(_)) => DeclarationKind::UnsupportedExport {
                shape: ExportShape::Class,
            },
            Some(_) => DeclarationKind::UnsupportedExport {
                shape: ExportShape::Other,
            },
            None => DeclarationKind::UnsupportedExport {
                shape: ExportShape::ExportList,
            },
        },
        Statement::ExportDefaultDeclaration(export) => {
            let shape = match &export.declaration {
                ExportDefaultDeclarationKind::ClassDeclaration(_) => ExportShape::Class,
                ExportDefaultDeclarationKind::FunctionDeclaration(func) if func.id.is_none() => {
                    ExportShape::AnonymousFunction
                }
                _ => ExportShape::DefaultExport,
            };
            DeclarationKind::UnsupportedExport { shape }
        }
        Statement::ExportAllDeclaration(_) => DeclarationKind::UnsupportedExport {
            shape: ExportShape::StarReExport,
        },
        Statement::ImportDeclaration(import) => {
            let bindings = import
                .specifiers
                .as_ref()
                .map(|specifiers| specifiers.iter().map(lower_specifier).collect())
                .unwrap_or_default();
            DeclarationKind::Import {
                source: import.source.value.to_string(),
                bindings,
            }
        }
        _ => DeclarationKind::Other,
    }
}

fn lower_specifier(specifier: &ImportDeclarationSpecifier) -> ImportBinding {
    match specifier {
        ImportDeclarationSpecifier::ImportSpecifier(s) => ImportBinding::Named {
            imported: module_export_name(&s.imported),
            local: s.local.name.to_string(),
        },
        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => ImportBinding::Default {
            local: s.local.name.to_string(),
        },
        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => ImportBinding::Namespace {
            local: s.local.name.to_string(),
        },
    }
}

fn module_export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::StringLiteral(s) => s.value.to_string(),
        other => other.name().to_string(),
    }
}

/// Parameter names in declaration order, or `None` when any parameter is not a
/// plain identifier.
fn parameter_names(params: &FormalParameters) -> Option<Vec<String>> {
    if params.rest.is_some() {
        return None;
    }
    params
        .items
        .iter()
        .map(|param| match &param.pattern {
            BindingPattern::BindingIdentifier(id) => Some(id.name.to_string()),
            _ => None,
        })
        .collect()
}

/// Locate a span for diagnostics.
pub fn span_location(source: &str, span: SourceSpan) -> (u32, u32) {
    line_column(source, span.start)
}
