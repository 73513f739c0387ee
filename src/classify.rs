//! Declaration classifier
//!
//! Splits a module's top-level declarations into routes (exported functions)
//! and dependency imports, in source order.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CompilerError, ErrorKind};
use crate::parse::{span_location, DeclarationKind, ImportBinding, SyntaxTree};

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Function name, also the URL path segment it is served under.
    pub path: String,
    pub params: Vec<String>,
    /// Verbatim source of the function declaration.
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct DependencyImport {
    pub package: String,
    pub import_code: Vec<String>,
}

impl DependencyImport {
    /// Local files are left to the deploy target; only packages are vendored.
    pub fn is_relative(&self) -> bool {
        self.package.starts_with('.')
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub routes: Vec<Route>,
    pub imports: Vec<DependencyImport>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION
// ═══════════════════════════════════════════════════════════════════════════════

pub fn classify_declarations(
    tree: &SyntaxTree,
    source: &str,
) -> Result<Classification, CompilerError> {
    let mut out = Classification::default();
    // path -> line of its first declaration
    let mut seen_paths: HashMap<String, u32> = HashMap::new();

    for decl in &tree.declarations {
        let (line, column) = span_location(source, decl.span);
        match &decl.kind {
            DeclarationKind::ExportedFunction {
                name,
                params,
                function_span,
            } => {
                if let Some(first_line) = seen_paths.get(name) {
                    return Err(CompilerError::with_context(
                        ErrorKind::DuplicateRoute,
                        &format!(
                            "Route `{}` is already declared on line {}",
                            name, first_line
                        ),
                        line,
                        column,
                        Some(decl.span.slice(source).to_string()),
                    ));
                }
                seen_paths.insert(name.clone(), line);
                out.routes.push(Route {
                    path: name.clone(),
                    params: params.clone(),
                    code: function_span.slice(source).to_string(),
                });
            }
            DeclarationKind::Import { source: package, bindings } => {
                out.imports.push(DependencyImport {
                    package: package.clone(),
                    import_code: bindings
                        .iter()
                        .map(|binding| require_line(package, binding))
                        .collect(),
                });
            }
            DeclarationKind::UnsupportedExport { shape } => {
                return Err(CompilerError::with_context(
                    ErrorKind::UnsupportedExport,
                    &format!("Unsupported export: {}", shape.describe()),
                    line,
                    column,
                    Some(decl.span.slice(source).to_string()),
                ));
            }
            DeclarationKind::Other => {}
        }
    }

    Ok(out)
}

/// Builds the CommonJS line standing in for one import binding. The path is
/// prefixed with `./` so vendored packages resolve to their archive entry.
pub fn require_line(package: &str, binding: &ImportBinding) -> String {
    match binding {
        ImportBinding::Named { imported, local } => {
            if is_identifier_name(imported) {
                format!("const {} = require(\"./{}\").{}", local, package, imported)
            } else {
                format!(
                    "const {} = require(\"./{}\")[{}]",
                    local,
                    package,
                    serde_json::Value::String(imported.clone())
                )
            }
        }
        ImportBinding::Default { local } | ImportBinding::Namespace { local } => {
            format!("const {} = require(\"./{}\")", local, package)
        }
    }
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
