//! # Function Bundler
//!
//! Compiles one ES module of exported functions into a deployable serverless
//! bundle.
//!
//! ## Pipeline
//!
//! 1. **Parse** (`parse`): oxc parses the module; top-level statements are
//!    lowered into an owned `SyntaxTree` with byte spans.
//! 2. **Classify** (`classify`): every `export function name(a, b) {}` becomes a
//!    `Route`, every `import` a `DependencyImport`. Any other export shape is a
//!    compile error (`FB-ERR-UNSUPPORTED-EXPORT`), as is a repeated route path.
//! 3. **Generate** (`codegen`): a CommonJS dispatcher re-declares each route
//!    function and exposes `exports.handler`, which switches on
//!    `event.pathParameters.proxy` and binds `event.queryStringParameters` to
//!    parameters by name.
//! 4. **Assemble** (`bundle`): `index.js` plus one `<package>.js` per
//!    non-relative import, fetched concurrently, zipped deterministically.
//!
//! Upload and deploy (`deploy`) sit outside the pipeline and only see the
//! finished archive.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};

pub mod bundle;
pub mod classify;
pub mod codegen;
pub mod config;
pub mod deploy;
pub mod error;
pub mod parse;
pub mod registry;

#[cfg(test)]
mod codegen_tests;
#[cfg(test)]
mod parse_tests;

pub use bundle::{assemble_bundle, Bundle, ENTRY_FILE};
pub use classify::{DependencyImport, Route};
pub use config::DeployConfig;
pub use error::{CompilerError, ErrorKind};
pub use registry::{PackageSource, StaticPackages, UnpkgRegistry};

/// Everything the compile step produces before packaging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct CompiledModule {
    pub routes: Vec<Route>,
    pub imports: Vec<DependencyImport>,
    pub document: String,
}

/// Parse, classify and generate the dispatcher for one module.
pub fn compile_module(source: &str) -> Result<CompiledModule, CompilerError> {
    let tree = parse::parse_module(source)?;
    let classification = classify::classify_declarations(&tree, source)?;
    let document = codegen::generate_dispatcher(&classification.routes, &classification.imports);
    Ok(CompiledModule {
        routes: classification.routes,
        imports: classification.imports,
        document,
    })
}

/// Compile a module and assemble its archive.
pub async fn build_bundle<S: PackageSource>(
    source: &str,
    packages: &S,
) -> Result<Bundle, CompilerError> {
    let compiled = compile_module(source)?;
    assemble_bundle(
        &compiled.document,
        &compiled.imports,
        compiled.routes,
        packages,
    )
    .await
}

#[cfg(feature = "napi")]
#[napi]
pub fn compile_module_native(source: String) -> napi::Result<CompiledModule> {
    compile_module(&source).map_err(|e| napi::Error::from_reason(e.to_string()))
}
