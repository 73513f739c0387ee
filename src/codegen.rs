//! Codegen module for the function bundler
//!
//! Renders the dispatcher script (`index.js`) from routes and dependency
//! imports. Output is a pure function of its inputs: no timestamps, no hash
//! maps, no ids. Reproducible archives depend on that.

use crate::classify::{DependencyImport, Route};

// ═══════════════════════════════════════════════════════════════════════════════
// TEMPLATE FRAGMENTS
// ═══════════════════════════════════════════════════════════════════════════════

const RESPOND_HELPER: &str = r#"function __respond(body, status) {
    return {
        statusCode: status,
        body: JSON.stringify(body)
    }
}"#;

const HANDLER_OPEN: &str = r#"exports.handler = async (event, context) => {
    const path = event.pathParameters.proxy;
    switch (path) {"#;

const HANDLER_CLOSE: &str = "
    }
};
";

// ═══════════════════════════════════════════════════════════════════════════════
// GENERATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Generate the dispatcher document.
///
/// Layout: require-lines, route functions verbatim, the `__respond` helper, and
/// an async `handler` that switches on `event.pathParameters.proxy`. Unknown
/// paths fall out of the switch without a response.
pub fn generate_dispatcher(routes: &[Route], imports: &[DependencyImport]) -> String {
    let require_lines = imports
        .iter()
        .flat_map(|import| import.import_code.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n");

    let functions = routes
        .iter()
        .map(|route| route.code.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let cases = routes
        .iter()
        .map(dispatch_case)
        .collect::<Vec<_>>()
        .join("\n");

    let mut out = String::new();
    out.push('\n');
    out.push_str(&require_lines);
    out.push('\n');
    out.push_str(&functions);
    out.push_str("\n\n");
    out.push_str(RESPOND_HELPER);
    out.push_str("\n\n");
    out.push_str(HANDLER_OPEN);
    out.push_str(&cases);
    out.push_str(HANDLER_CLOSE);
    out
}

/// Call arguments bound positionally from the query string.
pub fn call_arguments(params: &[String]) -> String {
    params
        .iter()
        .map(|p| format!("event.queryStringParameters.{}", p))
        .collect::<Vec<_>>()
        .join(", ")
}

fn dispatch_case(route: &Route) -> String {
    format!(
        "\n            case \"{path}\":\n                return __respond(await {path}({args}), 200)",
        path = route.path,
        args = call_arguments(&route.params)
    )
}
