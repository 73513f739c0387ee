#[cfg(test)]
mod tests {
    use crate::classify::{DependencyImport, Route};
    use crate::codegen::{call_arguments, generate_dispatcher};
    use pretty_assertions::assert_eq;

    fn route(path: &str, params: &[&str], code: &str) -> Route {
        Route {
            path: path.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            code: code.to_string(),
        }
    }

    #[test]
    fn test_single_route_document() {
        let routes = vec![route(
            "hello",
            &["name"],
            "function hello(name) { return \"hi \" + name }",
        )];
        let document = generate_dispatcher(&routes, &[]);

        let expected = r#"

function hello(name) { return "hi " + name }

function __respond(body, status) {
    return {
        statusCode: status,
        body: JSON.stringify(body)
    }
}

exports.handler = async (event, context) => {
    const path = event.pathParameters.proxy;
    switch (path) {
            case "hello":
                return __respond(await hello(event.queryStringParameters.name), 200)
    }
};
"#;
        assert_eq!(document, expected);
    }

    #[test]
    fn test_imports_then_functions_then_cases_in_order() {
        let imports = vec![
            DependencyImport {
                package: "lodash".to_string(),
                import_code: vec!["const _ = require(\"./lodash\")".to_string()],
            },
            DependencyImport {
                package: "uuid".to_string(),
                import_code: vec![
                    "const v4 = require(\"./uuid\").v4".to_string(),
                    "const validate = require(\"./uuid\").validate".to_string(),
                ],
            },
        ];
        let routes = vec![
            route("sum", &["a", "b"], "function sum(a, b) { return a + b }"),
            route("id", &[], "function id() { return v4() }"),
        ];
        let document = generate_dispatcher(&routes, &imports);

        assert!(document.starts_with(
            "\nconst _ = require(\"./lodash\")\nconst v4 = require(\"./uuid\").v4\nconst validate = require(\"./uuid\").validate\nfunction sum(a, b) { return a + b }\nfunction id() { return v4() }\n\nfunction __respond"
        ));

        let sum_case = document.find("case \"sum\":").unwrap();
        let id_case = document.find("case \"id\":").unwrap();
        assert!(sum_case < id_case);
        assert!(document.contains(
            "return __respond(await sum(event.queryStringParameters.a, event.queryStringParameters.b), 200)"
        ));
        assert!(document.contains("return __respond(await id(), 200)"));
    }

    #[test]
    fn test_no_default_branch() {
        let document = generate_dispatcher(&[route("a", &[], "function a() {}")], &[]);
        assert!(!document.contains("default:"));
    }

    #[test]
    fn test_empty_module_still_exports_handler() {
        let document = generate_dispatcher(&[], &[]);
        assert!(document.contains("exports.handler = async (event, context) => {"));
        assert!(document.contains("switch (path) {\n    }\n};\n"));
    }

    #[test]
    fn test_call_arguments() {
        assert_eq!(call_arguments(&[]), "");
        assert_eq!(
            call_arguments(&["x".to_string(), "y".to_string()]),
            "event.queryStringParameters.x, event.queryStringParameters.y"
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let routes = vec![route("f", &["q"], "function f(q) { return q }")];
        let imports = vec![DependencyImport {
            package: "dayjs".to_string(),
            import_code: vec!["const dayjs = require(\"./dayjs\")".to_string()],
        }];
        assert_eq!(
            generate_dispatcher(&routes, &imports),
            generate_dispatcher(&routes, &imports)
        );
    }
}
