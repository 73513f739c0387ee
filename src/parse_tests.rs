#[cfg(test)]
mod tests {
    use crate::error::{ErrorKind, ERR_SYNTAX};
    use crate::parse::{parse_module, DeclarationKind, ExportShape, ImportBinding};

    fn kinds(source: &str) -> Vec<DeclarationKind> {
        parse_module(source)
            .unwrap()
            .declarations
            .into_iter()
            .map(|d| d.kind)
            .collect()
    }

    #[test]
    fn test_exported_function_span_excludes_export_keyword() {
        let src = "export function hello(name) { return \"hi \" + name }";
        let tree = parse_module(src).unwrap();
        assert_eq!(tree.declarations.len(), 1);

        let decl = &tree.declarations[0];
        assert_eq!(decl.span.start, 0);
        match &decl.kind {
            DeclarationKind::ExportedFunction {
                name,
                params,
                function_span,
            } => {
                assert_eq!(name, "hello");
                assert_eq!(params, &vec!["name".to_string()]);
                assert_eq!(
                    function_span.slice(src),
                    "function hello(name) { return \"hi \" + name }"
                );
            }
            other => panic!("expected exported function, got {:?}", other),
        }
    }

    #[test]
    fn test_async_function_is_a_plain_function() {
        let src = "export async function load(id, limit) { return id }";
        match &kinds(src)[0] {
            DeclarationKind::ExportedFunction { name, params, .. } => {
                assert_eq!(name, "load");
                assert_eq!(params, &vec!["id".to_string(), "limit".to_string()]);
            }
            other => panic!("expected exported function, got {:?}", other),
        }
    }

    #[test]
    fn test_import_bindings() {
        let src = r#"
            import _ from "lodash";
            import { format as fmt, parse } from "date-fns";
            import * as util from "./util";
            import "./side-effect";
        "#;
        let kinds = kinds(src);
        assert_eq!(
            kinds[0],
            DeclarationKind::Import {
                source: "lodash".to_string(),
                bindings: vec![ImportBinding::Default {
                    local: "_".to_string()
                }],
            }
        );
        assert_eq!(
            kinds[1],
            DeclarationKind::Import {
                source: "date-fns".to_string(),
                bindings: vec![
                    ImportBinding::Named {
                        imported: "format".to_string(),
                        local: "fmt".to_string()
                    },
                    ImportBinding::Named {
                        imported: "parse".to_string(),
                        local: "parse".to_string()
                    },
                ],
            }
        );
        assert_eq!(
            kinds[2],
            DeclarationKind::Import {
                source: "./util".to_string(),
                bindings: vec![ImportBinding::Namespace {
                    local: "util".to_string()
                }],
            }
        );
        assert_eq!(
            kinds[3],
            DeclarationKind::Import {
                source: "./side-effect".to_string(),
                bindings: vec![],
            }
        );
    }

    #[test]
    fn test_unsupported_export_shapes() {
        let cases = [
            ("export const x = 1;", ExportShape::Variable),
            ("export class C {}", ExportShape::Class),
            ("export const f = (a) => a;", ExportShape::Variable),
            ("const a = 1; export { a };", ExportShape::ExportList),
            ("export { a } from \"./a\";", ExportShape::ExportList),
            ("export * from \"./a\";", ExportShape::StarReExport),
            ("export default 42;", ExportShape::DefaultExport),
            ("export default function () {}", ExportShape::AnonymousFunction),
            (
                "export function f({ a }) {}",
                ExportShape::NonIdentifierParameter {
                    function: "f".to_string(),
                },
            ),
            (
                "export function g(...rest) {}",
                ExportShape::NonIdentifierParameter {
                    function: "g".to_string(),
                },
            ),
        ];

        for (src, expected) in cases {
            let found = kinds(src)
                .into_iter()
                .find_map(|k| match k {
                    DeclarationKind::UnsupportedExport { shape } => Some(shape),
                    _ => None,
                })
                .unwrap_or_else(|| panic!("no unsupported export in {:?}", src));
            assert_eq!(found, expected, "source: {}", src);
        }
    }

    #[test]
    fn test_non_export_statements_are_other() {
        let kinds = kinds("const secret = 1;\nfunction helper() {}\nconsole.log(secret);");
        assert_eq!(kinds.len(), 3);
        assert!(kinds.iter().all(|k| *k == DeclarationKind::Other));
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_module("export function (").unwrap_err();
        assert_eq!(err.code, ERR_SYNTAX);
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert!(err.message.starts_with("Failed to parse module"));
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let err = parse_module("export function a() {}\n\nconst = 1;\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.line, 3);
        assert!(err.column > 0);
        assert!(err.to_string().ends_with(&format!("(3:{})", err.column)));
    }

    #[test]
    fn test_duplicate_exports_reach_the_tree() {
        let tree = parse_module("export function a() {}\nexport function a() {}\n").unwrap();
        let names: Vec<&str> = tree
            .declarations
            .iter()
            .filter_map(|d| match &d.kind {
                DeclarationKind::ExportedFunction { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["a", "a"]);
    }
}
