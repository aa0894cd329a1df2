use crate::error::{ExtractError, Result};
use crate::language::Language;
use crate::span;
use crate::types::{block_id, BlockRecord};
use tree_sitter::{Node, Parser};

/// Extracts one `BlockRecord` per method and per constructor, with class and
/// package context
pub struct JavaExtractor {
    parser: Parser,
}

impl JavaExtractor {
    /// Create a new Java extractor
    pub fn new() -> Result<Self> {
        let ts_language = Language::Java.tree_sitter_language()?;
        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|e| ExtractError::tree_sitter(format!("Failed to set language: {e}")))?;

        Ok(Self { parser })
    }

    /// Parse Java source and extract methods and constructors per class, in
    /// class-declaration discovery order
    pub fn extract(&mut self, content: &str, file_path: &str) -> Result<Vec<BlockRecord>> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| ExtractError::java_parse("failed to build syntax tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ExtractError::java_parse(format!(
                "invalid syntax near line {}",
                first_error_line(root)
            )));
        }

        let lines: Vec<&str> = content.lines().collect();
        let package = package_name(root, content);

        let mut classes = Vec::new();
        collect_classes(root, &mut classes);

        let mut records = Vec::new();
        for class in classes {
            let class_name = field_text(content, class, "name").unwrap_or_default();
            let Some(body) = class.child_by_field_name("body") else {
                continue;
            };

            // Methods first, then constructors, each in body order
            for kind in ["method_declaration", "constructor_declaration"] {
                let mut cursor = body.walk();
                for member in body.children(&mut cursor) {
                    if member.kind() != kind {
                        continue;
                    }
                    let record = self.member_to_record(
                        member,
                        content,
                        &lines,
                        file_path,
                        &class_name,
                        package.as_deref(),
                        records.len(),
                    )?;
                    records.push(record);
                }
            }
        }

        Ok(records)
    }

    #[allow(clippy::too_many_arguments)]
    fn member_to_record(
        &self,
        member: Node,
        content: &str,
        lines: &[&str],
        file_path: &str,
        class_name: &str,
        package: Option<&str>,
        idx: usize,
    ) -> Result<BlockRecord> {
        let is_constructor = member.kind() == "constructor_declaration";
        let name = field_text(content, member, "name").unwrap_or_default();
        let params = render_parameters(content, member);

        let signature = if is_constructor {
            format!("public {name}({params})")
        } else {
            let return_type = member
                .child_by_field_name("type")
                .map(|node| simple_type_name(content, node))
                .unwrap_or_else(|| "void".to_string());
            format!("public {return_type} {name}({params})")
        };

        let unit_kind = if is_constructor { "Constructor" } else { "Method" };
        let start_line = Some(member.start_position().row + 1);
        let (start_line, end_line, code) =
            resolve_unit_span(lines, start_line, unit_kind, &name)?;

        Ok(BlockRecord {
            block_id: block_id(file_path, idx),
            function_name: name,
            class_context: Some(class_name.to_string()),
            package_context: package.map(str::to_string),
            start_line,
            end_line,
            signature,
            code,
            language: Language::Java,
            is_constructor,
        })
    }
}

/// Recover a unit's extent from its start line via brace scanning.
///
/// The parser's end offsets are deliberately not consulted: the textual scan
/// and its failure modes are part of the observable contract. A unit with no
/// position info degrades to a placeholder code segment instead of an error;
/// a unit whose braces never balance before end of file is a parse error.
fn resolve_unit_span(
    lines: &[&str],
    start_line: Option<usize>,
    unit_kind: &str,
    name: &str,
) -> Result<(Option<usize>, Option<usize>, String)> {
    let Some(start) = start_line else {
        log::warn!("{unit_kind} {name}: no position info, emitting placeholder segment");
        return Ok((None, None, span::missing_span_placeholder(unit_kind, name)));
    };

    match span::brace_scan(lines, start) {
        Some(found) => Ok((Some(start), Some(found.end_line), found.code)),
        None => Err(ExtractError::java_parse(format!(
            "braces never balance for {} {name} starting at line {start}",
            unit_kind.to_lowercase()
        ))),
    }
}

/// Pre-order collection of class declarations; nested classes appear after
/// their enclosing class and own their members
fn collect_classes<'a>(node: Node<'a>, classes: &mut Vec<Node<'a>>) {
    if node.kind() == "class_declaration" {
        classes.push(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_classes(child, classes);
    }
}

/// The single package declaration, if present
fn package_name(root: Node, content: &str) -> Option<String> {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "package_declaration" {
            let mut inner = child.walk();
            for part in child.children(&mut inner) {
                if matches!(part.kind(), "scoped_identifier" | "identifier") {
                    return node_text(content, part).map(str::to_string);
                }
            }
        }
    }
    None
}

/// `"<type> <name>"` pairs joined by `", "`
fn render_parameters(content: &str, member: Node) -> String {
    let Some(parameters) = member.child_by_field_name("parameters") else {
        return String::new();
    };

    let mut rendered = Vec::new();
    let mut cursor = parameters.walk();
    for param in parameters.children(&mut cursor) {
        if !matches!(param.kind(), "formal_parameter" | "spread_parameter") {
            continue;
        }
        let param_type = param
            .child_by_field_name("type")
            .map(|node| simple_type_name(content, node))
            .unwrap_or_default();
        let param_name = field_text(content, param, "name").unwrap_or_default();
        rendered.push(format!("{param_type} {param_name}"));
    }
    rendered.join(", ")
}

/// Simple name of a type when one exists, otherwise the raw textual rendering
/// (e.g. `Map<String, Integer>` resolves to `Map`, `int[]` stays `int[]`)
fn simple_type_name(content: &str, node: Node) -> String {
    match node.kind() {
        "type_identifier" => node_text(content, node).unwrap_or_default().to_string(),
        "generic_type" | "scoped_type_identifier" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "type_identifier" {
                    return node_text(content, child).unwrap_or_default().to_string();
                }
            }
            node_text(content, node).unwrap_or_default().to_string()
        }
        _ => node_text(content, node).unwrap_or_default().to_string(),
    }
}

fn field_text(content: &str, node: Node, field: &str) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|n| node_text(content, n))
        .map(str::to_string)
}

fn node_text<'a>(content: &'a str, node: Node) -> Option<&'a str> {
    content.get(node.start_byte()..node.end_byte())
}

fn first_error_line(root: Node) -> usize {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return node.start_position().row + 1;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CALCULATOR: &str = r"package com.example.math;

public class Calculator {
    private int precision;

    public Calculator(int precision) {
        this.precision = precision;
    }

    public int add(int a, int b) {
        return a + b;
    }

    public double divide(double a, double b) {
        if (b == 0) {
            throw new ArithmeticException();
        }
        return a / b;
    }
}
";

    fn extract(code: &str) -> Vec<BlockRecord> {
        let mut extractor = JavaExtractor::new().unwrap();
        extractor.extract(code, "Calculator.java").unwrap()
    }

    #[test]
    fn test_methods_then_constructors_per_class() {
        let records = extract(CALCULATOR);
        let names: Vec<_> = records.iter().map(|r| r.function_name.as_str()).collect();
        assert_eq!(names, vec!["add", "divide", "Calculator"]);

        assert!(!records[0].is_constructor);
        assert!(!records[1].is_constructor);
        assert!(records[2].is_constructor);
    }

    #[test]
    fn test_package_attached_to_every_record() {
        let records = extract(CALCULATOR);
        for rec in &records {
            assert_eq!(rec.package_context.as_deref(), Some("com.example.math"));
            assert_eq!(rec.class_context.as_deref(), Some("Calculator"));
            assert_eq!(rec.language, Language::Java);
        }
    }

    #[test]
    fn test_no_package_declaration() {
        let records = extract("public class A {\n    void run() {\n    }\n}\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].package_context, None);
    }

    #[test]
    fn test_method_signature() {
        let records = extract(CALCULATOR);
        assert_eq!(records[0].signature, "public int add(int a, int b)");
        assert_eq!(
            records[1].signature,
            "public double divide(double a, double b)"
        );
    }

    #[test]
    fn test_constructor_signature_has_no_return_type() {
        let records = extract(CALCULATOR);
        assert_eq!(records[2].signature, "public Calculator(int precision)");
    }

    #[test]
    fn test_generic_parameter_type_uses_simple_name() {
        let code = "public class A {\n    void put(Map<String, Integer> counts) {\n    }\n}\n";
        let records = extract(code);
        assert_eq!(records[0].signature, "public void put(Map counts)");
    }

    #[test]
    fn test_span_from_brace_scan() {
        let records = extract(CALCULATOR);
        let divide = &records[1];
        assert_eq!(divide.start_line, Some(14));
        assert_eq!(divide.end_line, Some(19));
        assert!(divide.code.starts_with("    public double divide"));
        assert!(divide.code.ends_with("    }"));
    }

    #[test]
    fn test_code_reslices_from_source() {
        let records = extract(CALCULATOR);
        for rec in &records {
            let (Some(start), Some(end)) = (rec.start_line, rec.end_line) else {
                panic!("expected span for {}", rec.function_name);
            };
            assert_eq!(rec.code, span::slice_lines(CALCULATOR, start, end));
        }
    }

    #[test]
    fn test_nested_class_members_belong_to_inner_class() {
        let code = r"public class Outer {
    public void outerMethod() {
    }

    class Inner {
        public void innerMethod() {
        }
    }
}
";
        let records = extract(code);
        let names: Vec<_> = records
            .iter()
            .map(|r| {
                (
                    r.function_name.as_str(),
                    r.class_context.as_deref().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            names,
            vec![("outerMethod", "Outer"), ("innerMethod", "Inner")]
        );
    }

    #[test]
    fn test_block_ids_count_methods_and_constructors_together() {
        let records = extract(CALCULATOR);
        let ids: Vec<_> = records.iter().map(|r| r.block_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "Calculator.java_0",
                "Calculator.java_1",
                "Calculator.java_2"
            ]
        );
    }

    #[test]
    fn test_parse_error_is_fatal() {
        let mut extractor = JavaExtractor::new().unwrap();
        let result = extractor.extract("public class {{{", "Bad.java");
        assert!(matches!(result, Err(ExtractError::JavaParse(_))));
    }

    #[test]
    fn test_missing_position_degrades_to_placeholder() {
        let (start, end, code) = resolve_unit_span(&[], None, "Method", "add").unwrap();
        assert_eq!(start, None);
        assert_eq!(end, None);
        assert_eq!(code, "// Method add - source extraction failed");
    }

    #[test]
    fn test_unbalanced_braces_are_a_parse_error() {
        let lines = vec!["public void broken() {", "    run();"];
        let result = resolve_unit_span(&lines, Some(1), "Method", "broken");
        assert!(matches!(result, Err(ExtractError::JavaParse(_))));
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(extract(CALCULATOR), extract(CALCULATOR));
    }
}
