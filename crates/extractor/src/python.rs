use crate::error::{ExtractError, Result};
use crate::language::Language;
use crate::span;
use crate::types::{block_id, BlockRecord};
use tree_sitter::{Node, Parser};

/// Extracts one `BlockRecord` per `def`/`async def` at any nesting level
pub struct PythonExtractor {
    parser: Parser,
}

impl PythonExtractor {
    /// Create a new Python extractor
    pub fn new() -> Result<Self> {
        let ts_language = Language::Python.tree_sitter_language()?;
        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|e| ExtractError::tree_sitter(format!("Failed to set language: {e}")))?;

        Ok(Self { parser })
    }

    /// Parse Python source and extract every function-like unit in pre-order
    pub fn extract(&mut self, content: &str, file_path: &str) -> Result<Vec<BlockRecord>> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| ExtractError::python_syntax("failed to build syntax tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ExtractError::python_syntax(describe_first_error(root)));
        }

        let mut records = Vec::new();
        collect_functions(root, content, file_path, &mut records);
        Ok(records)
    }
}

/// Pre-order walk collecting `function_definition` nodes.
///
/// `async def` produces the same node kind in the grammar, so both forms are
/// covered; nested functions and methods of nested classes each yield their
/// own record.
fn collect_functions(node: Node, content: &str, file_path: &str, records: &mut Vec<BlockRecord>) {
    if node.kind() == "function_definition" {
        records.push(function_to_record(node, content, file_path, records.len()));
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_functions(child, content, file_path, records);
    }
}

fn function_to_record(node: Node, content: &str, file_path: &str, idx: usize) -> BlockRecord {
    let name = node
        .child_by_field_name("name")
        .and_then(|n| node_text(content, n))
        .unwrap_or_default()
        .to_string();

    let start_line = node.start_position().row + 1;
    let end_line = node.end_position().row + 1;

    // Exact segment from stored byte offsets; line-slice fallback otherwise.
    // The fallback is deliberately lossy and may carry whitespace artifacts.
    let code = match node_text(content, node) {
        Some(segment) => segment.to_string(),
        None => span::slice_lines(content, start_line, end_line),
    };

    BlockRecord {
        block_id: block_id(file_path, idx),
        function_name: name,
        class_context: nearest_class(node, content),
        package_context: None,
        start_line: Some(start_line),
        end_line: Some(end_line),
        signature: extract_signature(&code),
        code,
        language: Language::Python,
        is_constructor: false,
    }
}

/// Walk upward to the nearest enclosing class declaration, if any.
///
/// A function nested inside another function has no class context unless an
/// enclosing class is reached first during the upward walk.
fn nearest_class(node: Node, content: &str) -> Option<String> {
    let mut cur = node.parent();
    while let Some(ancestor) = cur {
        if ancestor.kind() == "class_definition" {
            return ancestor
                .child_by_field_name("name")
                .and_then(|n| node_text(content, n))
                .map(str::to_string);
        }
        cur = ancestor.parent();
    }
    None
}

/// First line of the segment that is a declaration head; defensive fallback
/// is the first nonblank line
fn extract_signature(code: &str) -> String {
    for line in code.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("def ") || trimmed.starts_with("async def ") {
            return trimmed.to_string();
        }
    }
    code.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn node_text<'a>(content: &'a str, node: Node) -> Option<&'a str> {
    content.get(node.start_byte()..node.end_byte())
}

fn describe_first_error(root: Node) -> String {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return format!(
                "invalid syntax at line {}, column {}",
                node.start_position().row + 1,
                node.start_position().column + 1
            );
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }
    "invalid syntax".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(code: &str) -> Vec<BlockRecord> {
        let mut extractor = PythonExtractor::new().unwrap();
        extractor.extract(code, "calculator.py").unwrap()
    }

    #[test]
    fn test_method_with_class_context() {
        let code = "class Calc:\n    def divide(self,a,b):\n        if b==0: raise ZeroDivisionError(\"x\")\n        return a/b\n";
        let records = extract(code);

        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.block_id, "calculator.py_0");
        assert_eq!(rec.function_name, "divide");
        assert_eq!(rec.class_context.as_deref(), Some("Calc"));
        assert_eq!(rec.signature, "def divide(self,a,b):");
        assert_eq!(rec.start_line, Some(2));
        assert_eq!(rec.end_line, Some(4));
        assert!(rec.package_context.is_none());
        assert!(!rec.is_constructor);
    }

    #[test]
    fn test_module_level_function_has_no_class_context() {
        let records = extract("def add(a, b):\n    return a + b\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].class_context, None);
    }

    #[test]
    fn test_async_functions_included() {
        let code = "async def fetch(url):\n    return await get(url)\n";
        let records = extract(code);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].function_name, "fetch");
        assert_eq!(records[0].signature, "async def fetch(url):");
    }

    #[test]
    fn test_nested_functions_each_yield_a_record() {
        let code = "def outer():\n    def inner():\n        pass\n    return inner\n";
        let records = extract(code);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].function_name, "outer");
        assert_eq!(records[1].function_name, "inner");
        // Nested inside a function, not a class
        assert_eq!(records[1].class_context, None);
    }

    #[test]
    fn test_function_in_nested_class() {
        let code = "class Outer:\n    class Inner:\n        def m(self):\n            pass\n";
        let records = extract(code);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].class_context.as_deref(), Some("Inner"));
    }

    #[test]
    fn test_ids_strictly_increasing_in_discovery_order() {
        let code = "def a():\n    pass\n\nclass C:\n    def b(self):\n        pass\n\ndef c():\n    pass\n";
        let records = extract(code);
        let ids: Vec<_> = records.iter().map(|r| r.block_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["calculator.py_0", "calculator.py_1", "calculator.py_2"]
        );
    }

    #[test]
    fn test_decorated_function_found() {
        let code = "@staticmethod\ndef helper():\n    pass\n";
        let records = extract(code);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].function_name, "helper");
        assert_eq!(records[0].signature, "def helper():");
    }

    #[test]
    fn test_code_matches_source_segment() {
        let code = "def add(a, b):\n    return a + b\n";
        let records = extract(code);
        assert_eq!(records[0].code, "def add(a, b):\n    return a + b");
    }

    #[test]
    fn test_syntax_error_is_fatal() {
        let mut extractor = PythonExtractor::new().unwrap();
        let result = extractor.extract("def broken(:\n    pass\n", "bad.py");
        assert!(matches!(result, Err(ExtractError::PythonSyntax(_))));
    }

    #[test]
    fn test_idempotent() {
        let code = "class C:\n    def m(self):\n        pass\n\ndef f():\n    pass\n";
        assert_eq!(extract(code), extract(code));
    }

    #[test]
    fn test_signature_fallback_first_nonblank() {
        assert_eq!(extract_signature("\n  lambda x: x\n"), "lambda x: x");
        assert_eq!(extract_signature(""), "");
    }
}
