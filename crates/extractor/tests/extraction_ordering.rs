use testforge_extractor::{slice_lines, Extractor, Language};

const PYTHON_SOURCE: &str = r#"import math

def area(r):
    return math.pi * r * r

class Shapes:
    def __init__(self):
        self.count = 0

    async def load(self, path):
        return await read(path)

    def describe(self):
        def fmt(n):
            return f"{n} shapes"
        return fmt(self.count)
"#;

const JAVA_SOURCE: &str = r#"package com.example.shop;

public class Cart {
    public Cart(int capacity) {
        this.capacity = capacity;
    }

    public void addItem(String sku, int quantity) {
        items.put(sku, quantity);
    }
}

class Audit {
    public void record(String event) {
        log.add(event);
    }
}
"#;

#[test]
fn python_ids_are_sequential_across_all_function_like_nodes() {
    let records = Extractor::new()
        .extract_str(PYTHON_SOURCE, "shapes.py")
        .expect("extraction failed");

    let ids: Vec<_> = records.iter().map(|r| r.block_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "shapes.py_0",
            "shapes.py_1",
            "shapes.py_2",
            "shapes.py_3",
            "shapes.py_4"
        ]
    );

    let names: Vec<_> = records.iter().map(|r| r.function_name.as_str()).collect();
    assert_eq!(names, vec!["area", "__init__", "load", "describe", "fmt"]);

    // area is module-level, fmt is nested in a method so its nearest class wins
    assert_eq!(records[0].class_context, None);
    assert_eq!(records[4].class_context.as_deref(), Some("Shapes"));
}

#[test]
fn java_records_cover_all_classes_with_correct_flags() {
    let records = Extractor::new()
        .extract_str(JAVA_SOURCE, "Cart.java")
        .expect("extraction failed");

    // Cart: method then constructor, then Audit's method
    let summary: Vec<_> = records
        .iter()
        .map(|r| (r.function_name.as_str(), r.is_constructor))
        .collect();
    assert_eq!(
        summary,
        vec![("addItem", false), ("Cart", true), ("record", false)]
    );

    for rec in &records {
        assert_eq!(rec.language, Language::Java);
        assert_eq!(rec.package_context.as_deref(), Some("com.example.shop"));
    }
}

#[test]
fn line_sliced_code_reslices_byte_for_byte() {
    let records = Extractor::new()
        .extract_str(JAVA_SOURCE, "Cart.java")
        .expect("extraction failed");

    for rec in &records {
        let (Some(start), Some(end)) = (rec.start_line, rec.end_line) else {
            panic!("{} has no span", rec.block_id);
        };
        assert!(start <= end, "{}: start > end", rec.block_id);
        assert_eq!(
            rec.code,
            slice_lines(JAVA_SOURCE, start, end),
            "{}: re-slicing diverged",
            rec.block_id
        );
    }
}

#[test]
fn extraction_is_idempotent_across_runs() {
    let extractor = Extractor::new();
    let first = extractor.extract_str(PYTHON_SOURCE, "shapes.py").unwrap();
    let second = extractor.extract_str(PYTHON_SOURCE, "shapes.py").unwrap();
    assert_eq!(first, second);

    let first = extractor.extract_str(JAVA_SOURCE, "Cart.java").unwrap();
    let second = extractor.extract_str(JAVA_SOURCE, "Cart.java").unwrap();
    assert_eq!(first, second);
}
