//! Source span recovery for parsed units.
//!
//! Parsers do not always hand back the verbatim text of a unit. The helpers
//! here reconstruct it either by slicing the original source by line range or,
//! for Java, by scanning forward from the declaration line counting braces.

/// A span recovered by brace scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BraceSpan {
    /// End line (1-indexed, inclusive)
    pub end_line: usize,
    /// Verbatim text of `start_line..end_line`
    pub code: String,
}

/// Slice the original source by an inclusive 1-based line range.
///
/// This is the lossy fallback used when a parser supplies positions but no
/// verbatim text: it may carry trailing or leading whitespace artifacts, and
/// re-slicing the same range always reproduces the result byte-for-byte.
pub fn slice_lines(src: &str, start_line: usize, end_line: usize) -> String {
    let lines: Vec<&str> = src.lines().collect();
    if start_line == 0 || start_line > lines.len() {
        return String::new();
    }
    let end = end_line.min(lines.len());
    lines[start_line - 1..end].join("\n")
}

/// Scan forward from `start_line`, accumulating an open/close brace counter.
///
/// Counting arms once the first `{` is seen; the unit ends at the first line
/// where the running balance returns to zero after having gone positive.
/// The scan is purely textual: braces inside string or character literals and
/// comments are counted like any other, which can corrupt the boundary. That
/// is observable behavior and intentionally kept.
///
/// Returns `None` when the balance never returns to zero before end of file
/// (including units that never open a brace at all).
pub fn brace_scan(lines: &[&str], start_line: usize) -> Option<BraceSpan> {
    if start_line == 0 || start_line > lines.len() {
        return None;
    }

    let mut brace_count: i64 = 0;
    let mut started = false;
    let mut unit_lines = Vec::new();

    for (i, line) in lines.iter().enumerate().skip(start_line - 1) {
        unit_lines.push(*line);
        let opens = line.matches('{').count() as i64;
        if opens > 0 {
            brace_count += opens;
            started = true;
        }
        brace_count -= line.matches('}').count() as i64;

        if started && brace_count == 0 {
            return Some(BraceSpan {
                end_line: i + 1,
                code: unit_lines.join("\n"),
            });
        }
    }

    None
}

/// Deterministic placeholder emitted when a unit carries no position info.
///
/// This is the designed per-unit failure mode: the record is still produced,
/// with this comment as its code segment, instead of aborting the file.
pub fn missing_span_placeholder(kind: &str, name: &str) -> String {
    format!("// {kind} {name} - source extraction failed")
}
