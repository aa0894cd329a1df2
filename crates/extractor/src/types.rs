use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One callable unit (function, method, or constructor) extracted from source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockRecord {
    /// Unique id within a file: `<basename>_<discovery index>`
    pub block_id: String,

    /// Identifier of the function/method/constructor
    pub function_name: String,

    /// Nearest enclosing class, if any
    pub class_context: Option<String>,

    /// Fully qualified package name (Java only, omitted for Python)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_context: Option<String>,

    /// Start line (1-indexed, inclusive)
    pub start_line: Option<usize>,

    /// End line (1-indexed, inclusive)
    pub end_line: Option<usize>,

    /// Single-line rendering of the declaration head
    pub signature: String,

    /// Verbatim source text spanning `start_line..end_line`
    pub code: String,

    /// Source language tag
    pub language: Language,

    /// True only for Java constructor units
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_constructor: bool,
}

impl BlockRecord {
    /// Get the number of source lines this record spans, when known
    #[must_use]
    pub fn line_count(&self) -> Option<usize> {
        match (self.start_line, self.end_line) {
            (Some(start), Some(end)) => Some(end.saturating_sub(start) + 1),
            _ => None,
        }
    }

    /// Module name this record originated from: `block_id` minus its
    /// trailing `_<index>` suffix
    #[must_use]
    pub fn module_name(&self) -> &str {
        match self.block_id.rfind('_') {
            Some(pos) if self.block_id[pos + 1..].chars().all(|c| c.is_ascii_digit()) => {
                &self.block_id[..pos]
            }
            _ => &self.block_id,
        }
    }
}

/// Build a `block_id` from a source path and a discovery index
pub fn block_id(file_path: &str, idx: usize) -> String {
    let basename = Path::new(file_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_path);
    format!("{basename}_{idx}")
}
