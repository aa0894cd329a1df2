//! # Testforge Extractor
//!
//! Callable-unit metadata extraction for Python and Java sources.
//!
//! ## Architecture
//!
//! ```text
//! Source Code
//!     │
//!     ├──> Language Detection (from extension)
//!     │
//!     ├──> Tree-sitter Parsing → AST
//!     │
//!     ├──> Language Walk
//!     │    ├─> Python: every def/async def, nearest-class context
//!     │    └─> Java: methods + constructors per class, package context,
//!     │        brace-scan span reconstruction
//!     │
//!     └──> Ordered Vec<BlockRecord> with stable block ids
//! ```
//!
//! ## Example
//!
//! ```rust
//! use testforge_extractor::Extractor;
//!
//! let code = "class Calc:\n    def divide(self, a, b):\n        return a / b\n";
//! let records = Extractor::new().extract_str(code, "calc.py").unwrap();
//!
//! assert_eq!(records[0].function_name, "divide");
//! assert_eq!(records[0].class_context.as_deref(), Some("Calc"));
//! ```

mod error;
mod extractor;
mod java;
mod language;
mod python;
mod span;
mod types;

pub use error::{ExtractError, Result};
pub use extractor::Extractor;
pub use java::JavaExtractor;
pub use language::Language;
pub use python::PythonExtractor;
pub use span::{brace_scan, missing_span_placeholder, slice_lines, BraceSpan};
pub use types::{block_id, BlockRecord};
