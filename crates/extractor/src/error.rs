use thiserror::Error;

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors that can occur while extracting blocks from a source file
#[derive(Error, Debug)]
pub enum ExtractError {
    /// File extension is not in the supported set
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Python source could not be parsed at all
    #[error("SyntaxError while parsing Python: {0}")]
    PythonSyntax(String),

    /// Java source could not be parsed, or a unit's span never closed
    #[error("Error parsing Java file: {0}")]
    JavaParse(String),

    /// Empty content provided
    #[error("Empty content provided")]
    EmptyContent,

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Create an unsupported language error
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Create a Python syntax error
    pub fn python_syntax(msg: impl Into<String>) -> Self {
        Self::PythonSyntax(msg.into())
    }

    /// Create a Java parse error
    pub fn java_parse(msg: impl Into<String>) -> Self {
        Self::JavaParse(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitter(msg.into())
    }
}
