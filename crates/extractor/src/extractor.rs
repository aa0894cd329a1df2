use crate::error::{ExtractError, Result};
use crate::java::JavaExtractor;
use crate::language::Language;
use crate::python::PythonExtractor;
use crate::types::BlockRecord;
use std::path::Path;

/// Main extraction interface: detects the language and delegates to the
/// matching language extractor
pub struct Extractor;

impl Extractor {
    /// Create a new extractor
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extract blocks from source text; language is implied by the path's
    /// extension
    pub fn extract_str(&self, content: &str, file_path: &str) -> Result<Vec<BlockRecord>> {
        let language = Language::from_path(file_path);
        self.extract_with_language(content, file_path, language)
    }

    /// Extract blocks from a file on disk
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<Vec<BlockRecord>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let file_path = path.to_str().unwrap_or("unknown");
        let language = Language::from_path(path);

        self.extract_with_language(&content, file_path, language)
    }

    /// Extract blocks with an explicit language tag
    pub fn extract_with_language(
        &self,
        content: &str,
        file_path: &str,
        language: Language,
    ) -> Result<Vec<BlockRecord>> {
        if content.is_empty() {
            return Err(ExtractError::EmptyContent);
        }

        let records = match language {
            Language::Python => PythonExtractor::new()?.extract(content, file_path)?,
            Language::Java => JavaExtractor::new()?.extract(content, file_path)?,
            Language::Unknown => {
                let ext = Path::new(file_path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("");
                return Err(ExtractError::unsupported_language(format!(".{ext}")));
            }
        };

        log::debug!(
            "extracted {} block(s) from {file_path} ({})",
            records.len(),
            language.as_str()
        );
        Ok(records)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
