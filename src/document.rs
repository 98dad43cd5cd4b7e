/// Boundary to the external document-to-text converter.
use crate::errors::AppError;
use std::path::Path;

/// Yields the raw text of each page of a staged document. The extraction
/// pipeline only ever sees the concatenated blob, so converters are free to
/// paginate however the underlying format does.
pub trait DocumentConverter: Send + Sync {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, AppError>;

    /// All pages concatenated in order.
    fn extract_text(&self, path: &Path) -> Result<String, AppError> {
        Ok(self.extract_pages(path)?.concat())
    }
}

/// Converter for reports that are already plain text; the whole file is one
/// page. Non-UTF-8 bytes are replaced, not rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextConverter;

impl DocumentConverter for PlainTextConverter {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, AppError> {
        let bytes = std::fs::read(path)?;
        Ok(vec![String::from_utf8_lossy(&bytes).into_owned()])
    }
}
