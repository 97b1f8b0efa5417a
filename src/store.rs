use std::collections::HashMap;

use crate::error::DalError;

/// Capability interface for a virtual file store: resolve a logical name to
/// bytes, or report absence. Implementations decide how content is loaded
/// and cached.
pub trait TemplateSource {
    /// Byte content for `name`, or `None` when the name does not resolve.
    fn read(&self, name: &str) -> Option<&[u8]>;
}

/// In-memory source, used by tests and callers that embed their SQL.
impl TemplateSource for HashMap<String, Vec<u8>> {
    fn read(&self, name: &str) -> Option<&[u8]> {
        self.get(name).map(Vec::as_slice)
    }
}

/// Resolves logical template names to SQL text through a `TemplateSource`.
pub struct TemplateStore<'s> {
    source: &'s dyn TemplateSource,
}

impl<'s> TemplateStore<'s> {
    #[must_use]
    pub fn new(source: &'s dyn TemplateSource) -> Self {
        Self { source }
    }

    /// Resolve `name` to SQL text.
    ///
    /// Empty content is not an error here; it surfaces later when the
    /// executor refuses to prepare empty text.
    ///
    /// # Errors
    ///
    /// Returns `DalError::NotFound` when the name does not resolve, and
    /// `DalError::ReadError` when the content is not valid UTF-8.
    pub fn load(&self, name: &str) -> Result<String, DalError> {
        let bytes = self
            .source
            .read(name)
            .ok_or_else(|| DalError::NotFound(name.to_string()))?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| DalError::ReadError(format!("{name}: {e}")))
    }
}
