//! Reading and writing template documents.
//!
//! `.json` files hold the serialized document model (paragraphs of styled runs
//! plus tables); any other file is plain text with one paragraph per line.

use std::fs;
use std::path::Path;
use stencil_relief::{
    Document, DocumentTextSink, DocumentTextSource, FragmentId, PlainText, SinkError, SourceError,
    TextFragment,
};

/// A loaded template
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateDocument {
    Rich(Document),
    Plain(PlainText),
}

impl TemplateDocument {
    /// Serialize back to the file format it was loaded from.
    pub fn render(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Rich(document) => {
                let mut json = serde_json::to_string_pretty(document)?;
                json.push('\n');
                Ok(json)
            }
            Self::Plain(text) => Ok(text.to_text()),
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = self.render().map_err(std::io::Error::other)?;
        fs::write(path, content)
    }
}

impl DocumentTextSource for TemplateDocument {
    fn fragments(&self) -> Result<Vec<TextFragment>, SourceError> {
        match self {
            Self::Rich(document) => document.fragments(),
            Self::Plain(text) => text.fragments(),
        }
    }
}

impl DocumentTextSink for TemplateDocument {
    fn replace_text(&mut self, id: FragmentId, text: &str) -> Result<(), SinkError> {
        match self {
            Self::Rich(document) => document.replace_text(id, text),
            Self::Plain(plain) => plain.replace_text(id, text),
        }
    }
}

/// A template on disk, read when its text is requested
#[derive(Debug, Clone, Copy)]
pub struct TemplateFile<'a> {
    pub path: &'a Path,
    pub max_file_size: u64,
}

impl<'a> TemplateFile<'a> {
    #[inline]
    pub fn new(path: &'a Path, max_file_size: u64) -> Self {
        Self {
            path,
            max_file_size,
        }
    }
}

impl DocumentTextSource for TemplateFile<'_> {
    fn fragments(&self) -> Result<Vec<TextFragment>, SourceError> {
        load_document(self.path, self.max_file_size)?.fragments()
    }
}

#[inline]
pub fn is_rich(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Load a template, refusing files above `max_file_size` bytes.
pub fn load_document(path: &Path, max_file_size: u64) -> Result<TemplateDocument, SourceError> {
    let size = fs::metadata(path)?.len();
    if size > max_file_size {
        return Err(SourceError::Unavailable(format!(
            "{} is {size} bytes, over the {max_file_size} byte limit",
            path.display()
        )));
    }

    let source = fs::read_to_string(path)?;
    if is_rich(path) {
        Ok(TemplateDocument::Rich(Document::from_json(&source)?))
    } else {
        Ok(TemplateDocument::Plain(PlainText::new(&source)))
    }
}
