use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read page file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Page file {0} is not valid UTF-8")]
    Encoding(PathBuf),
}

/// Supplier of page text, one string per page in document order.
///
/// The engine never reads PDFs itself; whatever turns a statement into text
/// sits behind this trait.
pub trait PageSource {
    fn pages(&self) -> Result<Vec<String>, SourceError>;
}

// ── In-memory pages (used by tests and embedding callers) ────────────────────

#[derive(Debug, Clone, Default)]
pub struct StaticPages {
    pages: Vec<String>,
}

impl StaticPages {
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pages: pages.into_iter().map(Into::into).collect(),
        }
    }
}

impl PageSource for StaticPages {
    fn pages(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.pages.clone())
    }
}

// ── Form-feed separated text (`pdftotext` output) ────────────────────────────

/// One text blob whose pages are separated by form feeds (`\x0C`).
#[derive(Debug, Clone, Default)]
pub struct FormFeedText {
    text: String,
}

impl FormFeedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl PageSource for FormFeedText {
    fn pages(&self) -> Result<Vec<String>, SourceError> {
        Ok(split_form_feeds(&self.text))
    }
}

fn split_form_feeds(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split('\x0C').map(str::to_string).collect();
    // a terminating form feed leaves an empty tail, not another page
    if pages.len() > 1 && pages.last().is_some_and(|p| p.trim().is_empty()) {
        pages.pop();
    }
    pages
}

// ── Text files on disk ───────────────────────────────────────────────────────

/// Text files read in the given order. A file containing form feeds
/// contributes one page per feed-separated chunk.
#[derive(Debug, Clone, Default)]
pub struct PageFiles {
    paths: Vec<PathBuf>,
}

impl PageFiles {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }
}

impl PageSource for PageFiles {
    fn pages(&self) -> Result<Vec<String>, SourceError> {
        let mut pages = Vec::new();
        for path in &self.paths {
            let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
                path: path.clone(),
                source,
            })?;
            let text = String::from_utf8(bytes).map_err(|_| SourceError::Encoding(path.clone()))?;
            pages.extend(split_form_feeds(&text));
        }
        Ok(pages)
    }
}
