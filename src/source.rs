//! Line sources for the readers.
//!
//! The parsers never open files themselves; they ask a [`LineSource`] for the
//! full sequence of lines. Buffering the whole resource lets the history reader
//! find the last header and then slice from it instead of seeking back.

use crate::error::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sequential text resource addressed by name
pub trait LineSource {
    /// Name of the resource, used in error messages
    fn name(&self) -> &Path;

    /// Read every line, without line terminators
    fn read_lines(&self) -> Result<Vec<String>>;
}

/// Lines read from a file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LineSource for FileSource {
    fn name(&self) -> &Path {
        &self.path
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        let file = File::open(&self.path)?;
        let lines = BufReader::new(file).lines().collect::<std::io::Result<Vec<_>>>()?;
        debug!("Read {} lines from {}", lines.len(), self.path.display());
        Ok(lines)
    }
}

/// Lines held in memory, for callers that already have the text
#[derive(Debug, Clone)]
pub struct TextSource {
    name: PathBuf,
    text: String,
}

impl TextSource {
    pub fn new(name: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl LineSource for TextSource {
    fn name(&self) -> &Path {
        &self.name
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        Ok(self.text.lines().map(str::to_string).collect())
    }
}
