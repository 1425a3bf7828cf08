//! Where layout documents are kept between sessions.
//!
//! The browser host backs `LayoutStore` with `localStorage`; native hosts
//! and tests use `MemoryStore`. Values are the raw JSON text of a layout
//! document, stored under a single key.

use std::collections::HashMap;
use std::fmt;

/// Key the layout document is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "savedCharacterLayout";

/// File name offered when exporting.
pub const DEFAULT_EXPORT_FILENAME: &str = "character.json";

/// A string key/value store.
pub trait LayoutStore {
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), String>;
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LayoutStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Successful persistence outcomes, each shown to the user as a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Saved,
    Loaded,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Saved => f.write_str("Character saved!"),
            Notice::Loaded => f.write_str("Character loaded!"),
        }
    }
}

/// Why a save / load / export / import did not happen.
///
/// `NothingSaved` and `NothingToExport` are missing-data conditions that
/// abort cleanly; `Malformed` carries the parse failure of a bad document.
/// None of them leave the scene partially modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    NothingSaved,
    NothingToExport,
    Malformed(String),
    Storage(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::NothingSaved => f.write_str("No saved character layout found!"),
            PersistError::NothingToExport => f.write_str("Nothing to export!"),
            PersistError::Malformed(msg) => write!(f, "Could not load layout: {msg}"),
            PersistError::Storage(msg) => write!(f, "Storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for PersistError {}

/// A file ready to hand to the user's browser for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: &'static str,
    pub contents: String,
}
