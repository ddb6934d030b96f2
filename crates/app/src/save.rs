//! Save-file handling on top of the codec.
//!
//! A save file is one line of compressed text. Its decoded form is a JSON
//! document; game variables live in `variables._data["@a"]`.
//!
//! # Replacement protocol
//!
//! Writing never leaves a half-written or missing save behind:
//! 1. encode the document and check that the encoded text decodes back to it
//! 2. write the encoded text to a temporary file in the save directory
//! 3. copy the original to `<name>.bak`, replacing any earlier backup
//! 4. persist the temporary file over the original in one rename
//!
//! The original stays in place until step 4 replaces it, so any failure
//! leaves it untouched.

use lzsave_core::{CodecStats, LzCodec};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name prefix of the engine's save slots.
pub const DEFAULT_PREFIX: &str = "DefaultTGOfile";

/// File name suffix of the engine's save slots.
pub const DEFAULT_SUFFIX: &str = ".rpgsave";

/// How many leading game variables are searched for the money value.
pub const MONEY_SCAN_LIMIT: usize = 100;

/// Extension given to the previous version of a rewritten save.
pub const BACKUP_EXTENSION: &str = "bak";

/// Errors from save-file operations.
#[derive(Debug, Error)]
pub enum SaveError {
    /// File system operation failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The compressed text could not be decoded
    #[error("codec error: {0}")]
    Codec(#[from] lzsave_core::Error),

    /// The compressed text decoded to nothing (truncated or malformed)
    #[error("save content did not decode to any text")]
    Undecodable,

    /// The decoded text is not JSON
    #[error("invalid save document: {0}")]
    Json(#[from] serde_json::Error),

    /// A required part of the document is absent or has the wrong type
    #[error("invalid save structure: {0} not found or invalid")]
    MissingSection(&'static str),

    /// The money value was not among the scanned variables
    #[error("money value {value} not found in the first {scanned} variables")]
    MoneyNotFound { value: i64, scanned: usize },

    /// Re-encoded content did not decode back to the same document
    #[error("encoded save failed verification")]
    VerificationFailed,

    /// No save files matched in the directory
    #[error("no save files found in {0}")]
    NoSaveFiles(PathBuf),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SaveError + '_ {
    move |source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Finds save slots in a directory by file name pattern.
#[derive(Debug, Clone)]
pub struct SaveLocator {
    pub dir: PathBuf,
    pub prefix: String,
    pub suffix: String,
}

impl SaveLocator {
    /// Locator using the engine's default slot naming.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    /// Matching save files, sorted by file name.
    ///
    /// # Errors
    /// - `SaveError::Io` if the directory cannot be read
    /// - `SaveError::NoSaveFiles` if nothing matches
    pub fn locate(&self) -> Result<Vec<PathBuf>, SaveError> {
        let entries = fs::read_dir(&self.dir).map_err(io_error(&self.dir))?;

        let mut saves = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_error(&self.dir))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with(&self.prefix) && name.ends_with(&self.suffix) {
                saves.push(entry.path());
            }
        }

        if saves.is_empty() {
            return Err(SaveError::NoSaveFiles(self.dir.clone()));
        }
        saves.sort();
        debug!(dir = %self.dir.display(), count = saves.len(), "located save files");
        Ok(saves)
    }
}

/// Reads, edits and writes compressed save documents.
#[derive(Debug, Clone, Default)]
pub struct SaveEditor {
    codec: LzCodec,
}

impl SaveEditor {
    pub fn new(codec: LzCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &LzCodec {
        &self.codec
    }

    /// Decode compressed save content into a JSON document.
    ///
    /// Surrounding whitespace is ignored.
    pub fn decode_content(&self, content: &str) -> Result<Value, SaveError> {
        Ok(self.decode_content_with_stats(content)?.0)
    }

    /// Like [`decode_content`](Self::decode_content), also returning the codec statistics.
    pub fn decode_content_with_stats(
        &self,
        content: &str,
    ) -> Result<(Value, CodecStats), SaveError> {
        let content = content.trim();
        let (text, stats) = self.codec.decompress_with_stats(content)?;
        if text.is_empty() && !content.is_empty() {
            return Err(SaveError::Undecodable);
        }
        Ok((serde_json::from_str(&text)?, stats))
    }

    /// Encode a JSON document as compressed save content, verifying it decodes back.
    pub fn encode_document(&self, doc: &Value) -> Result<String, SaveError> {
        let text = serde_json::to_string(doc)?;
        let encoded = self.codec.compress(&text)?;

        if self.codec.decompress(&encoded)? != text {
            return Err(SaveError::VerificationFailed);
        }
        Ok(encoded)
    }

    /// Read and decode a save file.
    pub fn read_document(&self, path: &Path) -> Result<Value, SaveError> {
        let content = fs::read_to_string(path).map_err(io_error(path))?;
        self.decode_content(&content)
    }

    /// Replace a save file with `doc`, keeping the previous version as a backup.
    ///
    /// Returns the backup path if an original existed.
    pub fn write_document(&self, path: &Path, doc: &Value) -> Result<Option<PathBuf>, SaveError> {
        let encoded = self.encode_document(doc)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir).map_err(io_error(dir))?;
        temp.write_all(encoded.as_bytes())
            .and_then(|_| temp.flush())
            .map_err(io_error(temp.path()))?;

        let backup = if path.exists() {
            let backup = path.with_extension(BACKUP_EXTENSION);
            if backup.exists() {
                warn!(backup = %backup.display(), "replacing earlier backup");
            }
            fs::copy(path, &backup).map_err(io_error(&backup))?;
            info!(backup = %backup.display(), "backed up original save");
            Some(backup)
        } else {
            None
        };

        temp.persist(path).map_err(|e| SaveError::Io {
            path: path.to_path_buf(),
            source: e.error,
        })?;
        info!(path = %path.display(), symbols = encoded.len(), "wrote save file");
        Ok(backup)
    }
}

/// The game variable array of a save document.
fn game_variables(doc: &Value) -> Result<&Vec<Value>, SaveError> {
    let variables = doc
        .get("variables")
        .filter(|v| v.is_object())
        .ok_or(SaveError::MissingSection("variables"))?;
    variables
        .get("_data")
        .and_then(|data| data.get("@a"))
        .and_then(Value::as_array)
        .ok_or(SaveError::MissingSection("variables._data.@a"))
}

/// Index of the first integer variable equal to `current` among the first
/// `scan_limit` game variables.
pub fn find_money_slot(doc: &Value, current: i64, scan_limit: usize) -> Result<usize, SaveError> {
    let vars = game_variables(doc)?;
    let scanned = scan_limit.min(vars.len());

    let matches: Vec<usize> = vars[..scanned]
        .iter()
        .enumerate()
        .filter(|(_, v)| v.as_i64() == Some(current))
        .map(|(idx, _)| idx)
        .collect();

    match matches.as_slice() {
        [] => Err(SaveError::MoneyNotFound {
            value: current,
            scanned,
        }),
        [only] => Ok(*only),
        [first, ..] => {
            warn!(
                value = current,
                indices = ?matches,
                "multiple variables hold the money value, using the first"
            );
            Ok(*first)
        }
    }
}

/// Replace the money value in place and return the slot that changed.
pub fn set_money(
    doc: &mut Value,
    current: i64,
    new: i64,
    scan_limit: usize,
) -> Result<usize, SaveError> {
    let slot = find_money_slot(doc, current, scan_limit)?;
    let vars = doc
        .pointer_mut("/variables/_data/@a")
        .and_then(Value::as_array_mut)
        .ok_or(SaveError::MissingSection("variables._data.@a"))?;
    vars[slot] = Value::from(new);
    info!(slot, from = current, to = new, "money value replaced");
    Ok(slot)
}
