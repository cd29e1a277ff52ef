use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable consulted when `--config` is not given.
pub const CONFIG_ENV: &str = "ASV_SELECT_CONFIG";

// ---------------------------------------------------------------------------
// Config – workflow conventions that differ between deployments
// ---------------------------------------------------------------------------

/// Column names and file conventions of the target workflow.
///
/// Loaded from a JSON file; any key left out keeps its default:
///
/// ```json
/// { "timestamp_column": "collection_date", "identifier_column": null }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Metadata column holding the timepoints.
    pub timestamp_column: String,
    /// Metadata column holding ASV names. `None` disables ASV matching on export.
    pub identifier_column: Option<String>,
    /// Metadata field delimiter. `None` infers it from the file extension.
    pub delimiter: Option<char>,
    /// Suggested file name in the metadata export dialog.
    pub output_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timestamp_column: "timestamp".to_string(),
            identifier_column: Some("ASV".to_string()),
            delimiter: None,
            output_file_name: "selected_metadata.tsv".to_string(),
        }
    }
}

impl Config {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Resolve the config from an explicit path, then `ASV_SELECT_CONFIG`,
    /// then defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    /// Delimiter byte for a metadata file at `path`.
    ///
    /// `.csv` means comma; everything else (`.tsv`, `.txt`, ...) means tab.
    pub fn delimiter_for(&self, path: &Path) -> u8 {
        if let Some(c) = self.delimiter {
            if c.is_ascii() {
                return c as u8;
            }
            log::warn!("Ignoring non-ASCII delimiter {c:?}, inferring from extension");
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext == "csv" {
            b','
        } else {
            b'\t'
        }
    }
}
