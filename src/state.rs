use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::data::export;
use crate::data::filter::{self, matching_rows, Selection};
use crate::data::metadata::load_metadata;
use crate::data::model::{MetadataTable, ReferenceSet};
use crate::data::reference::load_references;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything one user session knows, independent of rendering.
///
/// Every UI event maps to one method here. A failed upload leaves the
/// previous reference, metadata and selection untouched.
pub struct SessionState {
    pub config: Config,

    /// Loaded reference (None until the user opens one).
    pub reference: Option<ReferenceSet>,

    /// Loaded metadata table.
    pub metadata: Option<MetadataTable>,

    /// Chosen ASVs and timestamps.
    pub selection: Selection,

    /// Indices of metadata rows matching the selection (cached).
    pub matching: Vec<usize>,

    /// Substring filter for the ASV list.
    pub identifier_query: String,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl SessionState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            reference: None,
            metadata: None,
            selection: Selection::default(),
            matching: Vec::new(),
            identifier_query: String::new(),
            status: None,
        }
    }

    // -- uploads --

    /// Parse and install one or more reference files.
    pub fn load_reference(&mut self, paths: &[PathBuf]) -> Result<()> {
        match load_references(paths) {
            Ok(reference) => {
                log::info!("Loaded {} ASVs from {} file(s)", reference.len(), paths.len());
                self.set_reference(reference);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load reference: {e}");
                self.set_status(StatusKind::Error, e.to_string());
                Err(e)
            }
        }
    }

    /// Install a parsed reference, dropping selections it no longer offers.
    pub fn set_reference(&mut self, reference: ReferenceSet) {
        self.selection.retain_identifiers(&reference);
        if reference.is_empty() {
            log::warn!("Reference contains no records");
            self.set_status(StatusKind::Warning, "Reference file contains no ASV records");
        } else {
            let text = format!("{} ASVs loaded", reference.len());
            self.set_status(StatusKind::Info, text);
        }
        self.reference = Some(reference);
        self.refilter();
    }

    /// Parse and install a metadata table.
    pub fn load_metadata(&mut self, path: &Path) -> Result<()> {
        match load_metadata(path, &self.config) {
            Ok(table) => {
                log::info!(
                    "Loaded {} metadata rows, {} timestamps from {}",
                    table.len(),
                    table.timestamps.len(),
                    path.display()
                );
                self.set_metadata(table);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load metadata: {e}");
                self.set_status(StatusKind::Error, e.to_string());
                Err(e)
            }
        }
    }

    pub fn set_metadata(&mut self, table: MetadataTable) {
        self.selection.retain_timestamps(&table);
        if table.timestamps.is_empty() {
            log::warn!("Metadata contains no timestamps");
            self.set_status(StatusKind::Warning, "Metadata file contains no timestamps");
        } else {
            let text = format!(
                "{} metadata rows, {} timestamps loaded",
                table.len(),
                table.timestamps.len()
            );
            self.set_status(StatusKind::Info, text);
        }
        self.metadata = Some(table);
        self.refilter();
    }

    // -- selection --

    /// Whether the export actions are available.
    pub fn export_enabled(&self) -> bool {
        self.selection.export_enabled()
    }

    /// Recompute `matching` after a selection or upload change.
    pub fn refilter(&mut self) {
        self.matching = match &self.metadata {
            Some(table) => matching_rows(table, &self.selection),
            None => Vec::new(),
        };
        log::debug!(
            "{} ASVs x {} timestamps selected, {} rows match",
            self.selection.identifiers.len(),
            self.selection.timestamps.len(),
            self.matching.len()
        );
    }

    pub fn toggle_identifier(&mut self, id: &str) {
        filter::toggle(&mut self.selection.identifiers, id);
        self.refilter();
    }

    pub fn toggle_timestamp(&mut self, ts: &str) {
        filter::toggle(&mut self.selection.timestamps, ts);
        self.refilter();
    }

    /// Select the given ASVs. Names not in the reference are skipped and returned.
    pub fn select_identifiers<I, S>(&mut self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unknown = Vec::new();
        for id in ids {
            let id = id.into();
            if self.reference.as_ref().is_some_and(|r| r.contains(&id)) {
                self.selection.identifiers.insert(id);
            } else {
                unknown.push(id);
            }
        }
        self.refilter();
        unknown
    }

    /// Select the given timestamps. Values not in the metadata are skipped and returned.
    pub fn select_timestamps<I, S>(&mut self, timestamps: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unknown = Vec::new();
        for ts in timestamps {
            let ts = ts.into();
            if self
                .metadata
                .as_ref()
                .is_some_and(|m| m.timestamps.contains(&ts))
            {
                self.selection.timestamps.insert(ts);
            } else {
                unknown.push(ts);
            }
        }
        self.refilter();
        unknown
    }

    /// Select every ASV currently shown by the list filter.
    pub fn select_all_identifiers(&mut self) {
        let visible: Vec<String> = self
            .visible_identifiers()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.selection.identifiers.extend(visible);
        self.refilter();
    }

    pub fn select_no_identifiers(&mut self) {
        self.selection.identifiers.clear();
        self.refilter();
    }

    pub fn select_all_timestamps(&mut self) {
        if let Some(table) = &self.metadata {
            self.selection.timestamps = table.timestamps.clone();
            self.refilter();
        }
    }

    pub fn select_no_timestamps(&mut self) {
        self.selection.timestamps.clear();
        self.refilter();
    }

    /// ASVs whose name contains `identifier_query` (case-insensitive), in reference order.
    pub fn visible_identifiers(&self) -> Vec<&str> {
        let Some(reference) = &self.reference else {
            return Vec::new();
        };
        let query = self.identifier_query.trim().to_lowercase();
        reference
            .identifiers()
            .filter(|id| query.is_empty() || id.to_lowercase().contains(&query))
            .collect()
    }

    // -- export --

    /// Write the filtered metadata. Refuses when the selection is incomplete.
    pub fn export_metadata(&mut self, path: &Path) -> Result<usize> {
        let result = match &self.metadata {
            Some(table) if self.export_enabled() => {
                export::export_metadata(path, table, &self.selection)
            }
            _ => Err(Error::EmptySelection),
        };
        self.report_export(result, path, "rows")
    }

    /// Write the selected ASVs as FASTA.
    pub fn export_reference(&mut self, path: &Path) -> Result<usize> {
        let result = match &self.reference {
            Some(reference) if self.export_enabled() => {
                export::export_reference(path, reference, &self.selection)
            }
            _ => Err(Error::EmptySelection),
        };
        self.report_export(result, path, "sequences")
    }

    /// Write the `ASV,Length` table of the whole reference.
    pub fn export_lengths(&mut self, path: &Path) -> Result<usize> {
        let result = match &self.reference {
            Some(reference) => export::export_lengths(path, reference),
            None => Err(Error::NoReference),
        };
        self.report_export(result, path, "ASV lengths")
    }

    fn report_export(&mut self, result: Result<usize>, path: &Path, what: &str) -> Result<usize> {
        match &result {
            Ok(n) => {
                let text = format!("Exported {n} {what} to {}", path.display());
                self.set_status(StatusKind::Info, text);
            }
            Err(e) => {
                log::error!("Export failed: {e}");
                self.set_status(StatusKind::Error, e.to_string());
            }
        }
        result
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
        });
    }
}
