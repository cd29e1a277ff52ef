use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading inputs or exporting a selection.
///
/// None of these are fatal to a running session: a rejected upload leaves
/// the previous state in place.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error reading or writing \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed reference file \"{}\": {reason}", path.display())]
    MalformedReference { path: PathBuf, reason: String },

    #[error("Malformed metadata file \"{}\": {source}", path.display())]
    MalformedMetadata { path: PathBuf, source: csv::Error },

    #[error("Metadata has no '{column}' column (found: {})", found.join(", "))]
    MissingColumn { column: String, found: Vec<String> },

    #[error("Select at least one ASV and one timestamp before exporting")]
    EmptySelection,

    #[error("Open a reference file first")]
    NoReference,

    #[error("Invalid configuration \"{}\": {source}", path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
