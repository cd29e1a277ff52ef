use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use super::model::{uses_quoting, MetadataTable};
use crate::config::Config;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a delimited metadata table.
///
/// The delimiter comes from the config or the file extension; the timestamp
/// (and, if configured, ASV) column must be present in the header.
pub fn load_metadata(path: &Path, config: &Config) -> Result<MetadataTable> {
    let file = std::fs::File::open(path).map_err(|e| Error::io(path, e))?;
    parse_metadata(file, config.delimiter_for(path), config, path)
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a metadata table from any reader. `origin` only labels errors.
pub fn parse_metadata<R: Read>(
    reader: R,
    delimiter: u8,
    config: &Config,
    origin: &Path,
) -> Result<MetadataTable> {
    let malformed = |source| Error::MalformedMetadata {
        path: origin.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quoting(uses_quoting(delimiter))
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    // Zero-byte file: nothing to offer, but not an error.
    if headers.is_empty() {
        return Ok(MetadataTable::empty(delimiter));
    }

    let timestamp_idx = find_column(&headers, &config.timestamp_column)?;
    let identifier_idx = match &config.identifier_column {
        Some(col) => Some(find_column(&headers, col)?),
        None => None,
    };

    let mut rows = Vec::new();
    let mut timestamps = BTreeSet::new();

    for result in reader.records() {
        let record = result.map_err(malformed)?;
        let row: Vec<String> = record.iter().map(|f| f.to_string()).collect();

        let ts = row[timestamp_idx].trim();
        if !ts.is_empty() && !timestamps.contains(ts) {
            timestamps.insert(ts.to_string());
        }
        rows.push(row);
    }

    Ok(MetadataTable {
        headers,
        rows,
        delimiter,
        timestamp_idx: Some(timestamp_idx),
        identifier_idx,
        timestamps,
    })
}

fn find_column(headers: &[String], column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| Error::MissingColumn {
            column: column.to_string(),
            found: headers.iter().map(|h| h.trim().to_string()).collect(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(text: &str, delimiter: u8, config: &Config) -> Result<MetadataTable> {
        parse_metadata(text.as_bytes(), delimiter, config, Path::new("meta.tsv"))
    }

    #[test]
    fn extracts_sorted_unique_timestamps() {
        let text = "sample\tASV\ttimestamp\n\
                    s1\tA\t2021-03-01\n\
                    s2\tB\t2021-01-15\n\
                    s3\tA\t2021-03-01\n\
                    s4\tC\t \n";
        let table = parse(text, b'\t', &Config::default()).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.timestamps.iter().map(String::as_str).collect::<Vec<_>>(),
            ["2021-01-15", "2021-03-01"]
        );
        assert_eq!(table.timestamp_idx, Some(2));
        assert_eq!(table.identifier_idx, Some(1));
        assert_eq!(table.identifier(2), Some("A"));
    }

    #[test]
    fn comma_delimited() {
        let text = "ASV,timestamp,reads\nA,T1,10\nB,T2,3\n";
        let table = parse(text, b',', &Config::default()).unwrap();
        assert_eq!(table.delimiter, b',');
        assert_eq!(table.headers, ["ASV", "timestamp", "reads"]);
        assert_eq!(table.timestamp(1), Some("T2"));
    }

    #[test]
    fn missing_timestamp_column_names_it() {
        let err = parse("ASV\tdate\nA\t1\n", b'\t', &Config::default()).unwrap_err();
        match err {
            Error::MissingColumn { column, found } => {
                assert_eq!(column, "timestamp");
                assert_eq!(found, ["ASV", "date"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_identifier_column_is_rejected_only_when_configured() {
        let text = "timestamp\treads\nT1\t4\n";
        assert!(matches!(
            parse(text, b'\t', &Config::default()),
            Err(Error::MissingColumn { ref column, .. }) if column == "ASV"
        ));

        let config = Config {
            identifier_column: None,
            ..Config::default()
        };
        let table = parse(text, b'\t', &config).unwrap();
        assert_eq!(table.identifier_idx, None);
        assert_eq!(table.timestamps.len(), 1);
    }

    #[test]
    fn custom_timestamp_column() {
        let config = Config {
            timestamp_column: "collection_date".to_string(),
            ..Config::default()
        };
        let table = parse("ASV\tcollection_date\nA\tday1\n", b'\t', &config).unwrap();
        assert!(table.timestamps.contains("day1"));
    }

    #[test]
    fn empty_and_header_only_give_no_timestamps() {
        let table = parse("", b'\t', &Config::default()).unwrap();
        assert!(table.timestamps.is_empty());
        assert!(table.headers.is_empty());

        let table = parse("ASV\ttimestamp\n", b'\t', &Config::default()).unwrap();
        assert!(table.timestamps.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn ragged_row_is_malformed() {
        let err = parse("ASV\ttimestamp\nA\tT1\nB\n", b'\t', &Config::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata { .. }), "{err}");
    }

    #[test]
    fn tsv_quotes_are_plain_text() {
        let text = "sample\tASV\ttimestamp\tnote\n\
                    s1\tA\tT1\t\"open note\n\
                    s2\tA\tT2\tok\n\
                    s3\tB\tT3\tok\n";
        let table = parse(text, b'\t', &Config::default()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.timestamps.iter().map(String::as_str).collect::<Vec<_>>(),
            ["T1", "T2", "T3"]
        );
        assert_eq!(table.rows[0][3], "\"open note");
    }

    #[test]
    fn csv_still_honours_quotes() {
        let table = parse("ASV,timestamp,note\nA,T1,\"a, b\"\n", b',', &Config::default()).unwrap();
        assert_eq!(table.rows[0][2], "a, b");
    }

    proptest! {
        #[test]
        fn timestamp_set_is_distinct_column_values(
            rows in proptest::collection::vec(("[A-C]", "T[0-9]{1,2}"), 0..50),
        ) {
            let mut text = String::from("ASV\ttimestamp\n");
            for (asv, ts) in &rows {
                text.push_str(&format!("{asv}\t{ts}\n"));
            }
            let table = parse(&text, b'\t', &Config::default()).unwrap();
            let expected: BTreeSet<String> = rows.iter().map(|(_, ts)| ts.clone()).collect();
            prop_assert_eq!(&table.timestamps, &expected);
            prop_assert_eq!(table.len(), rows.len());
        }
    }
}
