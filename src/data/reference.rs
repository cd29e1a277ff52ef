use std::path::{Path, PathBuf};

use needletail::parse_fastx_reader;

use super::model::{ReferenceRecord, ReferenceSet};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load one or more reference files into a single identifier set.
///
/// Records are merged in the order the paths are given; a duplicated ASV
/// keeps its longest sequence. Any malformed file fails the whole upload.
pub fn load_references(paths: &[PathBuf]) -> Result<ReferenceSet> {
    let mut merged = ReferenceSet::new();
    for path in paths {
        let set = load_reference(path)?;
        log::debug!("{}: {} ASVs", path.display(), set.len());
        merged.merge(set);
    }
    Ok(merged)
}

/// Load a single FASTA / FASTQ file, gzipped or plain.
pub fn load_reference(path: &Path) -> Result<ReferenceSet> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    parse_reference(&bytes).map_err(|reason| Error::MalformedReference {
        path: path.to_path_buf(),
        reason,
    })
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse reference records from raw file contents.
///
/// A leading UTF-8 BOM and blank lines before the first record are skipped.
/// A file that is empty (or only whitespace) is valid and has no records.
pub fn parse_reference(bytes: &[u8]) -> std::result::Result<ReferenceSet, String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let bytes = &bytes[start..];
    if bytes.is_empty() {
        return Ok(ReferenceSet::new());
    }

    let mut reader = parse_fastx_reader(bytes).map_err(|e| e.to_string())?;
    let mut set = ReferenceSet::new();
    let mut n = 0usize;

    while let Some(result) = reader.next() {
        let record = result.map_err(|e| e.to_string())?;
        n += 1;
        let id = record_id(record.id())
            .ok_or_else(|| format!("record {n} has an empty identifier"))?;
        let record = ReferenceRecord {
            id,
            seq: record.seq().into_owned(),
        };
        if record.is_empty() {
            log::warn!("ASV {} has an empty sequence", record.id);
        }
        set.insert(record);
    }

    Ok(set)
}

/// ASV name: the header up to the first whitespace.
fn record_id(header: &[u8]) -> Option<String> {
    let token = header
        .split(|b| b.is_ascii_whitespace())
        .find(|t| !t.is_empty())?;
    Some(String::from_utf8_lossy(token).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(set: &ReferenceSet) -> Vec<&str> {
        set.identifiers().collect()
    }

    #[test]
    fn extracts_first_header_token() {
        let fasta = b">ASV_1 len=4 sample=x\nACGT\n>ASV_2\tother\nGG\nTT\n";
        let set = parse_reference(fasta).unwrap();
        assert_eq!(ids(&set), ["ASV_1", "ASV_2"]);
        assert_eq!(set.get("ASV_2").unwrap().seq, b"GGTT");
    }

    #[test]
    fn duplicates_collapse_to_longest() {
        let fasta = b">A\nAC\n>B\nT\n>A\nACGTAC\n";
        let set = parse_reference(fasta).unwrap();
        assert_eq!(ids(&set), ["A", "B"]);
        assert_eq!(set.get("A").unwrap().len(), 6);
    }

    #[test]
    fn reads_fastq() {
        let fastq = b"@r1 desc\nACGT\n+\nIIII\n@r2\nGG\n+\nII\n";
        let set = parse_reference(fastq).unwrap();
        assert_eq!(ids(&set), ["r1", "r2"]);
    }

    #[test]
    fn handles_crlf() {
        let fasta = b">A\r\nACGT\r\n>B\r\nGG\r\n";
        let set = parse_reference(fasta).unwrap();
        assert_eq!(ids(&set), ["A", "B"]);
        assert_eq!(set.get("A").unwrap().seq, b"ACGT");
    }

    #[test]
    fn empty_file_is_empty_set() {
        assert!(parse_reference(b"").unwrap().is_empty());
        assert!(parse_reference(b"\n\n  \n").unwrap().is_empty());
    }

    #[test]
    fn skips_leading_blank_lines() {
        let set = parse_reference(b"\n  \r\n>A\nAC\n").unwrap();
        assert_eq!(ids(&set), ["A"]);
    }

    #[test]
    fn skips_utf8_bom() {
        let set = parse_reference(b"\xEF\xBB\xBF>A desc\nAC\n>B\nG\n").unwrap();
        assert_eq!(ids(&set), ["A", "B"]);

        let set = parse_reference(b"\xEF\xBB\xBF\n>A\nAC\n").unwrap();
        assert_eq!(ids(&set), ["A"]);
        assert!(parse_reference(b"\xEF\xBB\xBF").unwrap().is_empty());
    }

    #[test]
    fn non_fasta_is_rejected() {
        assert!(parse_reference(b"ASV\ttimestamp\nA\t2020\n").is_err());
    }

    #[test]
    fn blank_identifier_is_rejected() {
        let err = parse_reference(b">A\nAC\n> \nGG\n").unwrap_err();
        assert!(err.contains("record 2"), "{err}");
    }

    #[test]
    fn record_id_skips_leading_space() {
        assert_eq!(record_id(b"  X y").as_deref(), Some("X"));
        assert_eq!(record_id(b"   "), None);
    }

    proptest! {
        #[test]
        fn identifier_set_is_distinct_headers(
            records in proptest::collection::vec(("[A-Za-z][A-Za-z0-9_]{0,6}", "[ACGT]{1,12}"), 1..40),
        ) {
            let mut fasta = String::new();
            for (id, seq) in &records {
                fasta.push_str(&format!(">{id} extra\n{seq}\n"));
            }
            let set = parse_reference(fasta.as_bytes()).unwrap();

            let mut expected: Vec<&str> = Vec::new();
            for (id, _) in &records {
                if !expected.contains(&id.as_str()) {
                    expected.push(id.as_str());
                }
            }
            prop_assert_eq!(ids(&set), expected);

            for (id, _) in &records {
                let longest = records.iter().filter(|(i, _)| i == id).map(|(_, s)| s.len()).max().unwrap();
                prop_assert_eq!(set.get(id).unwrap().len(), longest);
            }
        }
    }
}
