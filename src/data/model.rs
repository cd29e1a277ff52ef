use std::collections::{BTreeSet, HashMap};

// ---------------------------------------------------------------------------
// ReferenceRecord – one ASV from the reference file(s)
// ---------------------------------------------------------------------------

/// A single reference sequence, keyed by its ASV name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
    /// First whitespace-delimited token of the header line.
    pub id: String,
    pub seq: Vec<u8>,
}

impl ReferenceRecord {
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ReferenceSet – the identifier set
// ---------------------------------------------------------------------------

/// Deduplicated reference records in first-seen order.
///
/// When an identifier shows up twice, the longer sequence replaces the
/// shorter one but keeps the original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    records: Vec<ReferenceRecord>,
    index: HashMap<String, usize>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, keeping the longest sequence per identifier.
    pub fn insert(&mut self, record: ReferenceRecord) {
        match self.index.get(&record.id) {
            Some(&pos) => {
                if self.records[pos].len() < record.len() {
                    self.records[pos] = record;
                }
            }
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Fold another set into this one with the same longest-wins rule.
    pub fn merge(&mut self, other: ReferenceSet) {
        for record in other.records {
            self.insert(record);
        }
    }

    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.id.as_str())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ReferenceRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<ReferenceRecord> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = ReferenceRecord>>(iter: I) -> Self {
        let mut set = ReferenceSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// MetadataTable – the parsed metadata file
// ---------------------------------------------------------------------------

/// A delimited metadata table kept verbatim so it can be written back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTable {
    /// Header row, in file order.
    pub headers: Vec<String>,
    /// Data rows, in file order. Every row has `headers.len()` fields.
    pub rows: Vec<Vec<String>>,
    /// Field delimiter of the source, reused on export.
    pub delimiter: u8,
    /// Position of the timestamp column (`None` only for an empty file).
    pub timestamp_idx: Option<usize>,
    /// Position of the ASV column, when one is configured.
    pub identifier_idx: Option<usize>,
    /// Sorted unique non-empty timestamps.
    pub timestamps: BTreeSet<String>,
}

/// Tab-separated files carry `"` as plain text; only other delimiters quote.
pub fn uses_quoting(delimiter: u8) -> bool {
    delimiter != b'\t'
}

impl MetadataTable {
    /// A table with no header and no rows, as read from a zero-byte file.
    pub fn empty(delimiter: u8) -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
            delimiter,
            timestamp_idx: None,
            identifier_idx: None,
            timestamps: BTreeSet::new(),
        }
    }

    pub fn uses_quoting(&self) -> bool {
        uses_quoting(self.delimiter)
    }

    /// Trimmed timestamp cell of a row.
    pub fn timestamp(&self, row: usize) -> Option<&str> {
        self.cell(row, self.timestamp_idx?)
    }

    /// Trimmed ASV cell of a row.
    pub fn identifier(&self, row: usize) -> Option<&str> {
        self.cell(row, self.identifier_idx?)
    }

    fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(|s| s.trim())
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, seq: &str) -> ReferenceRecord {
        ReferenceRecord {
            id: id.to_string(),
            seq: seq.as_bytes().to_vec(),
        }
    }

    #[test]
    fn duplicate_keeps_longest_in_first_position() {
        let set: ReferenceSet = [rec("A", "ACG"), rec("B", "TT"), rec("A", "ACGTA"), rec("A", "A")]
            .into_iter()
            .collect();
        assert_eq!(set.identifiers().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(set.get("A").unwrap().seq, b"ACGTA");
    }

    #[test]
    fn merge_applies_longest_wins_across_sets() {
        let mut first: ReferenceSet = [rec("A", "AC"), rec("B", "GGGG")].into_iter().collect();
        let second: ReferenceSet = [rec("B", "GG"), rec("C", "T"), rec("A", "ACGT")]
            .into_iter()
            .collect();
        first.merge(second);
        assert_eq!(first.identifiers().collect::<Vec<_>>(), ["A", "B", "C"]);
        assert_eq!(first.get("A").unwrap().len(), 4);
        assert_eq!(first.get("B").unwrap().len(), 4);
        assert!(first.contains("C"));
        assert!(!first.contains("D"));
    }
}
