use std::collections::BTreeSet;

use super::model::{MetadataTable, ReferenceSet};

// ---------------------------------------------------------------------------
// Selection: the user's chosen ASVs and timepoints
// ---------------------------------------------------------------------------

/// The two user-chosen subsets. Both start empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub identifiers: BTreeSet<String>,
    pub timestamps: BTreeSet<String>,
}

impl Selection {
    #[cfg(test)]
    pub fn new<I, T>(identifiers: I, timestamps: T) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            identifiers: identifiers.into_iter().map(Into::into).collect(),
            timestamps: timestamps.into_iter().map(Into::into).collect(),
        }
    }

    /// Export needs at least one ASV and at least one timestamp.
    pub fn export_enabled(&self) -> bool {
        !self.identifiers.is_empty() && !self.timestamps.is_empty()
    }

    /// Drop selected ASVs that are not in a newly loaded reference.
    pub fn retain_identifiers(&mut self, reference: &ReferenceSet) {
        self.identifiers.retain(|id| reference.contains(id));
    }

    /// Drop selected timestamps that are not in a newly loaded table.
    pub fn retain_timestamps(&mut self, metadata: &MetadataTable) {
        self.timestamps.retain(|ts| metadata.timestamps.contains(ts));
    }
}

/// Toggle one value in a selection set; returns whether it is now selected.
pub fn toggle(set: &mut BTreeSet<String>, value: &str) -> bool {
    if set.remove(value) {
        false
    } else {
        set.insert(value.to_string());
        true
    }
}

/// Return indices of metadata rows that match the selection.
///
/// A row matches when:
/// * its timestamp is one of the selected timestamps, and
/// * the table has no ASV column, or the row's ASV is one of the selected ASVs.
///
/// An empty subset on either side matches nothing.
pub fn matching_rows(metadata: &MetadataTable, selection: &Selection) -> Vec<usize> {
    if !selection.export_enabled() {
        return Vec::new();
    }
    (0..metadata.len())
        .filter(|&row| {
            let ts_ok = metadata
                .timestamp(row)
                .is_some_and(|ts| selection.timestamps.contains(ts));
            let id_ok = metadata.identifier_idx.is_none()
                || metadata
                    .identifier(row)
                    .is_some_and(|id| selection.identifiers.contains(id));
            ts_ok && id_ok
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::metadata::parse_metadata;
    use crate::data::reference::parse_reference;
    use std::path::Path;

    fn table(text: &str, config: &Config) -> MetadataTable {
        parse_metadata(text.as_bytes(), b'\t', config, Path::new("meta.tsv")).unwrap()
    }

    const META: &str = "ASV\ttimestamp\treads\n\
                        A\tT1\t1\n\
                        B\tT1\t2\n\
                        C\tT1\t3\n\
                        A\tT2\t4\n\
                        B\tT2\t5\n";

    #[test]
    fn export_enabled_iff_both_non_empty() {
        assert!(!Selection::default().export_enabled());
        assert!(!Selection::new(["A"], Vec::<String>::new()).export_enabled());
        assert!(!Selection::new(Vec::<String>::new(), ["T1"]).export_enabled());
        assert!(Selection::new(["A"], ["T1"]).export_enabled());
    }

    #[test]
    fn matches_identifier_and_timestamp() {
        let meta = table(META, &Config::default());
        let sel = Selection::new(["A", "B"], ["T1"]);
        assert_eq!(matching_rows(&meta, &sel), [0, 1]);

        let sel = Selection::new(["B"], ["T1", "T2"]);
        assert_eq!(matching_rows(&meta, &sel), [1, 4]);
    }

    #[test]
    fn unmatched_selection_is_empty() {
        let meta = table(META, &Config::default());
        let sel = Selection::new(["C"], ["T2"]);
        assert!(matching_rows(&meta, &sel).is_empty());
    }

    #[test]
    fn without_identifier_column_only_timestamps_filter() {
        let config = Config {
            identifier_column: None,
            ..Config::default()
        };
        let meta = table(META, &config);
        let sel = Selection::new(["Z"], ["T2"]);
        assert_eq!(matching_rows(&meta, &sel), [3, 4]);
    }

    #[test]
    fn toggle_flips_membership() {
        let mut set = BTreeSet::new();
        assert!(toggle(&mut set, "A"));
        assert!(set.contains("A"));
        assert!(!toggle(&mut set, "A"));
        assert!(set.is_empty());
    }

    #[test]
    fn retain_drops_identifiers_missing_from_new_reference() {
        let mut sel = Selection::new(["A", "B", "X"], ["T1"]);
        let reference = parse_reference(b">B\nAC\n>C\nGG\n").unwrap();
        sel.retain_identifiers(&reference);
        assert_eq!(sel.identifiers.iter().collect::<Vec<_>>(), ["B"]);
        assert_eq!(sel.timestamps.len(), 1);
    }

    #[test]
    fn retain_drops_timestamps_missing_from_new_table() {
        let mut sel = Selection::new(["A"], ["T1", "T9"]);
        sel.retain_timestamps(&table(META, &Config::default()));
        assert_eq!(sel.timestamps.iter().collect::<Vec<_>>(), ["T1"]);
    }
}
