use super::model::RawTable;

/// Case-insensitive marker of diagnostic sensor records.
pub const SENTINEL: &str = "sdi";

/// How many rows each cleaning stage removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Records the parser could not use.
    pub malformed: usize,
    /// Rows with every field missing.
    pub empty: usize,
    /// Rows holding the `SDI` sentinel in any field.
    pub sentinel: usize,
}

impl CleanReport {
    pub fn total(&self) -> usize {
        self.malformed + self.empty + self.sentinel
    }
}

/// Drop rows with every field missing.  Returns how many were removed.
pub fn drop_empty_rows(table: &mut RawTable) -> usize {
    let before = table.rows.len();
    table.rows.retain(|row| row.iter().any(Option::is_some));
    before - table.rows.len()
}

/// Whether any present field contains the sentinel, ignoring case.
pub fn has_sentinel(row: &[Option<String>]) -> bool {
    row.iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(SENTINEL))
}

/// Drop rows flagged by [`has_sentinel`].  Returns how many were removed.
pub fn drop_sentinel_rows(table: &mut RawTable) -> usize {
    let before = table.rows.len();
    table.rows.retain(|row| !has_sentinel(row));
    before - table.rows.len()
}

/// Run both row filters in order: empty rows first, then sentinel rows.
pub fn clean(table: &mut RawTable, malformed: usize) -> CleanReport {
    let empty = drop_empty_rows(table);
    let sentinel = drop_sentinel_rows(table);
    CleanReport {
        malformed,
        empty,
        sentinel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<Option<String>> {
        fields
            .iter()
            .map(|f| (!f.is_empty()).then(|| f.to_string()))
            .collect()
    }

    fn table(rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: vec!["SampleDate".into(), "Temp".into()],
            rows: rows.iter().map(|r| row(r)).collect(),
        }
    }

    #[test]
    fn sentinel_row_is_dropped_entirely() {
        let mut t = table(&[
            &["2024-01-01", "4.1"],
            &["2024-01-02", "SDI-ERROR"],
            &["2024-01-03", "4.3"],
        ]);
        let removed = drop_sentinel_rows(&mut t);

        assert_eq!(removed, 1);
        assert_eq!(t.rows, vec![row(&["2024-01-01", "4.1"]), row(&["2024-01-03", "4.3"])]);
    }

    #[test]
    fn sentinel_match_ignores_case() {
        assert!(has_sentinel(&row(&["probe sdi fault", "1"])));
        assert!(has_sentinel(&row(&["", "xSdIx"])));
        assert!(!has_sentinel(&row(&["SD1", "S D I"])));
    }

    #[test]
    fn sentinel_filter_is_idempotent() {
        let mut t = table(&[
            &["a", "1"],
            &["SDI", "2"],
            &["b", "sdi"],
            &["c", "3"],
        ]);
        drop_sentinel_rows(&mut t);
        let once = t.clone();
        let removed = drop_sentinel_rows(&mut t);

        assert_eq!(removed, 0);
        assert_eq!(t, once);
    }

    #[test]
    fn empty_rows_go_and_order_is_kept() {
        let mut t = table(&[&["a", "1"], &["", ""], &["", "2"], &["b", ""]]);
        let report = clean(&mut t, 3);

        assert_eq!(report, CleanReport { malformed: 3, empty: 1, sentinel: 0 });
        assert_eq!(report.total(), 4);
        assert_eq!(t.rows, vec![row(&["a", "1"]), row(&["", "2"]), row(&["b", ""])]);
        assert_eq!(t.headers.len(), 2);
    }
}
