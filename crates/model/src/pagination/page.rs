use crate::records::record::SourceRecord;

/// One offset-paginated query against the record source.
///
/// `start` is the number of records already retrieved in the run, not a
/// page index. `rows` is handed to the source unchecked. Offset pagination
/// can skip or repeat records when the result set changes between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<'a> {
    pub query: &'a str,
    pub start: u64,
    pub rows: i64,
}

impl<'a> PageRequest<'a> {
    pub fn new(query: &'a str, start: u64, rows: i64) -> Self {
        PageRequest { query, start, rows }
    }
}

/// Records returned for a single [`PageRequest`], in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResult {
    pub records: Vec<SourceRecord>,
    /// Total number of matches, when the source reports it.
    pub num_found: Option<u64>,
}

impl FetchResult {
    pub fn row_count(&self) -> u64 {
        self.records.len() as u64
    }

    /// A page shorter than requested means the source has run out. With a
    /// negative row count only an empty page ends the run.
    pub fn is_last_page(&self, requested_rows: i64) -> bool {
        self.records.is_empty()
            || i64::try_from(self.row_count()).is_ok_and(|rows| rows < requested_rows)
    }
}
