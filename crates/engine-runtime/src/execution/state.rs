/// Outcome of exporting a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFlow {
    Continue,
    /// The configured limit was hit; stop the run after this record.
    LimitReached,
}

/// Counters threaded through the export loop.
///
/// Per-file counts live with the rotating output itself.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportState {
    /// Records retrieved so far; also the offset of the next page.
    pub total_recs: u64,
    /// Records handled from the current page.
    pub page_recs: u64,
    /// Pages fetched so far.
    pub pages: u64,
    last_id: Option<String>,
}

impl ExportState {
    pub fn begin_page(&mut self) {
        self.page_recs = 0;
        self.pages += 1;
    }

    /// Counts one exported record. The limit is hit only when the running
    /// total equals it exactly, so zero and negative limits never stop.
    pub fn record_done(&mut self, id: &str, limit: i64) -> RecordFlow {
        self.page_recs += 1;
        self.total_recs += 1;
        self.last_id = Some(id.to_string());

        if limit != 0 && i64::try_from(self.total_recs).is_ok_and(|total| total == limit) {
            RecordFlow::LimitReached
        } else {
            RecordFlow::Continue
        }
    }

    /// Id of the most recent record, carried across pages.
    pub fn last_id(&self) -> &str {
        self.last_id.as_deref().unwrap_or_default()
    }
}
