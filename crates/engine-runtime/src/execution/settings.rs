use engine_core::{connectors::sink::OutputSink, pacing::Pacing};

pub const DEFAULT_URL: &str = "http://localhost:8983/solr/biblio";
pub const DEFAULT_QUERY: &str = "title:lucene";
pub const DEFAULT_LIMIT: i64 = 100;
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const DEFAULT_FILE_SIZE: i64 = 10_000;

/// Everything an export run is configured with.
///
/// The numeric options are taken as given. A limit that the record count
/// can never equal, such as a negative one, exports everything.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Solr core to read from.
    pub url: String,
    /// Passed to the source verbatim.
    pub query: String,
    /// Maximum records to emit; 0 means no limit.
    pub limit: i64,
    /// Records requested per query.
    pub page_size: i64,
    /// Records per output file before rotating.
    pub file_size: i64,
    /// Enables rotating `<base>.NNNNNNNN.mrc` files instead of stdout.
    pub base: Option<String>,
    /// Seconds to pause before each page query.
    pub delay: Option<f64>,
    /// Jitter the pause.
    pub paranoid: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        ExportSettings {
            url: DEFAULT_URL.to_string(),
            query: DEFAULT_QUERY.to_string(),
            limit: DEFAULT_LIMIT,
            page_size: DEFAULT_PAGE_SIZE,
            file_size: DEFAULT_FILE_SIZE,
            base: None,
            delay: None,
            paranoid: false,
        }
    }
}

impl ExportSettings {
    pub fn pacing(&self) -> Pacing {
        Pacing::new(self.delay, self.paranoid)
    }

    pub fn output_sink(&self) -> OutputSink {
        OutputSink::for_base(self.base.as_deref(), self.file_size)
    }
}
