use async_trait::async_trait;
use engine_core::{
    connectors::{
        sink::OutputSink,
        source::{RecordSource, SourceConnector},
    },
    error::SourceError,
    progress::ProgressReporter,
};
use engine_runtime::execution::{executor::ExportExecutor, settings::ExportSettings};
use model::{
    pagination::page::{FetchResult, PageRequest},
    records::record::SourceRecord,
};
use std::{
    path::Path,
    sync::{Arc, Mutex},
};
use tokio::io::AsyncWrite;

/// Stored body for record `i`, escaped the way the index stores it and
/// padded with whitespace that the export trims.
pub fn stored_body(i: usize) -> String {
    format!("  00{i:03}nam#30;#31;aRecord {i}#30;#29;\n")
}

/// Binary form of [`stored_body`].
pub fn marc_bytes(i: usize) -> Vec<u8> {
    format!("00{i:03}nam\u{1e}\u{1f}aRecord {i}\u{1e}\u{1d}").into_bytes()
}

pub fn records(n: usize) -> Vec<SourceRecord> {
    (0..n)
        .map(|i| SourceRecord::new(format!("rec-{i:04}"), stored_body(i)))
        .collect()
}

/// Number of MARC records in a byte stream (one terminator each).
pub fn count_records(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == 0x1d).count()
}

/// Calls observed by an [`InMemoryConnector`].
#[derive(Debug, Default)]
pub struct CallLog {
    pub connects: usize,
    /// `(start, rows)` of every page query, in order.
    pub queries: Vec<(u64, i64)>,
}

/// Serves a fixed record list with offset pagination. Optionally fails the
/// query at a given offset.
#[derive(Clone)]
pub struct InMemoryConnector {
    records: Arc<Vec<SourceRecord>>,
    fail_at: Option<u64>,
    log: Arc<Mutex<CallLog>>,
}

impl InMemoryConnector {
    pub fn new(records: Vec<SourceRecord>) -> Self {
        InMemoryConnector {
            records: Arc::new(records),
            fail_at: None,
            log: Arc::new(Mutex::new(CallLog::default())),
        }
    }

    pub fn failing_at(mut self, offset: u64) -> Self {
        self.fail_at = Some(offset);
        self
    }

    pub fn queries(&self) -> Vec<(u64, i64)> {
        self.log.lock().unwrap().queries.clone()
    }

    pub fn connects(&self) -> usize {
        self.log.lock().unwrap().connects
    }
}

pub struct InMemorySource {
    records: Arc<Vec<SourceRecord>>,
    fail_at: Option<u64>,
    log: Arc<Mutex<CallLog>>,
}

#[async_trait]
impl SourceConnector for InMemoryConnector {
    type Source = InMemorySource;

    async fn connect(&self) -> Result<InMemorySource, SourceError> {
        self.log.lock().unwrap().connects += 1;
        Ok(InMemorySource {
            records: self.records.clone(),
            fail_at: self.fail_at,
            log: self.log.clone(),
        })
    }

    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn fetch(&mut self, request: &PageRequest<'_>) -> Result<FetchResult, SourceError> {
        self.log
            .lock()
            .unwrap()
            .queries
            .push((request.start, request.rows));

        if self.fail_at == Some(request.start) {
            return Err(SourceError::Other(format!(
                "connection reset at offset {}",
                request.start
            )));
        }

        let total = self.records.len();
        let start = (request.start as usize).min(total);
        let rows = usize::try_from(request.rows).unwrap_or(usize::MAX);
        let end = start.saturating_add(rows).min(total);
        Ok(FetchResult {
            records: self.records[start..end].to_vec(),
            num_found: Some(total as u64),
        })
    }
}

pub type TestExecutor<W> = ExportExecutor<InMemoryConnector, W, Vec<u8>>;

/// Executor writing to an in-memory console.
pub fn console_executor(
    settings: ExportSettings,
    connector: InMemoryConnector,
) -> TestExecutor<Vec<u8>> {
    ExportExecutor::new(
        settings,
        connector,
        OutputSink::console(Vec::new()),
        ProgressReporter::new(Vec::new()),
    )
}

/// Executor writing rotating files under `dir` with base name `base`.
pub fn rotating_executor(
    settings: ExportSettings,
    connector: InMemoryConnector,
    dir: &Path,
    base: &str,
) -> TestExecutor<tokio::io::Stdout> {
    let base = dir.join(base).to_str().unwrap().to_string();
    let settings = ExportSettings {
        base: Some(base),
        ..settings
    };
    let sink = settings.output_sink();
    ExportExecutor::new(settings, connector, sink, ProgressReporter::new(Vec::new()))
}

/// Splits an executor into its console bytes and progress text.
pub fn console_output<W>(executor: TestExecutor<W>) -> (Option<W>, String)
where
    W: AsyncWrite + Unpin + Send,
{
    let (sink, progress) = executor.into_parts();
    let text = String::from_utf8(progress.into_inner()).unwrap();
    (sink.into_console(), text)
}

/// Files named `<base>.*.mrc` in `dir`, sorted by name.
pub fn output_files(dir: &Path, base: &str) -> Vec<String> {
    let prefix = format!("{base}.");
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(&prefix) && name.ends_with(".mrc"))
        .collect();
    names.sort();
    names
}
