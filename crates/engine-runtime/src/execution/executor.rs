use crate::{
    error::ExportError,
    execution::{
        settings::ExportSettings,
        state::{ExportState, RecordFlow},
    },
};
use engine_core::{
    connectors::{
        sink::OutputSink,
        source::{RecordSource, SolrConnector, SourceConnector},
    },
    pacing::Pacing,
    progress::ProgressReporter,
};
use model::pagination::page::PageRequest;
use std::io::{Stderr, Write};
use tokio::io::{AsyncWrite, Stdout};
use tracing::{debug, info};

/// Runs a complete export against the configured Solr core, writing to
/// stdout or rotating files and reporting progress on stderr.
///
/// Returns the number of records written.
pub async fn run(settings: ExportSettings) -> Result<u64, ExportError> {
    let connector = SolrConnector::new(settings.url.clone());
    let sink = settings.output_sink();
    let mut executor = ExportExecutor::new(settings, connector, sink, ProgressReporter::stderr());
    executor.execute().await
}

/// The export loop: page through the source by offset, append each record
/// to the sink, pause between pages when configured, and stop at the limit
/// or when the source runs out.
pub struct ExportExecutor<C, W = Stdout, P = Stderr> {
    settings: ExportSettings,
    pacing: Pacing,
    connector: C,
    sink: OutputSink<W>,
    progress: ProgressReporter<P>,
}

impl<C, W, P> ExportExecutor<C, W, P>
where
    C: SourceConnector,
    W: AsyncWrite + Unpin + Send,
    P: Write,
{
    pub fn new(
        settings: ExportSettings,
        connector: C,
        sink: OutputSink<W>,
        progress: ProgressReporter<P>,
    ) -> Self {
        let pacing = settings.pacing();
        Self {
            settings,
            pacing,
            connector,
            sink,
            progress,
        }
    }

    pub async fn execute(&mut self) -> Result<u64, ExportError> {
        info!(
            "Exporting records matching '{}' from {}",
            self.settings.query,
            self.connector.describe()
        );

        let result = self.export_pages().await;

        // The output is closed on failure too, so records already handed to
        // the sink are flushed before the error propagates.
        let closed = self.sink.close().await;
        let total = result?;
        closed?;

        info!("Export finished: {} records written", total);
        Ok(total)
    }

    pub fn into_parts(self) -> (OutputSink<W>, ProgressReporter<P>) {
        (self.sink, self.progress)
    }

    async fn export_pages(&mut self) -> Result<u64, ExportError> {
        let mut source = self.connector.connect().await?;
        self.progress.start();
        let mut state = ExportState::default();

        loop {
            let mut annotation = String::new();
            if let Some(pause) = self.pacing.next_pause()? {
                annotation = pause.annotation();
                drop(source);
                debug!("Closed source connection, sleeping {:.2} sec", pause.secs());
                pause.sleep().await;
                source = self.connector.connect().await?;
            }

            let request = PageRequest::new(
                &self.settings.query,
                state.total_recs,
                self.settings.page_size,
            );
            let page = source.fetch(&request).await?;
            if state.pages == 0
                && let Some(num_found) = page.num_found
            {
                info!("{} records match the query", num_found);
            }
            state.begin_page();

            let mut flow = RecordFlow::Continue;
            for record in &page.records {
                self.sink.write_record(&record.to_marc_bytes()).await?;
                flow = state.record_done(&record.id, self.settings.limit);
                if flow == RecordFlow::LimitReached {
                    break;
                }
            }

            self.progress.page(state.last_id(), state.total_recs, &annotation);

            if flow == RecordFlow::LimitReached || page.is_last_page(self.settings.page_size) {
                debug!(
                    "Stopping after page {} with {} records",
                    state.pages, state.total_recs
                );
                self.progress.finish();
                return Ok(state.total_recs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use engine_core::error::SourceError;
    use model::{pagination::page::FetchResult, records::record::SourceRecord};
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    struct CountingConnector {
        available: u64,
        connects: Arc<AtomicUsize>,
        connect_latency: Duration,
    }

    struct CountingSource {
        available: u64,
    }

    #[async_trait]
    impl RecordSource for CountingSource {
        async fn fetch(&mut self, request: &PageRequest<'_>) -> Result<FetchResult, SourceError> {
            let rows = u64::try_from(request.rows).unwrap_or(u64::MAX);
            let end = request.start.saturating_add(rows).min(self.available);
            let records = (request.start..end)
                .map(|i| SourceRecord::new(format!("r{i}"), format!("{i}#29;")))
                .collect();
            Ok(FetchResult {
                records,
                num_found: Some(self.available),
            })
        }
    }

    #[async_trait]
    impl SourceConnector for CountingConnector {
        type Source = CountingSource;

        async fn connect(&self) -> Result<CountingSource, SourceError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.connect_latency).await;
            Ok(CountingSource {
                available: self.available,
            })
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    fn executor(
        settings: ExportSettings,
        available: u64,
    ) -> (
        ExportExecutor<CountingConnector, Vec<u8>, Vec<u8>>,
        Arc<AtomicUsize>,
    ) {
        let connects = Arc::new(AtomicUsize::new(0));
        let connector = CountingConnector {
            available,
            connects: connects.clone(),
            connect_latency: Duration::ZERO,
        };
        let exec = ExportExecutor::new(
            settings,
            connector,
            OutputSink::console(Vec::new()),
            ProgressReporter::new(Vec::new()),
        );
        (exec, connects)
    }

    #[tokio::test]
    async fn connects_once_without_delay() {
        let settings = ExportSettings {
            limit: 0,
            page_size: 4,
            ..Default::default()
        };
        let (mut exec, connects) = executor(settings, 10);

        assert_eq!(exec.execute().await.unwrap(), 10);
        assert_eq!(connects.load(Ordering::SeqCst), 1);

        let (sink, _) = exec.into_parts();
        assert_eq!(
            sink.into_console().unwrap(),
            b"0\x1d1\x1d2\x1d3\x1d4\x1d5\x1d6\x1d7\x1d8\x1d9\x1d".to_vec()
        );
    }

    #[tokio::test]
    async fn reconnects_around_every_pause() {
        let settings = ExportSettings {
            limit: 0,
            page_size: 4,
            delay: Some(0.001),
            ..Default::default()
        };
        let (mut exec, connects) = executor(settings, 10);

        assert_eq!(exec.execute().await.unwrap(), 10);
        // Initial connection plus one per page (4 + 4 + 2).
        assert_eq!(connects.load(Ordering::SeqCst), 4);

        let (_, progress) = exec.into_parts();
        let text = String::from_utf8(progress.into_inner()).unwrap();
        assert_eq!(text.matches("[sleeping 0.00 sec]").count(), 3);
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn invalid_pause_aborts_before_first_query() {
        let settings = ExportSettings {
            delay: Some(-1.0),
            ..Default::default()
        };
        let (mut exec, _) = executor(settings, 10);

        let err = exec.execute().await.unwrap_err();
        assert!(matches!(err, ExportError::Pacing(_)));
    }

    #[tokio::test]
    async fn rate_excludes_connection_setup() {
        let settings = ExportSettings {
            limit: 0,
            page_size: 20,
            ..Default::default()
        };
        let connector = CountingConnector {
            available: 10,
            connects: Arc::new(AtomicUsize::new(0)),
            connect_latency: Duration::from_millis(300),
        };
        let mut exec = ExportExecutor::new(
            settings,
            connector,
            OutputSink::console(Vec::new()),
            ProgressReporter::new(Vec::new()),
        );

        assert_eq!(exec.execute().await.unwrap(), 10);

        let (_, progress) = exec.into_parts();
        let text = String::from_utf8(progress.into_inner()).unwrap();
        let rate: u64 = text
            .split(" at ")
            .nth(1)
            .and_then(|rest| rest.split(' ').next())
            .unwrap()
            .parse()
            .unwrap();
        // Counting the 300 ms connect would cap the rate at 33 rec/sec.
        assert!(rate > 40, "rate {rate} includes connect time");
    }
}
