use crate::error::SourceError;
use async_trait::async_trait;
use connectors::solr::source::SolrDataSource;
use model::pagination::page::{FetchResult, PageRequest};

/// An open connection that can answer offset-paginated queries.
///
/// Dropping the value closes the connection.
#[async_trait]
pub trait RecordSource: Send {
    async fn fetch(&mut self, request: &PageRequest<'_>) -> Result<FetchResult, SourceError>;
}

/// Opens fresh [`RecordSource`] connections, so the export loop can close
/// its connection before a pause and reconnect afterwards.
#[async_trait]
pub trait SourceConnector: Send + Sync {
    type Source: RecordSource;

    async fn connect(&self) -> Result<Self::Source, SourceError>;

    /// Human-readable location of the source, used in log lines.
    fn describe(&self) -> String;
}

/// Connects to a Solr core by URL.
#[derive(Debug, Clone)]
pub struct SolrConnector {
    url: String,
}

impl SolrConnector {
    pub fn new(url: impl Into<String>) -> Self {
        SolrConnector { url: url.into() }
    }
}

#[async_trait]
impl SourceConnector for SolrConnector {
    type Source = SolrDataSource;

    async fn connect(&self) -> Result<SolrDataSource, SourceError> {
        Ok(SolrDataSource::connect(&self.url)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[async_trait]
impl RecordSource for SolrDataSource {
    async fn fetch(&mut self, request: &PageRequest<'_>) -> Result<FetchResult, SourceError> {
        Ok(self.select(request).await?)
    }
}
