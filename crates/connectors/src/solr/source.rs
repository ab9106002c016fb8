use crate::solr::{error::SolrError, response::parse_select_response};
use model::pagination::page::{FetchResult, PageRequest};
use reqwest::{Client, Url};
use tracing::debug;

/// Stored fields requested from the index.
const FIELD_LIST: &str = "id,fullrecord";

/// A connection to one Solr core.
///
/// Holds its own HTTP client, so dropping the source closes any pooled
/// connections to the server.
pub struct SolrDataSource {
    endpoint: Url,
    client: Client,
}

impl SolrDataSource {
    /// Opens a connection to the core at `url`, e.g.
    /// `http://localhost:8983/solr/biblio`.
    pub fn connect(url: &str) -> Result<Self, SolrError> {
        let endpoint = select_endpoint(url)?;
        let client = Client::builder().build()?;
        debug!("Opened Solr connection to {}", endpoint);
        Ok(SolrDataSource { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Runs one page of the query. The query text is passed through as-is.
    pub async fn select(&self, request: &PageRequest<'_>) -> Result<FetchResult, SolrError> {
        let start = std::time::Instant::now();
        let params = [
            ("q", request.query.to_string()),
            ("start", request.start.to_string()),
            ("rows", request.rows.to_string()),
            ("wt", "json".to_string()),
            ("fl", FIELD_LIST.to_string()),
        ];

        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SolrError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let parsed = parse_select_response(&body)?;

        debug!(
            "Fetched {} docs at offset {} in {} ms",
            parsed.response.docs.len(),
            request.start,
            start.elapsed().as_millis()
        );

        Ok(FetchResult {
            records: parsed.response.docs,
            num_found: Some(parsed.response.num_found),
        })
    }
}

/// Resolves the `select` handler below a core URL.
pub fn select_endpoint(url: &str) -> Result<Url, SolrError> {
    let invalid = |reason: String| SolrError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let base = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
        return Err(invalid("expected an http(s) URL".to_string()));
    }

    let path = format!("{}/select", base.path().trim_end_matches('/'));
    let mut endpoint = base;
    endpoint.set_path(&path);
    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        task::JoinHandle,
    };

    /// Answers one HTTP request with the given status line and body. The
    /// handle yields the raw request as received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/solr/biblio", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let reply = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });

        (url, handle)
    }

    /// Reads the request head and as much body as `content-length` announces.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut received = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            received.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&received);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let length = text[..head_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if received.len() >= head_end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8(received).unwrap()
    }

    #[tokio::test]
    async fn select_posts_form_and_decodes_docs() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"response":{"numFound":42,"start":40,"docs":[
                {"id":"b2","fullrecord":"00002#29;"},
                {"id":"a1","fullrecord":"00001#29;"}
            ]}}"#,
        )
        .await;

        let source = SolrDataSource::connect(&url).unwrap();
        let page = source
            .select(&PageRequest::new("format:Book", 40, 2))
            .await
            .unwrap();

        let ids: Vec<_> = page.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b2", "a1"]);
        assert_eq!(page.num_found, Some(42));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /solr/biblio/select HTTP/1.1\r\n"));
        assert!(
            request
                .to_ascii_lowercase()
                .contains("content-type: application/x-www-form-urlencoded")
        );
        let (_, form) = request.split_once("\r\n\r\n").unwrap();
        assert_eq!(
            form,
            "q=format%3ABook&start=40&rows=2&wt=json&fl=id%2Cfullrecord"
        );
    }

    #[tokio::test]
    async fn error_status_keeps_code_and_body() {
        let (url, server) = serve_once("500 Internal Server Error", "index unavailable").await;

        let source = SolrDataSource::connect(&url).unwrap();
        let err = source
            .select(&PageRequest::new("*:*", 0, 20))
            .await
            .unwrap_err();
        server.await.unwrap();

        match err {
            SolrError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "index unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn appends_select_to_core_path() {
        let url = select_endpoint("http://localhost:8983/solr/biblio").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8983/solr/biblio/select");
    }

    #[test]
    fn tolerates_trailing_slash() {
        let url = select_endpoint("https://index.example.org/solr/biblio/").unwrap();
        assert_eq!(url.as_str(), "https://index.example.org/solr/biblio/select");
    }

    #[test]
    fn keeps_query_string() {
        let url = select_endpoint("http://localhost:8983/solr/biblio?shards=a").unwrap();
        assert_eq!(url.path(), "/solr/biblio/select");
        assert_eq!(url.query(), Some("shards=a"));
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(
            select_endpoint("localhost:8983/solr/biblio"),
            Err(SolrError::InvalidUrl { .. })
        ));
        assert!(select_endpoint("not a url").is_err());
    }

    #[test]
    fn connect_does_not_touch_the_network() {
        let source = SolrDataSource::connect("http://127.0.0.1:9/solr/biblio").unwrap();
        assert_eq!(source.endpoint().port(), Some(9));
    }
}
