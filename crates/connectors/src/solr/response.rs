use crate::solr::error::SolrError;
use model::records::record::SourceRecord;
use serde::Deserialize;

/// Body of a `wt=json` select response. Only the result set is read.
#[derive(Debug, Deserialize)]
pub struct SelectResponse {
    pub response: ResultSet,
}

#[derive(Debug, Deserialize)]
pub struct ResultSet {
    #[serde(rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<SourceRecord>,
}

pub fn parse_select_response(body: &[u8]) -> Result<SelectResponse, SolrError> {
    Ok(serde_json::from_slice(body)?)
}
