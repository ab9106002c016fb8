use crate::records::marc;
use serde::Deserialize;

/// A single hit returned by the record source.
///
/// Only the two stored fields the export needs are modelled; anything else
/// the index returns is ignored during decoding.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub id: String,

    /// Record body with the MARC delimiters escaped (see [`marc`]).
    #[serde(rename = "fullrecord")]
    pub full_record: String,
}

impl SourceRecord {
    pub fn new(id: impl Into<String>, full_record: impl Into<String>) -> Self {
        SourceRecord {
            id: id.into(),
            full_record: full_record.into(),
        }
    }

    pub fn to_marc_bytes(&self) -> Vec<u8> {
        marc::to_marc_bytes(&self.full_record)
    }
}
