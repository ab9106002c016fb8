pub mod file;
pub mod solr;
