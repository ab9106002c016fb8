pub mod marc;
pub mod record;
