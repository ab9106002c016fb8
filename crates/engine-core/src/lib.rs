pub mod connectors;
pub mod error;
pub mod pacing;
pub mod progress;
