pub mod executor;
pub mod settings;
pub mod state;
