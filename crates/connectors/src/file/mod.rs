pub mod mrc;
