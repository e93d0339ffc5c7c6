// Utilities: raw log input and results table output.

pub mod export;
pub mod log_reader;
