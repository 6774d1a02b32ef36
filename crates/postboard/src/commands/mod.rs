//! Command handlers: bridge CLI args -> board events -> output formatting.

pub mod config_cmd;
pub mod posts;
