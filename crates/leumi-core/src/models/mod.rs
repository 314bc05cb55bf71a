//! Data models: configuration and per-document records.

pub mod config;
pub mod record;
