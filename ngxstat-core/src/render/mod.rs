//! Report rendering.
//!
//! A snapshot renders either as a human-readable text report or as a single
//! JSON document. Parsed records export as JSON lines or CSV.

mod csv_export;
mod json;
#[cfg(test)]
mod tests;
mod text;

pub use csv_export::*;
pub use json::*;
pub use text::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Export format for parsed records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// One JSON object per line
    #[default]
    Jsonl,
    /// Header row plus one row per record
    Csv,
}
