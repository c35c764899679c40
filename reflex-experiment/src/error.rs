//! Error types for the trial controller and exporter

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("stimulus delay range is inverted: min {min_ms} ms > max {max_ms} ms")]
    InvertedDelayRange { min_ms: u64, max_ms: u64 },
}

/// Why a record could not be marked as ignored
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreError {
    /// No recorded trial has completed since the last start (or ever).
    #[error("no recorded trial is eligible to be ignored")]
    NoRecordedTrial,

    #[error("only the most recently recorded trial can be ignored")]
    NotLatest,

    #[error("the trial is already ignored")]
    AlreadyIgnored,
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to encode results: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to decode results: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to write results to {destination}: {source}")]
    Io {
        destination: String,
        #[source]
        source: std::io::Error,
    },
}
