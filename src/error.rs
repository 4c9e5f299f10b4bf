use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors raised while loading the chunk sequence.
///
/// Every variant is fatal: nothing is displayed once one of these comes back.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("cannot open audio source {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed audio data: {0}")]
    Decode(#[source] hound::Error),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AnalyzerError {
    /// Classify an error hound raised while parsing the header of a source
    /// that is already open. A short read here means the file is malformed.
    pub(crate) fn from_header(err: hound::Error) -> Self {
        match err {
            hound::Error::Unsupported => {
                AnalyzerError::UnsupportedFormat("sample format not supported by decoder".into())
            }
            other => AnalyzerError::Decode(other),
        }
    }
}
