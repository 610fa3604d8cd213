//! Error types for the article detection library.

use thiserror::Error;

/// Result type alias for detection operations
pub type Result<T> = std::result::Result<T, DetectError>;

/// Errors that can occur during feature extraction, training, or evaluation
#[derive(Error, Debug)]
pub enum DetectError {
    /// Failed to read an input file (dataset CSV, color table, or page HTML)
    #[error("Failed to read {0}: {1}")]
    Io(String, #[source] std::io::Error),

    /// Dataset CSV row is malformed
    #[error("Invalid dataset: {0}")]
    Dataset(String),

    /// Color-name table row is malformed
    #[error("Invalid color table: {0}")]
    ColorTable(String),

    /// A tree node references a feature description that is not present in
    /// the input feature vector
    #[error("Unknown feature description: {0}")]
    UnknownFeature(String),

    /// Experiment configuration is inconsistent with the dataset
    #[error("Invalid experiment configuration: {0}")]
    Experiment(String),
}
