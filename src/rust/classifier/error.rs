use crate::models::Modality;

/// Represents the different types of errors that can occur in the mock classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// Neither text nor image was supplied to the predictor
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A category code outside the registered set was looked up
    #[error("Unknown category code: {0}")]
    UnknownCategory(u16),
    /// The requested modality has no model profiles registered
    #[error("No models configured for {0} modality")]
    NoModelsConfigured(Modality),
    /// Comparison metrics were requested over zero results
    #[error("Cannot compute comparison metrics over an empty result set")]
    EmptyResultSet,
    /// Error occurred due to invalid input parameters or a rejected upload
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Static configuration (categories, profiles, runtime settings) is malformed
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Error occurred while drawing scores
    #[error("Prediction error: {0}")]
    PredictionError(String),
    /// Image header could not be read
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl From<rand::distr::weighted::Error> for ClassifierError {
    fn from(err: rand::distr::weighted::Error) -> Self {
        ClassifierError::PredictionError(err.to_string())
    }
}
