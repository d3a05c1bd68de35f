use serde::Serialize;

use crate::runtime::FusionWeights;

mod error;
mod hints;
mod seed;
mod utils;
pub mod builder;
pub mod comparison;
pub mod image;
pub mod multi_model;
pub mod predictor;
pub mod preprocessing;

pub use builder::MultiModelClassifierBuilder;
pub use comparison::{get_comparison_metrics, ComparisonMetrics};
pub use error::ClassifierError;
pub use hints::{hint_for, hinted_categories};
pub use image::{validate_image, ImageDescriptor, ImageFormat};
pub use multi_model::MultiModelClassifier;
pub use predictor::{DemoClassifier, PredictionResult, ProductInput, MAX_CONFIDENCE, MIN_CONFIDENCE};
pub use preprocessing::{normalize, tokenize};
pub use seed::Seed;

/// Information about the current configuration of a classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierInfo {
    /// Number of categories predictions range over
    pub num_categories: usize,
    /// `top_k` used when the caller does not pass one
    pub default_top_k: usize,
    /// Minimum score worth displaying
    pub confidence_threshold: f32,
    pub fusion_weights: FusionWeights,
    /// Ids of the registered text models
    pub text_models: Vec<String>,
    /// Ids of the registered image models
    pub image_models: Vec<String>,
}
