//! A deterministic mock classifier for a multimodal (text + image) product
//! categorization demo over the 27 Rakuten product categories.
//!
//! No model is trained or loaded. Predictions are derived from a hash of the
//! input, so the same product always receives the same category, confidence
//! and runner-ups, while different products look plausibly varied.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use product_categorizer::{normalize, DemoClassifier, ProductInput};
//!
//! let classifier = DemoClassifier::default();
//! let text = normalize("Console PlayStation 5", "Jeux vidéo Sony nouvelle génération");
//! let result = classifier.predict(ProductInput::Text(&text), 5)?;
//!
//! let info = result.category.info()?;
//! println!("{} {} ({:.1}%)", info.glyph, info.short_name, result.confidence * 100.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Comparing Models
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use product_categorizer::MultiModelClassifier;
//!
//! let classifier = MultiModelClassifier::new()?;
//! let results = classifier.predict_all_text_models("playstation 5 console sony")?;
//! let metrics = classifier.get_comparison_metrics(&results)?;
//! println!("best model: {}", metrics.best_model);
//! # Ok(())
//! # }
//! ```

pub mod categories;
pub mod classifier;
pub mod explain;
pub mod models;
pub mod performance;
mod runtime;
pub mod showcase;

pub use categories::{get_all_categories, get_category_info, CategoryCode, CategoryInfo, CategoryRegistry};
pub use classifier::{
    get_comparison_metrics, normalize, validate_image, ClassifierError, ClassifierInfo, ComparisonMetrics,
    DemoClassifier, ImageDescriptor, ImageFormat, MultiModelClassifier, MultiModelClassifierBuilder,
    PredictionResult, ProductInput, Seed,
};
pub use explain::{explain_text, TokenAttribution};
pub use models::{Modality, ModelProfile};
pub use performance::PerformanceReport;
pub use runtime::{parse_fusion_weights, FusionWeights, ImageConfig, RuntimeConfig, TextConfig};

pub fn init_logger() {
    env_logger::init();
}

/// Checks the built-in category table and model profiles once, so a malformed
/// table is reported at startup instead of on the first prediction.
pub fn check_builtin_tables() -> Result<(), ClassifierError> {
    let categories = categories::check_builtin_table()?;
    MultiModelClassifierBuilder::new().with_default_models()?;
    log::debug!("Built-in tables OK ({} categories)", categories);
    Ok(())
}
