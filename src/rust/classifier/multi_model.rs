use std::collections::BTreeMap;

use log::debug;

use super::builder::MultiModelClassifierBuilder;
use super::comparison::{get_comparison_metrics, ComparisonMetrics};
use super::error::ClassifierError;
use super::image::ImageDescriptor;
use super::predictor::{DemoClassifier, PredictionResult};
use super::ClassifierInfo;
use crate::models::{Modality, ModelProfile};

/// Runs the same input through every simulated model of a modality.
///
/// Each model sees the input through its own seed (derived from its id) and
/// its own confidence profile, so models diverge deterministically instead of
/// agreeing trivially.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use product_categorizer::MultiModelClassifier;
///
/// let classifier = MultiModelClassifier::new()?;
/// let results = classifier.predict_all_text_models("playstation 5 console sony")?;
/// let metrics = classifier.get_comparison_metrics(&results)?;
/// println!("{} agree at {:.0}%", results.len(), metrics.agreement_ratio * 100.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MultiModelClassifier {
    predictor: DemoClassifier,
    text_models: Vec<ModelProfile>,
    image_models: Vec<ModelProfile>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<MultiModelClassifier>();
    }
};

impl MultiModelClassifier {
    /// Creates a MultiModelClassifierBuilder for fluent construction
    pub fn builder() -> MultiModelClassifierBuilder {
        MultiModelClassifierBuilder::new()
    }

    /// Classifier with the built-in text and image models
    pub fn new() -> Result<Self, ClassifierError> {
        Self::builder().with_default_models()?.build()
    }

    pub(crate) fn from_parts(
        predictor: DemoClassifier,
        text_models: Vec<ModelProfile>,
        image_models: Vec<ModelProfile>,
    ) -> Self {
        Self {
            predictor,
            text_models,
            image_models,
        }
    }

    /// Returns information about the classifier's configuration
    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            text_models: self.text_models.iter().map(|p| p.id.clone()).collect(),
            image_models: self.image_models.iter().map(|p| p.id.clone()).collect(),
            ..self.predictor.info()
        }
    }

    /// Registered profiles for `modality`, in registration order
    pub fn models(&self, modality: Modality) -> &[ModelProfile] {
        match modality {
            Modality::Text => &self.text_models,
            Modality::Image => &self.image_models,
        }
    }

    pub fn get_available_text_models(&self) -> &[ModelProfile] {
        &self.text_models
    }

    pub fn get_available_image_models(&self) -> &[ModelProfile] {
        &self.image_models
    }

    /// Looks up a registered profile by id
    pub fn model(&self, id: &str) -> Option<&ModelProfile> {
        self.text_models
            .iter()
            .chain(self.image_models.iter())
            .find(|p| p.id == id)
    }

    /// Predicts `text` with every text model.
    ///
    /// # Errors
    /// `NoModelsConfigured` when no text model is registered.
    pub fn predict_all_text_models(&self, text: &str) -> Result<BTreeMap<String, PredictionResult>, ClassifierError> {
        self.predict_all(Modality::Text, |profile, top_k| {
            self.predictor.predict_text_for(text, profile, top_k)
        })
    }

    /// Predicts `image` with every image model.
    ///
    /// # Errors
    /// `NoModelsConfigured` when no image model is registered.
    pub fn predict_all_image_models(
        &self,
        image: &ImageDescriptor,
    ) -> Result<BTreeMap<String, PredictionResult>, ClassifierError> {
        self.predict_all(Modality::Image, |profile, top_k| {
            self.predictor.predict_image_for(image, profile, top_k)
        })
    }

    /// See [`get_comparison_metrics`]
    pub fn get_comparison_metrics(
        &self,
        results: &BTreeMap<String, PredictionResult>,
    ) -> Result<ComparisonMetrics, ClassifierError> {
        get_comparison_metrics(results)
    }

    fn predict_all<F>(&self, modality: Modality, predict: F) -> Result<BTreeMap<String, PredictionResult>, ClassifierError>
    where
        F: Fn(&ModelProfile, usize) -> Result<PredictionResult, ClassifierError>,
    {
        let profiles = self.models(modality);
        if profiles.is_empty() {
            return Err(ClassifierError::NoModelsConfigured(modality));
        }

        let top_k = self.predictor.config().top_k;
        let mut results = BTreeMap::new();
        for profile in profiles {
            let result = predict(profile, top_k)?;
            debug!(
                "{} model '{}' -> {} ({:.1}%)",
                modality,
                profile.id,
                result.category,
                result.confidence * 100.0
            );
            results.insert(profile.id.clone(), result);
        }
        Ok(results)
    }
}
