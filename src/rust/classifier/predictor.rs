use log::{debug, info};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::error::ClassifierError;
use super::hints::{hinted_categories, HINT_BOOST};
use super::image::ImageDescriptor;
use super::preprocessing::canonical_text;
use super::seed::Seed;
use super::utils::{fuse_vectors, rank_scores, scores_to_vector};
use super::ClassifierInfo;
use crate::categories::{registry, CategoryCode, NUM_CATEGORIES};
use crate::models::ModelProfile;
use crate::runtime::RuntimeConfig;

/// Range the primary confidence of a single-modality prediction is drawn from
pub const MIN_CONFIDENCE: f32 = 0.60;
pub const MAX_CONFIDENCE: f32 = 0.98;

// Each runner-up takes this share of the remaining probability mass,
// and never more than TAIL_DECAY times the score ranked above it.
const TAIL_SHARE_MIN: f32 = 0.35;
const TAIL_SHARE_MAX: f32 = 0.65;
const TAIL_DECAY: f32 = 0.95;

/// Outcome of one classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub category: CategoryCode,
    pub confidence: f32,
    /// Strictly descending by score; the first entry is `(category, confidence)`
    pub top_k_predictions: Vec<(CategoryCode, f32)>,
}

impl PredictionResult {
    fn from_ranked(ranked: &[(usize, f32)]) -> Result<Self, ClassifierError> {
        let reg = registry();
        let top_k_predictions = ranked
            .iter()
            .map(|&(idx, score)| {
                reg.at(idx)
                    .map(|info| (info.code, score))
                    .ok_or_else(|| ClassifierError::PredictionError(format!("No category at slot {}", idx)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let &(category, confidence) = top_k_predictions
            .first()
            .ok_or_else(|| ClassifierError::PredictionError("Empty ranking".into()))?;

        Ok(Self {
            category,
            confidence,
            top_k_predictions,
        })
    }

    /// Ranked entries whose score reaches `threshold`
    pub fn above_threshold(&self, threshold: f32) -> impl Iterator<Item = &(CategoryCode, f32)> {
        self.top_k_predictions
            .iter()
            .filter(move |(_, score)| *score >= threshold)
    }
}

/// What the caller hands to the predictor
#[derive(Debug, Clone, Copy)]
pub enum ProductInput<'a> {
    /// Normalized product text
    Text(&'a str),
    Image(&'a ImageDescriptor),
    /// Both modalities, fused with the configured weights
    Multimodal {
        text: &'a str,
        image: &'a ImageDescriptor,
    },
}

impl<'a> ProductInput<'a> {
    /// Builds an input from optional parts.
    ///
    /// # Errors
    /// `InvalidInput` when neither text nor image is present.
    pub fn from_parts(text: Option<&'a str>, image: Option<&'a ImageDescriptor>) -> Result<Self, ClassifierError> {
        match (text, image) {
            (Some(text), Some(image)) => Ok(Self::Multimodal { text, image }),
            (Some(text), None) => Ok(Self::Text(text)),
            (None, Some(image)) => Ok(Self::Image(image)),
            (None, None) => Err(ClassifierError::InvalidInput(
                "Either text or an image must be provided".into(),
            )),
        }
    }
}

/// Deterministic mock classifier over the 27 product categories.
///
/// Identical input always yields an identical [`PredictionResult`]; nothing is
/// cached, the result is recomputed from a hash of the input on every call.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use product_categorizer::{normalize, DemoClassifier, ProductInput};
///
/// let classifier = DemoClassifier::default();
/// let text = normalize("Console PlayStation 5", "Jeux vidéo Sony nouvelle génération");
/// let result = classifier.predict(ProductInput::Text(&text), 5)?;
///
/// assert_eq!(result.top_k_predictions.len(), 5);
/// assert_eq!(result, classifier.predict(ProductInput::Text(&text), 5)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DemoClassifier {
    config: RuntimeConfig,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<DemoClassifier>();
    }
};

impl DemoClassifier {
    /// Creates a classifier after validating `config`
    pub fn new(config: RuntimeConfig) -> Result<Self, ClassifierError> {
        config.validate()?;
        info!(
            "Demo classifier ready ({} categories, top_k={}, fusion image={} text={})",
            registry().len(),
            config.top_k,
            config.fusion_weights.image,
            config.fusion_weights.text
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Returns information about the classifier's configuration
    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            num_categories: registry().len(),
            default_top_k: self.config.top_k,
            confidence_threshold: self.config.confidence_threshold,
            fusion_weights: self.config.fusion_weights,
            text_models: Vec::new(),
            image_models: Vec::new(),
        }
    }

    /// Predicts the category of a product.
    ///
    /// `top_k` is clamped to `[1, 27]`.
    ///
    /// # Returns
    /// A [`PredictionResult`] whose primary confidence lies in
    /// `[MIN_CONFIDENCE, MAX_CONFIDENCE]` for text or image input. Multimodal
    /// input is ranked on fused scores and has no such floor.
    pub fn predict(&self, input: ProductInput<'_>, top_k: usize) -> Result<PredictionResult, ClassifierError> {
        let top_k = top_k.clamp(1, NUM_CATEGORIES);

        let ranked = match input {
            ProductInput::Text(text) => self.draw_text(text, None, top_k)?,
            ProductInput::Image(image) => self.draw_image(image, None, top_k)?,
            ProductInput::Multimodal { text, image } => {
                let text_scores = scores_to_vector(&self.draw_text(text, None, NUM_CATEGORIES)?, NUM_CATEGORIES);
                let image_scores = scores_to_vector(&self.draw_image(image, None, NUM_CATEGORIES)?, NUM_CATEGORIES);
                let fused = fuse_vectors(&image_scores, &text_scores, self.config.fusion_weights);
                rank_scores(&fused, top_k)
            }
        };

        let result = PredictionResult::from_ranked(&ranked)?;
        debug!(
            "Predicted category {} at {:.1}% ({} ranked)",
            result.category,
            result.confidence * 100.0,
            result.top_k_predictions.len()
        );
        Ok(result)
    }

    /// [`predict`](Self::predict) with the configured default `top_k`
    pub fn predict_default(&self, input: ProductInput<'_>) -> Result<PredictionResult, ClassifierError> {
        self.predict(input, self.config.top_k)
    }

    /// Predicts from optional parts, mirroring a form with an optional upload.
    ///
    /// # Errors
    /// `InvalidInput` when both `text` and `image` are `None`.
    pub fn predict_parts(
        &self,
        text: Option<&str>,
        image: Option<&ImageDescriptor>,
        top_k: usize,
    ) -> Result<PredictionResult, ClassifierError> {
        self.predict(ProductInput::from_parts(text, image)?, top_k)
    }

    /// Text prediction as seen by one simulated model
    pub(crate) fn predict_text_for(
        &self,
        text: &str,
        profile: &ModelProfile,
        top_k: usize,
    ) -> Result<PredictionResult, ClassifierError> {
        let ranked = self.draw_text(text, Some(profile), top_k.clamp(1, NUM_CATEGORIES))?;
        PredictionResult::from_ranked(&ranked)
    }

    /// Image prediction as seen by one simulated model
    pub(crate) fn predict_image_for(
        &self,
        image: &ImageDescriptor,
        profile: &ModelProfile,
        top_k: usize,
    ) -> Result<PredictionResult, ClassifierError> {
        let ranked = self.draw_image(image, Some(profile), top_k.clamp(1, NUM_CATEGORIES))?;
        PredictionResult::from_ranked(&ranked)
    }

    fn draw_text(
        &self,
        text: &str,
        profile: Option<&ModelProfile>,
        top_k: usize,
    ) -> Result<Vec<(usize, f32)>, ClassifierError> {
        let canonical = canonical_text(text, self.config.text.max_length);
        let hints = hinted_categories(&canonical);

        let weights = registry()
            .codes()
            .map(|code| if hints.contains(&code.value()) { 1.0 + HINT_BOOST } else { 1.0 })
            .collect();

        self.draw(Seed::from_text(&canonical), weights, profile, top_k)
    }

    fn draw_image(
        &self,
        image: &ImageDescriptor,
        profile: Option<&ModelProfile>,
        top_k: usize,
    ) -> Result<Vec<(usize, f32)>, ClassifierError> {
        self.draw(Seed::from_image(image), vec![1.0; registry().len()], profile, top_k)
    }

    /// Draws a primary slot and `top_k - 1` runner-ups from the seeded stream.
    ///
    /// Draw order is fixed: primary slot, primary confidence, runner-up slots,
    /// then one share per runner-up. Changing it changes every prediction.
    fn draw(
        &self,
        seed: Seed,
        mut weights: Vec<f64>,
        profile: Option<&ModelProfile>,
        top_k: usize,
    ) -> Result<Vec<(usize, f32)>, ClassifierError> {
        let seed = match profile {
            Some(profile) => {
                for (weight, code) in weights.iter_mut().zip(registry().codes()) {
                    *weight *= f64::from(profile.bias_for(code.value()));
                }
                seed.for_model(&profile.id)
            }
            None => seed,
        };
        let mut rng = seed.rng();

        let primary = WeightedIndex::new(&weights)?.sample(&mut rng);
        let raw = rng.random_range(MIN_CONFIDENCE..=MAX_CONFIDENCE);
        let confidence = match profile {
            Some(profile) => {
                let blend = self.config.profile_blend;
                (blend * profile.base_confidence + (1.0 - blend) * raw).clamp(0.0, 1.0)
            }
            None => raw,
        };

        let mut others: Vec<usize> = (0..weights.len()).filter(|&idx| idx != primary).collect();
        let (runners_up, _) = others.partial_shuffle(&mut rng, top_k.saturating_sub(1));

        let mut ranked = Vec::with_capacity(top_k);
        ranked.push((primary, confidence));
        let mut budget = 1.0 - confidence;
        let mut prev = confidence;
        for &idx in runners_up.iter() {
            let share = rng.random_range(TAIL_SHARE_MIN..TAIL_SHARE_MAX);
            let score = (budget * share).min(prev * TAIL_DECAY);
            budget -= score;
            prev = score;
            ranked.push((idx, score));
        }

        Ok(ranked)
    }
}
