use std::collections::HashSet;

use log::{info, warn};

use super::error::ClassifierError;
use super::multi_model::MultiModelClassifier;
use super::predictor::DemoClassifier;
use crate::categories::get_category_info;
use crate::models::{builtin_models, Modality, ModelProfile};
use crate::runtime::RuntimeConfig;

/// Upper bound on simulated models per modality
pub const MAX_MODELS_PER_MODALITY: usize = 3;

/// Highest accepted base confidence; keeps room for runner-up scores
pub const MAX_BASE_CONFIDENCE: f32 = 0.99;

const MAX_DESCRIPTION_LENGTH: usize = 1000;

/// A builder for constructing a [`MultiModelClassifier`] with a fluent interface.
///
/// Profiles are validated as they are added, so a malformed profile is
/// reported at start-up rather than on the first comparison.
#[derive(Debug, Default)]
pub struct MultiModelClassifierBuilder {
    text_models: Vec<ModelProfile>,
    image_models: Vec<ModelProfile>,
    runtime_config: RuntimeConfig,
}

impl MultiModelClassifierBuilder {
    /// Creates an empty builder with the default runtime configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration
    ///
    /// # Example
    /// ```
    /// use product_categorizer::{MultiModelClassifierBuilder, RuntimeConfig};
    ///
    /// let config = RuntimeConfig { top_k: 3, ..RuntimeConfig::default() };
    /// let builder = MultiModelClassifierBuilder::new()
    ///     .with_runtime_config(config);
    /// ```
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Registers the built-in text and image profiles
    pub fn with_default_models(self) -> Result<Self, ClassifierError> {
        builtin_models(Modality::Text)
            .iter()
            .chain(builtin_models(Modality::Image))
            .cloned()
            .try_fold(self, |builder, profile| builder.add_model(profile))
    }

    /// Validates profile data:
    /// - id must be non-empty lowercase ASCII, digits or underscores
    /// - short name must not be empty
    /// - description must not exceed 1000 characters
    /// - base confidence must be in (0, 0.99]
    /// - every biased category must be registered with a positive finite factor
    fn validate_profile(profile: &ModelProfile) -> Result<(), ClassifierError> {
        if profile.id.is_empty() {
            return Err(ClassifierError::ValidationError("Model id cannot be empty".into()));
        }
        if !profile
            .id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(ClassifierError::ValidationError(format!(
                "Model id '{}' may only contain lowercase letters, digits and underscores",
                profile.id
            )));
        }
        if profile.short_name.trim().is_empty() {
            return Err(ClassifierError::ValidationError(format!(
                "Model '{}' needs a short name",
                profile.id
            )));
        }
        if profile.description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ClassifierError::ValidationError(format!(
                "Model description is too long ({} chars, max is {})",
                profile.description.chars().count(),
                MAX_DESCRIPTION_LENGTH
            )));
        }
        if !(profile.base_confidence > 0.0 && profile.base_confidence <= MAX_BASE_CONFIDENCE) {
            return Err(ClassifierError::ValidationError(format!(
                "Model '{}' base confidence must be in (0, {}], got {}",
                profile.id, MAX_BASE_CONFIDENCE, profile.base_confidence
            )));
        }
        for &(code, factor) in profile.category_bias.iter().flatten() {
            get_category_info(code)?;
            if !factor.is_finite() || factor <= 0.0 {
                return Err(ClassifierError::ValidationError(format!(
                    "Model '{}' has invalid bias {} for category {}",
                    profile.id, factor, code
                )));
            }
        }
        Ok(())
    }

    /// Adds a simulated model.
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The profile fails validation
    ///   - A model with the same id is already registered
    ///   - The modality already holds three models
    ///
    /// # Example
    /// ```
    /// use product_categorizer::{Modality, ModelProfile, MultiModelClassifierBuilder};
    ///
    /// let builder = MultiModelClassifierBuilder::new()
    ///     .add_model(ModelProfile::new("text_nb", Modality::Text, "NB", "Naive Bayes", 0.7));
    /// assert!(builder.is_ok());
    /// ```
    pub fn add_model(mut self, profile: ModelProfile) -> Result<Self, ClassifierError> {
        Self::validate_profile(&profile)?;

        if self
            .text_models
            .iter()
            .chain(self.image_models.iter())
            .any(|existing| existing.id == profile.id)
        {
            return Err(ClassifierError::ValidationError(format!(
                "Model '{}' is already registered",
                profile.id
            )));
        }

        let slot = match profile.modality {
            Modality::Text => &mut self.text_models,
            Modality::Image => &mut self.image_models,
        };
        if slot.len() >= MAX_MODELS_PER_MODALITY {
            return Err(ClassifierError::ValidationError(format!(
                "Maximum number of {} models ({}) exceeded",
                profile.modality, MAX_MODELS_PER_MODALITY
            )));
        }
        slot.push(profile);

        Ok(self)
    }

    /// Builds the classifier.
    ///
    /// # Errors
    /// `ConfigError` if the runtime configuration is invalid or no model at
    /// all was registered.
    pub fn build(self) -> Result<MultiModelClassifier, ClassifierError> {
        if self.text_models.is_empty() && self.image_models.is_empty() {
            return Err(ClassifierError::ConfigError("At least one model must be added".into()));
        }

        let ids: HashSet<&str> = self
            .text_models
            .iter()
            .chain(self.image_models.iter())
            .map(|p| p.id.as_str())
            .collect();
        if ids.len() != self.text_models.len() + self.image_models.len() {
            warn!("Duplicate model ids detected at build time");
            return Err(ClassifierError::ConfigError("Model ids must be unique".into()));
        }

        let predictor = DemoClassifier::new(self.runtime_config)?;
        info!(
            "Multi-model classifier ready: {} text model(s), {} image model(s)",
            self.text_models.len(),
            self.image_models.len()
        );

        Ok(MultiModelClassifier::from_parts(
            predictor,
            self.text_models,
            self.image_models,
        ))
    }
}
