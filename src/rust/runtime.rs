use std::env;

use log::warn;
use serde::Serialize;

use crate::categories::NUM_CATEGORIES;
use crate::classifier::image::ImageFormat;
use crate::classifier::ClassifierError;

pub const ENV_TOP_K: &str = "CATEGORIZER_TOP_K";
pub const ENV_CONFIDENCE_THRESHOLD: &str = "CATEGORIZER_CONFIDENCE_THRESHOLD";
pub const ENV_FUSION_WEIGHTS: &str = "CATEGORIZER_FUSION_WEIGHTS";

/// Weights used to fuse image and text score vectors
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FusionWeights {
    pub image: f32,
    pub text: f32,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self { image: 0.6, text: 0.4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextConfig {
    /// Characters of normalized text taken into account
    pub max_length: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { max_length: 5000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageConfig {
    pub allowed_formats: Vec<ImageFormat>,
    pub max_size_mb: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            allowed_formats: vec![ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Webp],
            max_size_mb: 10,
        }
    }
}

impl ImageConfig {
    pub fn max_size_bytes(&self) -> usize {
        self.max_size_mb * 1024 * 1024
    }
}

/// Settings shared by every classifier instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeConfig {
    pub top_k: usize,
    pub confidence_threshold: f32,
    pub fusion_weights: FusionWeights,
    /// Share of a profile's base confidence in the blended model confidence
    pub profile_blend: f32,
    pub text: TextConfig,
    pub image: ImageConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            confidence_threshold: 0.1,
            fusion_weights: FusionWeights::default(),
            profile_blend: 0.5,
            text: TextConfig::default(),
            image: ImageConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `CATEGORIZER_*` environment variables, then validated
    pub fn from_env() -> Result<Self, ClassifierError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var(ENV_TOP_K) {
            config.top_k = raw.trim().parse().map_err(|_| {
                ClassifierError::ConfigError(format!("{} must be an integer, got '{}'", ENV_TOP_K, raw))
            })?;
        }
        if let Ok(raw) = env::var(ENV_CONFIDENCE_THRESHOLD) {
            config.confidence_threshold = raw.trim().parse().map_err(|_| {
                ClassifierError::ConfigError(format!(
                    "{} must be a number, got '{}'",
                    ENV_CONFIDENCE_THRESHOLD, raw
                ))
            })?;
        }
        if let Ok(raw) = env::var(ENV_FUSION_WEIGHTS) {
            config.fusion_weights = parse_fusion_weights(&raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the classifiers cannot honour
    pub fn validate(&self) -> Result<(), ClassifierError> {
        let fail = |msg: String| {
            warn!("Rejected runtime configuration: {}", msg);
            Err(ClassifierError::ConfigError(msg))
        };

        if self.top_k == 0 || self.top_k > NUM_CATEGORIES {
            return fail(format!("top_k must be in [1, {}], got {}", NUM_CATEGORIES, self.top_k));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return fail(format!(
                "confidence_threshold must be in [0, 1], got {}",
                self.confidence_threshold
            ));
        }
        let FusionWeights { image, text } = self.fusion_weights;
        if !image.is_finite() || !text.is_finite() || image < 0.0 || text < 0.0 {
            return fail(format!("fusion weights must be non-negative, got ({}, {})", image, text));
        }
        if ((image + text) - 1.0).abs() > 1e-6 {
            return fail(format!("fusion weights must sum to 1, got {}", image + text));
        }
        if !(0.0..=1.0).contains(&self.profile_blend) {
            return fail(format!("profile_blend must be in [0, 1], got {}", self.profile_blend));
        }
        if self.text.max_length == 0 {
            return fail("text.max_length must be positive".to_string());
        }
        if self.image.allowed_formats.is_empty() {
            return fail("image.allowed_formats cannot be empty".to_string());
        }
        if self.image.max_size_mb == 0 {
            return fail("image.max_size_mb must be positive".to_string());
        }
        Ok(())
    }
}

/// Parses `"image,text"` fusion weights
pub fn parse_fusion_weights(raw: &str) -> Result<FusionWeights, ClassifierError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let parsed: Result<Vec<f32>, _> = parts.iter().map(|p| p.parse::<f32>()).collect();
    match parsed.as_deref() {
        Ok([image, text]) => Ok(FusionWeights { image: *image, text: *text }),
        _ => Err(ClassifierError::ConfigError(format!(
            "{} must look like 'image,text', got '{}'",
            ENV_FUSION_WEIGHTS, raw
        ))),
    }
}
