use std::fmt;

use lazy_static::lazy_static;
use serde::Serialize;

/// The input modality a simulated model works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// Static configuration of one simulated model.
///
/// `category_bias` multiplies the draw weight of the listed categories when
/// the model picks its primary category; factors above 1.0 favour a category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelProfile {
    pub id: String,
    pub modality: Modality,
    pub short_name: String,
    pub description: String,
    pub base_confidence: f32,
    pub category_bias: Option<Vec<(u16, f32)>>,
}

impl ModelProfile {
    /// Creates a profile with no category bias
    ///
    /// # Example
    /// ```
    /// use product_categorizer::{Modality, ModelProfile};
    ///
    /// let profile = ModelProfile::new(
    ///     "text_nb",
    ///     Modality::Text,
    ///     "Naive Bayes",
    ///     "TF-IDF + multinomial naive Bayes",
    ///     0.74,
    /// );
    /// assert!(profile.category_bias.is_none());
    /// ```
    pub fn new(
        id: impl Into<String>,
        modality: Modality,
        short_name: impl Into<String>,
        description: impl Into<String>,
        base_confidence: f32,
    ) -> Self {
        Self {
            id: id.into(),
            modality,
            short_name: short_name.into(),
            description: description.into(),
            base_confidence,
            category_bias: None,
        }
    }

    /// Adds per-category weight factors
    pub fn with_category_bias(mut self, bias: Vec<(u16, f32)>) -> Self {
        self.category_bias = Some(bias);
        self
    }

    /// Draw-weight multiplier for `code`, 1.0 when the profile has no opinion
    pub fn bias_for(&self, code: u16) -> f32 {
        self.category_bias
            .as_ref()
            .and_then(|bias| bias.iter().find(|(c, _)| *c == code))
            .map(|(_, factor)| *factor)
            .unwrap_or(1.0)
    }
}

lazy_static! {
    /// Text models shown on the comparison page
    pub static ref TEXT_MODELS: Vec<ModelProfile> = vec![
        ModelProfile::new(
            "text_svm",
            Modality::Text,
            "SVM",
            "TF-IDF features with a linear support vector machine",
            0.82,
        )
        .with_category_bias(vec![(2705, 1.6), (10, 1.3), (2280, 1.2)]),
        ModelProfile::new(
            "text_rf",
            Modality::Text,
            "Random Forest",
            "TF-IDF features with a random forest ensemble",
            0.76,
        )
        .with_category_bias(vec![(1280, 1.4), (1281, 1.2)]),
        ModelProfile::new(
            "text_camembert",
            Modality::Text,
            "CamemBERT",
            "Fine-tuned French transformer on designation and description",
            0.89,
        ),
    ];

    /// Image models shown on the comparison page
    pub static ref IMAGE_MODELS: Vec<ModelProfile> = vec![
        ModelProfile::new(
            "image_resnet_svm",
            Modality::Image,
            "ResNet50 + SVM",
            "Pretrained ResNet50 features with a linear SVM head",
            0.78,
        )
        .with_category_bias(vec![(1560, 1.4), (2582, 1.3)]),
        ModelProfile::new(
            "image_resnet_rf",
            Modality::Image,
            "ResNet50 + RF",
            "Pretrained ResNet50 features with a random forest head",
            0.71,
        ),
        ModelProfile::new(
            "image_vgg16",
            Modality::Image,
            "VGG16",
            "Fine-tuned VGG16 convolutional network",
            0.80,
        )
        .with_category_bias(vec![(1140, 1.5), (60, 1.2)]),
    ];
}

/// Built-in profiles for `modality`
pub fn builtin_models(modality: Modality) -> &'static [ModelProfile] {
    match modality {
        Modality::Text => &TEXT_MODELS,
        Modality::Image => &IMAGE_MODELS,
    }
}
