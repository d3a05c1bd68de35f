use product_categorizer::{
    parse_fusion_weights, validate_image, ClassifierError, DemoClassifier, FusionWeights, ImageConfig, ImageDescriptor,
    ImageFormat, Modality, ModelProfile, MultiModelClassifierBuilder, RuntimeConfig, TextConfig,
};

fn profile(id: &str, modality: Modality) -> ModelProfile {
    ModelProfile::new(id, modality, "Test model", "A model used in tests", 0.75)
}

#[test]
fn test_invalid_model_ids() {
    let cases = ["", "Text_SVM", "text svm", "text-svm"];
    for id in cases {
        let result = MultiModelClassifierBuilder::new().add_model(profile(id, Modality::Text));
        assert!(
            matches!(result, Err(ClassifierError::ValidationError(_))),
            "id '{}' should be rejected",
            id
        );
    }
}

#[test]
fn test_invalid_base_confidence() {
    for confidence in [0.0, -0.2, 1.0, f32::NAN] {
        let mut p = profile("text_bad", Modality::Text);
        p.base_confidence = confidence;
        let result = MultiModelClassifierBuilder::new().add_model(p);
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
    }
}

#[test]
fn test_long_description() {
    let mut p = profile("text_verbose", Modality::Text);
    p.description = "x".repeat(1001);
    let result = MultiModelClassifierBuilder::new().add_model(p);
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_invalid_category_bias() {
    let unknown = profile("text_unknown", Modality::Text).with_category_bias(vec![(9999, 1.5)]);
    let result = MultiModelClassifierBuilder::new().add_model(unknown);
    assert!(matches!(result, Err(ClassifierError::UnknownCategory(9999))));

    let negative = profile("text_negative", Modality::Text).with_category_bias(vec![(2705, -1.0)]);
    let result = MultiModelClassifierBuilder::new().add_model(negative);
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_duplicate_model() -> Result<(), Box<dyn std::error::Error>> {
    let builder = MultiModelClassifierBuilder::new().add_model(profile("shared_id", Modality::Text))?;
    let result = builder.add_model(profile("shared_id", Modality::Image));
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
    Ok(())
}

#[test]
fn test_model_limit() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = MultiModelClassifierBuilder::new();
    for i in 0..3 {
        builder = builder.add_model(profile(&format!("image_{}", i), Modality::Image))?;
    }
    let result = builder.add_model(profile("image_3", Modality::Image));
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));

    // The default set fills both modalities
    let full = MultiModelClassifierBuilder::new().with_default_models()?;
    let result = full.add_model(profile("text_extra", Modality::Text));
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
    Ok(())
}

#[test]
fn test_build_without_models() {
    let result = MultiModelClassifierBuilder::new().build();
    assert!(matches!(result, Err(ClassifierError::ConfigError(_))));
}

#[test]
fn test_build_with_invalid_config() -> Result<(), Box<dyn std::error::Error>> {
    let config = RuntimeConfig { top_k: 28, ..RuntimeConfig::default() };
    let result = MultiModelClassifierBuilder::new()
        .with_runtime_config(config)
        .with_default_models()?
        .build();
    assert!(matches!(result, Err(ClassifierError::ConfigError(_))));
    Ok(())
}

#[test]
fn test_runtime_config_rules() {
    let invalid = [
        RuntimeConfig { top_k: 0, ..RuntimeConfig::default() },
        RuntimeConfig { confidence_threshold: 1.5, ..RuntimeConfig::default() },
        RuntimeConfig {
            fusion_weights: FusionWeights { image: 0.7, text: 0.7 },
            ..RuntimeConfig::default()
        },
        RuntimeConfig {
            fusion_weights: FusionWeights { image: -0.5, text: 1.5 },
            ..RuntimeConfig::default()
        },
        RuntimeConfig { profile_blend: 2.0, ..RuntimeConfig::default() },
        RuntimeConfig { text: TextConfig { max_length: 0 }, ..RuntimeConfig::default() },
        RuntimeConfig {
            image: ImageConfig { allowed_formats: vec![], max_size_mb: 10 },
            ..RuntimeConfig::default()
        },
    ];
    for config in invalid {
        assert!(
            matches!(DemoClassifier::new(config.clone()), Err(ClassifierError::ConfigError(_))),
            "{:?} should be rejected",
            config
        );
    }
    assert!(DemoClassifier::new(RuntimeConfig::default()).is_ok());
}

#[test]
fn test_parse_fusion_weights() -> Result<(), Box<dyn std::error::Error>> {
    assert_eq!(parse_fusion_weights("0.5, 0.5")?, FusionWeights { image: 0.5, text: 0.5 });
    assert!(matches!(parse_fusion_weights("0.5"), Err(ClassifierError::ConfigError(_))));
    assert!(matches!(parse_fusion_weights("a,b"), Err(ClassifierError::ConfigError(_))));
    assert!(matches!(parse_fusion_weights("0.2,0.3,0.5"), Err(ClassifierError::ConfigError(_))));
    Ok(())
}

#[test]
fn test_image_validation() {
    let config = ImageConfig::default();

    let ok = ImageDescriptor::new(&[0u8; 64], 32, 32, ImageFormat::Webp);
    assert!(validate_image(&ok, &config).is_ok());

    let flat = ImageDescriptor::new(&[0u8; 64], 0, 32, ImageFormat::Png);
    assert!(matches!(validate_image(&flat, &config), Err(ClassifierError::ValidationError(_))));

    let gif = ImageDescriptor::new(&[0u8; 64], 32, 32, ImageFormat::Other);
    assert!(matches!(validate_image(&gif, &config), Err(ClassifierError::ValidationError(_))));

    let small_limit = ImageConfig { max_size_mb: 1, ..ImageConfig::default() };
    let big = ImageDescriptor::new(&vec![0u8; 1024 * 1024 + 1], 32, 32, ImageFormat::Jpeg);
    assert!(matches!(validate_image(&big, &small_limit), Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_undecodable_image() {
    let result = ImageDescriptor::from_bytes(b"definitely not an image");
    assert!(matches!(result, Err(ClassifierError::Image(_))));
}

// 1x1 transparent PNG
const TINY_PNG: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00,
    0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00,
    0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D,
    0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[test]
fn test_uploaded_png_summary() -> Result<(), Box<dyn std::error::Error>> {
    let descriptor = ImageDescriptor::from_bytes(&TINY_PNG)?;
    validate_image(&descriptor, &ImageConfig::default())?;

    assert_eq!(
        descriptor.digest_hex(),
        "ebf4f635a17d10d6eb46ba680b70142419aa3220f228001a036d311a22ee9d2a"
    );
    assert!(descriptor.matches_extension("png"));
    assert!(descriptor.matches_extension("PNG"));
    assert!(!descriptor.matches_extension("jpg"));
    assert!(!descriptor.matches_extension(""));
    Ok(())
}

#[test]
fn test_unknown_format_never_matches_extension() {
    let descriptor = ImageDescriptor::new(&[0u8; 8], 4, 4, ImageFormat::Other);
    assert!(!descriptor.matches_extension("gif"));
    assert!(!descriptor.matches_extension("bmp"));
}
