use std::collections::BTreeMap;

use product_categorizer::{
    get_comparison_metrics, CategoryCode, ClassifierError, ImageDescriptor, ImageFormat, Modality, ModelProfile,
    MultiModelClassifier, PredictionResult, Seed,
};

fn fake_result(code: u16, confidence: f32) -> PredictionResult {
    let category = CategoryCode::try_from(code).unwrap();
    PredictionResult {
        category,
        confidence,
        top_k_predictions: vec![(category, confidence)],
    }
}

#[test]
fn test_text_comparison_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = MultiModelClassifier::new()?;
    let results = classifier.predict_all_text_models("playstation 5 console sony")?;
    assert_eq!(results.len(), 3);

    let ids: Vec<&str> = classifier
        .get_available_text_models()
        .iter()
        .map(|profile| profile.id.as_str())
        .collect();
    for id in &ids {
        assert!(results.contains_key(*id));
    }

    let metrics = classifier.get_comparison_metrics(&results)?;
    let allowed = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
    assert!(allowed.iter().any(|a| (metrics.agreement_ratio - a).abs() < 1e-6));
    assert!(results.contains_key(&metrics.best_model));
    assert!((0.0..=1.0).contains(&metrics.avg_confidence));

    let again = classifier.predict_all_text_models("playstation 5 console sony")?;
    assert_eq!(results, again);
    Ok(())
}

#[test]
fn test_text_comparison_is_pinned() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = MultiModelClassifier::new()?;
    let results = classifier.predict_all_text_models("playstation 5 console sony")?;

    let expected: [(&str, [(u16, u32); 5]); 3] = [
        (
            "text_camembert",
            [(1160, 0x3f67_4801), (1320, 0x3d75_93d1), (1281, 0x3c89_64aa), (1302, 0x3c0a_4343), (1300, 0x3bb9_23d5)],
        ),
        (
            "text_rf",
            [(60, 0x3f46_57a5), (2060, 0x3dd4_c69b), (1920, 0x3d9a_8470), (1940, 0x3cd5_47a4), (10, 0x3c30_7f4a)],
        ),
        (
            "text_svm",
            [(1920, 0x3f5d_5128), (60, 0x3d87_2600), (1180, 0x3d01_c27d), (2705, 0x3ca4_b08c), (2522, 0x3c00_0292)],
        ),
    ];
    assert_eq!(results.len(), expected.len());
    for (model_id, ranked) in expected {
        let result = &results[model_id];
        let actual: Vec<(u16, u32)> = result
            .top_k_predictions
            .iter()
            .map(|(code, score)| (code.value(), score.to_bits()))
            .collect();
        assert_eq!(actual, ranked.to_vec(), "{} drifted", model_id);
    }

    let metrics = classifier.get_comparison_metrics(&results)?;
    assert_eq!(metrics.majority_category.value(), 60);
    assert!((metrics.agreement_ratio - 1.0 / 3.0).abs() < 1e-6);
    assert_eq!(metrics.best_model, "text_camembert");
    Ok(())
}

#[test]
fn test_models_use_distinct_seeds() {
    let base = Seed::from_text("playstation 5 console sony");
    let seeds: Vec<Seed> = ["text_svm", "text_rf", "text_camembert"]
        .iter()
        .map(|id| base.for_model(id))
        .collect();
    assert_ne!(seeds[0], seeds[1]);
    assert_ne!(seeds[1], seeds[2]);
    assert_ne!(seeds[0], seeds[2]);
    assert_ne!(seeds[0], base);
}

#[test]
fn test_models_diverge_across_inputs() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = MultiModelClassifier::new()?;
    let mut disagreements = 0;
    for i in 0..30 {
        let results = classifier.predict_all_text_models(&format!("objet de collection {}", i))?;
        if get_comparison_metrics(&results)?.agreement_ratio < 1.0 {
            disagreements += 1;
        }
    }
    assert!(disagreements > 0);
    Ok(())
}

#[test]
fn test_image_comparison() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = MultiModelClassifier::new()?;
    let image = ImageDescriptor::new(b"not really a jpeg", 800, 600, ImageFormat::Jpeg);
    let results = classifier.predict_all_image_models(&image)?;
    assert_eq!(results.len(), 3);
    for (id, result) in &results {
        let profile = classifier.model(id).unwrap();
        assert_eq!(profile.modality, Modality::Image);
        assert_eq!(result.top_k_predictions.len(), 5);
    }
    let metrics = classifier.get_comparison_metrics(&results)?;
    assert!((0.0..=1.0).contains(&metrics.agreement_ratio));
    assert_eq!(metrics.ranking.len(), 3);
    Ok(())
}

#[test]
fn test_empty_result_set() {
    let results = BTreeMap::new();
    assert!(matches!(get_comparison_metrics(&results), Err(ClassifierError::EmptyResultSet)));
}

#[test]
fn test_full_agreement() -> Result<(), Box<dyn std::error::Error>> {
    let mut results = BTreeMap::new();
    results.insert("a".to_string(), fake_result(2705, 0.8));
    results.insert("b".to_string(), fake_result(2705, 0.7));
    results.insert("c".to_string(), fake_result(2705, 0.9));

    let metrics = get_comparison_metrics(&results)?;
    assert_eq!(metrics.agreement_ratio, 1.0);
    assert_eq!(metrics.best_model, "c");
    assert_eq!(metrics.majority_category.value(), 2705);
    assert!((metrics.avg_confidence - 0.8).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_majority_tie_break() -> Result<(), Box<dyn std::error::Error>> {
    let mut results = BTreeMap::new();
    results.insert("a".to_string(), fake_result(2583, 0.6));
    results.insert("b".to_string(), fake_result(40, 0.6));
    results.insert("c".to_string(), fake_result(1280, 0.6));

    let metrics = get_comparison_metrics(&results)?;
    assert_eq!(metrics.majority_category.value(), 40);
    assert!((metrics.agreement_ratio - 1.0 / 3.0).abs() < 1e-6);
    // Equal confidences fall back to the smallest id
    assert_eq!(metrics.best_model, "a");
    Ok(())
}

#[test]
fn test_no_image_models() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = MultiModelClassifier::builder()
        .add_model(ModelProfile::new("text_only", Modality::Text, "Text", "", 0.8))?
        .build()?;
    let image = ImageDescriptor::new(&[0u8; 16], 10, 10, ImageFormat::Png);
    let result = classifier.predict_all_image_models(&image);
    assert!(matches!(result, Err(ClassifierError::NoModelsConfigured(Modality::Image))));
    assert_eq!(classifier.predict_all_text_models("bonjour")?.len(), 1);
    Ok(())
}
