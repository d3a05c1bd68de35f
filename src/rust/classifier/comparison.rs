use std::collections::BTreeMap;

use serde::Serialize;

use super::error::ClassifierError;
use super::predictor::PredictionResult;
use crate::categories::CategoryCode;

/// Summary of how a set of simulated models agree on one input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonMetrics {
    /// Fraction of models whose top category is the majority category
    pub agreement_ratio: f32,
    pub avg_confidence: f32,
    /// Id of the most confident model
    pub best_model: String,
    pub majority_category: CategoryCode,
    /// Model ids with their confidence, most confident first
    pub ranking: Vec<(String, f32)>,
}

/// Reduces per-model predictions to agreement statistics.
///
/// The majority category is the one with the most votes, the smallest code
/// winning ties. `best_model` is the highest confidence, the lexicographically
/// smallest id winning ties.
///
/// # Errors
/// `EmptyResultSet` when `results` is empty.
pub fn get_comparison_metrics(
    results: &BTreeMap<String, PredictionResult>,
) -> Result<ComparisonMetrics, ClassifierError> {
    if results.is_empty() {
        return Err(ClassifierError::EmptyResultSet);
    }
    let total = results.len();

    let mut votes: BTreeMap<CategoryCode, usize> = BTreeMap::new();
    for result in results.values() {
        *votes.entry(result.category).or_insert(0) += 1;
    }
    let mut majority: Option<(CategoryCode, usize)> = None;
    for (&code, &count) in &votes {
        if majority.map_or(true, |(_, best)| count > best) {
            majority = Some((code, count));
        }
    }
    let (majority_category, majority_votes) = majority.ok_or(ClassifierError::EmptyResultSet)?;

    let avg_confidence = results.values().map(|r| r.confidence).sum::<f32>() / total as f32;

    let mut ranking: Vec<(String, f32)> = results
        .iter()
        .map(|(id, result)| (id.clone(), result.confidence))
        .collect();
    // Stable sort keeps ids in ascending order among equal confidences
    ranking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let best_model = ranking
        .first()
        .map(|(id, _)| id.clone())
        .ok_or(ClassifierError::EmptyResultSet)?;

    Ok(ComparisonMetrics {
        agreement_ratio: majority_votes as f32 / total as f32,
        avg_confidence,
        best_model,
        majority_category,
        ranking,
    })
}
