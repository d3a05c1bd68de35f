//! Mocked evaluation figures for the performance page.
//!
//! Nothing here is measured. The report is generated from a fixed seed so the
//! dashboard shows the same plausible numbers on every run.

use ndarray::{Array2, Axis};
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::categories::{registry, CategoryCode};
use crate::classifier::ClassifierError;

const REPORT_SEED: u64 = 42;
const OFF_DIAGONAL_PER_ROW: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalMetrics {
    pub accuracy: f32,
    pub f1_macro: f32,
    pub f1_weighted: f32,
    pub precision: f32,
    pub recall: f32,
}

impl Default for GlobalMetrics {
    fn default() -> Self {
        Self {
            accuracy: 0.847,
            f1_macro: 0.823,
            f1_weighted: 0.851,
            precision: 0.835,
            recall: 0.812,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMetrics {
    pub code: CategoryCode,
    pub f1: f32,
    pub precision: f32,
    pub recall: f32,
    pub support: u32,
}

/// Accuracy and F1 for one input modality
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalityScore {
    pub modality: &'static str,
    pub accuracy: f32,
    pub f1: f32,
}

pub static MODALITY_SCORES: [ModalityScore; 3] = [
    ModalityScore { modality: "text", accuracy: 0.795, f1: 0.762 },
    ModalityScore { modality: "image", accuracy: 0.728, f1: 0.685 },
    ModalityScore { modality: "multimodal", accuracy: 0.847, f1: 0.823 },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub global: GlobalMetrics,
    /// One entry per category, ascending by code
    pub categories: Vec<CategoryMetrics>,
    /// Rows are true categories, columns predicted ones, both in registry order
    #[serde(skip)]
    pub confusion: Array2<u32>,
}

impl PerformanceReport {
    /// Builds the seeded demonstration report
    pub fn mock() -> Result<Self, ClassifierError> {
        let reg = registry();
        let n = reg.len();
        let mut rng = ChaCha8Rng::seed_from_u64(REPORT_SEED);

        let mut categories = Vec::with_capacity(n);
        for code in reg.codes() {
            let f1: f32 = rng.random_range(0.70..0.95);
            let precision = (f1 + rng.random_range(-0.05..0.08)).min(0.99);
            let recall = (f1 + rng.random_range(-0.08..0.05)).min(0.97);
            let support = rng.random_range(800..4500);
            categories.push(CategoryMetrics {
                code,
                f1: f1.min(0.98),
                precision,
                recall,
                support,
            });
        }

        let mut confusion = Array2::<u32>::zeros((n, n));
        for i in 0..n {
            confusion[[i, i]] = rng.random_range(700..3500);
            let others: Vec<usize> = (0..n).filter(|&j| j != i).collect();
            let picked: Vec<usize> = others
                .choose_multiple(&mut rng, OFF_DIAGONAL_PER_ROW)
                .copied()
                .collect();
            if picked.len() != OFF_DIAGONAL_PER_ROW {
                return Err(ClassifierError::ConfigError(format!(
                    "Need at least {} categories for a confusion matrix",
                    OFF_DIAGONAL_PER_ROW + 1
                )));
            }
            for j in picked {
                confusion[[i, j]] = rng.random_range(10..150);
            }
        }

        Ok(Self {
            global: GlobalMetrics::default(),
            categories,
            confusion,
        })
    }

    /// Confusion matrix as row percentages
    pub fn normalized_confusion(&self) -> Array2<f64> {
        let counts = self.confusion.mapv(f64::from);
        let row_sums = counts.sum_axis(Axis(1)).insert_axis(Axis(1));
        let safe_sums = row_sums.mapv(|s| if s > 0.0 { s } else { 1.0 });
        counts / safe_sums * 100.0
    }

    /// The `n` categories with the highest F1
    pub fn best_categories(&self, n: usize) -> Vec<&CategoryMetrics> {
        let mut sorted: Vec<&CategoryMetrics> = self.categories.iter().collect();
        sorted.sort_by(|a, b| b.f1.partial_cmp(&a.f1).unwrap_or(std::cmp::Ordering::Equal));
        sorted.truncate(n);
        sorted
    }

    /// The `n` categories with the lowest F1
    pub fn weakest_categories(&self, n: usize) -> Vec<&CategoryMetrics> {
        let mut sorted: Vec<&CategoryMetrics> = self.categories.iter().collect();
        sorted.sort_by(|a, b| a.f1.partial_cmp(&b.f1).unwrap_or(std::cmp::Ordering::Equal));
        sorted.truncate(n);
        sorted
    }

    pub fn modality_scores(&self) -> &'static [ModalityScore] {
        &MODALITY_SCORES
    }
}
