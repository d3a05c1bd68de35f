//! Mocked token attributions in the style of a LIME/SHAP bar chart.

use std::collections::BTreeSet;

use rand::Rng;
use serde::Serialize;

use crate::classifier::{hint_for, tokenize, Seed};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenAttribution {
    pub token: String,
    pub weight: f32,
}

/// Deterministic per-token weights for `text`, most influential first.
///
/// Tokens that carry a category hint land in `[0.25, 0.45]`, all others in
/// `[0.02, 0.20]`. Each distinct token appears once.
pub fn explain_text(text: &str, top_n: usize) -> Vec<TokenAttribution> {
    let tokens: BTreeSet<String> = tokenize(text).into_iter().collect();

    let mut attributions: Vec<TokenAttribution> = tokens
        .into_iter()
        .map(|token| {
            let mut rng = Seed::from_label(&token).rng();
            let weight = if hint_for(&token).is_some() {
                rng.random_range(0.25..=0.45)
            } else {
                rng.random_range(0.02..=0.20)
            };
            TokenAttribution { token, weight }
        })
        .collect();

    attributions.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.token.cmp(&b.token))
    });
    attributions.truncate(top_n);
    attributions
}
