use ndarray::Array1;

use crate::runtime::FusionWeights;

/// Dense score vector (one slot per registry position) from ranked pairs
pub(crate) fn scores_to_vector(ranked: &[(usize, f32)], len: usize) -> Array1<f32> {
    let mut vec = Array1::zeros(len);
    for &(idx, score) in ranked {
        if idx < len {
            vec[idx] = score;
        }
    }
    vec
}

pub(crate) fn fuse_vectors(image: &Array1<f32>, text: &Array1<f32>, weights: FusionWeights) -> Array1<f32> {
    image * weights.image + text * weights.text
}

/// The `top_k` best slots of `scores`, strictly descending.
///
/// Equal scores keep the lower slot first; later equal entries are nudged to
/// the next representable value below their predecessor.
pub(crate) fn rank_scores(scores: &Array1<f32>, top_k: usize) -> Vec<(usize, f32)> {
    let mut indexed: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    indexed.truncate(top_k);

    let mut prev: Option<f32> = None;
    for entry in indexed.iter_mut() {
        let score = entry.1.clamp(0.0, 1.0);
        entry.1 = match prev {
            Some(p) if score >= p => just_below(p),
            _ => score,
        };
        prev = Some(entry.1);
    }
    indexed
}

/// Largest non-negative f32 strictly below `x` (0.0 stays 0.0)
pub(crate) fn just_below(x: f32) -> f32 {
    if x <= 0.0 {
        0.0
    } else {
        f32::from_bits(x.to_bits() - 1)
    }
}
