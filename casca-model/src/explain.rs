//! Permutation (Shapley sampling) attribution.
//!
//! For each random feature ordering and each background row, features are
//! switched one at a time from the background value to the query value; the
//! change in model output at each switch is credited to that feature. Every
//! ordering is also walked in reverse. Scores sum to
//! `f(query) - mean(f(background))`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

pub const DEFAULT_PERMUTATIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribution {
    pub feature: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PermutationExplainer {
    background: Vec<Vec<f64>>,
    permutations: usize,
    seed: u64,
}

impl PermutationExplainer {
    pub fn new(background: Vec<Vec<f64>>, permutations: usize, seed: u64) -> Self {
        Self {
            background,
            permutations: permutations.max(1),
            seed,
        }
    }

    /// Per-feature attribution of `model(query)`. Same query, same scores.
    pub fn explain<F>(&self, model: F, query: &[f64]) -> Vec<f64>
    where
        F: Fn(&[f64]) -> f64,
    {
        let n = query.len();
        let mut scores = vec![0.0; n];
        if n == 0 || self.background.is_empty() {
            return scores;
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut walks = 0usize;
        let mut order: Vec<usize> = (0..n).collect();

        for _ in 0..self.permutations {
            order.shuffle(&mut rng);
            for reverse in [false, true] {
                for base in &self.background {
                    let mut z = base.clone();
                    let mut prev = model(&z[..]);
                    let mut step = |j: usize| {
                        z[j] = query[j];
                        let cur = model(&z[..]);
                        scores[j] += cur - prev;
                        prev = cur;
                    };
                    if reverse {
                        order.iter().rev().for_each(|&j| step(j));
                    } else {
                        order.iter().for_each(|&j| step(j));
                    }
                    walks += 1;
                }
            }
        }

        for s in &mut scores {
            *s /= walks as f64;
        }
        scores
    }
}

/// Pair scores with feature names and sort by absolute score, largest first.
/// Ties keep the original column order.
pub fn rank_attributions(names: &[String], scores: &[f64]) -> Vec<Attribution> {
    let mut ranked: Vec<Attribution> = names
        .iter()
        .zip(scores)
        .map(|(feature, score)| Attribution {
            feature: feature.clone(),
            score: *score,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.abs().total_cmp(&a.score.abs()));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(row: &[f64]) -> f64 {
        2.0 * row[0] - 3.0 * row[1] + 0.0 * row[2]
    }

    #[test]
    fn test_linear_model_gets_exact_scores() {
        let background = vec![vec![0.0, 0.0, 0.0], vec![2.0, 2.0, 2.0]];
        let explainer = PermutationExplainer::new(background, 4, 42);
        let scores = explainer.explain(linear, &[3.0, 1.0, 5.0]);

        // w * (x - mean(background))
        assert!((scores[0] - 2.0 * (3.0 - 1.0)).abs() < 1e-9);
        assert!((scores[1] - -3.0 * (1.0 - 1.0)).abs() < 1e-9);
        assert!(scores[2].abs() < 1e-9);
    }

    #[test]
    fn test_scores_sum_to_output_gap() {
        let model = |r: &[f64]| if r[0] > 1.0 && r[1] > 1.0 { 1.0 } else { 0.0 };
        let background = vec![vec![0.0, 0.0], vec![2.0, 0.0], vec![0.0, 2.0]];
        let explainer = PermutationExplainer::new(background.clone(), 8, 7);
        let query = [5.0, 5.0];
        let scores = explainer.explain(model, &query);

        let base: f64 = background.iter().map(|b| model(b.as_slice())).sum::<f64>() / 3.0;
        let total: f64 = scores.iter().sum();
        assert!((total - (model(&query[..]) - base)).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let explainer = PermutationExplainer::new(vec![vec![1.0, 1.0]], 3, 5);
        let model = |r: &[f64]| r[0] * r[1];
        assert_eq!(explainer.explain(model, &[2.0, 3.0]), explainer.explain(model, &[2.0, 3.0]));
    }

    #[test]
    fn test_rank_by_magnitude_stable_on_ties() {
        let names: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let ranked = rank_attributions(&names, &[0.1, -0.5, 0.5, 0.0]);
        let order: Vec<_> = ranked.iter().map(|a| a.feature.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a", "d"]);
    }
}
