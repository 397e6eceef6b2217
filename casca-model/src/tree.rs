//! CART decision tree for a binary target (Gini impurity).
//!
//! Nodes are grown until pure or until no feature separates the samples.
//! Thresholds sit halfway between consecutive distinct values; a sample goes
//! left when `x[feature] <= threshold`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        /// Fraction of class-1 samples that reached this leaf
        p1: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct GrowCtx<'a> {
    x: &'a [Vec<f64>],
    y: &'a [bool],
    max_features: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn gini(pos: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = pos as f64 / n as f64;
    2.0 * p * (1.0 - p)
}

impl DecisionTree {
    /// Fit on the rows listed in `samples` (duplicates act as weights).
    ///
    /// At each node, features are visited in random order; the search stops
    /// after `max_features` non-constant features once a split has been found.
    pub fn fit(
        x: &[Vec<f64>],
        y: &[bool],
        samples: &[usize],
        max_features: usize,
        rng: &mut StdRng,
    ) -> Self {
        let ctx = GrowCtx {
            x,
            y,
            max_features: max_features.max(1),
        };
        let mut tree = DecisionTree { nodes: Vec::new() };
        if samples.is_empty() {
            tree.nodes.push(Node::Leaf { p1: 0.0 });
        } else {
            tree.grow(&ctx, samples, rng);
        }
        tree
    }

    fn grow(&mut self, ctx: &GrowCtx<'_>, samples: &[usize], rng: &mut StdRng) -> usize {
        let pos = samples.iter().filter(|&&i| ctx.y[i]).count();
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            p1: pos as f64 / samples.len() as f64,
        });

        if pos == 0 || pos == samples.len() {
            return id;
        }
        let Some(best) = Self::best_split(ctx, samples, rng) else {
            return id;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .partition(|&&i| ctx.x[i][best.feature] <= best.threshold);
        let left_id = self.grow(ctx, &left, rng);
        let right_id = self.grow(ctx, &right, rng);
        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: left_id,
            right: right_id,
        };
        id
    }

    fn best_split(ctx: &GrowCtx<'_>, samples: &[usize], rng: &mut StdRng) -> Option<BestSplit> {
        let n_features = ctx.x[samples[0]].len();
        let mut order: Vec<usize> = (0..n_features).collect();
        order.shuffle(rng);

        let n = samples.len();
        let total_pos = samples.iter().filter(|&&i| ctx.y[i]).count();
        let mut best: Option<BestSplit> = None;
        let mut visited = 0;

        for feature in order {
            if visited >= ctx.max_features && best.is_some() {
                break;
            }

            let mut column: Vec<(f64, bool)> = samples
                .iter()
                .map(|&i| (ctx.x[i][feature], ctx.y[i]))
                .collect();
            column.sort_by(|a, b| a.0.total_cmp(&b.0));
            if column[0].0 == column[n - 1].0 {
                continue;
            }
            visited += 1;

            let mut left_pos = 0;
            for k in 1..n {
                if column[k - 1].1 {
                    left_pos += 1;
                }
                if column[k - 1].0 == column[k].0 {
                    continue;
                }
                let right_pos = total_pos - left_pos;
                let impurity = (k as f64 * gini(left_pos, k)
                    + (n - k) as f64 * gini(right_pos, n - k))
                    / n as f64;
                if best.as_ref().is_none_or(|b| impurity < b.impurity) {
                    let (lo, hi) = (column[k - 1].0, column[k].0);
                    let mut threshold = lo / 2.0 + hi / 2.0;
                    if threshold >= hi || !threshold.is_finite() {
                        threshold = lo;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }
        best
    }

    /// Class-1 probability for one row.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { p1 } => return *p1,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match &nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_separates_single_feature() {
        let x = vec![vec![1.0], vec![2.0], vec![10.0], vec![11.0]];
        let y = vec![false, false, true, true];
        let mut rng = StdRng::seed_from_u64(7);
        let tree = DecisionTree::fit(&x, &y, &[0, 1, 2, 3], 1, &mut rng);

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict_proba(&[0.0]), 0.0);
        // threshold is the midpoint 6.0, inclusive on the left
        assert_eq!(tree.predict_proba(&[6.0]), 0.0);
        assert_eq!(tree.predict_proba(&[6.5]), 1.0);
    }

    #[test]
    fn test_skips_constant_features() {
        let x = vec![vec![5.0, 1.0], vec![5.0, 2.0], vec![5.0, 3.0]];
        let y = vec![true, true, false];
        let mut rng = StdRng::seed_from_u64(1);
        let tree = DecisionTree::fit(&x, &y, &[0, 1, 2], 1, &mut rng);
        for (row, label) in x.iter().zip(&y) {
            assert_eq!(tree.predict_proba(row), if *label { 1.0 } else { 0.0 });
        }
    }

    #[test]
    fn test_unsplittable_node_is_mixed_leaf() {
        let x = vec![vec![1.0], vec![1.0]];
        let y = vec![true, false];
        let mut rng = StdRng::seed_from_u64(3);
        let tree = DecisionTree::fit(&x, &y, &[0, 1, 1], 1, &mut rng);
        assert_eq!(tree.node_count(), 1);
        assert!((tree.predict_proba(&[1.0]) - 1.0 / 3.0).abs() < 1e-12);
    }
}
