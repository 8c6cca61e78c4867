//! Calorie-burn predictor: a seeded random forest refit on every request.
//!
//! The forest is a bag of CART regression trees. Each tree is grown on a
//! bootstrap sample of the training split, choosing at every node the split
//! over all five features that most reduces squared error. Given the same
//! data and `random_state`, the split, the bootstrap samples and therefore
//! every prediction are identical across runs.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use tracing::debug;

use crate::config::PredictorConfig;
use crate::error::{FitnessError, Result};
use crate::logging::OperationTimer;
use crate::models::TrainingSample;
use crate::training::TrainingSet;

/// Number of input features.
pub const FEATURE_COUNT: usize = 5;

/// One feature row: age, BMI, duration, heart rate, body temperature.
pub type Features = [f64; FEATURE_COUNT];

/// Physiological inputs for a prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionInput {
    /// Age in years
    pub age: f64,
    /// Body mass index
    pub bmi: f64,
    /// Exercise duration in minutes
    pub duration: f64,
    /// Heart rate in bpm
    pub heart_rate: f64,
    /// Body temperature in °C
    pub body_temp: f64,
}

impl PredictionInput {
    /// Feature vector in training column order
    #[must_use]
    pub const fn features(&self) -> Features {
        [self.age, self.bmi, self.duration, self.heart_rate, self.body_temp]
    }
}

impl Default for PredictionInput {
    fn default() -> Self {
        Self {
            age: 30.0,
            bmi: 22.0,
            duration: 30.0,
            heart_rate: 90.0,
            body_temp: 37.0,
        }
    }
}

/// Hyperparameters of the forest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    /// Number of trees
    pub n_estimators: usize,
    /// Seed for bootstrap sampling
    pub random_state: u64,
    /// Minimum node size that may still be split
    pub min_samples_split: usize,
    /// Depth limit, `None` for unlimited
    pub max_depth: Option<usize>,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            random_state: 42,
            min_samples_split: 2,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: &Features) -> f64 {
        let mut node = self;
        loop {
            match node {
                Self::Leaf(value) => return *value,
                Self::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { &**left } else { &**right };
                }
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// A single CART regression tree.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    root: Node,
}

impl RegressionTree {
    /// Grow a tree on the rows of `x`/`y` selected by `indices` (repeats allowed).
    #[must_use]
    pub fn fit(x: &[Features], y: &[f64], indices: Vec<usize>, params: &ForestParams) -> Self {
        Self {
            root: grow(x, y, indices, 0, params),
        }
    }

    /// Predicted target for `row`.
    #[must_use]
    pub fn predict(&self, row: &Features) -> f64 {
        self.root.predict(row)
    }

    /// Longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

fn mean_of(y: &[f64], indices: &[usize]) -> f64 {
    indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64
}

fn grow(x: &[Features], y: &[f64], indices: Vec<usize>, depth: usize, params: &ForestParams) -> Node {
    let mean = mean_of(y, &indices);

    let depth_reached = params.max_depth.is_some_and(|limit| depth >= limit);
    let pure = indices.iter().all(|&i| (y[i] - mean).abs() < f64::EPSILON);
    if indices.len() < params.min_samples_split || depth_reached || pure {
        return Node::Leaf(mean);
    }

    let Some((feature, threshold)) = best_split(x, y, &indices) else {
        return Node::Leaf(mean);
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices.into_iter().partition(|&i| x[i][feature] <= threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(grow(x, y, left, depth + 1, params)),
        right: Box::new(grow(x, y, right, depth + 1, params)),
    }
}

/// Feature and threshold maximizing `sum_l²/n_l + sum_r²/n_r`, which is
/// equivalent to minimizing the children's summed squared error.
fn best_split(x: &[Features], y: &[f64], indices: &[usize]) -> Option<(usize, f64)> {
    let n = indices.len();
    let total: f64 = indices.iter().map(|&i| y[i]).sum();
    let parent_score = total * total / n as f64;

    let mut best: Option<(usize, f64)> = None;
    let mut best_score = parent_score;
    let mut sorted = indices.to_vec();

    for feature in 0..FEATURE_COUNT {
        sorted.sort_by(|&a, &b| x[a][feature].partial_cmp(&x[b][feature]).unwrap_or(Ordering::Equal));

        let mut left_sum = 0.0;
        for k in 0..n - 1 {
            left_sum += y[sorted[k]];
            let current = x[sorted[k]][feature];
            let next = x[sorted[k + 1]][feature];
            if next <= current {
                continue;
            }

            let left_n = (k + 1) as f64;
            let right_n = (n - k - 1) as f64;
            let right_sum = total - left_sum;
            let score = left_sum * left_sum / left_n + right_sum * right_sum / right_n;

            if score > best_score + 1e-9 {
                best_score = score;
                let midpoint = current + (next - current) / 2.0;
                let threshold = if midpoint < next { midpoint } else { current };
                best = Some((feature, threshold));
            }
        }
    }

    best
}

/// Bagged ensemble of regression trees.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fit `params.n_estimators` trees, each on a bootstrap sample drawn from
    /// a seed derived from `params.random_state`.
    pub fn fit(x: &[Features], y: &[f64], params: &ForestParams) -> Result<Self> {
        if x.is_empty() || x.len() != y.len() {
            return Err(FitnessError::Model(format!(
                "cannot fit forest on {} feature rows and {} targets",
                x.len(),
                y.len()
            )));
        }
        if params.n_estimators == 0 {
            return Err(FitnessError::Model("n_estimators must be greater than 0".to_string()));
        }

        let mut seeder = StdRng::seed_from_u64(params.random_state);
        let n = x.len();
        let trees = (0..params.n_estimators)
            .map(|_| {
                let mut rng = StdRng::seed_from_u64(seeder.gen());
                let sample = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(x, y, sample, params)
            })
            .collect();

        Ok(Self { trees })
    }

    /// Mean of the trees' predictions.
    #[must_use]
    pub fn predict(&self, row: &Features) -> f64 {
        self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>() / self.trees.len() as f64
    }

    /// Trees in the ensemble.
    #[must_use]
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }
}

/// Shuffle `0..n` with `seed` and hold out the first `ceil(test_size * n)` indices.
///
/// Returns `(train, test)`.
#[must_use]
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n_test = ((test_size * n as f64).ceil() as usize).min(n.saturating_sub(1));
    let train = indices.split_off(n_test);
    (train, indices)
}

/// Coefficient of determination of `predicted` against `actual`.
#[must_use]
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.len() < 2 || actual.len() != predicted.len() {
        return None;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let total: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if total == 0.0 {
        return None;
    }
    let residual: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum();
    Some(1.0 - residual / total)
}

/// A forest fitted on the training split, with its holdout score.
#[derive(Debug, Clone)]
pub struct FittedModel {
    /// The fitted forest
    pub forest: RandomForest,
    /// Rows used for fitting
    pub train_rows: usize,
    /// Rows held out
    pub test_rows: usize,
    /// R² on the held-out rows, when defined
    pub holdout_r2: Option<f64>,
}

/// Predictor that reloads the training set and refits on every call.
#[derive(Debug, Clone)]
pub struct CaloriePredictor {
    training: TrainingSet,
    params: ForestParams,
    test_size: f64,
}

impl CaloriePredictor {
    /// Predictor over `training` with hyperparameters from `config`.
    #[must_use]
    pub fn new(training: TrainingSet, config: &PredictorConfig) -> Self {
        Self {
            training,
            params: config.forest_params(),
            test_size: config.test_size,
        }
    }

    /// Load the training set, split it and fit a fresh forest.
    pub fn fit(&self) -> Result<FittedModel> {
        let samples = self.training.load()?;
        fit_samples(&samples, &self.params, self.test_size)
    }

    /// Predicted calories burned for `input`. Refits the model first.
    pub fn predict(&self, input: &PredictionInput) -> Result<f64> {
        let timer = OperationTimer::new("predict_calories");
        let model = self.fit()?;
        let calories = model.forest.predict(&input.features());
        let elapsed = timer.finish();

        crate::metrics::record_prediction(elapsed);
        debug!(calories, holdout_r2 = ?model.holdout_r2, "Predicted calories");
        Ok(calories)
    }
}

/// Split `samples`, fit a forest on the training part and score the rest.
pub fn fit_samples(samples: &[TrainingSample], params: &ForestParams, test_size: f64) -> Result<FittedModel> {
    if samples.len() < 2 {
        return Err(FitnessError::Model(format!(
            "training set needs at least 2 rows, found {}",
            samples.len()
        )));
    }

    let (train_idx, test_idx) = train_test_split(samples.len(), test_size, params.random_state);
    let x_train: Vec<Features> = train_idx.iter().map(|&i| samples[i].features()).collect();
    let y_train: Vec<f64> = train_idx.iter().map(|&i| samples[i].calories).collect();

    let forest = RandomForest::fit(&x_train, &y_train, params)?;

    let actual: Vec<f64> = test_idx.iter().map(|&i| samples[i].calories).collect();
    let predicted: Vec<f64> = test_idx
        .iter()
        .map(|&i| forest.predict(&samples[i].features()))
        .collect();
    let holdout_r2 = r2_score(&actual, &predicted);

    debug!(
        train_rows = train_idx.len(),
        test_rows = test_idx.len(),
        trees = params.n_estimators,
        holdout_r2 = ?holdout_r2,
        "Fitted calorie forest"
    );

    Ok(FittedModel {
        forest,
        train_rows: train_idx.len(),
        test_rows: test_idx.len(),
        holdout_r2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tree_fits_step_function() {
        let x: Vec<Features> = (0..10).map(|i| [f64::from(i), 0.0, 0.0, 0.0, 0.0]).collect();
        let y: Vec<f64> = (0..10).map(|i| if i < 5 { 100.0 } else { 500.0 }).collect();
        let tree = RegressionTree::fit(&x, &y, (0..10).collect(), &ForestParams::default());

        assert!((tree.predict(&[2.0, 0.0, 0.0, 0.0, 0.0]) - 100.0).abs() < 1e-9);
        assert!((tree.predict(&[7.0, 0.0, 0.0, 0.0, 0.0]) - 500.0).abs() < 1e-9);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_max_depth_limits_growth() {
        let x: Vec<Features> = (0..16).map(|i| [f64::from(i), 0.0, 0.0, 0.0, 0.0]).collect();
        let y: Vec<f64> = (0..16).map(f64::from).collect();
        let params = ForestParams {
            max_depth: Some(2),
            ..ForestParams::default()
        };
        let tree = RegressionTree::fit(&x, &y, (0..16).collect(), &params);
        assert!(tree.depth() <= 2);
    }

    #[test]
    fn test_constant_features_produce_leaf() {
        let x = vec![[1.0; FEATURE_COUNT]; 4];
        let y = vec![10.0, 20.0, 30.0, 40.0];
        let tree = RegressionTree::fit(&x, &y, (0..4).collect(), &ForestParams::default());
        assert_eq!(tree.depth(), 0);
        assert!((tree.predict(&[1.0; FEATURE_COUNT]) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_sizes() {
        let (train, test) = train_test_split(100, 0.2, 42);
        assert_eq!(train.len(), 80);
        assert_eq!(test.len(), 20);

        let mut all: Vec<usize> = train.iter().chain(&test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_r2_perfect_and_undefined() {
        assert_eq!(r2_score(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), Some(1.0));
        assert_eq!(r2_score(&[5.0, 5.0], &[4.0, 6.0]), None);
        assert_eq!(r2_score(&[1.0], &[1.0]), None);
    }
}
