use super::helper_functions::*;
use super::*;

/// A bagging ensemble of decision trees with out-of-bag estimation.
///
/// Every tree is grown on its own bootstrap resample of the training rows. Rows left out of a
/// tree's resample are scored by that tree, and the per-row aggregate of those scores is the
/// out-of-bag estimate returned by [`fit`](RandomForest::fit). Predictions and importances are
/// running means over the trees.
///
/// # Fields
///
/// - `trees` - Fitted trees in growth order, `None` before fitting
/// - `n_trees` - Number of trees to grow
/// - `params` - Growth hyperparameters shared by every tree
/// - `bootstrap` - Whether each tree is grown on a bootstrap resample; when `false` every tree sees every row once and no out-of-bag estimate exists
/// - `random_state` - Random seed for reproducibility
/// - `n_features` - Number of features seen during fitting
/// - `oob_predictions` - Out-of-bag prediction per training row from the last fit
///
/// # Example
/// ```rust
/// use rustyforest::machine_learning::{CriterionFactory, RandomForest};
/// use ndarray::array;
///
/// let x = array![[1.0], [2.0], [3.0], [10.0], [11.0], [12.0]];
/// let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
///
/// let mut forest = RandomForest::new(20, None, true, Some(42)).unwrap();
/// let oob = forest.fit_matrix(x.view(), y.view(), &CriterionFactory::gini(2)).unwrap();
/// assert_eq!(oob.len(), 6);
/// let predictions = forest.predict_matrix(x.view()).unwrap();
/// assert!(predictions[0] < 0.5 && predictions[5] > 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Option<Vec<Node>>,
    n_trees: usize,
    params: DecisionTreeParams,
    bootstrap: bool,
    random_state: Option<u64>,
    n_features: usize,
    oob_predictions: Option<Array1<f64>>,
}

/// Creates a Random Forest with default parameters.
///
/// # Default Values
///
/// - `trees` - None (not fitted)
/// - `n_trees` - 100
/// - `params` - `DecisionTreeParams::default()`
/// - `bootstrap` - true
/// - `random_state` - None
/// - `n_features` - 0
/// - `oob_predictions` - None
impl Default for RandomForest {
    fn default() -> Self {
        Self {
            trees: None,
            n_trees: 100,
            params: DecisionTreeParams::default(),
            bootstrap: true,
            random_state: None,
            n_features: 0,
            oob_predictions: None,
        }
    }
}

impl RandomForest {
    /// Creates a new Random Forest with specified parameters.
    ///
    /// # Parameters
    ///
    /// - `n_trees` - Number of trees to grow
    /// - `params` - Growth hyperparameters for every tree, `None` for the defaults
    /// - `bootstrap` - Whether to grow each tree on a bootstrap resample
    /// - `random_state` - Random seed for reproducibility. If None, uses non-deterministic seed
    ///
    /// # Returns
    ///
    /// - `Ok(RandomForest)` - A new unfitted forest
    /// - `Err(ModelError::InputValidationError)` - If `n_trees` is 0 or the parameters are invalid
    pub fn new(
        n_trees: usize,
        params: Option<DecisionTreeParams>,
        bootstrap: bool,
        random_state: Option<u64>,
    ) -> Result<Self, ModelError> {
        validate_n_trees(n_trees)?;
        let params = params.unwrap_or_default();
        validate_params(&params)?;

        Ok(Self {
            trees: None,
            n_trees,
            params,
            bootstrap,
            random_state,
            n_features: 0,
            oob_predictions: None,
        })
    }

    // Getters
    get_field!(get_n_trees, n_trees, usize);
    get_field!(get_bootstrap, bootstrap, bool);
    get_field!(get_random_state, random_state, Option<u64>);
    get_field!(get_n_features, n_features, usize);
    get_field_as_ref!(get_trees, trees, Option<&Vec<Node>>);
    get_field_as_ref!(get_oob_predictions, oob_predictions, Option<&Array1<f64>>);

    /// Gets the growth hyperparameters shared by every tree.
    pub fn get_params(&self) -> &DecisionTreeParams {
        &self.params
    }

    /// Trains the forest and returns the out-of-bag prediction of every training row.
    ///
    /// Every feature is prepared once, then `n_trees` trees are grown, each on a freshly drawn
    /// bag. A row's out-of-bag prediction aggregates, with the criterion of the task, the leaf
    /// predictions of the trees that did not train on it; rows that were in every bag (and every
    /// row when `bootstrap` is off) get NaN.
    ///
    /// # Parameters
    ///
    /// - `features` - Feature columns, all of the same length
    /// - `target` - Target column; numeric for regression, category codes for classification
    /// - `factory` - Selects the learning task
    ///
    /// # Returns
    ///
    /// * `Result<Array1<f64>, ModelError>` - Out-of-bag predictions, or `ModelError` if:
    ///     - No features or no rows are supplied
    ///     - Feature and target lengths differ
    ///     - A feature contains an infinite value
    ///     - The target does not suit the criterion
    pub fn fit(
        &mut self,
        features: &mut [Box<dyn OrderedFeature>],
        target: &dyn Feature,
        factory: &CriterionFactory,
    ) -> Result<Array1<f64>, ModelError> {
        let n_rows = preliminary_check(&as_features(features))?;
        validate_target(n_rows, target, factory)?;

        for feature in features.iter_mut() {
            feature.prepare();
        }

        let grower = TreeGrower::new(&self.params, features.len());
        let mut rng = make_rng(self.random_state);
        let mut oob = vec![factory.new_criterion(); n_rows];
        let mut bag = if self.bootstrap {
            Bag::Bootstrap(vec![0; n_rows])
        } else {
            Bag::full(n_rows)
        };

        let mut trees = Vec::with_capacity(self.n_trees);
        for index in 0..self.n_trees {
            bag.resample(&mut rng);
            let tree = grower.grow(
                features,
                target,
                factory,
                &bag,
                Some(oob.as_mut_slice()),
                &mut rng,
            );

            log::debug!(
                "tree {}: {} in-bag rows, {} out-of-bag rows, {} leaves",
                index,
                bag.in_bag_rows(),
                bag.out_of_bag_rows(),
                tree.n_leaves()
            );
            trees.push(tree);
        }

        let oob_predictions: Array1<f64> = oob.iter().map(Criterion::prediction).collect();

        self.trees = Some(trees);
        self.n_features = features.len();
        self.oob_predictions = Some(oob_predictions.clone());
        Ok(oob_predictions)
    }

    /// Trains the forest on a feature matrix (rows are samples) and a target vector.
    ///
    /// For classification, `y` must hold integer class codes in `0..n_categories` of `factory`.
    pub fn fit_matrix(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        factory: &CriterionFactory,
    ) -> Result<Array1<f64>, ModelError> {
        validate_matrix_target(x, y)?;

        let mut features = features_from_matrix(x);
        let target = NumericFeature::new("target", y.to_vec());
        self.fit(&mut features, &target, factory)
    }

    /// Predicts every row of `features` as the mean of the trees' leaf predictions.
    ///
    /// For classification this is the mean predicted class code; with two classes coded 0 and 1
    /// it is the fraction of trees voting for class 1.
    ///
    /// # Returns
    ///
    /// * `Result<Array1<f64>, ModelError>` - One prediction per row, or `ModelError` if:
    ///     - The model has not been fitted
    ///     - The number of features differs from training
    ///     - The features are empty, of unequal lengths, or contain infinite values
    pub fn predict(&self, features: &[&dyn Feature]) -> Result<Array1<f64>, ModelError> {
        let trees = self.trees.as_ref().ok_or(ModelError::NotFitted)?;
        let n_rows = validate_prediction_features(features, self.n_features)?;

        let mut predictions = Array1::<f64>::zeros(n_rows);
        for (index, tree) in trees.iter().enumerate() {
            let weight = (index + 1) as f64;
            for (row, prediction) in predictions.iter_mut().enumerate() {
                *prediction += (tree.predict_row(features, row) - *prediction) / weight;
            }
        }

        Ok(predictions)
    }

    /// Predicts every row of a feature matrix.
    pub fn predict_matrix(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        let features = features_from_matrix(x);
        self.predict(&as_features(&features))
    }

    /// Impurity-reduction importance of each feature, averaged over the trees.
    ///
    /// # Returns
    ///
    /// * `Result<Array1<f64>, ModelError>` - For every feature, the mean over trees of the summed
    ///   reductions of that tree's splits on it, or `ModelError::NotFitted`
    pub fn importances(&self) -> Result<Array1<f64>, ModelError> {
        let trees = self.trees.as_ref().ok_or(ModelError::NotFitted)?;

        let mut importances = Array1::<f64>::zeros(self.n_features);
        let mut tree_importances = vec![0.0; self.n_features];
        for (index, tree) in trees.iter().enumerate() {
            tree_importances.iter_mut().for_each(|v| *v = 0.0);
            tree.importances(&mut tree_importances);

            let weight = (index + 1) as f64;
            for (mean, &value) in importances.iter_mut().zip(tree_importances.iter()) {
                *mean += (value - *mean) / weight;
            }
        }

        Ok(importances)
    }
}
