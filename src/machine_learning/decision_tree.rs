use super::helper_functions::*;
use super::*;

/// A single decision tree for regression or classification.
///
/// The tree is grown on every training row with weight 1 (no bootstrap), breadth first, until no
/// node can be improved by a split on the sampled features. With the default parameters the tree
/// is fully grown and reproduces deterministic training data exactly.
///
/// # Fields
///
/// - `root` - Root node of the fitted tree, `None` before fitting
/// - `params` - Growth hyperparameters
/// - `random_state` - Seed for the feature sampling, `None` for a non-deterministic seed
/// - `n_features` - Number of features seen during fitting
///
/// # Example
/// ```rust
/// use rustyforest::machine_learning::{CriterionFactory, DecisionTree};
/// use ndarray::array;
///
/// let x = array![[0.0], [1.0], [2.0], [3.0]];
/// let y = array![3.0, 0.0, 3.0, 1.0];
///
/// let mut tree = DecisionTree::new(None, Some(42)).unwrap();
/// tree.fit_matrix(x.view(), y.view(), &CriterionFactory::Mse).unwrap();
/// let predictions = tree.predict_matrix(x.view()).unwrap();
/// assert_eq!(predictions, y);
/// ```
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: Option<Node>,
    params: DecisionTreeParams,
    random_state: Option<u64>,
    n_features: usize,
}

/// Creates an unfitted tree with default parameters and no seed.
impl Default for DecisionTree {
    fn default() -> Self {
        Self {
            root: None,
            params: DecisionTreeParams::default(),
            random_state: None,
            n_features: 0,
        }
    }
}

impl DecisionTree {
    /// Creates a new decision tree.
    ///
    /// # Parameters
    ///
    /// - `params` - Growth hyperparameters, `None` for the defaults
    /// - `random_state` - Random seed for reproducibility. If None, uses non-deterministic seed
    ///
    /// # Returns
    ///
    /// - `Ok(DecisionTree)` - A new unfitted tree
    /// - `Err(ModelError::InputValidationError)` - If the parameters are invalid
    pub fn new(
        params: Option<DecisionTreeParams>,
        random_state: Option<u64>,
    ) -> Result<Self, ModelError> {
        let params = params.unwrap_or_default();
        validate_params(&params)?;

        Ok(Self {
            root: None,
            params,
            random_state,
            n_features: 0,
        })
    }

    // Getters
    get_field!(get_random_state, random_state, Option<u64>);
    get_field!(get_n_features, n_features, usize);
    get_field_as_ref!(get_root, root, Option<&Node>);

    /// Gets the growth hyperparameters.
    pub fn get_params(&self) -> &DecisionTreeParams {
        &self.params
    }

    /// Fits the tree to the given features and target.
    ///
    /// Every feature is prepared (value-sorted) before growth.
    ///
    /// # Parameters
    ///
    /// - `features` - Feature columns, all of the same length
    /// - `target` - Target column; numeric for regression, category codes for classification
    /// - `factory` - Selects the learning task
    ///
    /// # Returns
    ///
    /// * `Result<&mut Self, ModelError>` - A mutable reference to self if successful, or `ModelError` if:
    ///     - No features or no rows are supplied
    ///     - Feature and target lengths differ
    ///     - A feature contains an infinite value
    ///     - The target does not suit the criterion
    pub fn fit(
        &mut self,
        features: &mut [Box<dyn OrderedFeature>],
        target: &dyn Feature,
        factory: &CriterionFactory,
    ) -> Result<&mut Self, ModelError> {
        let n_rows = preliminary_check(&as_features(features))?;
        validate_target(n_rows, target, factory)?;

        for feature in features.iter_mut() {
            feature.prepare();
        }

        let grower = TreeGrower::new(&self.params, features.len());
        let mut rng = make_rng(self.random_state);
        let bag = Bag::full(n_rows);
        let root = grower.grow(features, target, factory, &bag, None, &mut rng);

        log::debug!(
            "decision tree fitted on {} rows: {} leaves, depth {}",
            n_rows,
            root.n_leaves(),
            root.depth()
        );

        self.n_features = features.len();
        self.root = Some(root);
        Ok(self)
    }

    /// Fits the tree to a feature matrix (rows are samples) and a target vector.
    ///
    /// For classification, `y` must hold integer class codes in `0..n_categories` of `factory`.
    pub fn fit_matrix(
        &mut self,
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        factory: &CriterionFactory,
    ) -> Result<&mut Self, ModelError> {
        validate_matrix_target(x, y)?;

        let mut features = features_from_matrix(x);
        let target = NumericFeature::new("target", y.to_vec());
        self.fit(&mut features, &target, factory)
    }

    /// Predicts every row of `features`.
    ///
    /// # Returns
    ///
    /// * `Result<Array1<f64>, ModelError>` - One prediction per row, or `ModelError` if:
    ///     - The model has not been fitted
    ///     - The number of features differs from training
    ///     - The features are empty, of unequal lengths, or contain infinite values
    pub fn predict(&self, features: &[&dyn Feature]) -> Result<Array1<f64>, ModelError> {
        let root = self.root.as_ref().ok_or(ModelError::NotFitted)?;
        validate_prediction_features(features, self.n_features)?;

        Ok(Array1::from_vec(root.predict(features)))
    }

    /// Predicts every row of a feature matrix.
    pub fn predict_matrix(&self, x: ArrayView2<f64>) -> Result<Array1<f64>, ModelError> {
        let features = features_from_matrix(x);
        self.predict(&as_features(&features))
    }

    /// Impurity-reduction importance of each feature.
    ///
    /// # Returns
    ///
    /// * `Result<Array1<f64>, ModelError>` - For every feature, the sum of the reductions of the
    ///   splits made on it, or `ModelError::NotFitted`
    pub fn importances(&self) -> Result<Array1<f64>, ModelError> {
        let root = self.root.as_ref().ok_or(ModelError::NotFitted)?;

        let mut importances = vec![0.0; self.n_features];
        root.importances(&mut importances);
        Ok(Array1::from_vec(importances))
    }

    /// Generates a text representation of the tree structure.
    ///
    /// Every node is listed with its prediction, metric and size; internal nodes also show the
    /// reduction of their split.
    ///
    /// # Returns
    ///
    /// * `Result<String, ModelError>` - The rendered tree, or `ModelError::NotFitted`
    pub fn generate_tree_structure(&self) -> Result<String, ModelError> {
        let root = self.root.as_ref().ok_or(ModelError::NotFitted)?;

        let mut output = String::new();
        output.push_str("Decision Tree Structure:\n");
        output.push_str(&root.generate_structure());
        Ok(output)
    }
}
