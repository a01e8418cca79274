use super::*;

/// Impurity functions for categorical targets.
///
/// A categorical node's metric has the form `sum_c count_c * f(count_c / total)` over the
/// non-empty categories, which keeps it additive across the children of a split.
///
/// # Variants
///
/// - `Gini` - `f(p) = 1 - p`, the count-weighted Gini impurity
/// - `Entropy` - `f(p) = -log2(p)`, the count-weighted entropy (information gain splitting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impurity {
    Gini,
    Entropy,
}

impl Impurity {
    fn weight(self, p: f64) -> f64 {
        match self {
            Impurity::Gini => gini_weight(p),
            Impurity::Entropy => entropy_weight(p),
        }
    }
}

/// Regression criterion: the node metric is the sum of squared error and the prediction is
/// the mean.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MseCriterion {
    accumulator: MeanVarianceAccumulator,
}

impl MseCriterion {
    /// Creates an empty criterion.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Classification criterion over integer category codes.
///
/// # Fields
///
/// - `count` - Total number of values in the node
/// - `counts` - Number of values per category code
/// - `impurity` - Impurity function applied to each category's share
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalCriterion {
    count: usize,
    counts: Vec<usize>,
    impurity: Impurity,
}

impl CategoricalCriterion {
    /// Creates an empty criterion over `n_categories` codes.
    pub fn new(n_categories: usize, impurity: Impurity) -> Self {
        Self {
            count: 0,
            counts: vec![0; n_categories],
            impurity,
        }
    }

    /// Number of values per category code.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }
}

/// Online sufficient statistic over the target values of a node.
///
/// `add` and `subtract` move single target values in and out; `metric` is an additive
/// impurity so the metrics of two children can be summed and compared with their parent's;
/// `prediction` is the node's point estimate. `clone` produces an independent snapshot.
///
/// # Example
/// ```rust
/// use rustyforest::machine_learning::{Criterion, Impurity};
///
/// let mut gini = Criterion::categorical(2, Impurity::Gini);
/// for y in [0.0, 1.0, 1.0, 1.0] {
///     gini.add(y);
/// }
/// assert_eq!(gini.prediction(), 1.0);
/// // 1 * (1 - 1/4) + 3 * (1 - 3/4)
/// assert!((gini.metric() - 1.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Mse(MseCriterion),
    Categorical(CategoricalCriterion),
}

impl Criterion {
    /// Creates an empty regression criterion.
    pub fn mse() -> Self {
        Criterion::Mse(MseCriterion::new())
    }

    /// Creates an empty classification criterion.
    pub fn categorical(n_categories: usize, impurity: Impurity) -> Self {
        Criterion::Categorical(CategoricalCriterion::new(n_categories, impurity))
    }

    /// Adds a target value to the node.
    pub fn add(&mut self, y: f64) {
        match self {
            Criterion::Mse(c) => c.accumulator.add(y),
            Criterion::Categorical(c) => {
                c.counts[y as usize] += 1;
                c.count += 1;
            }
        }
    }

    /// Removes a target value that was previously added.
    ///
    /// # Panics
    ///
    /// Panics if the node is empty, or (for categorical targets) if no value of that category
    /// is present.
    pub fn subtract(&mut self, y: f64) {
        match self {
            Criterion::Mse(c) => c.accumulator.subtract(y),
            Criterion::Categorical(c) => {
                assert!(c.count > 0, "subtract() without a corresponding add()");
                let code = y as usize;
                assert!(
                    c.counts[code] > 0,
                    "subtract() without a corresponding add() for category {}",
                    code
                );
                c.counts[code] -= 1;
                c.count -= 1;
            }
        }
    }

    /// Folds every value held by `other` into this node.
    ///
    /// # Panics
    ///
    /// Panics if the two criteria are of different kinds.
    pub fn merge(&mut self, other: &Criterion) {
        match (self, other) {
            (Criterion::Mse(a), Criterion::Mse(b)) => a.accumulator.merge(&b.accumulator),
            (Criterion::Categorical(a), Criterion::Categorical(b)) => {
                for (ca, cb) in a.counts.iter_mut().zip(b.counts.iter()) {
                    *ca += cb;
                }
                a.count += b.count;
            }
            _ => panic!("merge() of mismatched criterion kinds"),
        }
    }

    /// Removes every value held by `other`, the inverse of [`merge`](Self::merge).
    ///
    /// # Panics
    ///
    /// Panics if the criteria are of different kinds or `other` holds values this node does not.
    pub fn unmerge(&mut self, other: &Criterion) {
        match (self, other) {
            (Criterion::Mse(a), Criterion::Mse(b)) => a.accumulator.unmerge(&b.accumulator),
            (Criterion::Categorical(a), Criterion::Categorical(b)) => {
                for (code, (ca, cb)) in a.counts.iter_mut().zip(b.counts.iter()).enumerate() {
                    assert!(
                        *ca >= *cb,
                        "unmerge() removes more values of category {} than were added",
                        code
                    );
                    *ca -= cb;
                }
                a.count -= b.count;
            }
            _ => panic!("unmerge() of mismatched criterion kinds"),
        }
    }

    /// Number of values in the node.
    pub fn count(&self) -> usize {
        match self {
            Criterion::Mse(c) => c.accumulator.count(),
            Criterion::Categorical(c) => c.count,
        }
    }

    /// Point estimate for the node: the mean for regression, the most frequent category for
    /// classification (the lowest code wins a tie). NaN for an empty node.
    pub fn prediction(&self) -> f64 {
        match self {
            Criterion::Mse(c) => c.accumulator.mean(),
            Criterion::Categorical(c) => {
                let mut prediction = f64::NAN;
                let mut max_count = 0;
                for (code, &n) in c.counts.iter().enumerate() {
                    if n > max_count {
                        max_count = n;
                        prediction = code as f64;
                    }
                }
                prediction
            }
        }
    }

    /// Additive impurity of the node; zero for a single-valued node.
    pub fn metric(&self) -> f64 {
        match self {
            Criterion::Mse(c) => c.accumulator.sum_squared_error(),
            Criterion::Categorical(c) => {
                if c.count == 0 {
                    return 0.0;
                }
                let total = c.count as f64;
                c.counts
                    .iter()
                    .filter(|&&n| n > 0)
                    .map(|&n| {
                        let n = n as f64;
                        n * c.impurity.weight(n / total)
                    })
                    .sum()
            }
        }
    }
}

/// Selects the learning task by creating fresh, empty criteria.
///
/// # Variants
///
/// - `Mse` - Regression with sum-of-squared-error impurity and mean prediction
/// - `Categorical` - Classification over `n_categories` integer codes with the given impurity
///   and mode prediction
///
/// # Example
/// ```rust
/// use rustyforest::feature::CategoricalFeature;
/// use rustyforest::machine_learning::{CriterionFactory, Impurity};
///
/// let target = CategoricalFeature::from_values("label", ["yes", "no", "yes"]);
/// let factory = CriterionFactory::classification(Impurity::Entropy, &target).unwrap();
/// assert_eq!(
///     factory,
///     CriterionFactory::Categorical { n_categories: 2, impurity: Impurity::Entropy }
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionFactory {
    Mse,
    Categorical {
        n_categories: usize,
        impurity: Impurity,
    },
}

impl CriterionFactory {
    /// Gini classification over `n_categories` codes.
    pub fn gini(n_categories: usize) -> Self {
        CriterionFactory::Categorical {
            n_categories,
            impurity: Impurity::Gini,
        }
    }

    /// Entropy classification over `n_categories` codes.
    pub fn entropy(n_categories: usize) -> Self {
        CriterionFactory::Categorical {
            n_categories,
            impurity: Impurity::Entropy,
        }
    }

    /// Classification factory sized from a categorical target column.
    ///
    /// # Returns
    ///
    /// - `Ok(CriterionFactory)` - A categorical factory covering every category of `target`
    /// - `Err(ModelError::InputValidationError)` - If `target` is not categorical
    pub fn classification(impurity: Impurity, target: &dyn Feature) -> Result<Self, ModelError> {
        match target.categories() {
            Some(n_categories) => Ok(CriterionFactory::Categorical {
                n_categories,
                impurity,
            }),
            None => Err(ModelError::InputValidationError(format!(
                "classification requires a categorical target, but '{}' is numeric",
                target.name()
            ))),
        }
    }

    /// Creates an empty criterion of this kind.
    pub fn new_criterion(&self) -> Criterion {
        match *self {
            CriterionFactory::Mse => Criterion::mse(),
            CriterionFactory::Categorical {
                n_categories,
                impurity,
            } => Criterion::categorical(n_categories, impurity),
        }
    }

    /// Checks that every target value can be fed to criteria of this kind.
    ///
    /// Regression targets must be finite; classification targets must be integer codes in
    /// `0..n_categories`.
    pub fn validate_target(&self, target: &dyn Feature) -> Result<(), ModelError> {
        for row in 0..target.len() {
            let y = target.numeric_value(row);
            match *self {
                CriterionFactory::Mse => {
                    if !y.is_finite() {
                        return Err(ModelError::InputValidationError(format!(
                            "Target '{}' contains a non-finite value at row {}",
                            target.name(),
                            row
                        )));
                    }
                }
                CriterionFactory::Categorical { n_categories, .. } => {
                    if !(y >= 0.0 && y.fract() == 0.0 && y < n_categories as f64) {
                        return Err(ModelError::InputValidationError(format!(
                            "Target '{}' value {} at row {} is not a category code in 0..{}",
                            target.name(),
                            y,
                            row,
                            n_categories
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
