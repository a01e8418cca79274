use super::*;

/// Size, prediction and impurity of one side of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSummary {
    pub size: usize,
    pub prediction: f64,
    pub metric: f64,
}

impl NodeSummary {
    /// Summarizes the current state of a criterion.
    pub fn from_criterion(criterion: &Criterion) -> Self {
        Self {
            size: criterion.count(),
            prediction: criterion.prediction(),
            metric: criterion.metric(),
        }
    }
}

/// Result of a completed split search for one node on one feature.
///
/// Rows whose feature value is `< threshold` go left, every other row (including NaN)
/// goes right.
///
/// # Fields
///
/// - `threshold` - Decision threshold of the predicate `value < threshold`
/// - `metric` - Combined impurity of the two children
/// - `reduction` - Impurity of the unsplit node minus `metric`; always positive
/// - `left` - Summary of the rows sent left
/// - `right` - Summary of the rows sent right
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitInfo {
    pub threshold: f64,
    pub metric: f64,
    pub reduction: f64,
    pub left: NodeSummary,
    pub right: NodeSummary,
}

impl SplitInfo {
    /// Whether a row with feature value `x` belongs to the left child.
    pub fn goes_left(&self, x: f64) -> bool {
        goes_left(x, self.threshold)
    }
}

/// The split predicate shared by growth and prediction.
#[inline]
pub fn goes_left(x: f64, threshold: f64) -> bool {
    x < threshold
}

/// A threshold strictly above `previous` and at most `current`, where `previous < current`
/// or `current` is NaN.
fn threshold_between(previous: f64, current: f64) -> f64 {
    if current.is_nan() {
        return f64::INFINITY;
    }
    let mid = previous / 2.0 + current / 2.0;
    if mid > previous { mid } else { current }
}

/// Smallest reduction, relative to the node's impurity, that counts as an improvement.
const MIN_RELATIVE_REDUCTION: f64 = 1e-12;

/// Whether a split with children impurity `metric` genuinely improves on `initial_metric`.
///
/// Child metrics are built by repeated subtraction, so a split that reduces nothing can come out
/// a few ulps below the parent.
fn improves(initial_metric: f64, metric: f64) -> bool {
    initial_metric - metric > MIN_RELATIVE_REDUCTION * initial_metric.max(1.0)
}

/// Whether `current` starts a new run of equal values after `previous`.
fn starts_run(previous: Option<f64>, current: f64) -> bool {
    match previous {
        None => true,
        Some(p) if p.is_nan() && current.is_nan() => false,
        Some(p) => p != current,
    }
}

/// Sweep state for finding the best threshold of one node on one numeric feature.
///
/// The accumulator starts with the node's whole target distribution on the right. Rows are
/// then moved to the left in ascending feature order; every time a run of equal feature values
/// has been moved completely, the split between that run and the next is evaluated.
#[derive(Debug, Clone)]
pub struct SplitAccumulator {
    min_leaf_size: usize,
    initial_metric: f64,
    best_metric: f64,
    left: Criterion,
    right: Criterion,
    previous: Option<f64>,
    best: Option<SplitInfo>,
}

impl SplitAccumulator {
    /// Seeds the sweep with the full target distribution of the node.
    pub fn new(factory: &CriterionFactory, node_total: &Criterion, min_leaf_size: usize) -> Self {
        let initial_metric = node_total.metric();
        Self {
            min_leaf_size,
            initial_metric,
            best_metric: initial_metric,
            left: factory.new_criterion(),
            right: node_total.clone(),
            previous: None,
            best: None,
        }
    }

    /// Moves one unit of target mass from the right side to the left side.
    ///
    /// Calls must arrive in non-decreasing feature order (NaN last).
    pub fn move_row(&mut self, feature_value: f64, target_value: f64) {
        if starts_run(self.previous, feature_value) {
            if let Some(previous) = self.previous {
                self.evaluate(threshold_between(previous, feature_value));
            }
            self.previous = Some(feature_value);
        }

        self.right.subtract(target_value);
        self.left.add(target_value);
    }

    fn evaluate(&mut self, threshold: f64) {
        let left_count = self.left.count();
        let right_count = self.right.count();
        if left_count < self.min_leaf_size || right_count < self.min_leaf_size {
            return;
        }

        let metric = self.left.metric() + self.right.metric();
        if metric < self.best_metric && improves(self.initial_metric, metric) {
            self.best_metric = metric;
            self.best = Some(SplitInfo {
                threshold,
                metric,
                reduction: self.initial_metric - metric,
                left: NodeSummary::from_criterion(&self.left),
                right: NodeSummary::from_criterion(&self.right),
            });
        }
    }

    /// Best split found by the sweep, if any improved on not splitting.
    ///
    /// # Panics
    ///
    /// Panics if called before every row of the node has been moved.
    pub fn best_split(self) -> Option<SplitInfo> {
        assert!(
            self.right.count() == 0,
            "best_split() called prematurely: {} target values were never moved",
            self.right.count()
        );
        self.best
    }
}

/// Shared inputs of a split search over the open nodes of one growth generation.
///
/// # Fields
///
/// - `target` - Target column
/// - `factory` - Creates empty criteria of the task's kind
/// - `membership` - Open node index per row, `None` once a row has reached a leaf
/// - `bag` - Sampling weight per row
/// - `min_leaf_size` - Minimum (weighted) size of either child
#[derive(Clone, Copy)]
pub struct SplitSearch<'a> {
    pub target: &'a dyn Feature,
    pub factory: &'a CriterionFactory,
    pub membership: &'a [Option<usize>],
    pub bag: &'a Bag,
    pub min_leaf_size: usize,
}

impl<'a> SplitSearch<'a> {
    /// Finds the best split of every open node on `feature`.
    ///
    /// `node_totals[k]` must hold the full in-bag target distribution of open node `k`.
    ///
    /// # Returns
    ///
    /// * `Vec<Option<SplitInfo>>` - One entry per open node; `None` when no threshold reduces
    ///   the node's impurity while keeping both children at `min_leaf_size` or larger
    pub fn optimal_splits(
        &self,
        feature: &dyn OrderedFeature,
        node_totals: &[Criterion],
    ) -> Vec<Option<SplitInfo>> {
        match feature.categories() {
            Some(n_categories) => self.categorical_splits(feature, n_categories, node_totals),
            None => self.numeric_splits(feature, node_totals),
        }
    }

    /// Sweeps the rows of each node in feature order.
    fn numeric_splits(
        &self,
        feature: &dyn OrderedFeature,
        node_totals: &[Criterion],
    ) -> Vec<Option<SplitInfo>> {
        let mut accumulators: Vec<SplitAccumulator> = node_totals
            .iter()
            .map(|total| SplitAccumulator::new(self.factory, total, self.min_leaf_size))
            .collect();

        for rank in 0..feature.len() {
            let row = feature.in_order(rank);
            if let Some(node) = self.membership[row] {
                let weight = self.bag.count(row);
                if weight == 0 {
                    continue;
                }
                let x = feature.numeric_value(row);
                let y = self.target.numeric_value(row);
                for _ in 0..weight {
                    accumulators[node].move_row(x, y);
                }
            }
        }

        accumulators
            .into_iter()
            .map(SplitAccumulator::best_split)
            .collect()
    }

    /// Scans category codes in ascending order, moving whole categories from right to left.
    fn categorical_splits(
        &self,
        feature: &dyn OrderedFeature,
        n_categories: usize,
        node_totals: &[Criterion],
    ) -> Vec<Option<SplitInfo>> {
        let mut by_category: Vec<Vec<Criterion>> = node_totals
            .iter()
            .map(|_| vec![self.factory.new_criterion(); n_categories])
            .collect();

        for row in 0..feature.len() {
            if let Some(node) = self.membership[row] {
                let weight = self.bag.count(row);
                if weight == 0 {
                    continue;
                }
                let code = feature.numeric_value(row) as usize;
                let y = self.target.numeric_value(row);
                for _ in 0..weight {
                    by_category[node][code].add(y);
                }
            }
        }

        by_category
            .iter()
            .zip(node_totals.iter())
            .map(|(categories, total)| {
                let initial_metric = total.metric();
                let mut best_metric = initial_metric;
                let mut best = None;

                let mut left = self.factory.new_criterion();
                let mut right = total.clone();
                for (code, category) in categories.iter().enumerate() {
                    if category.count() == 0 {
                        continue;
                    }
                    left.merge(category);
                    right.unmerge(category);
                    if right.count() == 0 {
                        break;
                    }
                    if left.count() < self.min_leaf_size || right.count() < self.min_leaf_size {
                        continue;
                    }

                    let metric = left.metric() + right.metric();
                    if metric < best_metric && improves(initial_metric, metric) {
                        best_metric = metric;
                        best = Some(SplitInfo {
                            threshold: code as f64 + 0.5,
                            metric,
                            reduction: initial_metric - metric,
                            left: NodeSummary::from_criterion(&left),
                            right: NodeSummary::from_criterion(&right),
                        });
                    }
                }
                best
            })
            .collect()
    }
}
