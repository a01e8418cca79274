use super::*;

/// Hyperparameters controlling decision tree growth.
///
/// Trees are grown until no open node can be split: there is no depth limit, and a node
/// becomes a leaf once no sampled feature offers a split that reduces its impurity while
/// leaving at least `min_leaf_size` rows on each side.
///
/// # Fields
///
/// - `max_features` - Number of features sampled (without replacement) at each growth generation. `None` uses all features.
/// - `min_leaf_size` - Minimum number of in-bag rows, counted with their bag weight, in each child of a split. Must be at least 1.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTreeParams {
    pub max_features: Option<usize>,
    pub min_leaf_size: usize,
}

/// Default hyperparameters: every feature is considered and leaves may hold a single row.
impl Default for DecisionTreeParams {
    fn default() -> Self {
        Self {
            max_features: None,
            min_leaf_size: 1,
        }
    }
}

/// A split committed on a growing node, pointing at its children in the arena.
#[derive(Debug, Clone, Copy)]
struct CommittedSplit {
    feature_index: usize,
    threshold: f64,
    reduction: f64,
    left: usize,
    right: usize,
}

/// A node of the growth arena; converted into an owned [`Node`] once growth completes.
#[derive(Debug, Clone)]
struct GrowingNode {
    summary: NodeSummary,
    split: Option<CommittedSplit>,
}

/// An open node of the current generation and its block of the row arena.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    arena_index: usize,
    start: usize,
    end: usize,
}

/// Grows one decision tree breadth first.
///
/// Each generation runs three steps over the open nodes:
/// 1. the full in-bag target distribution of every open node is rebuilt from scratch,
/// 2. a random subset of features is searched for the best split of every open node,
/// 3. nodes with a split get two children (which form the next generation) and their rows are
///    partitioned between them; nodes without one become leaves, and their out-of-bag rows
///    receive the leaf's prediction.
///
/// Growth ends when a generation has no open nodes left.
#[derive(Debug, Clone)]
pub struct TreeGrower {
    max_features: usize,
    min_leaf_size: usize,
}

impl TreeGrower {
    /// Creates a grower for a data set with `n_features` features.
    ///
    /// `max_features` larger than `n_features` is clamped to `n_features`.
    pub fn new(params: &DecisionTreeParams, n_features: usize) -> Self {
        let max_features = match params.max_features {
            Some(m) if m > n_features => {
                log::warn!(
                    "max_features ({}) exceeds the number of features ({}); using all features",
                    m,
                    n_features
                );
                n_features
            }
            Some(m) => m,
            None => n_features,
        };

        Self {
            max_features,
            min_leaf_size: params.min_leaf_size,
        }
    }

    /// Number of features searched per generation.
    pub fn max_features(&self) -> usize {
        self.max_features
    }

    /// Minimum weighted size of either child of a split.
    pub fn min_leaf_size(&self) -> usize {
        self.min_leaf_size
    }

    /// Grows a tree on the rows weighted by `bag`.
    ///
    /// # Parameters
    ///
    /// - `features` - Prepared (value-sorted) feature columns
    /// - `target` - Target column of the same length
    /// - `factory` - Creates criteria for the learning task
    /// - `bag` - Row weights; rows with weight 0 do not influence the tree
    /// - `oob` - Optional per-row accumulators; each out-of-bag row receives the prediction of the leaf it lands in
    /// - `rng` - Random source for feature sampling
    ///
    /// # Returns
    ///
    /// * `Node` - Root of the fitted tree
    pub fn grow(
        &self,
        features: &[Box<dyn OrderedFeature>],
        target: &dyn Feature,
        factory: &CriterionFactory,
        bag: &Bag,
        mut oob: Option<&mut [Criterion]>,
        rng: &mut StdRng,
    ) -> Node {
        let n_rows = bag.len();

        let mut rows: Vec<usize> = (0..n_rows).collect();
        let mut membership: Vec<Option<usize>> = vec![Some(0); n_rows];
        let mut scratch = Vec::with_capacity(n_rows);

        let mut arena = vec![GrowingNode {
            summary: NodeSummary::from_criterion(&factory.new_criterion()),
            split: None,
        }];
        let mut open = vec![OpenNode {
            arena_index: 0,
            start: 0,
            end: n_rows,
        }];

        let mut generation = 0;
        while !open.is_empty() {
            let totals = self.node_totals(&open, &rows, target, factory, bag);
            for (node, total) in open.iter().zip(totals.iter()) {
                arena[node.arena_index].summary = NodeSummary::from_criterion(total);
            }

            let best = self.best_splits(
                features,
                &totals,
                SplitSearch {
                    target,
                    factory,
                    membership: &membership,
                    bag,
                    min_leaf_size: self.min_leaf_size,
                },
                rng,
            );

            let mut next_open = Vec::with_capacity(2 * open.len());
            for (node, best) in open.iter().zip(best.into_iter()) {
                let block = &mut rows[node.start..node.end];
                match best {
                    Some((feature_index, split)) => {
                        let column = &features[feature_index];
                        let n_left = stable_partition(block, &mut scratch, |row| {
                            split.goes_left(column.numeric_value(row))
                        });

                        let left = arena.len();
                        arena.push(GrowingNode {
                            summary: split.left,
                            split: None,
                        });
                        let right = arena.len();
                        arena.push(GrowingNode {
                            summary: split.right,
                            split: None,
                        });
                        arena[node.arena_index].split = Some(CommittedSplit {
                            feature_index,
                            threshold: split.threshold,
                            reduction: split.reduction,
                            left,
                            right,
                        });

                        let (left_rows, right_rows) = block.split_at(n_left);
                        for &row in left_rows {
                            membership[row] = Some(next_open.len());
                        }
                        for &row in right_rows {
                            membership[row] = Some(next_open.len() + 1);
                        }
                        next_open.push(OpenNode {
                            arena_index: left,
                            start: node.start,
                            end: node.start + n_left,
                        });
                        next_open.push(OpenNode {
                            arena_index: right,
                            start: node.start + n_left,
                            end: node.end,
                        });
                    }
                    None => {
                        let prediction = arena[node.arena_index].summary.prediction;
                        for &row in block.iter() {
                            membership[row] = None;
                            if bag.count(row) == 0 {
                                if let Some(oob) = oob.as_deref_mut() {
                                    oob[row].add(prediction);
                                }
                            }
                        }
                    }
                }
            }

            log::trace!(
                "generation {}: {} open nodes, {} split",
                generation,
                open.len(),
                next_open.len() / 2
            );
            open = next_open;
            generation += 1;
        }

        into_tree(arena)
    }

    /// Builds the in-bag target distribution of every open node.
    fn node_totals(
        &self,
        open: &[OpenNode],
        rows: &[usize],
        target: &dyn Feature,
        factory: &CriterionFactory,
        bag: &Bag,
    ) -> Vec<Criterion> {
        open.iter()
            .map(|node| {
                let mut total = factory.new_criterion();
                for &row in &rows[node.start..node.end] {
                    let y = target.numeric_value(row);
                    for _ in 0..bag.count(row) {
                        total.add(y);
                    }
                }
                total
            })
            .collect()
    }

    /// Searches a random feature subset and keeps the largest reduction per open node.
    ///
    /// Ties keep the feature drawn first.
    fn best_splits(
        &self,
        features: &[Box<dyn OrderedFeature>],
        totals: &[Criterion],
        search: SplitSearch<'_>,
        rng: &mut StdRng,
    ) -> Vec<Option<(usize, SplitInfo)>> {
        let mut best: Vec<Option<(usize, SplitInfo)>> = vec![None; totals.len()];

        for feature_index in sample_features(features.len(), self.max_features, rng) {
            let candidates = search.optimal_splits(features[feature_index].as_ref(), totals);
            for (slot, candidate) in best.iter_mut().zip(candidates.into_iter()) {
                if let Some(split) = candidate {
                    let improves = match slot {
                        Some((_, current)) => split.reduction > current.reduction,
                        None => true,
                    };
                    if improves {
                        *slot = Some((feature_index, split));
                    }
                }
            }
        }

        best
    }
}

/// Draws `k` distinct feature indices out of `n` with a partial Fisher-Yates shuffle.
pub fn sample_features(n: usize, k: usize, rng: &mut StdRng) -> Vec<usize> {
    let k = k.min(n);
    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = rng.random_range(i..n);
        indices.swap(i, j);
    }
    indices.truncate(k);
    indices
}

/// Reorders `block` so rows satisfying `goes_left` come first, preserving relative order on
/// both sides. Returns the number of left rows.
fn stable_partition<F>(block: &mut [usize], scratch: &mut Vec<usize>, mut goes_left: F) -> usize
where
    F: FnMut(usize) -> bool,
{
    scratch.clear();
    let mut n_left = 0;
    for i in 0..block.len() {
        let row = block[i];
        if goes_left(row) {
            block[n_left] = row;
            n_left += 1;
        } else {
            scratch.push(row);
        }
    }
    block[n_left..].copy_from_slice(scratch);
    n_left
}

/// Converts the growth arena into an owned tree rooted at arena index 0.
///
/// Children are always pushed after their parent, so a reverse sweep builds every child
/// before it is needed.
fn into_tree(arena: Vec<GrowingNode>) -> Node {
    let mut built: Vec<Option<Node>> = Vec::with_capacity(arena.len());
    built.resize_with(arena.len(), || None);

    for (index, node) in arena.iter().enumerate().rev() {
        let tree_node = match node.split {
            Some(split) => {
                let left = built[split.left].take();
                let right = built[split.right].take();
                match (left, right) {
                    (Some(left), Some(right)) => Node::new_internal(
                        node.summary,
                        split.feature_index,
                        split.threshold,
                        split.reduction,
                        left,
                        right,
                    ),
                    _ => unreachable!("children are built before their parent"),
                }
            }
            None => Node::new_leaf(node.summary),
        };
        built[index] = Some(tree_node);
    }

    match built.into_iter().next().flatten() {
        Some(root) => root,
        None => unreachable!("the arena always holds the root"),
    }
}
