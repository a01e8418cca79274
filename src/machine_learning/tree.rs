use super::*;

/// Type of a node in a fitted decision tree.
///
/// # Variants
///
/// - `Leaf` - A terminal node; its prediction is the node's own
/// - `Internal` - A decision node that owns its two children
///   - `feature_index`: Index of the feature used for splitting
///   - `threshold`: Rows with feature value `< threshold` go left, all others go right
///   - `reduction`: Impurity reduction achieved by the split
///   - `left`, `right`: The children
#[derive(Debug, Clone)]
pub enum NodeType {
    Leaf,
    Internal {
        feature_index: usize,
        threshold: f64,
        reduction: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// A node of a fitted decision tree.
///
/// # Fields
///
/// - `size` - Number of in-bag training rows (counted with their bag weight) that reached the node
/// - `prediction` - Point estimate of the node
/// - `metric` - Additive impurity of the node's training targets
/// - `node_type` - Leaf or internal node with its split and children
#[derive(Debug, Clone)]
pub struct Node {
    pub size: usize,
    pub prediction: f64,
    pub metric: f64,
    pub node_type: NodeType,
}

impl Node {
    /// Creates a leaf from a node summary.
    pub fn new_leaf(summary: NodeSummary) -> Self {
        Self {
            size: summary.size,
            prediction: summary.prediction,
            metric: summary.metric,
            node_type: NodeType::Leaf,
        }
    }

    /// Creates an internal node owning `left` and `right`.
    pub fn new_internal(
        summary: NodeSummary,
        feature_index: usize,
        threshold: f64,
        reduction: f64,
        left: Node,
        right: Node,
    ) -> Self {
        Self {
            size: summary.size,
            prediction: summary.prediction,
            metric: summary.metric,
            node_type: NodeType::Internal {
                feature_index,
                threshold,
                reduction,
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    /// Returns `true` for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self.node_type, NodeType::Leaf)
    }

    /// Leaf reached by `row` of `features`.
    pub fn leaf_for_row(&self, features: &[&dyn Feature], row: usize) -> &Node {
        let mut node = self;
        while let NodeType::Internal {
            feature_index,
            threshold,
            left,
            right,
            ..
        } = &node.node_type
        {
            node = if goes_left(features[*feature_index].numeric_value(row), *threshold) {
                left
            } else {
                right
            };
        }
        node
    }

    /// Prediction for `row` of `features`.
    pub fn predict_row(&self, features: &[&dyn Feature], row: usize) -> f64 {
        self.leaf_for_row(features, row).prediction
    }

    /// Predictions for every row of `features`.
    ///
    /// `features` must hold at least every feature index the tree splits on, all of the same
    /// length.
    pub fn predict(&self, features: &[&dyn Feature]) -> Vec<f64> {
        let n_rows = features.first().map_or(0, |f| f.len());
        (0..n_rows).map(|row| self.predict_row(features, row)).collect()
    }

    /// Adds the reduction of every internal node to `importances[feature_index]`.
    pub fn importances(&self, importances: &mut [f64]) {
        for node in self.nodes() {
            if let NodeType::Internal {
                feature_index,
                reduction,
                ..
            } = &node.node_type
            {
                importances[*feature_index] += reduction;
            }
        }
    }

    /// Sum of the reductions of every internal node.
    pub fn total_reduction(&self) -> f64 {
        self.nodes()
            .iter()
            .map(|node| match &node.node_type {
                NodeType::Internal { reduction, .. } => *reduction,
                NodeType::Leaf => 0.0,
            })
            .sum()
    }

    /// Number of leaves under (and including) this node.
    pub fn n_leaves(&self) -> usize {
        self.nodes().iter().filter(|node| node.is_leaf()).count()
    }

    /// Length of the longest root-to-leaf path, 0 for a single leaf.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let NodeType::Internal { left, right, .. } = &node.node_type {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
        max_depth
    }

    /// Every node of the subtree in pre-order.
    fn nodes(&self) -> Vec<&Node> {
        let mut nodes = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            nodes.push(node);
            if let NodeType::Internal { left, right, .. } = &node.node_type {
                stack.push(right);
                stack.push(left);
            }
        }
        nodes
    }

    /// Human-readable rendering of the subtree, one node per line.
    pub fn generate_structure(&self) -> String {
        let mut output = String::new();
        self.print_node(&mut output, "", "Root", true);
        output
    }

    fn print_node(&self, output: &mut String, prefix: &str, label: &str, is_last: bool) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!(
            "{}{}{}: prediction={:.4} metric={:.4} size={}",
            prefix, connector, label, self.prediction, self.metric, self.size
        ));

        match &self.node_type {
            NodeType::Leaf => output.push_str(" (leaf)\n"),
            NodeType::Internal {
                feature_index,
                threshold,
                reduction,
                left,
                right,
            } => {
                output.push_str(&format!(" reduction={:.4}\n", reduction));

                let new_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
                left.print_node(
                    output,
                    &new_prefix,
                    &format!("L feature[{}] < {}", feature_index, threshold),
                    false,
                );
                right.print_node(
                    output,
                    &new_prefix,
                    &format!("R feature[{}] >= {}", feature_index, threshold),
                    true,
                );
            }
        }
    }
}
