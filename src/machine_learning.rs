use crate::error::ModelError;
use crate::feature::{Feature, NumericFeature, OrderedFeature, as_features, features_from_matrix};
use crate::math::{MeanVarianceAccumulator, entropy_weight, gini_weight};
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::prelude::*;
use rand::rng;

/// Bootstrap and full row-weight bags
pub mod bag;
/// Splitting criteria and their factory
pub mod criterion;
/// Single decision tree estimator
pub mod decision_tree;
/// Breadth-first tree growth
pub mod grower;
/// Input and parameter validation shared by the estimators
mod helper_functions;
/// Bagging ensemble of decision trees
pub mod random_forest;
/// Optimal split search over ordered features
pub mod split;
/// Fitted tree nodes
pub mod tree;

pub use bag::*;
pub use criterion::*;
pub use decision_tree::*;
pub use grower::*;
pub use random_forest::*;
pub use split::*;
pub use tree::*;
