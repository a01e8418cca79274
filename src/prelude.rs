pub use crate::error::ModelError;
pub use crate::feature::{
    CategoricalFeature, Codec, Feature, FeatureValue, NumericFeature, OrderedFeature, as_features,
    features_from_matrix,
};
#[cfg(feature = "math")]
pub use crate::math::MeanVarianceAccumulator;
#[cfg(feature = "machine_learning")]
pub use crate::machine_learning::{
    Bag, Criterion, CriterionFactory, DecisionTree, DecisionTreeParams, Impurity, Node, NodeType,
    RandomForest,
};
