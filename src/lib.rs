//! Decision tree induction and random forest ensembles.
//!
//! Trees are grown breadth first over value-sorted feature columns, choosing at every node the
//! threshold that most reduces an additive impurity: sum of squared error for regression, or
//! count-weighted Gini impurity or entropy for classification. A [`machine_learning::RandomForest`]
//! grows many such trees on bootstrap resamples, returns an out-of-bag estimate for every
//! training row, and averages predictions and impurity-reduction importances over its trees.
//!
//! # Example
//! ```rust
//! use rustyforest::prelude::*;
//! use ndarray::array;
//!
//! let x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [7.0]];
//! let y = array![3.0, 0.0, 3.0, 1.0, 7.0, 6.0, 5.0, -1.0];
//!
//! let mut tree = DecisionTree::new(None, Some(1)).unwrap();
//! tree.fit_matrix(x.view(), y.view(), &CriterionFactory::Mse).unwrap();
//! assert_eq!(tree.predict_matrix(x.view()).unwrap(), y);
//! ```

/// A macro that generates a getter method for any field.
///
/// This macro creates a public getter method that returns the value or reference
/// of the specified field. The generated method includes appropriate documentation
/// describing the field being accessed.
///
/// # Parameters
///
/// - `$method_name` - The name of the getter method (e.g., get_n_trees)
/// - `$field_name` - The name of the field to access (e.g., n_trees)
/// - `$return_type` - The return type of the getter method
///
/// # Generated Method
///
/// The macro generates a method that returns the field value,
/// with documentation that describes what field is being accessed.
#[cfg(feature = "machine_learning")]
macro_rules! get_field {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name
        }
    };
}

/// A macro that generates a public getter method returning a reference to a field.
///
/// This macro creates a method that provides immutable reference access to a private field
/// in a struct, following the Rust convention of getter methods.
///
/// # Parameters
///
/// - `$method_name` - The identifier for the generated getter method name
/// - `$field_name` - The identifier of the struct field to access
/// - `$return_type` - The type expression for the return value (typically `Option<&Type>`)
///
/// # Generated Method
///
/// The macro generates a method that returns the field value as a reference,
/// with documentation that describes what field is being accessed
#[cfg(feature = "machine_learning")]
macro_rules! get_field_as_ref {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field as a reference")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name.as_ref()
        }
    };
}

/// Error type shared by every fallible operation of the crate.
pub mod error;

pub use error::ModelError;

/// Module `feature` defines the column types trees are grown on.
///
/// # Core Types
///
/// - `Feature` - A named column whose values can be read as `f64`
/// - `OrderedFeature` - A feature that can be traversed in value order after `prepare()`
/// - `NumericFeature` - Floating-point values; absent or unparseable entries are NaN and sort last
/// - `CategoricalFeature` - Values interned to dense integer codes by a `Codec`
///
/// # Example
/// ```rust
/// use rustyforest::feature::{CategoricalFeature, Feature, FeatureValue, OrderedFeature};
///
/// let mut colour = CategoricalFeature::from_values("colour", ["red", "blue", "red"]);
/// assert_eq!(colour.categories(), Some(2));
/// assert_eq!(colour.value(2), FeatureValue::Category("red".to_string()));
///
/// colour.prepare();
/// assert_eq!(colour.numeric_value(colour.in_order(0)), 0.0);
/// ```
pub mod feature;

/// Module `math` contains the online statistics the splitting criteria are built on.
///
/// # Core Items
///
/// - `MeanVarianceAccumulator` - Welford-style running mean and sum of squared error with exact
///   inverse updates and pairwise merging
/// - `gini_weight` - Per-category impurity weight `1 - p`
/// - `entropy_weight` - Per-category impurity weight `-log2(p)`
///
/// # Example
/// ```rust
/// use rustyforest::math::MeanVarianceAccumulator;
///
/// let mut acc = MeanVarianceAccumulator::new();
/// for x in [1.0, 2.0, 3.0] {
///     acc.add(x);
/// }
/// assert_eq!(acc.mean(), 2.0);
/// assert_eq!(acc.sum_squared_error(), 2.0);
/// ```
#[cfg(feature = "math")]
pub mod math;

/// Module `machine_learning` provides decision trees and random forests.
///
/// # Estimators
///
/// - **DecisionTree**: A single fully grown tree on every training row
/// - **RandomForest**: Bagging ensemble with out-of-bag estimation and importance averaging
///
/// # Building Blocks
///
/// - `Criterion` / `CriterionFactory` - Regression (sum of squared error) and classification
///   (Gini or entropy) splitting criteria
/// - `Bag` - Bootstrap or full row weights for one tree
/// - `SplitSearch` - Best threshold per open node on one feature
/// - `TreeGrower` - Breadth-first growth loop
/// - `Node` - Fitted tree nodes
///
/// # Examples
/// ```rust
/// use rustyforest::machine_learning::*;
/// use ndarray::array;
///
/// let x = array![[1.0, 5.0], [2.0, 4.0], [8.0, 5.0], [9.0, 4.0]];
/// let y = array![0.0, 0.0, 1.0, 1.0];
///
/// let mut forest = RandomForest::new(10, None, true, Some(7)).unwrap();
/// let oob = forest.fit_matrix(x.view(), y.view(), &CriterionFactory::gini(2)).unwrap();
/// assert_eq!(oob.len(), 4);
/// assert_eq!(forest.importances().unwrap().len(), 2);
/// ```
#[cfg(feature = "machine_learning")]
pub mod machine_learning;

/// A convenience module that re-exports the most commonly used types and traits from this crate.
///
/// # Examples
/// ```rust
/// use rustyforest::prelude::*;
///
/// let forest = RandomForest::default();
/// assert_eq!(forest.get_n_trees(), 100);
/// ```
pub mod prelude;
