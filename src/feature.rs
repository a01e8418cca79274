use ahash::AHashMap;
use ndarray::{ArrayView2, Axis};
use std::cmp::Ordering;
use std::hash::Hash;

/// A value as it was originally supplied to a feature column.
///
/// # Variants
///
/// - `Number` - A raw floating-point value of a numeric column (NaN for absent or unparseable input)
/// - `Category` - A raw value of a categorical column
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

/// A named column of values, one per row.
///
/// Every value can be presented as an `f64` through [`numeric_value`](Feature::numeric_value).
/// For categorical columns that number is the integer code assigned by the column's codec, and
/// `decode(numeric_value(i)) == Some(value(i))` holds for every row.
pub trait Feature {
    /// Name of the column.
    fn name(&self) -> &str;

    /// Number of rows.
    fn len(&self) -> usize;

    /// Returns `true` when the column has no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The value of `row` as a float-comparable number.
    fn numeric_value(&self, row: usize) -> f64;

    /// The value of `row` in its original type.
    fn value(&self, row: usize) -> FeatureValue;

    /// Maps a number produced by `numeric_value` back to the original value.
    fn decode(&self, x: f64) -> Option<FeatureValue>;

    /// Number of distinct categories for categorical columns, `None` for numeric ones.
    fn categories(&self) -> Option<usize> {
        None
    }
}

/// A feature that can be traversed in value order.
///
/// After [`prepare`](OrderedFeature::prepare), visiting `in_order(0..len)` yields rows in
/// non-decreasing value order, and equal values are always adjacent. Preparing only changes
/// the traversal order, never the values themselves.
pub trait OrderedFeature: Feature {
    /// Computes the value-sorted traversal order.
    fn prepare(&mut self);

    /// Row at position `rank` of the sorted traversal.
    fn in_order(&self, rank: usize) -> usize;

    /// Views this column as a plain [`Feature`].
    fn as_feature(&self) -> &dyn Feature;
}

/// Borrows every column of an ordered feature set as a plain [`Feature`].
pub fn as_features(features: &[Box<dyn OrderedFeature>]) -> Vec<&dyn Feature> {
    features.iter().map(|f| f.as_feature()).collect()
}

/// Builds one [`NumericFeature`] per column of `x`, named `feature_<j>`.
///
/// # Example
/// ```rust
/// use ndarray::array;
/// use rustyforest::feature::{features_from_matrix, Feature};
///
/// let x = array![[1.0, 10.0], [2.0, 20.0]];
/// let features = features_from_matrix(x.view());
/// assert_eq!(features.len(), 2);
/// assert_eq!(features[1].numeric_value(0), 10.0);
/// ```
pub fn features_from_matrix(x: ArrayView2<f64>) -> Vec<Box<dyn OrderedFeature>> {
    x.axis_iter(Axis(1))
        .enumerate()
        .map(|(j, column)| {
            Box::new(NumericFeature::new(
                format!("feature_{}", j),
                column.iter().copied().collect(),
            )) as Box<dyn OrderedFeature>
        })
        .collect()
}

/// Orders floats ascending with NaN after every number.
fn compare_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Categorical value codec
pub mod codec;
/// Categorical feature column
pub mod categorical;
/// Numeric feature column
pub mod numeric;

pub use categorical::*;
pub use codec::*;
pub use numeric::*;
