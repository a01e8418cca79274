use super::*;

/// A numeric feature column.
///
/// Absent or unparseable values are stored as NaN and sort after every number.
///
/// # Fields
///
/// - `name` - Column name
/// - `values` - Raw values in insertion order
/// - `order` - Row permutation visiting values in sorted order once prepared
///
/// # Example
/// ```rust
/// use rustyforest::feature::{Feature, NumericFeature, OrderedFeature};
///
/// let mut feature = NumericFeature::from_strings("x", &["3.5", "n/a", "1.0"]);
/// assert!(feature.numeric_value(1).is_nan());
///
/// feature.prepare();
/// assert_eq!(feature.in_order(0), 2);
/// assert_eq!(feature.in_order(2), 1);
/// ```
#[derive(Debug, Clone)]
pub struct NumericFeature {
    name: String,
    values: Vec<f64>,
    order: Vec<usize>,
}

impl NumericFeature {
    /// Creates a column from raw values.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        let order = (0..values.len()).collect();
        Self {
            name: name.into(),
            values,
            order,
        }
    }

    /// Creates a column by parsing text, mapping anything unparseable to NaN.
    pub fn from_strings(name: impl Into<String>, values: &[&str]) -> Self {
        let mut feature = Self::new(name, Vec::with_capacity(values.len()));
        for s in values {
            feature.push_str(s);
        }
        feature
    }

    /// Appends a value.
    pub fn push(&mut self, x: f64) {
        self.order.push(self.values.len());
        self.values.push(x);
    }

    /// Parses and appends a value; unparseable text becomes NaN.
    pub fn push_str(&mut self, s: &str) {
        self.push(s.trim().parse::<f64>().unwrap_or(f64::NAN));
    }

    /// Raw values in insertion order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl Feature for NumericFeature {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn numeric_value(&self, row: usize) -> f64 {
        self.values[row]
    }

    fn value(&self, row: usize) -> FeatureValue {
        FeatureValue::Number(self.values[row])
    }

    fn decode(&self, x: f64) -> Option<FeatureValue> {
        Some(FeatureValue::Number(x))
    }
}

impl OrderedFeature for NumericFeature {
    fn prepare(&mut self) {
        let values = &self.values;
        self.order.sort_by(|&a, &b| compare_nan_last(values[a], values[b]));
    }

    fn in_order(&self, rank: usize) -> usize {
        self.order[rank]
    }

    fn as_feature(&self) -> &dyn Feature {
        self
    }
}
