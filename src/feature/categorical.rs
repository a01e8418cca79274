use super::*;

/// A categorical feature column.
///
/// Each distinct value is interned by an owned [`Codec`] and stored as its code, so
/// `numeric_value` reports the code and `value` reports the original text. Codes are assigned
/// in first-seen order; [`order_encoding`](CategoricalFeature::order_encoding) renumbers them
/// to follow the sorted order of the values.
///
/// # Example
/// ```rust
/// use rustyforest::feature::{CategoricalFeature, Feature, FeatureValue};
///
/// let feature = CategoricalFeature::from_values("color", ["red", "blue", "red"]);
/// assert_eq!(feature.categories(), Some(2));
/// assert_eq!(feature.numeric_value(2), 0.0);
/// assert_eq!(feature.value(1), FeatureValue::Category("blue".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct CategoricalFeature {
    name: String,
    codec: Codec<String>,
    values: Vec<usize>,
    order: Vec<usize>,
}

impl CategoricalFeature {
    /// Creates an empty column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            codec: Codec::new(),
            values: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Creates a column from any displayable values.
    pub fn from_values<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let mut feature = Self::new(name);
        for v in values {
            feature.push(v);
        }
        feature
    }

    /// Interns and appends a value.
    pub fn push<S: ToString>(&mut self, value: S) {
        let (code, _) = self.codec.encode(value.to_string());
        self.order.push(self.values.len());
        self.values.push(code);
    }

    /// Category codes in insertion order.
    pub fn codes(&self) -> &[usize] {
        &self.values
    }

    /// The codec mapping values to codes.
    pub fn codec(&self) -> &Codec<String> {
        &self.codec
    }

    /// Renumbers codes so that code order equals the lexical order of the values.
    ///
    /// Any previously prepared traversal order is reset, so call
    /// [`prepare`](OrderedFeature::prepare) again before traversing.
    pub fn order_encoding(&mut self) {
        let remap = self.codec.sort_codes();
        for code in self.values.iter_mut() {
            *code = remap[*code];
        }
        self.order = (0..self.values.len()).collect();
    }
}

impl Feature for CategoricalFeature {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn numeric_value(&self, row: usize) -> f64 {
        self.values[row] as f64
    }

    fn value(&self, row: usize) -> FeatureValue {
        // every stored code came from the codec
        FeatureValue::Category(self.codec.decode(self.values[row]).cloned().unwrap_or_default())
    }

    fn decode(&self, x: f64) -> Option<FeatureValue> {
        if x < 0.0 || x.fract() != 0.0 {
            return None;
        }
        self.codec
            .decode(x as usize)
            .map(|v| FeatureValue::Category(v.clone()))
    }

    fn categories(&self) -> Option<usize> {
        Some(self.codec.len())
    }
}

impl OrderedFeature for CategoricalFeature {
    fn prepare(&mut self) {
        let values = &self.values;
        self.order.sort_by_key(|&row| values[row]);
    }

    fn in_order(&self, rank: usize) -> usize {
        self.order[rank]
    }

    fn as_feature(&self) -> &dyn Feature {
        self
    }
}
