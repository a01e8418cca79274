use super::*;

/// Injective mapping between values and dense non-negative integer codes.
///
/// Codes are handed out in first-seen order starting at 0, and
/// `decode(encode(v).0) == Some(&v)` for every value ever encoded.
///
/// # Example
/// ```rust
/// use rustyforest::feature::Codec;
///
/// let mut codec = Codec::new();
/// assert_eq!(codec.encode("red".to_string()), (0, false));
/// assert_eq!(codec.encode("blue".to_string()), (1, false));
/// assert_eq!(codec.encode("red".to_string()), (0, true));
/// assert_eq!(codec.decode(1).map(String::as_str), Some("blue"));
/// ```
#[derive(Debug, Clone)]
pub struct Codec<T> {
    mapper: AHashMap<T, usize>,
    unmapper: Vec<T>,
}

impl<T> Default for Codec<T>
where
    T: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self {
            mapper: AHashMap::new(),
            unmapper: Vec::new(),
        }
    }
}

impl<T> Codec<T>
where
    T: Clone + Eq + Hash,
{
    /// Creates an empty codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code for `value`, assigning the next free code if it is new.
    ///
    /// # Returns
    ///
    /// * `(usize, bool)` - The code and whether the value was already known
    pub fn encode(&mut self, value: T) -> (usize, bool) {
        if let Some(&code) = self.mapper.get(&value) {
            return (code, true);
        }

        let code = self.unmapper.len();
        self.mapper.insert(value.clone(), code);
        self.unmapper.push(value);
        (code, false)
    }

    /// Looks up the code of a known value without assigning one.
    pub fn code_of(&self, value: &T) -> Option<usize> {
        self.mapper.get(value).copied()
    }

    /// Returns the value that maps to `code`.
    pub fn decode(&self, code: usize) -> Option<&T> {
        self.unmapper.get(code)
    }

    /// Number of distinct values encoded so far.
    pub fn len(&self) -> usize {
        self.unmapper.len()
    }

    /// Returns `true` when nothing has been encoded.
    pub fn is_empty(&self) -> bool {
        self.unmapper.is_empty()
    }

    /// Re-numbers codes so that code order matches the sorted order of the values.
    ///
    /// # Returns
    ///
    /// * `Vec<usize>` - `remap[old_code] == new_code` for every code
    pub fn sort_codes(&mut self) -> Vec<usize>
    where
        T: Ord,
    {
        let mut by_value: Vec<usize> = (0..self.unmapper.len()).collect();
        by_value.sort_by(|&a, &b| self.unmapper[a].cmp(&self.unmapper[b]));

        let mut remap = vec![0; by_value.len()];
        for (new_code, &old_code) in by_value.iter().enumerate() {
            remap[old_code] = new_code;
        }

        let sorted: Vec<T> = by_value
            .iter()
            .map(|&old_code| self.unmapper[old_code].clone())
            .collect();
        for (code, value) in sorted.iter().enumerate() {
            self.mapper.insert(value.clone(), code);
        }
        self.unmapper = sorted;

        remap
    }
}
