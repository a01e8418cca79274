use super::*;

/// Per-row sampling weights for growing one tree.
///
/// A row's weight is the number of times it occurs in the tree's training sample; rows with
/// weight 0 are out-of-bag for that tree. Weights always sum to the number of rows.
///
/// # Variants
///
/// - `Bootstrap` - Weights drawn by sampling `len` rows uniformly with replacement
/// - `Full` - Every row has weight 1 (no out-of-bag rows)
///
/// # Example
/// ```rust
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use rustyforest::machine_learning::Bag;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let bag = Bag::bootstrap(10, &mut rng);
/// let total: usize = (0..bag.len()).map(|i| bag.count(i)).sum();
/// assert_eq!(total, 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Bag {
    Bootstrap(Vec<usize>),
    Full(usize),
}

impl Bag {
    /// Draws a fresh bootstrap bag over `len` rows.
    pub fn bootstrap(len: usize, rng: &mut StdRng) -> Self {
        let mut bag = Bag::Bootstrap(vec![0; len]);
        bag.resample(rng);
        bag
    }

    /// A bag holding every row exactly once.
    pub fn full(len: usize) -> Self {
        Bag::Full(len)
    }

    /// Number of rows covered by the bag.
    pub fn len(&self) -> usize {
        match self {
            Bag::Bootstrap(counts) => counts.len(),
            Bag::Full(len) => *len,
        }
    }

    /// Returns `true` when the bag covers no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weight of `row` in the bag.
    pub fn count(&self, row: usize) -> usize {
        match self {
            Bag::Bootstrap(counts) => counts[row],
            Bag::Full(_) => 1,
        }
    }

    /// Redraws the weights of a bootstrap bag; a full bag is left unchanged.
    pub fn resample(&mut self, rng: &mut StdRng) {
        if let Bag::Bootstrap(counts) = self {
            counts.iter_mut().for_each(|c| *c = 0);
            let n = counts.len();
            for _ in 0..n {
                counts[rng.random_range(0..n)] += 1;
            }
        }
    }

    /// Number of rows with non-zero weight.
    pub fn in_bag_rows(&self) -> usize {
        (0..self.len()).filter(|&row| self.count(row) > 0).count()
    }

    /// Number of rows with zero weight.
    pub fn out_of_bag_rows(&self) -> usize {
        self.len() - self.in_bag_rows()
    }
}
