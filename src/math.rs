/// Online accumulator for the mean and the sum of squared error of a series.
///
/// Values are folded in one at a time with a Welford-style recurrence. The squared error is
/// guaranteed to stay non-negative when values are only added; `subtract` is the algebraic
/// inverse of `add` and accrues ordinary floating-point roundoff, so an estimate that must be
/// exact should be rebuilt from `add` calls alone.
///
/// # Example
/// ```rust
/// use rustyforest::math::MeanVarianceAccumulator;
///
/// let mut acc = MeanVarianceAccumulator::new();
/// for x in [1.0, 2.0, 3.0] {
///     acc.add(x);
/// }
/// assert_eq!(acc.count(), 3);
/// assert!((acc.mean() - 2.0).abs() < 1e-12);
/// assert!((acc.sum_squared_error() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeanVarianceAccumulator {
    mean: f64,
    sum_squared_error: f64,
    count: usize,
}

impl MeanVarianceAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `x` to the series.
    pub fn add(&mut self, x: f64) {
        let n = self.count as f64;
        let e = x - self.mean;
        self.mean += e / (n + 1.0);
        // pre-update error
        self.sum_squared_error += e * e * n / (n + 1.0);
        self.count += 1;
    }

    /// Removes `x`, which must previously have been added.
    ///
    /// # Panics
    ///
    /// Panics if the accumulator is empty.
    pub fn subtract(&mut self, x: f64) {
        assert!(
            self.count > 0,
            "subtract() called on an empty accumulator (more subtract() than add() calls)"
        );

        if self.count == 1 {
            self.reset();
            return;
        }

        self.count -= 1;
        let n = self.count as f64;
        let e = x - self.mean;
        self.mean -= e / n;

        let e = x - self.mean;
        self.sum_squared_error = (self.sum_squared_error - e * e * n / (n + 1.0)).max(0.0);
    }

    /// Folds every value summarized by `other` into this accumulator.
    pub fn merge(&mut self, other: &MeanVarianceAccumulator) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }

        let na = self.count as f64;
        let nb = other.count as f64;
        let n = na + nb;
        let delta = other.mean - self.mean;

        self.mean += delta * nb / n;
        self.sum_squared_error += other.sum_squared_error + delta * delta * na * nb / n;
        self.count += other.count;
    }

    /// Removes every value summarized by `other`, the inverse of [`merge`](Self::merge).
    ///
    /// # Panics
    ///
    /// Panics if `other` holds more values than this accumulator.
    pub fn unmerge(&mut self, other: &MeanVarianceAccumulator) {
        assert!(
            other.count <= self.count,
            "unmerge() of {} values from an accumulator holding {}",
            other.count,
            self.count
        );

        if other.count == 0 {
            return;
        }
        if other.count == self.count {
            self.reset();
            return;
        }

        let n = self.count as f64;
        let nb = other.count as f64;
        let na = n - nb;
        let mean_a = (n * self.mean - nb * other.mean) / na;
        let delta = other.mean - mean_a;

        self.sum_squared_error = (self.sum_squared_error
            - other.sum_squared_error
            - delta * delta * na * nb / n)
            .max(0.0);
        self.mean = mean_a;
        self.count -= other.count;
    }

    /// Returns the accumulator to its empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Number of values currently in the series.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean of the series, or NaN when it is empty.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    /// Sum of squared deviations from the mean.
    pub fn sum_squared_error(&self) -> f64 {
        self.sum_squared_error
    }

    /// Population variance of the series (0.0 when empty).
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum_squared_error / self.count as f64
        }
    }
}

/// Per-class Gini weight `1 - p`.
///
/// Summing `count_c * gini_weight(p_c)` over classes gives the count-weighted Gini impurity.
#[inline]
pub fn gini_weight(p: f64) -> f64 {
    1.0 - p
}

/// Per-class entropy weight `-log2(p)`.
///
/// Summing `count_c * entropy_weight(p_c)` over classes gives the count-weighted entropy.
#[inline]
pub fn entropy_weight(p: f64) -> f64 {
    -p.log2()
}
