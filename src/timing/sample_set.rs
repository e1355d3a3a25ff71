//! Ordered storage for the k smallest timings of a session.

/// The k smallest timing values observed so far, sorted ascending.
///
/// Admission follows insertion-sort semantics: while the set is below
/// capacity every value is appended into sorted position; once full, a value
/// is admitted only if it beats the current worst member, which it replaces.
/// As a consequence the worst element is non-increasing over the life of a
/// session.
#[derive(Debug, Clone)]
pub struct SampleSet {
    values: Vec<f64>,
    capacity: usize,
}

impl SampleSet {
    /// Create an empty set holding at most `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "SampleSet capacity must be at least 1");
        Self {
            values: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Offer a value; returns whether it was admitted.
    pub fn insert(&mut self, value: f64) -> bool {
        if self.values.len() < self.capacity {
            self.values.push(value);
        } else if value < self.values[self.capacity - 1] {
            self.values[self.capacity - 1] = value;
        } else {
            return false;
        }

        // Sift the new value left into sorted position.
        let mut pos = self.values.len() - 1;
        while pos > 0 && self.values[pos - 1] > self.values[pos] {
            self.values.swap(pos - 1, pos);
            pos -= 1;
        }
        true
    }

    /// Smallest value seen so far.
    pub fn best(&self) -> Option<f64> {
        self.values.first().copied()
    }

    /// Largest value currently retained.
    pub fn worst(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Relative spread `(worst - best) / best`, or `None` while empty.
    pub fn spread(&self) -> Option<f64> {
        let best = self.best()?;
        let worst = self.worst()?;
        Some((worst - best) / best)
    }

    /// Whether the retained best samples agree within `epsilon`.
    ///
    /// Only meaningful once the set is full: a partially filled set has not
    /// yet seen `capacity` candidates and reports `false`.
    pub fn converged(&self, epsilon: f64) -> bool {
        if !self.is_full() {
            return false;
        }
        let best = self.values[0];
        let worst = self.values[self.capacity - 1];
        worst - best <= epsilon * best
    }

    /// Number of values currently retained.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values have been admitted yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the set has reached capacity.
    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// The retained values, sorted ascending.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Drop all retained values, keeping the capacity.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_sorted(set: &SampleSet) -> bool {
        set.as_slice().windows(2).all(|w| w[0] <= w[1])
    }

    #[test]
    fn test_fills_in_sorted_order() {
        let mut set = SampleSet::new(4);
        for v in [3.0, 1.0, 4.0, 2.0] {
            assert!(set.insert(v));
            assert!(is_sorted(&set));
        }
        assert_eq!(set.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert!(set.is_full());
    }

    #[test]
    fn test_full_set_rejects_worse_values() {
        let mut set = SampleSet::new(3);
        for v in [1.0, 2.0, 3.0] {
            set.insert(v);
        }
        assert!(!set.insert(3.0));
        assert!(!set.insert(10.0));
        assert_eq!(set.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_full_set_replaces_worst() {
        let mut set = SampleSet::new(3);
        for v in [1.0, 2.0, 3.0] {
            set.insert(v);
        }
        assert!(set.insert(1.5));
        assert_eq!(set.as_slice(), &[1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_worst_is_non_increasing() {
        let mut set = SampleSet::new(5);
        let stream = [9.0, 7.0, 8.0, 6.0, 9.5, 5.0, 7.5, 4.0, 10.0, 3.0];
        let mut prev_worst = f64::INFINITY;
        for v in stream {
            set.insert(v);
            if set.is_full() {
                let worst = set.worst().unwrap();
                assert!(worst <= prev_worst);
                prev_worst = worst;
            }
        }
        assert_eq!(set.best(), Some(3.0));
    }

    #[test]
    fn test_convergence_requires_full_set() {
        let mut set = SampleSet::new(3);
        set.insert(1.0);
        set.insert(1.0);
        assert!(!set.converged(1.0));
        set.insert(1.0);
        assert!(set.converged(1.0));
    }

    #[test]
    fn test_convergence_spread() {
        let mut set = SampleSet::new(2);
        set.insert(100.0);
        set.insert(102.0);
        // spread is 2%
        assert!(!set.converged(0.01));
        assert!(set.converged(0.02));
    }

    #[test]
    fn test_capacity_one_converges_immediately() {
        let mut set = SampleSet::new(1);
        set.insert(42.0);
        assert!(set.converged(1e-12));
    }

    #[test]
    #[should_panic]
    fn test_zero_capacity_panics() {
        SampleSet::new(0);
    }
}
