//! Double-buffered state containers.
//!
//! Every evolving quantity carries a *current* value (time t) and a *new*
//! value (time t + dt). Within a step all operations read current state
//! and write new state; [`StateField::commit`] publishes new over current
//! at the end of the step, so no operation ever observes a half-updated
//! field.

/// A per-entity scalar field with current and new time levels.
///
/// Both buffers always have the same length, fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct StateField {
    current: Vec<f64>,
    new: Vec<f64>,
}

impl StateField {
    /// Create a field of `len` entries, both time levels set to `value`.
    pub fn uniform(len: usize, value: f64) -> Self {
        Self {
            current: vec![value; len],
            new: vec![value; len],
        }
    }

    /// Create a field from per-entity values, both time levels identical.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            current: values.clone(),
            new: values,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Returns `true` if the field has no entries.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// The current (time t) values.
    pub fn current(&self) -> &[f64] {
        &self.current
    }

    /// The new (time t + dt) values.
    pub fn new_values(&self) -> &[f64] {
        &self.new
    }

    /// Mutable access to the new (time t + dt) values.
    pub fn new_values_mut(&mut self) -> &mut [f64] {
        &mut self.new
    }

    /// Mutable access to the current values.
    ///
    /// Only the enrichment transitions rewrite current state (sub-field
    /// seeding and size folding happen at both time levels); the regular
    /// update path writes exclusively through [`new_values_mut`](Self::new_values_mut).
    pub fn current_mut(&mut self) -> &mut [f64] {
        &mut self.current
    }

    /// Split borrow: current values immutably, new values mutably.
    ///
    /// The usual update shape reads time t and writes time t + dt of the
    /// same field; this keeps that a single borrow of `self`.
    pub fn levels_mut(&mut self) -> (&[f64], &mut [f64]) {
        (&self.current, &mut self.new)
    }

    /// Set both time levels of one entry.
    pub fn set_both(&mut self, index: usize, value: f64) {
        self.current[index] = value;
        self.new[index] = value;
    }

    /// Publish the new values as current.
    pub fn commit(&mut self) {
        self.current.copy_from_slice(&self.new);
    }
}

/// A single scalar with current and new time levels.
///
/// Used for per-discontinuity quantities (opening, damage, dissipated
/// energy, crack-face kinematics) that are not whole-mesh arrays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatePair {
    /// Value at time t.
    pub current: f64,
    /// Value at time t + dt.
    pub new: f64,
}

impl StatePair {
    /// Create a pair with both time levels set to `value`.
    pub fn both(value: f64) -> Self {
        Self {
            current: value,
            new: value,
        }
    }

    /// Publish the new value as current.
    pub fn commit(&mut self) {
        self.current = self.new;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn uniform_initializes_both_levels() {
        let f = StateField::uniform(4, 2.5);
        assert_eq!(f.len(), 4);
        assert_eq!(f.current(), &[2.5; 4]);
        assert_eq!(f.new_values(), &[2.5; 4]);
    }

    #[test]
    fn commit_publishes_new_over_current() {
        let mut f = StateField::from_values(vec![1.0, 2.0, 3.0]);
        f.new_values_mut()[1] = 9.0;
        assert_eq!(f.current()[1], 2.0, "current untouched before commit");
        f.commit();
        assert_eq!(f.current(), &[1.0, 9.0, 3.0]);
    }

    #[test]
    fn set_both_touches_both_levels() {
        let mut f = StateField::uniform(2, 0.0);
        f.set_both(0, 7.0);
        assert_eq!(f.current()[0], 7.0);
        assert_eq!(f.new_values()[0], 7.0);
    }

    #[test]
    fn pair_commit() {
        let mut p = StatePair::both(1.0);
        p.new = 4.0;
        p.commit();
        assert_eq!(p.current, 4.0);
    }

    proptest! {
        #[test]
        fn commit_is_idempotent(values in prop::collection::vec(-1e9f64..1e9, 1..64)) {
            let mut f = StateField::from_values(values);
            for (i, v) in f.new_values_mut().iter_mut().enumerate() {
                *v += i as f64;
            }
            f.commit();
            let after_first: Vec<f64> = f.current().to_vec();
            f.commit();
            prop_assert_eq!(f.current(), after_first.as_slice());
            prop_assert_eq!(f.current(), f.new_values());
        }
    }
}
