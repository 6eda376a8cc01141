//! Capacity growth and shrink policy.
//!
//! A [`GrowthPolicy`] decides when a growable vector resizes and to what
//! capacity. Growth and shrink amounts are computed by counting how many
//! factor steps are needed to bring the projected size back inside the
//! thresholds, then resizing once. A sequence of N single-element inserts
//! or removes therefore costs O(1) amortized resizes, and each logical
//! operation performs at most one reallocation.

use crate::error::PolicyError;

#[cold]
#[inline(never)]
#[track_caller]
fn capacity_overflow(capacity: f64) -> ! {
    panic!("allocation size overflow: capacity {capacity} exceeds usize");
}

fn to_capacity(value: f64) -> usize {
    if value >= usize::MAX as f64 {
        capacity_overflow(value);
    }
    value as usize
}

/// Growth configuration for a growable vector.
///
/// Validated at construction; immutable afterwards. The fields satisfy
/// `grow_factor > 1`, both thresholds in `(0, 1)` and
/// `shrink_threshold * grow_factor <= grow_threshold`, so a shrink never
/// lands on a capacity that the next insert would immediately grow again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowthPolicy {
    grow_factor: f64,
    grow_threshold: f64,
    shrink_threshold: f64,
}

impl GrowthPolicy {
    /// Default multiplicative growth factor.
    pub const DEFAULT_GROW_FACTOR: f64 = 1.5;

    /// Default fraction of capacity at which growth triggers.
    pub const DEFAULT_GROW_THRESHOLD: f64 = 0.75;

    /// Default fraction of capacity below which shrinking triggers.
    pub const DEFAULT_SHRINK_THRESHOLD: f64 = 0.25;

    /// Validate and build a policy.
    pub fn new(
        grow_factor: f64,
        grow_threshold: f64,
        shrink_threshold: f64,
    ) -> Result<Self, PolicyError> {
        if !grow_factor.is_finite() || grow_factor <= 1.0 {
            return Err(PolicyError::InvalidGrowFactor { value: grow_factor });
        }
        for (which, value) in [("grow", grow_threshold), ("shrink", shrink_threshold)] {
            // NaN fails both comparisons and is rejected here too.
            if !(value > 0.0 && value < 1.0) {
                return Err(PolicyError::InvalidThreshold { which, value });
            }
        }
        let product = shrink_threshold * grow_factor;
        if product > grow_threshold {
            return Err(PolicyError::Oscillation {
                product,
                grow_threshold,
            });
        }
        Ok(Self {
            grow_factor,
            grow_threshold,
            shrink_threshold,
        })
    }

    /// Multiplicative growth factor.
    pub fn grow_factor(&self) -> f64 {
        self.grow_factor
    }

    /// Fraction of capacity that, once reached by the size, triggers growth.
    pub fn grow_threshold(&self) -> f64 {
        self.grow_threshold
    }

    /// Fraction of capacity below which the size triggers a shrink.
    pub fn shrink_threshold(&self) -> f64 {
        self.shrink_threshold
    }

    /// Whether a vector with `capacity` slots must grow to hold
    /// `projected` elements.
    pub fn should_grow(&self, capacity: usize, projected: usize) -> bool {
        projected as f64 >= self.grow_threshold * capacity as f64
    }

    /// Whether a vector with `capacity` slots should shrink once it holds
    /// only `projected` elements.
    pub fn should_shrink(&self, capacity: usize, projected: usize) -> bool {
        (projected as f64) < self.shrink_threshold * capacity as f64
    }

    /// Capacity after growing from `capacity` so that `projected` elements
    /// sit below the grow threshold.
    ///
    /// Multiplies by the grow factor as many times as needed, then returns
    /// `ceil(capacity * factor^steps)`. An empty capacity grows from one
    /// slot.
    ///
    /// # Panics
    ///
    /// Panics with `"allocation size overflow"` if the result does not fit
    /// in `usize`.
    pub fn grown_capacity(&self, capacity: usize, projected: usize) -> usize {
        let base = capacity.max(1) as f64;
        let mut candidate = base;
        let mut steps = 0;
        while projected as f64 >= self.grow_threshold * candidate {
            candidate *= self.grow_factor;
            steps += 1;
        }
        let grown = (base * self.grow_factor.powi(steps)).ceil();
        to_capacity(grown).max(projected)
    }

    /// Capacity after shrinking from `capacity` so that `projected`
    /// elements sit at or above the shrink threshold, never going below
    /// `floor`.
    ///
    /// Divides by the grow factor as many times as needed, then returns
    /// `ceil(capacity / factor^steps)` clamped to `floor`.
    pub fn shrunk_capacity(&self, capacity: usize, projected: usize, floor: usize) -> usize {
        let mut candidate = capacity as f64;
        let mut steps = 0;
        while (projected as f64) < self.shrink_threshold * candidate
            && candidate > floor as f64
            && candidate > 1.0
        {
            candidate /= self.grow_factor;
            steps += 1;
        }
        let shrunk = (capacity as f64 / self.grow_factor.powi(steps)).ceil();
        to_capacity(shrunk).max(floor).max(projected)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            grow_factor: Self::DEFAULT_GROW_FACTOR,
            grow_threshold: Self::DEFAULT_GROW_THRESHOLD,
            shrink_threshold: Self::DEFAULT_SHRINK_THRESHOLD,
        }
    }
}
