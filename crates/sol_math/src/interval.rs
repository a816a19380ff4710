/// A scalar range `[min, max]`, used for hit parameters and color clamping.
///
/// `min > max` is a valid, empty interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const EMPTY: Interval = Interval::new(f64::INFINITY, f64::NEG_INFINITY);
    pub const UNIVERSE: Interval = Interval::new(f64::NEG_INFINITY, f64::INFINITY);

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Closed test: both endpoints count.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Open test: endpoints are outside.
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    /// Pull `x` into range. Never panics, even when the interval is empty.
    pub fn clamp(&self, x: f64) -> f64 {
        if x < self.min {
            self.min
        } else if x > self.max {
            self.max
        } else {
            x
        }
    }

    /// Same lower bound, new upper bound.
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size() {
        assert_eq!(Interval::new(0.5, 3.0).size(), 2.5);
        assert_eq!(Interval::new(-4.0, 4.0).size(), 8.0);
        assert_eq!(Interval::UNIVERSE.size(), f64::INFINITY);
    }

    #[test]
    fn test_endpoint_membership() {
        let t = Interval::new(1.0, 2.0);

        assert!(t.contains(1.0) && t.contains(2.0));
        assert!(!t.surrounds(1.0) && !t.surrounds(2.0));
        assert!(t.contains(1.5) && t.surrounds(1.5));
        assert!(!t.contains(0.999) && !t.contains(2.001));
    }

    #[test]
    fn test_clamp_to_display_range() {
        let intensity = Interval::new(0.000, 0.999);
        assert_eq!(intensity.clamp(-2.0), 0.0);
        assert_eq!(intensity.clamp(0.25), 0.25);
        assert_eq!(intensity.clamp(1.0), 0.999);
    }

    #[test]
    fn test_clamp_on_empty_does_not_panic() {
        assert_eq!(Interval::EMPTY.clamp(3.0), f64::INFINITY);
    }

    #[test]
    fn test_with_max_narrows_upper_bound() {
        let narrowed = Interval::new(0.001, f64::INFINITY).with_max(4.0);
        assert_eq!(narrowed, Interval::new(0.001, 4.0));
    }

    #[test]
    fn test_empty_and_universe() {
        assert_eq!(Interval::default(), Interval::EMPTY);
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(!Interval::EMPTY.contains(f64::NEG_INFINITY));
        assert!(Interval::UNIVERSE.contains(-1e300));
        assert!(Interval::UNIVERSE.surrounds(1e300));
    }
}
