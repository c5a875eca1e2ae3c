// Sampled garbage collection policy

use rand::Rng;

/// Decides whether a successful write should trigger a GC sweep
///
/// Runs with probability `probability`, sampled as a uniform integer draw in
/// `[1, divisor]` compared against `probability * divisor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GcPolicy {
    probability: f64,
    divisor: u32,
}

impl GcPolicy {
    /// `probability` is clamped to `[0, 1]`, NaN disables GC, divisor 0 is read as 1
    pub fn new(probability: f64, divisor: u32) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        Self {
            probability,
            divisor: divisor.max(1),
        }
    }

    /// A policy that never triggers
    pub fn never() -> Self {
        Self::new(0.0, 1)
    }

    /// A policy that triggers on every write
    pub fn always() -> Self {
        Self::new(1.0, 1)
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// Draw once and report whether GC should run
    pub fn should_run(&self) -> bool {
        if self.probability <= 0.0 {
            return false;
        }
        if self.probability >= 1.0 {
            return true;
        }
        let draw = rand::thread_rng().gen_range(1..=self.divisor);
        self.accepts(draw)
    }

    /// Whether a given draw in `[1, divisor]` falls under the threshold
    pub fn accepts(&self, draw: u32) -> bool {
        f64::from(draw) <= self.probability * f64::from(self.divisor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_runs() {
        let policy = GcPolicy::new(0.0, 100);
        assert!((0..1000).all(|_| !policy.should_run()));
    }

    #[test]
    fn test_one_always_runs() {
        let policy = GcPolicy::new(1.0, 100);
        assert!((0..1000).all(|_| policy.should_run()));
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        assert_eq!(GcPolicy::new(-2.0, 100).probability(), 0.0);
        assert_eq!(GcPolicy::new(7.5, 100).probability(), 1.0);
        assert_eq!(GcPolicy::new(f64::NAN, 100).probability(), 0.0);
        assert_eq!(GcPolicy::new(0.5, 0).divisor(), 1);
    }

    #[test]
    fn test_threshold_matches_probability_times_divisor() {
        let policy = GcPolicy::new(0.01, 100);
        assert!(policy.accepts(1));
        assert!(!policy.accepts(2));

        let policy = GcPolicy::new(0.25, 1000);
        assert!(policy.accepts(250));
        assert!(!policy.accepts(251));
    }

    #[test]
    fn test_sampled_rate_is_roughly_probability() {
        let policy = GcPolicy::new(0.5, 100);
        let runs = (0..10_000).filter(|_| policy.should_run()).count();
        assert!((4_000..6_000).contains(&runs), "runs = {runs}");
    }
}
