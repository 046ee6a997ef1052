use std::time::{Duration, Instant};

/// Default quiet period before a filter edit is acted on.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// A value that only settles once its input has been left alone for `delay`.
///
/// Every [`set`](Self::set) restarts the timer and replaces any pending
/// value. [`poll`](Self::poll) fires at most once per pending value, and only
/// reports values that differ from the last settled one. Time is passed in
/// by the caller.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
    settled: T,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub const fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            settled: initial,
        }
    }

    /// Schedule `value`, cancelling whatever was pending.
    pub fn set(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Settle the pending value if its quiet period has elapsed.
    ///
    /// Returns the newly settled value when it differs from the previous one.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.deadline().is_some_and(|d| now >= d);
        if !due {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if value == self.settled {
            return None;
        }
        self.settled = value.clone();
        Some(value)
    }

    /// When the pending value will settle, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The last settled value.
    pub const fn settled(&self) -> &T {
        &self.settled
    }

    /// The value most recently set, settled or not.
    pub fn latest(&self) -> &T {
        self.pending.as_ref().map_or(&self.settled, |(v, _)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(500);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn nothing_fires_without_input() {
        let mut d = Debouncer::new(String::new(), DELAY);
        assert!(d.poll(Instant::now() + ms(10_000)).is_none());
        assert!(!d.is_pending());
    }

    #[test]
    fn fires_once_after_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(String::new(), DELAY);
        d.set("abc".to_string(), t0);
        assert!(d.poll(t0 + ms(499)).is_none());
        assert_eq!(d.poll(t0 + ms(500)).as_deref(), Some("abc"));
        assert!(d.poll(t0 + ms(2_000)).is_none());
        assert_eq!(d.settled(), "abc");
    }

    #[test]
    fn new_input_restarts_the_timer() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(String::new(), DELAY);
        d.set("a".to_string(), t0);
        d.set("ab".to_string(), t0 + ms(400));
        assert!(d.poll(t0 + ms(600)).is_none());
        assert_eq!(d.poll(t0 + ms(900)).as_deref(), Some("ab"));
    }

    #[test]
    fn returning_to_settled_value_does_not_fire() {
        let t0 = Instant::now();
        let mut d = Debouncer::new("x".to_string(), DELAY);
        d.set("xy".to_string(), t0);
        d.set("x".to_string(), t0 + ms(100));
        assert!(d.poll(t0 + ms(700)).is_none());
        assert!(!d.is_pending());
        assert_eq!(d.settled(), "x");
    }

    #[test]
    fn latest_reflects_pending_value() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(1, DELAY);
        d.set(2, t0);
        assert_eq!(*d.latest(), 2);
        assert_eq!(*d.settled(), 1);
        assert_eq!(d.deadline(), Some(t0 + DELAY));
    }

    #[test]
    fn instances_are_independent() {
        let t0 = Instant::now();
        let mut name = Debouncer::new(String::new(), DELAY);
        let mut owner = Debouncer::new(String::new(), DELAY);
        name.set("etl".to_string(), t0);
        owner.set("jane".to_string(), t0 + ms(300));
        assert_eq!(name.poll(t0 + ms(500)).as_deref(), Some("etl"));
        assert!(owner.poll(t0 + ms(500)).is_none());
        assert_eq!(owner.poll(t0 + ms(800)).as_deref(), Some("jane"));
    }
}
