use crate::shared_data::Time;

/// A monotonic time source in whole seconds.
pub trait Clock {
    fn now(&self) -> Time;

    /// Seconds since `then`. `then` must not be in the future.
    fn elapsed(&self, then: Time) -> Time {
        let now = self.now();
        debug_assert!(then <= now, "elapsed() asked about {then}s at {now}s");
        now.saturating_sub(then)
    }
}

/// A simple clock for simulating time. Starts at zero and only moves when
/// told to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimClock {
    now: Time,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(now: Time) -> Self {
        Self { now }
    }

    pub fn set(&mut self, now: Time) {
        self.now = now;
    }

    pub fn advance(&mut self, delta: Time) {
        self.now += delta;
    }
}

impl Clock for SimClock {
    fn now(&self) -> Time {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_and_elapsed() {
        let mut clock = SimClock::new();
        assert_eq!(clock.now(), 0);
        clock.advance(10);
        clock.advance(5);
        assert_eq!(clock.now(), 15);
        assert_eq!(clock.elapsed(10), 5);
        clock.set(100);
        assert_eq!(clock.elapsed(0), 100);
    }
}
