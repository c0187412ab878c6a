use std::{collections::VecDeque, time::Duration};
use web_time::Instant;

/// One timed animation update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSample {
    pub started: Instant,
    pub duration: Duration,
}

/// Summary of the samples currently in the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateStats {
    pub samples: usize,
    pub avg: Duration,
    pub min: Duration,
    pub max: Duration,
    /// Updates per second, `None` until two samples started at different times.
    pub ups: Option<f32>,
}

/// Rolling window of animation update timings.
#[derive(Debug)]
pub struct PerformanceTracker {
    capacity: usize,
    window: VecDeque<UpdateSample>,
    total: Duration,
}

impl PerformanceTracker {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            window: VecDeque::with_capacity(capacity),
            total: Duration::ZERO,
        }
    }

    /// Time `update` and record it as a sample starting now.
    pub fn measure<T>(&mut self, update: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let result = update();
        self.record(UpdateSample {
            started,
            duration: started.elapsed(),
        });
        result
    }

    /// Push `sample`, evicting the oldest one once the window is full.
    pub fn record(&mut self, sample: UpdateSample) {
        if self.window.len() == self.capacity {
            if let Some(evicted) = self.window.pop_front() {
                self.total -= evicted.duration;
            }
        }
        self.total += sample.duration;
        self.window.push_back(sample);
    }

    pub fn samples(&self) -> impl Iterator<Item = &UpdateSample> {
        self.window.iter()
    }

    pub fn stats(&self) -> Option<UpdateStats> {
        let first = self.window.front()?;
        let last = self.window.back()?;
        let (min, max) = self.window.iter().fold(
            (Duration::MAX, Duration::ZERO),
            |(min, max), sample| (min.min(sample.duration), max.max(sample.duration)),
        );
        let span = last.started.duration_since(first.started);
        let ups = (!span.is_zero())
            .then(|| (self.window.len() - 1) as f32 / span.as_secs_f32());
        Some(UpdateStats {
            samples: self.window.len(),
            avg: self.total / self.window.len() as u32,
            min,
            max,
            ups,
        })
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use web_time::Instant;

    use super::{PerformanceTracker, UpdateSample};

    fn sample(started: Instant, millis: u64) -> UpdateSample {
        UpdateSample {
            started,
            duration: Duration::from_millis(millis),
        }
    }

    #[test]
    fn test_rolling_window() {
        let start = Instant::now();
        let mut tracker = PerformanceTracker::new(2);
        assert_eq!(tracker.stats(), None);

        tracker.record(sample(start, 8));
        tracker.record(sample(start + Duration::from_millis(100), 2));
        tracker.record(sample(start + Duration::from_millis(200), 4));

        assert_eq!(tracker.samples().count(), 2);
        let stats = tracker.stats().unwrap();
        assert_eq!(stats.samples, 2);
        assert_eq!(stats.avg, Duration::from_millis(3));
        assert_eq!(stats.min, Duration::from_millis(2));
        assert_eq!(stats.max, Duration::from_millis(4));
        assert!((stats.ups.unwrap() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_single_sample_has_no_rate() {
        let mut tracker = PerformanceTracker::new(0);
        tracker.record(sample(Instant::now(), 5));
        let stats = tracker.stats().unwrap();
        assert_eq!(stats.avg, Duration::from_millis(5));
        assert_eq!(stats.ups, None);
    }

    #[test]
    fn test_measure_returns_result() {
        let mut tracker = PerformanceTracker::new(4);
        assert_eq!(tracker.measure(|| 7), 7);
        assert_eq!(tracker.samples().count(), 1);
    }
}
