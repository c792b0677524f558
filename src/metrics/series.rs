use std::collections::VecDeque;

/// Rolling history of a single numeric metric.
///
/// Capacity-bounded FIFO: once full, each push evicts the oldest sample, so
/// the contents are always the most recent `capacity` values in push order.
#[derive(Debug, Clone)]
pub struct MetricSeries {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl MetricSeries {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, evicting the oldest if at capacity.
    ///
    /// Values are trusted pass-through from the metrics source; anything
    /// outside [0, 100] is stored as-is and clamped at display time.
    pub fn push(&mut self, value: f32) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently pushed sample, if any.
    pub fn latest(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    pub fn oldest(&self) -> Option<f32> {
        self.samples.front().copied()
    }

    /// Samples in chronological order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(series: &MetricSeries) -> Vec<f32> {
        series.iter().collect()
    }

    #[test]
    fn fills_up_to_capacity() {
        let mut series = MetricSeries::new(5);
        assert!(series.is_empty());
        for v in [1.0, 2.0, 3.0] {
            series.push(v);
        }
        assert_eq!(series.len(), 3);
        assert_eq!(contents(&series), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut series = MetricSeries::new(3);
        for v in [10.0, 20.0, 30.0, 40.0] {
            series.push(v);
        }
        assert_eq!(contents(&series), vec![20.0, 30.0, 40.0]);
    }

    #[test]
    fn retains_most_recent_window() {
        let mut series = MetricSeries::new(50);
        for v in 1..=60 {
            series.push(v as f32);
        }
        assert_eq!(series.len(), 50);
        let expected: Vec<f32> = (11..=60).map(|v| v as f32).collect();
        assert_eq!(contents(&series), expected);
        assert_eq!(series.oldest(), Some(11.0));
        assert_eq!(series.latest(), Some(60.0));
    }

    #[test]
    fn length_is_min_of_pushes_and_capacity() {
        for (pushes, capacity) in [(0, 4), (3, 4), (4, 4), (9, 4), (100, 60)] {
            let mut series = MetricSeries::new(capacity);
            for v in 0..pushes {
                series.push(v as f32);
            }
            assert_eq!(series.len(), pushes.min(capacity));
        }
    }

    #[test]
    fn out_of_range_values_stored_as_is() {
        let mut series = MetricSeries::new(4);
        series.push(-5.0);
        series.push(250.0);
        assert_eq!(contents(&series), vec![-5.0, 250.0]);
    }
}
