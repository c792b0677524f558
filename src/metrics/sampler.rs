use std::time::Instant;

use log::*;

use crate::metrics::{
    series::MetricSeries,
    source::{MetricsSource, SampleTick, SystemInfo},
};

/// Session-scoped rolling histories of host metrics.
///
/// One sampler lives for the life of a monitoring session. It owns every
/// `MetricSeries` and is only ever touched by the event loop, so there is one
/// writer and one reader and no locking.
#[derive(Debug)]
pub struct Sampler {
    info: SystemInfo,
    cpu: MetricSeries,
    memory: MetricSeries,
    per_core: Vec<MetricSeries>,
    /// Seconds since session start for each retained tick, the x-axis of
    /// every chart. Same capacity and cadence as the value histories.
    elapsed: MetricSeries,
    started: Instant,
    paused: bool,
    ticks: u64,
}

impl Sampler {
    pub fn new(info: SystemInfo, capacity: usize) -> Self {
        let per_core = (0..info.core_count)
            .map(|_| MetricSeries::new(capacity))
            .collect();
        Self {
            info,
            cpu: MetricSeries::new(capacity),
            memory: MetricSeries::new(capacity),
            per_core,
            elapsed: MetricSeries::new(capacity),
            started: Instant::now(),
            paused: false,
            ticks: 0,
        }
    }

    /// Fetch one tick from the source and record it.
    ///
    /// A failed fetch is fatal to this tick only: the histories are left
    /// untouched and the loop carries on at the next interval. While paused
    /// the tick is skipped entirely.
    pub fn poll<S: MetricsSource>(&mut self, source: &mut S) {
        if self.paused {
            return;
        }
        match source.sample() {
            Ok(tick) => self.record(tick),
            Err(err) => warn!(target: "Sampler", "Skipping tick: {}", err),
        }
    }

    /// Append one tick's values to their histories.
    ///
    /// The per-core vector is matched up positionally; a short vector updates
    /// only the matching prefix, extra values are dropped. Core cardinality
    /// never changes mid-session.
    pub fn record(&mut self, tick: SampleTick) {
        self.cpu.push(tick.cpu_percent);
        self.memory.push(tick.mem_percent);
        for (series, value) in self.per_core.iter_mut().zip(&tick.per_core) {
            series.push(*value);
        }
        let elapsed = tick.timestamp.saturating_duration_since(self.started);
        self.elapsed.push(elapsed.as_secs_f32());
        self.ticks += 1;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn info(&self) -> &SystemInfo {
        &self.info
    }

    pub fn cpu(&self) -> &MetricSeries {
        &self.cpu
    }

    pub fn memory(&self) -> &MetricSeries {
        &self.memory
    }

    pub fn per_core(&self) -> &[MetricSeries] {
        &self.per_core
    }

    pub fn elapsed(&self) -> &MetricSeries {
        &self.elapsed
    }

    /// Number of ticks recorded since session start, including evicted ones.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::source::SourceError;
    use std::{collections::VecDeque, time::Instant};

    /// A scripted source: pops one canned result per poll.
    struct ScriptedSource {
        info: SystemInfo,
        script: VecDeque<Result<SampleTick, SourceError>>,
    }

    impl ScriptedSource {
        fn new(core_count: usize) -> Self {
            Self {
                info: SystemInfo {
                    core_count,
                    frequency_mhz: 3_000,
                    brand: "testcpu".to_string(),
                    total_ram_bytes: 8 << 30,
                    os: "testos".to_string(),
                },
                script: VecDeque::new(),
            }
        }

        fn push_tick(&mut self, cpu: f32, mem: f32, per_core: Vec<f32>) {
            self.script.push_back(Ok(SampleTick {
                timestamp: Instant::now(),
                cpu_percent: cpu,
                mem_percent: mem,
                per_core,
            }));
        }

        fn push_error(&mut self) {
            self.script.push_back(Err(SourceError::NoCpus));
        }
    }

    impl MetricsSource for ScriptedSource {
        fn sample(&mut self) -> Result<SampleTick, SourceError> {
            self.script.pop_front().expect("script should not be empty")
        }

        fn info(&self) -> SystemInfo {
            self.info.clone()
        }
    }

    fn sampler(source: &ScriptedSource, capacity: usize) -> Sampler {
        Sampler::new(source.info(), capacity)
    }

    #[test]
    fn records_every_series_once_per_tick() {
        let mut source = ScriptedSource::new(4);
        let mut sampler = sampler(&source, 60);
        for t in 0..5 {
            let base = t as f32;
            source.push_tick(base, base + 50.0, vec![base, base + 1.0, base + 2.0, base + 3.0]);
            sampler.poll(&mut source);
        }
        assert_eq!(sampler.cpu().len(), 5);
        assert_eq!(sampler.memory().len(), 5);
        assert_eq!(sampler.elapsed().len(), 5);
        assert_eq!(sampler.per_core().len(), 4);
        for (core, series) in sampler.per_core().iter().enumerate() {
            assert_eq!(series.len(), 5);
            let values: Vec<f32> = series.iter().collect();
            let expected: Vec<f32> = (0..5).map(|t| (t + core) as f32).collect();
            assert_eq!(values, expected, "core {} out of tick order", core);
        }
        assert_eq!(sampler.ticks(), 5);
    }

    #[test]
    fn paused_sampler_appends_nothing() {
        let mut source = ScriptedSource::new(1);
        let mut sampler = sampler(&source, 60);
        source.push_tick(10.0, 40.0, vec![10.0]);
        sampler.poll(&mut source);

        sampler.pause();
        assert!(sampler.is_paused());
        // Paused polls never reach the source.
        sampler.poll(&mut source);
        sampler.poll(&mut source);
        assert_eq!(sampler.cpu().len(), 1);
        assert_eq!(sampler.ticks(), 1);

        sampler.resume();
        source.push_tick(20.0, 41.0, vec![20.0]);
        sampler.poll(&mut source);
        let values: Vec<f32> = sampler.cpu().iter().collect();
        assert_eq!(values, vec![10.0, 20.0]);
    }

    #[test]
    fn failed_tick_leaves_histories_untouched() {
        let mut source = ScriptedSource::new(2);
        let mut sampler = sampler(&source, 60);
        source.push_tick(5.0, 30.0, vec![4.0, 6.0]);
        source.push_error();
        source.push_tick(7.0, 31.0, vec![6.0, 8.0]);
        for _ in 0..3 {
            sampler.poll(&mut source);
        }
        let values: Vec<f32> = sampler.cpu().iter().collect();
        assert_eq!(values, vec![5.0, 7.0]);
        assert_eq!(sampler.memory().len(), 2);
        assert_eq!(sampler.elapsed().len(), 2);
        assert_eq!(sampler.ticks(), 2);
    }

    #[test]
    fn short_per_core_vector_updates_prefix_only() {
        let mut source = ScriptedSource::new(3);
        let mut sampler = sampler(&source, 60);
        source.push_tick(1.0, 1.0, vec![9.0]);
        sampler.poll(&mut source);
        assert_eq!(sampler.per_core()[0].len(), 1);
        assert_eq!(sampler.per_core()[1].len(), 0);
        assert_eq!(sampler.per_core()[2].len(), 0);
    }

    #[test]
    fn histories_stay_bounded_over_long_sessions() {
        let mut source = ScriptedSource::new(1);
        let mut sampler = sampler(&source, 60);
        for t in 0..200 {
            source.push_tick(t as f32, 50.0, vec![t as f32]);
            sampler.poll(&mut source);
        }
        assert_eq!(sampler.cpu().len(), 60);
        assert_eq!(sampler.cpu().oldest(), Some(140.0));
        assert_eq!(sampler.cpu().latest(), Some(199.0));
        assert_eq!(sampler.elapsed().len(), 60);
        assert_eq!(sampler.ticks(), 200);
    }
}
