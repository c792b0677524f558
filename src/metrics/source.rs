use std::{fmt::Display, time::Instant};

use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

/// One poll of the host: everything the sampler records for a single tick.
///
/// Not retained beyond updating the histories.
#[derive(Debug, Clone)]
pub struct SampleTick {
    pub timestamp: Instant,
    pub cpu_percent: f32,
    pub mem_percent: f32,
    pub per_core: Vec<f32>,
}

/// Static facts about the host, read once at session start.
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub core_count: usize,
    pub frequency_mhz: u64,
    pub brand: String,
    pub total_ram_bytes: u64,
    pub os: String,
}

#[derive(Debug)]
pub enum SourceError {
    NoCpus,
    NoMemory,
}

impl Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCpus => f.write_str("no cpu counters reported"),
            Self::NoMemory => f.write_str("no memory counters reported"),
        }
    }
}

impl std::error::Error for SourceError {}

/// A provider of host utilization metrics.
///
/// The sampler only ever talks to this trait, so tests drive it with a
/// scripted implementation instead of real OS calls.
pub trait MetricsSource {
    fn sample(&mut self) -> Result<SampleTick, SourceError>;
    fn info(&self) -> SystemInfo;
}

/// Production source backed by `sysinfo`.
pub struct SysinfoSource {
    sys: System,
    info: SystemInfo,
}

impl SysinfoSource {
    pub fn new() -> Self {
        // Priming refresh: sysinfo reports 0% CPU until it has two readings
        // to diff, so take the first one at construction.
        let sys = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );
        let (brand, frequency_mhz) = sys
            .cpus()
            .first()
            .map(|cpu| (cpu.brand().to_string(), cpu.frequency()))
            .unwrap_or_default();
        let info = SystemInfo {
            core_count: sys.cpus().len(),
            frequency_mhz,
            brand,
            total_ram_bytes: sys.total_memory(),
            os: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
        };
        Self { sys, info }
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSource for SysinfoSource {
    fn sample(&mut self) -> Result<SampleTick, SourceError> {
        let timestamp = Instant::now();
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        let per_core: Vec<f32> = self.sys.cpus().iter().map(|cpu| cpu.cpu_usage()).collect();
        if per_core.is_empty() {
            return Err(SourceError::NoCpus);
        }
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(SourceError::NoMemory);
        }
        let mem_percent = self.sys.used_memory() as f32 / total as f32 * 100.0;

        Ok(SampleTick {
            timestamp,
            cpu_percent: self.sys.global_cpu_usage(),
            mem_percent,
            per_core,
        })
    }

    fn info(&self) -> SystemInfo {
        self.info.clone()
    }
}
