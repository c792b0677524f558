pub mod sampler;
pub mod series;
pub mod source;

pub use sampler::Sampler;
pub use series::MetricSeries;
pub use source::{MetricsSource, SampleTick, SourceError, SysinfoSource, SystemInfo};
