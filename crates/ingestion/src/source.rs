//! 模拟数据源
//!
//! 在没有真实测量台的环境下生成密度与位置样本。

use std::time::Duration;

use contracts::{DensityProducerConfig, PositionProducerConfig, Sample, StreamKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 样本数据源
///
/// 每次调用 `next_sample` 产出下一个样本，返回 None 表示数据源耗尽。
pub trait SampleSource: Send {
    /// 数据流类型
    fn kind(&self) -> StreamKind;

    /// 下一个样本
    fn next_sample(&mut self) -> Option<Sample>;

    /// 两次发送之间的休眠
    fn pause(&self) -> Duration;
}

/// 模拟密度源
///
/// 第 i 个样本: 时间戳 `i * interval_us`，值在 `[0, max_value)` 内均匀随机。
#[derive(Debug)]
pub struct MockDensitySource {
    config: DensityProducerConfig,
    rng: StdRng,
    next_index: u64,
}

impl MockDensitySource {
    /// 创建新的密度源
    pub fn new(config: DensityProducerConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            next_index: 0,
        }
    }
}

impl SampleSource for MockDensitySource {
    fn kind(&self) -> StreamKind {
        StreamKind::Density
    }

    fn next_sample(&mut self) -> Option<Sample> {
        if self.next_index >= self.config.samples {
            return None;
        }
        // 时间戳溢出 i64 时数据源提前结束
        let timestamp_us = i64::try_from(self.next_index)
            .ok()?
            .checked_mul(self.config.interval_us)?;
        self.next_index += 1;

        let value = self.rng.random_range(0..self.config.max_value.max(1));
        Some(Sample::new(timestamp_us, value))
    }

    fn pause(&self) -> Duration {
        Duration::from_micros(self.config.pause_us)
    }
}

/// 模拟位置源
///
/// 板材匀速前进：第 i 个样本位于 `i * step_mm`，时间戳 `i * interval_us`。
#[derive(Debug)]
pub struct MockPositionSource {
    config: PositionProducerConfig,
    next_index: u64,
}

impl MockPositionSource {
    /// 创建新的位置源
    pub fn new(config: PositionProducerConfig) -> Self {
        Self {
            config,
            next_index: 0,
        }
    }
}

impl SampleSource for MockPositionSource {
    fn kind(&self) -> StreamKind {
        StreamKind::Position
    }

    fn next_sample(&mut self) -> Option<Sample> {
        if self.next_index >= self.config.samples {
            return None;
        }
        let index = i64::try_from(self.next_index).ok()?;
        let timestamp_us = index.checked_mul(self.config.interval_us)?;
        self.next_index += 1;

        let position_mm = index.saturating_mul(i64::from(self.config.step_mm));
        let position_mm = position_mm.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        Some(Sample::new(timestamp_us, position_mm))
    }

    fn pause(&self) -> Duration {
        Duration::from_micros(self.config.pause_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(source: &mut dyn SampleSource) -> Vec<Sample> {
        std::iter::from_fn(|| source.next_sample()).collect()
    }

    #[test]
    fn test_density_source_timestamps_and_range() {
        let config = DensityProducerConfig {
            samples: 100,
            interval_us: 1000,
            pause_us: 0,
            max_value: 200,
        };
        let samples = drain(&mut MockDensitySource::new(config, 1));

        assert_eq!(samples.len(), 100);
        assert_eq!(samples[0].timestamp_us, 0);
        assert_eq!(samples[99].timestamp_us, 99_000);
        assert!(samples.iter().all(|s| (0..200).contains(&s.value)));
    }

    #[test]
    fn test_density_source_is_deterministic_per_seed() {
        let config = DensityProducerConfig::default();
        let a = drain(&mut MockDensitySource::new(config.clone(), 42));
        let b = drain(&mut MockDensitySource::new(config, 42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_position_source_moves_linearly() {
        let config = PositionProducerConfig {
            samples: 300,
            interval_us: 3000,
            pause_us: 0,
            step_mm: 1,
        };
        let mut source = MockPositionSource::new(config);
        assert_eq!(source.kind(), StreamKind::Position);

        let samples = drain(&mut source);
        assert_eq!(samples.len(), 300);
        assert_eq!(samples[10], Sample::new(30_000, 10));
        assert_eq!(samples[299], Sample::new(897_000, 299));
        assert!(source.next_sample().is_none());
    }

    #[test]
    fn test_sources_end_on_timestamp_overflow() {
        let mut position = MockPositionSource::new(PositionProducerConfig {
            samples: 3,
            interval_us: i64::MAX,
            pause_us: 0,
            step_mm: 1,
        });
        let samples = drain(&mut position);
        assert_eq!(samples, vec![Sample::new(0, 0), Sample::new(i64::MAX, 1)]);
        assert!(position.next_sample().is_none());

        let mut density = MockDensitySource::new(
            DensityProducerConfig {
                samples: 5,
                interval_us: i64::MAX / 2,
                pause_us: 0,
                max_value: 10,
            },
            0,
        );
        let samples = drain(&mut density);
        assert_eq!(samples.len(), 3);
        assert!(samples.windows(2).all(|w| w[0].timestamp_us < w[1].timestamp_us));
    }

    #[test]
    fn test_pause_durations() {
        let density = MockDensitySource::new(DensityProducerConfig::default(), 0);
        let position = MockPositionSource::new(PositionProducerConfig::default());
        assert_eq!(density.pause(), Duration::from_micros(500));
        assert_eq!(position.pause(), Duration::from_micros(1000));
    }
}
