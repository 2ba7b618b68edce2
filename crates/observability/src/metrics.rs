//! 密度引擎指标收集模块
//!
//! 记录样本接收、窗口裁剪、缓冲区深度与查询结果。
//! 未安装 recorder 时所有宏均为空操作。

use contracts::{AggregateResult, StreamKind};
use metrics::{counter, gauge, histogram};

/// 记录样本接收
pub fn record_sample_received(stream: StreamKind) {
    counter!(
        "density_rig_samples_received_total",
        "stream" => stream.as_str()
    )
    .increment(1);
}

/// 记录窗口裁剪淘汰的样本数
pub fn record_samples_evicted(stream: StreamKind, count: usize) {
    counter!(
        "density_rig_samples_evicted_total",
        "stream" => stream.as_str()
    )
    .increment(count as u64);
}

/// 记录缓冲区深度
pub fn record_buffer_depth(stream: StreamKind, depth: usize) {
    gauge!(
        "density_rig_buffer_depth",
        "stream" => stream.as_str()
    )
    .set(depth as f64);
}

/// 从 AggregateResult 记录查询指标
///
/// 每次查询完成时调用。
pub fn record_query(result: &AggregateResult, latency_us: f64) {
    counter!("density_rig_queries_total").increment(1);
    histogram!("density_rig_query_latency_us").record(latency_us);
    histogram!("density_rig_query_working_set").record(result.count as f64);

    if result.is_empty() {
        counter!("density_rig_queries_empty_total").increment(1);
    } else {
        gauge!("density_rig_last_mean_density").set(result.mean as f64);
        gauge!("density_rig_last_median_density").set(result.median as f64);
    }
}

/// 查询指标聚合器
///
/// 在内存中聚合查询结果，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct QueryMetricsAggregator {
    /// 总查询数
    pub total_queries: u64,

    /// 无匹配样本的查询数
    pub empty_queries: u64,

    /// 均值统计 (仅非空查询)
    pub mean_stats: RunningStats,

    /// 中位数统计 (仅非空查询)
    pub median_stats: RunningStats,

    /// 最小值统计 (仅非空查询)
    pub min_stats: RunningStats,

    /// 工作集大小统计
    pub working_set_stats: RunningStats,
}

impl QueryMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, result: &AggregateResult) {
        self.total_queries += 1;
        self.working_set_stats.push(result.count as f64);

        if result.is_empty() {
            self.empty_queries += 1;
            return;
        }

        self.mean_stats.push(result.mean as f64);
        self.median_stats.push(result.median as f64);
        self.min_stats.push(result.min as f64);
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_queries: self.total_queries,
            empty_queries: self.empty_queries,
            empty_rate: if self.total_queries > 0 {
                self.empty_queries as f64 / self.total_queries as f64 * 100.0
            } else {
                0.0
            },
            mean_density: StatsSummary::from(&self.mean_stats),
            median_density: StatsSummary::from(&self.median_stats),
            min_density: StatsSummary::from(&self.min_stats),
            working_set: StatsSummary::from(&self.working_set_stats),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_queries: u64,
    pub empty_queries: u64,
    pub empty_rate: f64,
    pub mean_density: StatsSummary,
    pub median_density: StatsSummary,
    pub min_density: StatsSummary,
    pub working_set: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Query Metrics Summary ===")?;
        writeln!(f, "Total queries: {}", self.total_queries)?;
        writeln!(
            f,
            "Empty queries: {} ({:.2}%)",
            self.empty_queries, self.empty_rate
        )?;
        writeln!(f, "Mean density: {}", self.mean_density)?;
        writeln!(f, "Median density: {}", self.median_density)?;
        writeln!(f, "Min density: {}", self.min_density)?;
        writeln!(f, "Working set size: {}", self.working_set)?;
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.2}, std={:.2} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }
}
