//! # Density Engine
//!
//! 密度/位置双数据流的窗口保留、位置插值与区间统计。
//!
//! 负责：
//! - 两路时间有序缓冲区与滑动窗口裁剪
//! - 按时间戳线性插值板材位置
//! - 区间内密度的均值 / 最小值 / 中位数
//! - 可切换的中位数算法
//!
//! ## 使用示例
//!
//! ```
//! use density_engine::SensorDataManager;
//!
//! let manager = SensorDataManager::default();
//! manager.record_density(10, 0);
//! manager.record_density(20, 1_000);
//! manager.record_density(30, 2_000);
//! manager.record_position(0, 0);
//! manager.record_position(100, 2_000);
//!
//! let result = manager.query(0, 50);
//! assert_eq!((result.mean, result.min, result.median), (15, 10, 10));
//! ```

mod aggregate;
mod buffer;
mod interpolate;
mod manager;
pub mod median;

pub use buffer::StreamBuffer;
pub use interpolate::interpolate_position;
pub use manager::SensorDataManager;
pub use median::StreamingMedian;

// Re-export contracts types
pub use contracts::{
    AggregateResult, BufferStats, ManagerConfig, MedianAlgorithm, Sample, StreamKind,
    StreamStats, TrimPolicy, DEFAULT_WINDOW_US,
};
