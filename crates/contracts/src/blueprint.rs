//! RigBlueprint - Config Loader 输出
//!
//! 描述完整的测量台配置：数据管理器参数与模拟线程参数。

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ManagerConfig;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的测量台配置蓝图
///
/// 所有字段都有默认值，空文件即为合法配置。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct RigBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 数据管理器配置
    #[serde(default)]
    #[validate(nested)]
    pub manager: ManagerConfig,

    /// 模拟生产者/查询者配置
    #[serde(default)]
    #[validate(nested)]
    pub simulation: SimulationConfig,
}

/// 模拟线程配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SimulationConfig {
    /// 随机种子 (None = 每次运行随机)
    #[serde(default)]
    pub seed: Option<u64>,

    /// 密度生产者
    #[serde(default)]
    #[validate(nested)]
    pub density: DensityProducerConfig,

    /// 位置生产者
    #[serde(default)]
    #[validate(nested)]
    pub position: PositionProducerConfig,

    /// 查询线程
    #[serde(default)]
    #[validate(nested)]
    pub query: QueryConfig,
}

/// 样本间隔上限: 60 秒
pub const MAX_INTERVAL_US: i64 = 60_000_000;

/// 单次运行的查询次数上限
pub const MAX_QUERY_COUNT: u64 = 1_000_000;

/// 密度生产者配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DensityProducerConfig {
    /// 发送样本数
    pub samples: u64,

    /// 相邻样本时间戳间隔 (微秒)
    #[validate(range(
        min = 1,
        max = MAX_INTERVAL_US,
        message = "interval_us must be in 1..=60000000"
    ))]
    pub interval_us: i64,

    /// 每次发送后的休眠 (微秒, 0 = 不休眠)
    pub pause_us: u64,

    /// 密度取值上界 (不含)
    #[validate(range(min = 1, message = "max_value must be > 0"))]
    pub max_value: i32,
}

impl Default for DensityProducerConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            interval_us: 1000,
            pause_us: 500,
            max_value: 200,
        }
    }
}

/// 位置生产者配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PositionProducerConfig {
    /// 发送样本数
    pub samples: u64,

    /// 相邻样本时间戳间隔 (微秒)
    #[validate(range(
        min = 1,
        max = MAX_INTERVAL_US,
        message = "interval_us must be in 1..=60000000"
    ))]
    pub interval_us: i64,

    /// 每次发送后的休眠 (微秒, 0 = 不休眠)
    pub pause_us: u64,

    /// 每个样本前进的距离 (毫米)
    pub step_mm: i32,
}

impl Default for PositionProducerConfig {
    fn default() -> Self {
        Self {
            samples: 300,
            interval_us: 3000,
            pause_us: 1000,
            step_mm: 1,
        }
    }
}

/// 查询线程配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QueryConfig {
    /// 查询次数
    #[validate(range(max = MAX_QUERY_COUNT, message = "count must be <= 1000000"))]
    pub count: u64,

    /// 两次查询之间的休眠 (毫秒)
    pub pause_ms: u64,

    /// 查询区间下界 (毫米, 含)
    pub min_position_mm: i32,

    /// 查询区间上界 (毫米, 含)
    pub max_position_mm: i32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            count: 100,
            pause_ms: 100,
            min_position_mm: 10,
            max_position_mm: 200,
        }
    }
}
