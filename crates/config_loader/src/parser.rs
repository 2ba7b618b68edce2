//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式。

use contracts::{ContractError, RigBlueprint};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<RigBlueprint, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<RigBlueprint, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<RigBlueprint, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{MedianAlgorithm, TrimPolicy};

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[manager]
window_us = 2000000
median = "full_sort"
trim_policy = "per_call"

[simulation.query]
min_position_mm = 0
max_position_mm = 50
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.manager.window_us, 2_000_000);
        assert_eq!(bp.manager.median, MedianAlgorithm::FullSort);
        assert_eq!(bp.manager.trim_policy, TrimPolicy::PerCall);
        assert_eq!(bp.simulation.query.max_position_mm, 50);
        // untouched sections keep their defaults
        assert_eq!(bp.simulation.density.samples, 1000);
    }

    #[test]
    fn test_parse_empty_toml() {
        let bp = parse_toml("").unwrap();
        assert_eq!(bp, RigBlueprint::default());
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "manager": { "median": "two_heap" },
            "simulation": {
                "seed": 7,
                "density": { "samples": 10, "pause_us": 0 },
                "position": { "samples": 5, "step_mm": 10 }
            }
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.simulation.seed, Some(7));
        assert_eq!(bp.simulation.position.step_mm, 10);
        assert_eq!(bp.simulation.position.interval_us, 3000);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_parse_unknown_median() {
        let content = "[manager]\nmedian = \"quickselect\"\n";
        assert!(matches!(
            parse_toml(content),
            Err(ContractError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
