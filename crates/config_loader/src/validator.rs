//! 配置校验模块
//!
//! 校验规则：
//! - 字段范围 (window_us > 0, interval_us > 0, max_value > 0)，由 `validator` derive 声明
//! - 查询区间 min_position_mm <= max_position_mm
//! - 查询线程存在时至少有一个生产者
//! - 每路生产者的最后一个时间戳 (samples * interval_us) 不溢出 i64

use contracts::{ContractError, RigBlueprint};
use ::validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// 校验 RigBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &RigBlueprint) -> Result<(), ContractError> {
    validate_field_ranges(blueprint)?;
    validate_query_range(blueprint)?;
    validate_producers(blueprint)?;
    validate_stream_spans(blueprint)?;
    Ok(())
}

/// 校验 derive 声明的字段范围
fn validate_field_ranges(blueprint: &RigBlueprint) -> Result<(), ContractError> {
    blueprint.validate().map_err(|errors| {
        let (field, message) = first_violation(&errors, "")
            .unwrap_or_else(|| ("blueprint".to_string(), errors.to_string()));
        ContractError::config_validation(field, message)
    })
}

/// 取出第一个违规字段的路径和信息
fn first_violation(errors: &ValidationErrors, prefix: &str) -> Option<(String, String)> {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(err) = list.first() {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    return Some((path, message));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                if let Some(found) = first_violation(inner, &path) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    if let Some(found) = first_violation(inner, &format!("{path}[{idx}]")) {
                        return Some(found);
                    }
                }
            }
        }
    }
    None
}

/// 校验查询区间
fn validate_query_range(blueprint: &RigBlueprint) -> Result<(), ContractError> {
    let query = &blueprint.simulation.query;

    if query.min_position_mm > query.max_position_mm {
        return Err(ContractError::config_validation(
            "simulation.query.min_position_mm / simulation.query.max_position_mm",
            format!(
                "min_position_mm ({}) must be <= max_position_mm ({})",
                query.min_position_mm, query.max_position_mm
            ),
        ));
    }

    Ok(())
}

/// 校验生产者数量
fn validate_producers(blueprint: &RigBlueprint) -> Result<(), ContractError> {
    let sim = &blueprint.simulation;

    if sim.query.count > 0 && sim.density.samples == 0 && sim.position.samples == 0 {
        return Err(ContractError::config_validation(
            "simulation",
            "queries configured but both producers send zero samples",
        ));
    }

    Ok(())
}

/// 校验时间戳跨度
fn validate_stream_spans(blueprint: &RigBlueprint) -> Result<(), ContractError> {
    let sim = &blueprint.simulation;
    let streams = [
        ("simulation.density.samples", sim.density.samples, sim.density.interval_us),
        ("simulation.position.samples", sim.position.samples, sim.position.interval_us),
    ];

    for (field, samples, interval_us) in streams {
        let span = i64::try_from(samples)
            .ok()
            .and_then(|n| n.checked_mul(interval_us));
        if span.is_none() {
            return Err(ContractError::config_validation(
                field,
                format!("{samples} samples at {interval_us} us overflow the timestamp range"),
            ));
        }
    }

    Ok(())
}
