// ==========================================
// 楼层配置中心 - 表单校验器
// ==========================================
// 职责: 楼层/图片表单进入 Store 前的基础校验
// 说明: Store 本身不校验业务内容, 校验只在 API 层发生
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::floor::ActionConfig;
use crate::domain::form::{FloorFormData, FloorImageFormData};
use crate::engine::identity::parse_time;
use crate::i18n::{t, t_with_args};

/// 校验楼层表单
///
/// # 规则
/// - 名称去除空白后不能为空
/// - 开始/结束时间均可解析时, 开始不得晚于结束
pub fn validate_floor_form(form: &FloorFormData) -> ApiResult<()> {
    if form.name.trim().is_empty() {
        return Err(ApiError::ValidationError(t("validation.floor_name_required")));
    }
    validate_time_range(&form.start_time, &form.end_time)
}

/// 校验图片表单
///
/// # 规则
/// - 图片地址不能为空
/// - 需要跳转地址的动作类型必须带 url
/// - 投放策略时间窗同楼层规则
pub fn validate_image_form(form: &FloorImageFormData) -> ApiResult<()> {
    if form.url.trim().is_empty() {
        return Err(ApiError::ValidationError(t("validation.image_url_required")));
    }
    validate_action(&form.action)?;

    if let Some(strategy) = &form.strategy {
        if let (Some(start), Some(end)) = (&strategy.start_time, &strategy.end_time) {
            validate_time_range(start, end)?;
        }
    }
    Ok(())
}

pub fn validate_action(action: &ActionConfig) -> ApiResult<()> {
    let has_url = action.url.as_deref().is_some_and(|url| !url.trim().is_empty());
    if action.action_type.requires_url() && !has_url {
        return Err(ApiError::ValidationError(t_with_args(
            "validation.action_url_required",
            &[("action", action.action_type.as_str())],
        )));
    }
    Ok(())
}

/// 时间无法解析时不做比较（沿用原值）
fn validate_time_range(start: &str, end: &str) -> ApiResult<()> {
    if let (Some(s), Some(e)) = (parse_time(start), parse_time(end)) {
        if s > e {
            return Err(ApiError::ValidationError(t_with_args(
                "validation.time_range_invalid",
                &[("start", start), ("end", end)],
            )));
        }
    }
    Ok(())
}
