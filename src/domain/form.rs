// ==========================================
// 楼层配置中心 - 表单数据
// ==========================================
// 编辑端提交的结构化输入; Store 不做校验
// ==========================================

use crate::domain::floor::{ActionConfig, StrategyConfig, TrackingConfig};
use crate::domain::types::{CustomerSegment, FloorStatus, FloorType};
use serde::{Deserialize, Serialize};

/// 楼层表单数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorFormData {
    pub name: String,
    #[serde(rename = "type")]
    pub floor_type: FloorType,
    pub customer_segments: Vec<CustomerSegment>,
    pub start_time: String,
    pub end_time: String,
    pub status: FloorStatus,
}

/// 图片表单数据
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorImageFormData {
    pub url: String,
    #[serde(default)]
    pub action: ActionConfig,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub strategy: Option<StrategyConfig>,
    #[serde(default)]
    pub tracking: Option<TrackingConfig>,
}

impl FloorImageFormData {
    /// 旧版表单 (url + linkUrl + alt) 的便捷构造
    pub fn with_link(url: impl Into<String>, link_url: impl Into<String>, alt: impl Into<String>) -> Self {
        let link_url = link_url.into();
        let action = if link_url.trim().is_empty() {
            ActionConfig::none()
        } else {
            ActionConfig::h5(link_url)
        };
        Self {
            url: url.into(),
            action,
            alt: alt.into(),
            strategy: None,
            tracking: None,
        }
    }
}
