// ==========================================
// 楼层配置中心 - 楼层与图片领域模型
// ==========================================
// 红线: priority / order 均为 1 起始、连续、唯一
// 对齐: 持久化快照字段名 (camelCase)
// ==========================================

use crate::domain::types::{ActionType, CustomerSegment, FloorStatus, FloorType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 拥有唯一 ID 的实体
pub trait Identified {
    fn id(&self) -> &str;
}

// ==========================================
// ActionConfig - 点击跳转配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfig {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,
}

impl ActionConfig {
    /// 不跳转
    pub fn none() -> Self {
        Self::default()
    }

    /// H5 网页跳转
    pub fn h5(url: impl Into<String>) -> Self {
        Self {
            action_type: ActionType::H5,
            url: Some(url.into()),
            params: None,
        }
    }
}

// ==========================================
// StrategyConfig - 图片级投放策略
// ==========================================
// 与楼层级客群独立; 时间范围可为空
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyConfig {
    pub priority: i32,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub target_tags: Vec<String>,
}

// ==========================================
// TrackingConfig - 埋点配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingConfig {
    #[serde(default)]
    pub click_id: Option<String>,
    #[serde(default)]
    pub exposure_id: Option<String>,
}

// ==========================================
// FloorImage - 楼层图片项
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorImage {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub action: ActionConfig,
    pub alt: String,
    pub order: u32, // 播放顺序 (1..=M)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking: Option<TrackingConfig>,
}

// ==========================================
// Floor - 楼层
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub floor_type: FloorType,
    pub images: Vec<FloorImage>,
    pub customer_segments: Vec<CustomerSegment>,
    pub priority: u32, // 展示顺序 (1..=N)
    pub start_time: String,
    pub end_time: String,
    pub status: FloorStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Floor {
    pub fn find_image(&self, image_id: &str) -> Option<&FloorImage> {
        self.images.iter().find(|img| img.id == image_id)
    }

    pub fn has_image(&self, image_id: &str) -> bool {
        self.find_image(image_id).is_some()
    }
}

impl Identified for Floor {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for FloorImage {
    fn id(&self) -> &str {
        &self.id
    }
}

// ==========================================
// PageConfig - 渠道页面配置
// ==========================================
// 每个渠道唯一; 由 Store 独占
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub id: String,
    pub channel: crate::domain::types::Channel,
    pub page_name: String,
    pub floors: Vec<Floor>,
    pub created_at: String,
    pub updated_at: String,
}

impl PageConfig {
    pub fn find_floor(&self, floor_id: &str) -> Option<&Floor> {
        self.floors.iter().find(|f| f.id == floor_id)
    }

    pub fn find_floor_mut(&mut self, floor_id: &str) -> Option<&mut Floor> {
        self.floors.iter_mut().find(|f| f.id == floor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_config_json_shape() {
        let action = ActionConfig::h5("https://example.com");
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "h5");
        assert_eq!(json["url"], "https://example.com");
        assert!(json.get("params").is_none());
    }

    #[test]
    fn test_image_without_action_defaults_to_none() {
        let raw = r#"{"id":"i1","url":"u","alt":"a","order":1}"#;
        let image: FloorImage = serde_json::from_str(raw).unwrap();
        assert_eq!(image.action, ActionConfig::none());
        assert!(image.strategy.is_none());
    }
}
