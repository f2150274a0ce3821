// ==========================================
// 楼层配置中心 - 旧版广告楼层
// ==========================================
// 单图广告位 (保持向后兼容), 导入时转换为 ad 类型楼层
// ==========================================

use crate::domain::types::{Channel, FloorStatus};
use serde::{Deserialize, Serialize};

/// 旧版广告楼层
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdFloor {
    pub id: String,
    pub channel: Channel,
    pub title: String,
    pub image_url: String,
    pub link_url: String,
    pub priority: i32,
    pub start_time: String,
    pub end_time: String,
    pub status: FloorStatus,
    pub created_at: String,
    pub updated_at: String,
}
