// ==========================================
// 楼层配置中心 - 预览视图
// ==========================================
// 职责: 按客群与可选时间条件生成展示侧楼层视图
// 说明: 生效时间/状态判断只在调用方请求时执行, Store 不做强制
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::floor::{ActionConfig, Floor, FloorImage};
use crate::domain::options::{floor_type_icon, floor_type_label, status_label};
use crate::domain::types::{CustomerSegment, FloorStatus, FloorType};
use crate::engine::identity::parse_time;
use crate::engine::ordering::sort_by_position;

/// 预览条件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewContext {
    pub segment: CustomerSegment,
    /// 仅展示启用状态的楼层
    #[serde(default)]
    pub active_only: bool,
    /// 评估时刻 (YYYY-MM-DD HH:MM:SS); 为空时不判断时间窗
    #[serde(default)]
    pub at: Option<String>,
}

impl Default for PreviewContext {
    fn default() -> Self {
        Self {
            segment: CustomerSegment::All,
            active_only: false,
            at: None,
        }
    }
}

impl PreviewContext {
    pub fn for_segment(segment: CustomerSegment) -> Self {
        Self {
            segment,
            ..Self::default()
        }
    }
}

/// 预览楼层
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewFloor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub floor_type: FloorType,
    pub type_label: String,
    pub icon: String,
    pub priority: u32,
    pub status: FloorStatus,
    pub status_label: String,
    pub images: Vec<PreviewImage>,
}

/// 预览图片（按 order 升序）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewImage {
    pub id: String,
    pub url: String,
    pub alt: String,
    pub order: u32,
    pub action: ActionConfig,
}

impl From<&FloorImage> for PreviewImage {
    fn from(image: &FloorImage) -> Self {
        Self {
            id: image.id.clone(),
            url: image.url.clone(),
            alt: image.alt.clone(),
            order: image.order,
            action: image.action.clone(),
        }
    }
}

/// 由已按客群筛选、按 priority 排好序的楼层生成预览
pub fn build_preview(floors: Vec<Floor>, ctx: &PreviewContext) -> Vec<PreviewFloor> {
    let at = ctx.at.as_deref().and_then(parse_time);
    if ctx.at.is_some() && at.is_none() {
        tracing::warn!(at = ?ctx.at, "预览时刻无法解析, 忽略时间窗判断");
    }

    floors
        .into_iter()
        .filter(|floor| !ctx.active_only || floor.status == FloorStatus::Active)
        .filter(|floor| at.map_or(true, |at| within(at, &floor.start_time, &floor.end_time)))
        .map(|floor| {
            let images = sort_by_position(&floor.images)
                .iter()
                .filter(|image| at.map_or(true, |at| image_visible_at(image, at)))
                .map(PreviewImage::from)
                .collect();
            PreviewFloor {
                type_label: floor_type_label(floor.floor_type),
                icon: floor_type_icon(floor.floor_type).to_string(),
                status_label: status_label(floor.status),
                id: floor.id,
                name: floor.name,
                floor_type: floor.floor_type,
                priority: floor.priority,
                status: floor.status,
                images,
            }
        })
        .collect()
}

/// 时间窗判断; 无法解析的边界视为不限
fn within(at: NaiveDateTime, start: &str, end: &str) -> bool {
    let after_start = parse_time(start).map_or(true, |s| s <= at);
    let before_end = parse_time(end).map_or(true, |e| at <= e);
    after_start && before_end
}

fn image_visible_at(image: &FloorImage, at: NaiveDateTime) -> bool {
    match &image.strategy {
        Some(strategy) => within(
            at,
            strategy.start_time.as_deref().unwrap_or(""),
            strategy.end_time.as_deref().unwrap_or(""),
        ),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::floor::StrategyConfig;

    fn floor(id: &str, priority: u32, status: FloorStatus, start: &str, end: &str) -> Floor {
        Floor {
            id: id.to_string(),
            name: id.to_string(),
            floor_type: FloorType::Banner,
            images: vec![],
            customer_segments: vec![CustomerSegment::All],
            priority,
            start_time: start.to_string(),
            end_time: end.to_string(),
            status,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn image(id: &str, order: u32, strategy: Option<StrategyConfig>) -> FloorImage {
        FloorImage {
            id: id.to_string(),
            url: format!("https://img/{}.png", id),
            action: ActionConfig::none(),
            alt: String::new(),
            order,
            strategy,
            tracking: None,
        }
    }

    #[test]
    fn test_preview_without_conditions_keeps_everything() {
        let floors = vec![
            floor("a", 1, FloorStatus::Inactive, "2020-01-01 00:00:00", "2020-02-01 00:00:00"),
            floor("b", 2, FloorStatus::Active, "", ""),
        ];
        let preview = build_preview(floors, &PreviewContext::default());
        let ids: Vec<&str> = preview.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(preview[0].icon, "🎠");
    }

    #[test]
    fn test_preview_active_only_and_time_window() {
        let floors = vec![
            floor("expired", 1, FloorStatus::Active, "2020-01-01 00:00:00", "2020-02-01 00:00:00"),
            floor("off", 2, FloorStatus::Inactive, "2026-01-01 00:00:00", "2026-12-31 00:00:00"),
            floor("live", 3, FloorStatus::Active, "2026-01-01 00:00:00", "2026-12-31 00:00:00"),
            floor("open", 4, FloorStatus::Active, "", ""),
        ];
        let ctx = PreviewContext {
            segment: CustomerSegment::All,
            active_only: true,
            at: Some("2026-06-01 12:00:00".to_string()),
        };
        let ids: Vec<String> = build_preview(floors, &ctx).into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec!["live", "open"]);
    }

    #[test]
    fn test_preview_images_sorted_and_filtered_by_strategy() {
        let mut f = floor("a", 1, FloorStatus::Active, "", "");
        f.images = vec![
            image("second", 2, None),
            image(
                "ended",
                3,
                Some(StrategyConfig {
                    priority: 0,
                    start_time: None,
                    end_time: Some("2026-01-01 00:00:00".to_string()),
                    target_tags: vec![],
                }),
            ),
            image("first", 1, None),
        ];

        let all = build_preview(vec![f.clone()], &PreviewContext::default());
        let ids: Vec<&str> = all[0].images.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "ended"]);

        let ctx = PreviewContext {
            at: Some("2026-06-01 00:00:00".to_string()),
            ..PreviewContext::default()
        };
        let live = build_preview(vec![f], &ctx);
        let ids: Vec<&str> = live[0].images.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }
}
