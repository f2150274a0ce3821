// ==========================================
// 楼层配置中心 - 旧版数据迁移
// ==========================================
// 1. 图片 linkUrl → action (加载快照时执行一次)
// 2. 旧版单图广告楼层 AdFloor → ad 类型楼层
// ==========================================

use crate::domain::floor::{ActionConfig, Floor, FloorImage};
use crate::domain::legacy::AdFloor;
use crate::domain::types::{CustomerSegment, FloorType};
use crate::engine::identity::{generate_id, now_string};
use serde_json::{json, Value};

/// 当前快照版本 (0 = 旧版 linkUrl 图片)
pub const SNAPSHOT_VERSION: u64 = 1;

fn legacy_link_to_action(link_url: Option<&str>) -> Value {
    match link_url.map(str::trim) {
        Some(link) if !link.is_empty() => json!({ "type": "h5", "url": link }),
        _ => json!({ "type": "none" }),
    }
}

/// 将 pageConfigs 数组中的旧版图片迁移为 action 结构
///
/// # 返回
/// - 迁移的图片数量
///
/// # 说明
/// 已有 action 的图片只移除残留的 linkUrl 字段
pub fn migrate_legacy_images(page_configs: &mut Value) -> usize {
    let mut migrated = 0;

    let Some(configs) = page_configs.as_array_mut() else {
        return 0;
    };

    for config in configs.iter_mut() {
        let Some(floors) = config.get_mut("floors").and_then(Value::as_array_mut) else {
            continue;
        };
        for floor in floors.iter_mut() {
            let Some(images) = floor.get_mut("images").and_then(Value::as_array_mut) else {
                continue;
            };
            for image in images.iter_mut() {
                let Some(obj) = image.as_object_mut() else {
                    continue;
                };
                let link = obj.remove("linkUrl");
                if obj.contains_key("action") {
                    continue;
                }
                let action = legacy_link_to_action(link.as_ref().and_then(Value::as_str));
                obj.insert("action".to_string(), action);
                migrated += 1;
            }
        }
    }

    migrated
}

/// 旧版广告楼层转换为楼层
///
/// 说明: priority 沿用旧值, 调用方负责最终重新编号
pub fn ad_floor_into_floor(ad: &AdFloor) -> Floor {
    let action = if ad.link_url.trim().is_empty() {
        ActionConfig::none()
    } else {
        ActionConfig::h5(ad.link_url.clone())
    };

    Floor {
        id: generate_id(),
        name: ad.title.clone(),
        floor_type: FloorType::Ad,
        images: vec![FloorImage {
            id: generate_id(),
            url: ad.image_url.clone(),
            action,
            alt: ad.title.clone(),
            order: 1,
            strategy: None,
            tracking: None,
        }],
        customer_segments: vec![CustomerSegment::All],
        priority: ad.priority.max(1) as u32,
        start_time: ad.start_time.clone(),
        end_time: ad.end_time.clone(),
        status: ad.status,
        created_at: ad.created_at.clone(),
        updated_at: now_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ActionType, Channel, FloorStatus};

    #[test]
    fn test_migrate_legacy_images() {
        let mut configs = json!([{
            "floors": [{
                "images": [
                    { "id": "a", "url": "u1", "linkUrl": "https://x.com", "alt": "", "order": 1 },
                    { "id": "b", "url": "u2", "linkUrl": "", "alt": "", "order": 2 },
                    { "id": "c", "url": "u3", "action": { "type": "program" }, "alt": "", "order": 3 }
                ]
            }]
        }]);

        let migrated = migrate_legacy_images(&mut configs);
        assert_eq!(migrated, 2);

        let images = &configs[0]["floors"][0]["images"];
        assert_eq!(images[0]["action"]["type"], "h5");
        assert_eq!(images[0]["action"]["url"], "https://x.com");
        assert!(images[0].get("linkUrl").is_none());
        assert_eq!(images[1]["action"]["type"], "none");
        assert_eq!(images[2]["action"]["type"], "program");
    }

    #[test]
    fn test_migrate_non_array_is_noop() {
        let mut value = json!({ "floors": [] });
        assert_eq!(migrate_legacy_images(&mut value), 0);
    }

    #[test]
    fn test_ad_floor_into_floor() {
        let ad = AdFloor {
            id: "ad1".to_string(),
            channel: Channel::Mobile,
            title: "信用卡开卡礼".to_string(),
            image_url: "https://img/ad.png".to_string(),
            link_url: "https://example.com/card".to_string(),
            priority: 0,
            start_time: "2026-01-01 00:00:00".to_string(),
            end_time: "2026-02-01 00:00:00".to_string(),
            status: FloorStatus::Inactive,
            created_at: "2025-12-01 08:00:00".to_string(),
            updated_at: "2025-12-01 08:00:00".to_string(),
        };

        let floor = ad_floor_into_floor(&ad);
        assert_ne!(floor.id, ad.id);
        assert_eq!(floor.floor_type, FloorType::Ad);
        assert_eq!(floor.name, "信用卡开卡礼");
        assert_eq!(floor.priority, 1);
        assert_eq!(floor.status, FloorStatus::Inactive);
        assert_eq!(floor.images.len(), 1);
        assert_eq!(floor.images[0].action.action_type, ActionType::H5);
        assert_eq!(floor.created_at, ad.created_at);
    }
}
