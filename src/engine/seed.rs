// ==========================================
// 楼层配置中心 - 渠道初始配置
// ==========================================
// 首次使用某渠道时生成: 1 个 banner 楼层 + 1 张默认图片
// 客群 all / 状态 active / 有效期 now .. now + N 天
// ==========================================

use crate::domain::floor::{ActionConfig, Floor, FloorImage, PageConfig};
use crate::domain::types::{Channel, CustomerSegment, FloorStatus, FloorType};
use crate::engine::identity::{days_from_now_string, generate_id, now_string};

/// 默认有效期（天）
pub const DEFAULT_SEED_VALIDITY_DAYS: i64 = 30;

/// 有效期上限（天）
pub const MAX_SEED_VALIDITY_DAYS: i64 = 36_500;

/// 默认推广链接
pub const DEFAULT_PROMOTION_LINK: &str = "https://example.com/promotion";

fn page_name(channel: Channel) -> &'static str {
    match channel {
        Channel::Mobile => "手机银行首页",
        Channel::Web => "网上银行首页",
    }
}

fn seed_floor_name(channel: Channel) -> &'static str {
    match channel {
        Channel::Mobile => "春节大促",
        Channel::Web => "理财产品推荐",
    }
}

fn placeholder_image_url(channel: Channel) -> &'static str {
    match channel {
        Channel::Mobile => "https://via.placeholder.com/800x400?text=Mobile+Banner",
        Channel::Web => "https://via.placeholder.com/1200x400?text=Web+Banner",
    }
}

/// 创建渠道初始页面配置
pub fn create_initial_page_config(channel: Channel, validity_days: i64) -> PageConfig {
    let now = now_string();

    let image = FloorImage {
        id: generate_id(),
        url: placeholder_image_url(channel).to_string(),
        action: ActionConfig::h5(DEFAULT_PROMOTION_LINK),
        alt: "促销活动".to_string(),
        order: 1,
        strategy: None,
        tracking: None,
    };

    let floor = Floor {
        id: generate_id(),
        name: seed_floor_name(channel).to_string(),
        floor_type: FloorType::Banner,
        images: vec![image],
        customer_segments: vec![CustomerSegment::All],
        priority: 1,
        start_time: now.clone(),
        end_time: days_from_now_string(validity_days),
        status: FloorStatus::Active,
        created_at: now.clone(),
        updated_at: now.clone(),
    };

    PageConfig {
        id: generate_id(),
        channel,
        page_name: page_name(channel).to_string(),
        floors: vec![floor],
        created_at: now.clone(),
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::identity::parse_time;

    #[test]
    fn test_seed_contract() {
        let config = create_initial_page_config(Channel::Web, DEFAULT_SEED_VALIDITY_DAYS);

        assert_eq!(config.channel, Channel::Web);
        assert_eq!(config.page_name, "网上银行首页");
        assert_eq!(config.floors.len(), 1);

        let floor = &config.floors[0];
        assert_eq!(floor.floor_type, FloorType::Banner);
        assert_eq!(floor.priority, 1);
        assert_eq!(floor.customer_segments, vec![CustomerSegment::All]);
        assert_eq!(floor.status, FloorStatus::Active);
        assert_eq!(floor.images.len(), 1);
        assert_eq!(floor.images[0].order, 1);
        assert!(floor.images[0].url.contains("1200x400"));

        let start = parse_time(&floor.start_time).unwrap();
        let end = parse_time(&floor.end_time).unwrap();
        assert!(end > start);
    }
}
