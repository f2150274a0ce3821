// ==========================================
// 楼层配置中心 - 引擎层
// ==========================================
// 职责: 无状态的纯函数工具
// 顺序编号 / 标识与时间 / 客群筛选 / 初始配置 / 旧版迁移 / 变更事件
// ==========================================

pub mod events;
pub mod identity;
pub mod migration;
pub mod ordering;
pub mod seed;
pub mod segment_filter;

pub use events::{
    FnSubscriber, NoOpSubscriber, StoreEvent, StoreEventType, StoreSubscriber, SubscriberList,
    SubscriptionId,
};
pub use ordering::{is_dense, renumber, sort_by_position, Positioned};
pub use segment_filter::{filter_by_segment, matches_segment};
