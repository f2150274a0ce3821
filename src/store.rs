// ==========================================
// 楼层配置中心 - 配置状态存储
// ==========================================
// 职责: 独占整棵渠道配置树, 提供查询与变更操作
// 红线: 每次变更后 priority / order 必须为 1..N 连续编号
// 流程: 构建完整新树 → 原子替换根引用 → 持久化 → 同步通知订阅者
// ==========================================

mod core;
mod floor_ops;
mod image_ops;
mod types;


pub use core::FloorStore;
pub use types::{MutationOutcome, SkipReason, StoreSnapshot};
