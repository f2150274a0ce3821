// ==========================================
// 楼层配置中心 - Store 运行参数
// ==========================================
// 由 ConfigManager 从 config_kv 加载, 启动后不可变
// ==========================================

use crate::engine::seed::DEFAULT_SEED_VALIDITY_DAYS;
use crate::repository::snapshot_repo::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 默认复制后缀
pub const DEFAULT_DUPLICATE_SUFFIX: &str = " (副本)";

/// 默认语言
pub const DEFAULT_LOCALE: &str = "zh-CN";

// ==========================================
// ReorderPolicy - 重排时遗漏 ID 的处理策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReorderPolicy {
    /// 未出现在 ID 列表中的条目被移除
    #[default]
    DropMissing,
    /// ID 列表未覆盖全部条目时拒绝整个操作
    RejectPartial,
}

impl ReorderPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "DROP_MISSING" => Some(ReorderPolicy::DropMissing),
            "REJECT_PARTIAL" => Some(ReorderPolicy::RejectPartial),
            _ => None,
        }
    }
}

impl fmt::Display for ReorderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReorderPolicy::DropMissing => write!(f, "DROP_MISSING"),
            ReorderPolicy::RejectPartial => write!(f, "REJECT_PARTIAL"),
        }
    }
}

// ==========================================
// StoreSettings
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub seed_validity_days: i64,
    pub duplicate_name_suffix: String,
    pub reorder_policy: ReorderPolicy,
    pub storage_key: String,
    pub locale: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            seed_validity_days: DEFAULT_SEED_VALIDITY_DAYS,
            duplicate_name_suffix: DEFAULT_DUPLICATE_SUFFIX.to_string(),
            reorder_policy: ReorderPolicy::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl StoreSettings {
    pub fn with_reorder_policy(mut self, policy: ReorderPolicy) -> Self {
        self.reorder_policy = policy;
        self
    }
}
