use crate::domain::floor::PageConfig;
use crate::domain::types::Channel;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// StoreSnapshot - 不可变配置快照
// ==========================================
// 发布后不再修改; 读者持有 Arc 即可安全读取
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub generation: u64,
    pub page_configs: Vec<PageConfig>,
}

impl StoreSnapshot {
    pub fn page_config(&self, channel: Channel) -> Option<&PageConfig> {
        self.page_configs.iter().find(|config| config.channel == channel)
    }
}

// ==========================================
// 变更结果
// ==========================================

/// 变更未执行的原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    PageConfigMissing { channel: Channel },
    FloorNotFound { floor_id: String },
    ImageNotFound { floor_id: String, image_id: String },
    /// REJECT_PARTIAL 策略下, ID 列表未覆盖全部条目
    PartialReorderRejected { expected: usize, matched: usize },
    /// 导入列表中没有属于该渠道的记录
    NothingToImport { channel: Channel },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::PageConfigMissing { channel } => write!(f, "渠道 {} 无页面配置", channel),
            SkipReason::FloorNotFound { floor_id } => write!(f, "楼层不存在: {}", floor_id),
            SkipReason::ImageNotFound { floor_id, image_id } => {
                write!(f, "图片不存在: floor={}, image={}", floor_id, image_id)
            }
            SkipReason::PartialReorderRejected { expected, matched } => {
                write!(f, "重排列表不完整: 期望 {} 项, 匹配 {} 项", expected, matched)
            }
            SkipReason::NothingToImport { channel } => write!(f, "渠道 {} 无可导入记录", channel),
        }
    }
}

/// 变更结果
///
/// - Applied: 已生效（target_id 为新建或受影响的实体 ID）
/// - Skipped: 未做任何改动, 未持久化, 未通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationOutcome {
    Applied { target_id: String },
    Skipped(SkipReason),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }

    /// 已生效时返回目标 ID
    pub fn target_id(&self) -> Option<&str> {
        match self {
            MutationOutcome::Applied { target_id } => Some(target_id),
            MutationOutcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            MutationOutcome::Applied { .. } => None,
            MutationOutcome::Skipped(reason) => Some(reason),
        }
    }
}
