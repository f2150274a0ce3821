// ==========================================
// 楼层配置中心 - 配置层
// ==========================================
// 职责: 系统配置管理, 默认值回退
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod store_settings;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use store_settings::{ReorderPolicy, StoreSettings};
