// ==========================================
// 楼层配置中心 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 渠道首页楼层/图片配置的状态存储
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 排序/种子/迁移/事件
pub mod engine;

// 数据仓储层 - 快照持久化
pub mod repository;

// 配置层 - 运行参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 状态存储
pub mod store;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 展示侧接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ActionType, Channel, CustomerSegment, FloorStatus, FloorType};

// 领域实体
pub use domain::{
    ActionConfig, AdFloor, Floor, FloorFormData, FloorImage, FloorImageFormData, PageConfig,
    StrategyConfig, TrackingConfig,
};

// 存储
pub use store::{FloorStore, MutationOutcome, SkipReason, StoreSnapshot};

// 持久化
pub use repository::{
    BackgroundSnapshotWriter, InMemorySnapshotRepository, SnapshotPersistence,
    SqliteSnapshotRepository,
};

// API
pub use api::{ApiError, ApiResult, FloorApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "楼层配置中心";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!APP_NAME.is_empty());
    }
}
