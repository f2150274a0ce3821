// ==========================================
// 楼层配置中心 - 领域模型层
// ==========================================
// 职责: 定义页面配置 / 楼层 / 图片实体与枚举类型
// 红线: 不含存储逻辑, 不含排序与变更逻辑
// ==========================================

pub mod floor;
pub mod form;
pub mod legacy;
pub mod options;
pub mod types;

// 重导出核心类型
pub use floor::{
    ActionConfig, Floor, FloorImage, Identified, PageConfig, StrategyConfig, TrackingConfig,
};
pub use form::{FloorFormData, FloorImageFormData};
pub use legacy::AdFloor;
pub use options::{customer_segment_options, floor_type_options, CustomerSegmentOption, FloorTypeOption};
pub use types::{ActionType, Channel, CustomerSegment, FloorStatus, FloorType};
