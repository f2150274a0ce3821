// ==========================================
// 楼层配置中心 - API 层
// ==========================================
// 职责: 面向展示侧的接口, 校验输入并转换错误
// ==========================================

pub mod error;
pub mod floor_api;
pub mod preview;
pub mod validator;

// 重导出
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use floor_api::FloorApi;
pub use preview::{PreviewContext, PreviewFloor, PreviewImage};
