// ==========================================
// 楼层配置中心 - 应用层
// ==========================================
// 职责: 组装各层实例, 供命令行与界面宿主使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
