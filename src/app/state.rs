// ==========================================
// 楼层配置中心 - 应用状态
// ==========================================
// 职责: 组装数据库 / 配置 / Store / API, 管理共享实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::FloorApi;
use crate::config::config_manager::ConfigManager;
use crate::config::store_settings::StoreSettings;
use crate::db::open_sqlite_connection;
use crate::repository::background_writer::BackgroundSnapshotWriter;
use crate::repository::snapshot_repo::{SnapshotPersistence, SqliteSnapshotRepository};
use crate::store::FloorStore;
use tokio::runtime::Handle;

/// 应用状态
///
/// 包含共享的 Store、配置管理器与 API 实例
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 启动时加载的运行参数
    pub settings: StoreSettings,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 配置状态存储
    pub store: Arc<FloorStore>,

    /// 楼层配置API
    pub floor_api: Arc<FloorApi>,

    /// 后台快照写入器（仅 with_background_writer 创建时存在）
    writer: Option<Arc<BackgroundSnapshotWriter>>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并初始化表结构
    /// 2. 读取运行参数并应用语言
    /// 3. 加载快照并打开 Store（为缺失渠道生成初始配置）
    /// 4. 创建 API 实例
    ///
    /// 快照在变更路径上同步写入 SQLite
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::build(db_path, None)
    }

    /// 创建使用后台快照写入的AppState实例
    ///
    /// # 说明
    /// - 写入任务运行在给定的 tokio 运行时上, 变更路径只入队
    /// - 写入失败经 Store 广播为 PersistFailed 事件
    /// - 退出前调用 flush_pending_writes 确保落盘
    pub fn with_background_writer(db_path: String, handle: &Handle) -> Result<Self, String> {
        Self::build(db_path, Some(handle))
    }

    /// 等待已入队的快照写入完成（同步写入模式下直接返回）
    pub async fn flush_pending_writes(&self) -> Result<(), String> {
        match &self.writer {
            Some(writer) => writer
                .flush()
                .await
                .map_err(|e| format!("后台写入刷新失败: {}", e)),
            None => Ok(()),
        }
    }

    fn build(db_path: String, handle: Option<&Handle>) -> Result<Self, String> {
        tracing::info!(
            background_writer = handle.is_some(),
            "初始化AppState，数据库路径: {}",
            db_path
        );

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置层
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let settings = config_manager
            .load_store_settings()
            .map_err(|e| format!("无法加载运行参数: {}", e))?;
        crate::i18n::set_locale(&settings.locale);

        // ==========================================
        // 仓储层与 Store
        // ==========================================
        let repository = Arc::new(
            SqliteSnapshotRepository::from_connection(conn, settings.storage_key.clone())
                .map_err(|e| format!("无法创建SqliteSnapshotRepository: {}", e))?,
        );
        let writer = handle.map(|handle| {
            let (writer, _task) = BackgroundSnapshotWriter::spawn(repository.clone(), handle);
            Arc::new(writer)
        });
        let persistence: Arc<dyn SnapshotPersistence> = match &writer {
            Some(writer) => writer.clone(),
            None => repository,
        };

        let store = Arc::new(
            FloorStore::open(persistence, settings.clone())
                .map_err(|e| format!("无法加载楼层配置: {}", e))?,
        );
        if let Some(writer) = &writer {
            writer.set_failure_hook(store.persist_failure_hook());
        }

        let floor_api = Arc::new(FloorApi::new(store.clone()));

        tracing::info!(
            generation = store.generation(),
            storage_key = %settings.storage_key,
            reorder_policy = %settings.reorder_policy,
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            settings,
            config_manager,
            store,
            floor_api,
            writer,
        })
    }
}

/// 获取默认数据库路径
///
/// # 说明
/// - 环境变量 FLOOR_CONFIG_DB_PATH 优先
/// - 否则使用用户数据目录下的 floor-config/floor_config.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("FLOOR_CONFIG_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./floor_config.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("floor-config-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("floor-config");
        }

        if let Err(e) = std::fs::create_dir_all(&path) {
            tracing::warn!("无法创建数据目录 {:?}: {}", path, e);
        }
        path = path.join("floor_config.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    // AppState::new() 需要真实的数据库文件, 见 tests/app_state_test.rs
}
