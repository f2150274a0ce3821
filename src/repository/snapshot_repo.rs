// ==========================================
// 楼层配置中心 - 配置快照仓储
// ==========================================
// 职责: 整棵配置树的 load / save
// 存储: kv_store 表, 单行 JSON 文档
// 格式: {"state":{"pageConfigs":[...]},"version":N}
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::floor::PageConfig;
use crate::engine::migration::{migrate_legacy_images, SNAPSHOT_VERSION};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 默认存储键
pub const DEFAULT_STORAGE_KEY: &str = "floor-storage";

// ==========================================
// 持久化契约
// ==========================================

/// 配置快照持久化
///
/// # 约定
/// - load: 启动时调用一次; None 表示尚无数据
/// - save: 每次变更后调用; 不保证原子性, 崩溃时允许丢失最后一次写入
pub trait SnapshotPersistence: Send + Sync {
    fn load(&self) -> RepositoryResult<Option<Vec<PageConfig>>>;
    fn save(&self, page_configs: &[PageConfig]) -> RepositoryResult<()>;
}

// ==========================================
// 快照编解码
// ==========================================

/// 编码为带版本的快照文档
pub fn encode_snapshot(page_configs: &[PageConfig]) -> RepositoryResult<String> {
    let document = json!({
        "state": { "pageConfigs": serde_json::to_value(page_configs)? },
        "version": SNAPSHOT_VERSION,
    });
    Ok(serde_json::to_string(&document)?)
}

/// 解码快照文档（必要时迁移旧版图片字段）
pub fn decode_snapshot(raw: &str) -> RepositoryResult<Vec<PageConfig>> {
    let mut document: Value = serde_json::from_str(raw)?;

    let version = document.get("version").and_then(Value::as_u64).unwrap_or(0);
    if version > SNAPSHOT_VERSION {
        return Err(RepositoryError::UnsupportedSnapshotVersion {
            found: version,
            supported: SNAPSHOT_VERSION,
        });
    }

    let mut configs = document
        .get_mut("state")
        .and_then(|state| state.get_mut("pageConfigs"))
        .map(Value::take)
        .ok_or_else(|| RepositoryError::SerializationError("缺少 state.pageConfigs".to_string()))?;

    let migrated = migrate_legacy_images(&mut configs);
    if migrated > 0 {
        tracing::warn!(
            snapshot_version = version,
            migrated_images = migrated,
            "快照包含旧版图片字段 linkUrl, 已迁移为 action"
        );
    }

    Ok(serde_json::from_value(configs)?)
}

// ==========================================
// SqliteSnapshotRepository - SQLite 实现
// ==========================================
pub struct SqliteSnapshotRepository {
    conn: Arc<Mutex<Connection>>,
    storage_key: String,
}

impl SqliteSnapshotRepository {
    /// 打开数据库文件并确保表结构
    pub fn new(db_path: &str, storage_key: impl Into<String>) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)), storage_key)
    }

    /// 复用已有连接
    pub fn from_connection(
        conn: Arc<Mutex<Connection>>,
        storage_key: impl Into<String>,
    ) -> RepositoryResult<Self> {
        let repo = Self {
            conn,
            storage_key: storage_key.into(),
        };
        {
            let conn = repo.get_conn()?;
            ensure_schema(&conn)?;
        }
        Ok(repo)
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取原始快照文档
    pub fn read_raw(&self) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let raw = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![self.storage_key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw)
    }

    /// 写入原始快照文档
    pub fn write_raw(&self, raw: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![self.storage_key, raw],
        )?;
        Ok(())
    }
}

impl SnapshotPersistence for SqliteSnapshotRepository {
    fn load(&self) -> RepositoryResult<Option<Vec<PageConfig>>> {
        match self.read_raw()? {
            Some(raw) => {
                let configs = decode_snapshot(&raw)?;
                tracing::info!(
                    storage_key = %self.storage_key,
                    page_configs = configs.len(),
                    "已加载配置快照"
                );
                Ok(Some(configs))
            }
            None => {
                tracing::info!(storage_key = %self.storage_key, "未找到配置快照");
                Ok(None)
            }
        }
    }

    fn save(&self, page_configs: &[PageConfig]) -> RepositoryResult<()> {
        let raw = encode_snapshot(page_configs)?;
        self.write_raw(&raw)?;
        tracing::debug!(storage_key = %self.storage_key, bytes = raw.len(), "配置快照已保存");
        Ok(())
    }
}

// ==========================================
// InMemorySnapshotRepository - 内存实现
// ==========================================
// 用途: 单元测试 / 临时会话
#[derive(Default)]
pub struct InMemorySnapshotRepository {
    document: Mutex<Option<String>>,
    save_count: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以现有快照文档初始化
    pub fn with_document(raw: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(raw.into())),
            ..Self::default()
        }
    }

    /// 当前保存的文档
    pub fn document(&self) -> Option<String> {
        self.document
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// 成功保存次数
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// 模拟存储故障
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl SnapshotPersistence for InMemorySnapshotRepository {
    fn load(&self) -> RepositoryResult<Option<Vec<PageConfig>>> {
        match self.document() {
            Some(raw) => Ok(Some(decode_snapshot(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, page_configs: &[PageConfig]) -> RepositoryResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::InternalError("模拟存储故障".to_string()));
        }
        let raw = encode_snapshot(page_configs)?;
        *self
            .document
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))? = Some(raw);
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ActionType, Channel};
    use crate::engine::seed::create_initial_page_config;

    fn setup_repo() -> SqliteSnapshotRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        SqliteSnapshotRepository::from_connection(Arc::new(Mutex::new(conn)), DEFAULT_STORAGE_KEY)
            .unwrap()
    }

    #[test]
    fn test_load_empty() {
        let repo = setup_repo();
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let repo = setup_repo();
        let configs = vec![
            create_initial_page_config(Channel::Mobile, 30),
            create_initial_page_config(Channel::Web, 30),
        ];

        repo.save(&configs).unwrap();
        let loaded = repo.load().unwrap().unwrap();
        assert_eq!(loaded, configs);

        // 覆盖写入
        repo.save(&configs[..1]).unwrap();
        assert_eq!(repo.load().unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_envelope_layout() {
        let raw = encode_snapshot(&[create_initial_page_config(Channel::Mobile, 30)]).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], SNAPSHOT_VERSION);
        assert_eq!(value["state"]["pageConfigs"][0]["channel"], "mobile");
        assert_eq!(value["state"]["pageConfigs"][0]["floors"][0]["type"], "banner");
    }

    #[test]
    fn test_decode_legacy_document() {
        let raw = r#"{
            "state": { "pageConfigs": [{
                "id": "p1", "channel": "web", "pageName": "网上银行首页",
                "createdAt": "2025-01-01 00:00:00", "updatedAt": "2025-01-01 00:00:00",
                "floors": [{
                    "id": "f1", "name": "理财", "type": "product",
                    "customerSegments": ["vip"], "priority": 1,
                    "startTime": "2025-01-01 00:00:00", "endTime": "2025-02-01 00:00:00",
                    "status": "active",
                    "createdAt": "2025-01-01 00:00:00", "updatedAt": "2025-01-01 00:00:00",
                    "images": [{ "id": "i1", "url": "https://img/1.png",
                                 "linkUrl": "https://example.com/p", "alt": "a", "order": 1 }]
                }]
            }]},
            "version": 0
        }"#;

        let configs = decode_snapshot(raw).unwrap();
        let image = &configs[0].floors[0].images[0];
        assert_eq!(image.action.action_type, ActionType::H5);
        assert_eq!(image.action.url.as_deref(), Some("https://example.com/p"));
    }

    #[test]
    fn test_decode_rejects_future_version() {
        let raw = r#"{"state":{"pageConfigs":[]},"version":99}"#;
        let err = decode_snapshot(raw).unwrap_err();
        assert!(matches!(err, RepositoryError::UnsupportedSnapshotVersion { found: 99, .. }));
    }

    #[test]
    fn test_decode_rejects_missing_state() {
        let err = decode_snapshot(r#"{"version":1}"#).unwrap_err();
        assert!(matches!(err, RepositoryError::SerializationError(_)));
    }

    #[test]
    fn test_in_memory_failure_switch() {
        let repo = InMemorySnapshotRepository::new();
        repo.save(&[]).unwrap();
        assert_eq!(repo.save_count(), 1);

        repo.set_fail_saves(true);
        assert!(repo.save(&[]).is_err());
        assert_eq!(repo.save_count(), 1);
    }
}
