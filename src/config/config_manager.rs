// ==========================================
// 楼层配置中心 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::store_settings::{ReorderPolicy, StoreSettings};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::seed::MAX_SEED_VALIDITY_DAYS;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 与建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        if key.trim().is_empty() {
            return Err("配置键不能为空".into());
        }
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, "配置已更新");
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key"
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 此方法会覆盖现有的同名 global 配置
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> Result<usize, Box<dyn Error>> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            let affected = tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
                params![key, value],
            )?;
            count += affected;
        }

        tx.commit()?;
        Ok(count)
    }

    // ===== Store 运行参数 =====

    /// 加载 Store 运行参数（缺失或格式错误时回退默认值）
    pub fn load_store_settings(&self) -> Result<StoreSettings, Box<dyn Error>> {
        let defaults = StoreSettings::default();

        let raw_days = self.get_config_or_default(
            config_keys::SEED_VALIDITY_DAYS,
            &defaults.seed_validity_days.to_string(),
        )?;
        let seed_validity_days = match raw_days.trim().parse::<i64>() {
            Ok(days) if (1..=MAX_SEED_VALIDITY_DAYS).contains(&days) => days,
            _ => {
                tracing::warn!(
                    config_key = config_keys::SEED_VALIDITY_DAYS,
                    raw_value = %raw_days,
                    "初始有效期配置无效，使用默认值"
                );
                defaults.seed_validity_days
            }
        };

        let duplicate_name_suffix = self
            .get_config_value(config_keys::DUPLICATE_NAME_SUFFIX)?
            .unwrap_or(defaults.duplicate_name_suffix);

        let raw_policy = self.get_config_or_default(
            config_keys::REORDER_POLICY,
            &defaults.reorder_policy.to_string(),
        )?;
        let reorder_policy = ReorderPolicy::parse(&raw_policy).unwrap_or_else(|| {
            tracing::warn!(
                config_key = config_keys::REORDER_POLICY,
                raw_value = %raw_policy,
                "重排策略配置无效，使用默认值"
            );
            defaults.reorder_policy
        });

        let storage_key = self
            .get_config_value(config_keys::STORAGE_KEY)?
            .filter(|key| !key.trim().is_empty())
            .unwrap_or(defaults.storage_key);

        let locale = match self.get_config_value(config_keys::LOCALE)? {
            Some(v) if v == "zh-CN" || v == "en" => v,
            Some(v) => {
                tracing::warn!(config_key = config_keys::LOCALE, raw_value = %v, "不支持的语言，使用默认值");
                defaults.locale
            }
            None => defaults.locale,
        };

        Ok(StoreSettings {
            seed_validity_days,
            duplicate_name_suffix,
            reorder_policy,
            storage_key,
            locale,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 渠道初始楼层有效期（天）
    pub const SEED_VALIDITY_DAYS: &str = "seed_validity_days";

    // 复制楼层名称后缀
    pub const DUPLICATE_NAME_SUFFIX: &str = "duplicate_name_suffix";

    // 重排策略: DROP_MISSING / REJECT_PARTIAL
    pub const REORDER_POLICY: &str = "reorder_policy";

    // 快照存储键
    pub const STORAGE_KEY: &str = "storage_key";

    // 标签语言
    pub const LOCALE: &str = "locale";
}
