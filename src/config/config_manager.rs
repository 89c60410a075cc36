// ==========================================
// 角色档案追踪 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::{ConfigError, ImportConfigReader};
use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::types::LocalMergeMode;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// 配置键常量与默认值
// ==========================================
pub mod config_keys {
    // 导入
    pub const IMPORT_DELIMITER: &str = "import_delimiter";

    // 本地缓存
    pub const LOCAL_MERGE_MODE: &str = "local_merge_mode";
    pub const CACHE_NAMESPACE: &str = "cache_namespace";
}

pub mod config_defaults {
    pub const IMPORT_DELIMITER: u8 = b',';
    pub const LOCAL_MERGE_MODE: &str = "append";
    pub const CACHE_NAMESPACE: &str = "persona-tracker";
}

/// 解析分隔符配置值
///
/// 接受单个 ASCII 符号字符（不含 CSV 引用符 `"`），或 "tab" / "\t"
pub fn parse_delimiter(value: &str) -> Option<u8> {
    match value {
        "tab" | "\\t" | "\t" => return Some(b'\t'),
        _ => {}
    }

    let trimmed = value.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() == 1
        && bytes[0].is_ascii()
        && !bytes[0].is_ascii_alphanumeric()
        && bytes[0] != b'"'
    {
        Some(bytes[0])
    } else {
        None
    }
}

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
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有 global 配置的快照（JSON，按键排序）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_delimiter(&self) -> Result<u8, ConfigError> {
        let Some(value) = self.get_global_config_value(config_keys::IMPORT_DELIMITER)? else {
            return Ok(config_defaults::IMPORT_DELIMITER);
        };

        Ok(parse_delimiter(&value).unwrap_or_else(|| {
            warn!(
                config_key = config_keys::IMPORT_DELIMITER,
                raw_value = %value,
                "分隔符配置无效，使用默认值"
            );
            config_defaults::IMPORT_DELIMITER
        }))
    }

    async fn get_local_merge_mode(&self) -> Result<LocalMergeMode, ConfigError> {
        let value = self.get_config_or_default(
            config_keys::LOCAL_MERGE_MODE,
            config_defaults::LOCAL_MERGE_MODE,
        )?;

        Ok(value.parse::<LocalMergeMode>().unwrap_or_else(|_| {
            warn!(
                config_key = config_keys::LOCAL_MERGE_MODE,
                raw_value = %value,
                "合并模式配置无效，使用 append"
            );
            LocalMergeMode::Append
        }))
    }

    async fn get_cache_namespace(&self) -> Result<String, ConfigError> {
        let value = self.get_config_or_default(
            config_keys::CACHE_NAMESPACE,
            config_defaults::CACHE_NAMESPACE,
        )?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok(config_defaults::CACHE_NAMESPACE.to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }
}
