// ==========================================
// 角色档案追踪 - 本地缓存 SQLite 实现
// ==========================================
// 存储: local_cache 表，payload 为记录集合的 JSON
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::record::DomainRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::local_cache::LocalCache;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::debug;

pub struct SqliteLocalCache {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLocalCache {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl LocalCache for SqliteLocalCache {
    async fn read(&self, key: &str) -> RepositoryResult<Vec<DomainRecord>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM local_cache WHERE cache_key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write(&self, key: &str, records: &[DomainRecord]) -> RepositoryResult<()> {
        let payload = serde_json::to_string(records)?;
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        conn.execute(
            r#"
            INSERT INTO local_cache (cache_key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(cache_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
            params![key, payload, Utc::now().to_rfc3339()],
        )?;
        debug!(cache_key = key, count = records.len(), "本地缓存已写入");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::NpcEntry;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_persists_across_instances() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();
        let npc = DomainRecord::Npc(NpcEntry {
            id: "x".to_string(),
            profile_id: Some("p1".to_string()),
            name: "Rogue".to_string(),
            relationship: "fixer".to_string(),
            affinity: 1,
            trust: 2,
            notes: String::new(),
        });

        SqliteLocalCache::new(path)
            .unwrap()
            .write("persona-tracker-npcs", &[npc.clone()])
            .await
            .unwrap();

        let reopened = SqliteLocalCache::new(path).unwrap();
        assert_eq!(reopened.read("persona-tracker-npcs").await.unwrap(), vec![npc]);
        assert!(reopened.read("persona-tracker-notes").await.unwrap().is_empty());
    }
}
