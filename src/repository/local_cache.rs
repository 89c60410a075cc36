// ==========================================
// 角色档案追踪 - 本地缓存 Trait
// ==========================================
// 职责: 设备本地的记录集合（按缓存键整体读写）
// 键格式: <命名空间><类别后缀>，例如 persona-tracker-missions
// ==========================================

use crate::domain::record::DomainRecord;
use crate::domain::types::RecordKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 拼接缓存键
pub fn cache_key(namespace: &str, kind: RecordKind) -> String {
    format!("{}{}", namespace, kind.cache_suffix())
}

// ==========================================
// LocalCache Trait
// ==========================================
// 实现者: SqliteLocalCache（持久化）/ InMemoryLocalCache（测试与临时会话）
#[async_trait]
pub trait LocalCache: Send + Sync {
    /// 读取缓存集合（不存在时返回空集合）
    async fn read(&self, key: &str) -> RepositoryResult<Vec<DomainRecord>>;

    /// 整体覆盖写入缓存集合
    async fn write(&self, key: &str, records: &[DomainRecord]) -> RepositoryResult<()>;
}

#[async_trait]
impl<T: LocalCache + ?Sized> LocalCache for Arc<T> {
    async fn read(&self, key: &str) -> RepositoryResult<Vec<DomainRecord>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, records: &[DomainRecord]) -> RepositoryResult<()> {
        (**self).write(key, records).await
    }
}

// ==========================================
// InMemoryLocalCache
// ==========================================
// 以 JSON 文本保存，与持久化实现的序列化格式一致
#[derive(Default)]
pub struct InMemoryLocalCache {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryLocalCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalCache for InMemoryLocalCache {
    async fn read(&self, key: &str) -> RepositoryResult<Vec<DomainRecord>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        match entries.get(key) {
            Some(payload) => Ok(serde_json::from_str(payload)?),
            None => Ok(Vec::new()),
        }
    }

    async fn write(&self, key: &str, records: &[DomainRecord]) -> RepositoryResult<()> {
        let payload = serde_json::to_string(records)?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        entries.insert(key.to_string(), payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Note;

    #[test]
    fn test_cache_key_suffix() {
        assert_eq!(
            cache_key("persona-tracker", RecordKind::CharacterSheet),
            "persona-tracker-character"
        );
        assert_eq!(cache_key("ns", RecordKind::Npc), "ns-npcs");
    }

    #[tokio::test]
    async fn test_in_memory_read_missing_is_empty() {
        let cache = InMemoryLocalCache::new();
        assert!(cache.read("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_write_overwrites() {
        let cache = InMemoryLocalCache::new();
        let note = DomainRecord::Note(Note {
            id: "n-1".to_string(),
            profile_id: Some("p1".to_string()),
            title: "Contacts".to_string(),
            content: String::new(),
            category: String::new(),
            pinned: false,
        });

        cache.write("k", &[note.clone(), note.clone()]).await.unwrap();
        cache.write("k", &[note.clone()]).await.unwrap();

        assert_eq!(cache.read("k").await.unwrap(), vec![note]);
    }
}
