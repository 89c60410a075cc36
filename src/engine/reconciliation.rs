// ==========================================
// 角色档案追踪 - 对账引擎
// ==========================================
// 职责: 将一批领域记录写入本地缓存与远端存储（按档案）
// 顺序: 会话/档案校验 → 打档案标签 → 本地缓存 → 远端 UPSERT
// 红线: 两侧写入互不回滚；只有本引擎修改持久状态
// ==========================================

use crate::auth::SessionProvider;
use crate::config::config_defaults;
use crate::domain::outcome::{ImportFailure, ReconciliationOutcome, StoreWriteResult, WriteReport};
use crate::domain::record::DomainRecord;
use crate::domain::types::{LocalMergeMode, RecordKind};
use crate::repository::local_cache::{cache_key, LocalCache};
use crate::repository::remote_store::RemoteStore;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

// ==========================================
// ReconcileOptions - 对账参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub cache_namespace: String,
    pub local_merge_mode: LocalMergeMode,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            cache_namespace: config_defaults::CACHE_NAMESPACE.to_string(),
            local_merge_mode: LocalMergeMode::Append,
        }
    }
}

/// 合并本地缓存集合
///
/// - Append: 原集合后追加
/// - DedupeByNaturalKey: 同档案同自然键的条目被新记录替换（位置与 id 不变，
///   与远端 UPSERT 保留首个 id 一致）
pub fn merge_local(
    cached: Vec<DomainRecord>,
    incoming: &[DomainRecord],
    mode: LocalMergeMode,
) -> Vec<DomainRecord> {
    let mut merged = cached;
    match mode {
        LocalMergeMode::Append => merged.extend(incoming.iter().cloned()),
        LocalMergeMode::DedupeByNaturalKey => {
            for record in incoming {
                match merged.iter().position(|r| r.same_identity(record)) {
                    Some(index) => {
                        let mut replacement = record.clone();
                        replacement.set_id(merged[index].id());
                        merged[index] = replacement;
                    }
                    None => merged.push(record.clone()),
                }
            }
        }
    }
    merged
}

// ==========================================
// ReconciliationEngine
// ==========================================
pub struct ReconciliationEngine<R: ?Sized, L: ?Sized, S: ?Sized>
where
    R: RemoteStore,
    L: LocalCache,
    S: SessionProvider,
{
    remote: Arc<R>,
    local: Arc<L>,
    session: Arc<S>,
}

impl<R: ?Sized, L: ?Sized, S: ?Sized> ReconciliationEngine<R, L, S>
where
    R: RemoteStore,
    L: LocalCache,
    S: SessionProvider,
{
    pub fn new(remote: Arc<R>, local: Arc<L>, session: Arc<S>) -> Self {
        Self {
            remote,
            local,
            session,
        }
    }

    /// 解析目标档案
    ///
    /// # 规则
    /// 1. 必须已登录
    /// 2. 显式传入的档案优先，其次取会话中的活动档案
    ///
    /// # 返回
    /// - Err(PreconditionFailed): 未登录或无档案
    pub async fn resolve_profile(
        &self,
        active_profile_id: Option<&str>,
    ) -> Result<String, ImportFailure> {
        let Some(user_id) = self.session.current_user_id().await else {
            return Err(ImportFailure::PreconditionFailed {
                message: "未登录，请先登录后再导入".to_string(),
            });
        };

        if let Some(profile_id) = active_profile_id.map(str::trim).filter(|p| !p.is_empty()) {
            return Ok(profile_id.to_string());
        }

        match self.session.active_profile_id(&user_id).await {
            Some(profile_id) if !profile_id.trim().is_empty() => Ok(profile_id),
            _ => Err(ImportFailure::PreconditionFailed {
                message: "未选择角色档案，请先选择档案后再导入".to_string(),
            }),
        }
    }

    /// 对账（使用默认对账参数；按配置对账经由导入器）
    pub async fn reconcile(
        &self,
        batch: Vec<DomainRecord>,
        kind: RecordKind,
        active_profile_id: Option<&str>,
    ) -> ReconciliationOutcome {
        match self.reconcile_detailed(batch, kind, active_profile_id).await {
            Ok(report) => report.into_outcome(),
            Err(failure) => ReconciliationOutcome::failed(kind, failure),
        }
    }

    /// 对账并返回双写报告
    ///
    /// # 返回
    /// - Err(PreconditionFailed): 未写入任何存储
    pub async fn reconcile_detailed(
        &self,
        batch: Vec<DomainRecord>,
        kind: RecordKind,
        active_profile_id: Option<&str>,
    ) -> Result<WriteReport, ImportFailure> {
        let profile_id = self.resolve_profile(active_profile_id).await.map_err(|failure| {
            warn!(kind = %kind, reason = %failure, "对账前置条件不满足，未写入");
            failure
        })?;

        Ok(self
            .reconcile_for_profile(batch, kind, &profile_id, &ReconcileOptions::default())
            .await)
    }

    /// 对已解析档案执行双写
    pub async fn reconcile_for_profile(
        &self,
        batch: Vec<DomainRecord>,
        kind: RecordKind,
        profile_id: &str,
        options: &ReconcileOptions,
    ) -> WriteReport {
        let tagged: Vec<DomainRecord> = batch
            .into_iter()
            .filter(|record| {
                let matches = record.kind() == kind;
                if !matches {
                    warn!(expected = %kind, actual = %record.kind(), id = record.id(), "记录类别不匹配，跳过");
                }
                matches
            })
            .map(|mut record| {
                record.set_profile_id(profile_id);
                record
            })
            .collect();

        let batch_size = tagged.len();
        if tagged.is_empty() {
            debug!(kind = %kind, profile_id, "空批次，跳过写入");
            return WriteReport {
                kind,
                profile_id: profile_id.to_string(),
                batch_size,
                local: StoreWriteResult::Skipped,
                remote: StoreWriteResult::Skipped,
            };
        }

        let local = self.write_local(&tagged, kind, options).await;
        let remote = self.write_remote(&tagged, kind, profile_id).await;

        let report = WriteReport {
            kind,
            profile_id: profile_id.to_string(),
            batch_size,
            local,
            remote,
        };
        info!(
            kind = %kind,
            profile_id,
            batch_size,
            local = ?report.local,
            remote = ?report.remote,
            "对账完成"
        );
        report
    }

    async fn write_local(
        &self,
        records: &[DomainRecord],
        kind: RecordKind,
        options: &ReconcileOptions,
    ) -> StoreWriteResult {
        let key = cache_key(&options.cache_namespace, kind);

        let cached = match self.local.read(&key).await {
            Ok(cached) => cached,
            Err(e) => {
                error!(cache_key = %key, error = %e, "本地缓存读取失败");
                return StoreWriteResult::Failed(e.to_string());
            }
        };

        let merged = merge_local(cached, records, options.local_merge_mode);
        match self.local.write(&key, &merged).await {
            Ok(()) => StoreWriteResult::Written(records.len()),
            Err(e) => {
                error!(cache_key = %key, error = %e, "本地缓存写入失败");
                StoreWriteResult::Failed(e.to_string())
            }
        }
    }

    async fn write_remote(
        &self,
        records: &[DomainRecord],
        kind: RecordKind,
        profile_id: &str,
    ) -> StoreWriteResult {
        match self.remote.upsert_batch(kind, profile_id, records).await {
            Ok(count) => StoreWriteResult::Written(count),
            Err(e) => {
                error!(kind = %kind, profile_id, error = %e, "远端写入失败");
                StoreWriteResult::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionState;
    use crate::domain::record::Note;
    use crate::repository::{InMemoryLocalCache, SqliteRemoteStore};
    use tempfile::NamedTempFile;

    fn note(title: &str, content: &str) -> DomainRecord {
        DomainRecord::Note(Note {
            id: format!("id-{}", title),
            profile_id: None,
            title: title.to_string(),
            content: content.to_string(),
            category: String::new(),
            pinned: false,
        })
    }

    fn tagged(record: DomainRecord, profile_id: &str) -> DomainRecord {
        let mut record = record;
        record.set_profile_id(profile_id);
        record
    }

    #[test]
    fn test_merge_append_keeps_duplicates() {
        let cached = vec![tagged(note("a", "1"), "p1")];
        let merged = merge_local(cached, &[tagged(note("a", "2"), "p1")], LocalMergeMode::Append);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_dedupe_replaces_in_place() {
        let cached = vec![
            tagged(note("a", "1"), "p1"),
            tagged(note("b", "1"), "p1"),
            tagged(note("a", "1"), "p2"),
        ];
        let incoming = vec![tagged(note("a", "2"), "p1"), tagged(note("c", "1"), "p1")];
        let merged = merge_local(cached, &incoming, LocalMergeMode::DedupeByNaturalKey);

        assert_eq!(merged.len(), 4);
        let DomainRecord::Note(replaced) = &merged[0] else {
            panic!("应为笔记记录");
        };
        assert_eq!(replaced.content, "2");
        assert_eq!(merged[2].profile_id(), Some("p2"));
        assert_eq!(merged[3], incoming[1]);
    }

    #[test]
    fn test_merge_dedupe_keeps_cached_id() {
        let cached = vec![tagged(note("a", "1"), "p1")];
        let mut incoming = tagged(note("a", "2"), "p1");
        incoming.set_id("fresh-id");

        let merged = merge_local(cached, &[incoming], LocalMergeMode::DedupeByNaturalKey);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id(), "id-a");
    }

    #[tokio::test]
    async fn test_resolve_profile_rules() {
        let temp_file = NamedTempFile::new().unwrap();
        let remote = Arc::new(SqliteRemoteStore::new(temp_file.path().to_str().unwrap()).unwrap());
        let session = Arc::new(SessionState::new());
        let engine = ReconciliationEngine::new(remote, Arc::new(InMemoryLocalCache::new()), session.clone());

        assert!(matches!(
            engine.resolve_profile(Some("p1")).await,
            Err(ImportFailure::PreconditionFailed { .. })
        ));

        session.sign_in("u1");
        assert!(engine.resolve_profile(None).await.is_err());
        assert_eq!(engine.resolve_profile(Some(" p9 ")).await.unwrap(), "p9");

        session.select_profile("p1");
        assert_eq!(engine.resolve_profile(None).await.unwrap(), "p1");
        assert_eq!(engine.resolve_profile(Some("")).await.unwrap(), "p1");
    }

    #[tokio::test]
    async fn test_reconcile_tags_and_skips_other_kinds() {
        let temp_file = NamedTempFile::new().unwrap();
        let remote = Arc::new(SqliteRemoteStore::new(temp_file.path().to_str().unwrap()).unwrap());
        let local = Arc::new(InMemoryLocalCache::new());
        let engine = ReconciliationEngine::new(
            remote.clone(),
            local.clone(),
            Arc::new(SessionState::signed_in("u1", "p1")),
        );

        let mission = DomainRecord::Mission(crate::domain::record::Mission {
            id: "m".to_string(),
            profile_id: None,
            name: "stray".to_string(),
            mission_type: Default::default(),
            progress: 0,
            notes: String::new(),
            completed: false,
        });
        let report = engine
            .reconcile_detailed(vec![note("a", "1"), mission], RecordKind::Note, None)
            .await
            .unwrap();

        assert_eq!(report.batch_size, 1);
        assert_eq!(report.local, StoreWriteResult::Written(1));
        assert_eq!(report.remote, StoreWriteResult::Written(1));

        let cached = local.read("persona-tracker-notes").await.unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].profile_id(), Some("p1"));
        assert_eq!(remote.count_records(RecordKind::Note, "p1").await.unwrap(), 1);
    }
}
