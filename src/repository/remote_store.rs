// ==========================================
// 角色档案追踪 - 远端存储 Repository Trait
// ==========================================
// 职责: 定义远端权威存储的数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::record::DomainRecord;
use crate::domain::types::RecordKind;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::sync::Arc;

// ==========================================
// RemoteStore Trait
// ==========================================
// 用途: 按档案范围的记录读写
// 实现者: SqliteRemoteStore（使用 rusqlite）
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// 批量 UPSERT（按 profile_id + 自然键合并）
    ///
    /// # 参数
    /// - kind: 记录类别（决定目标表与自然键）
    /// - profile_id: 所属档案
    /// - records: 待写入记录
    ///
    /// # 返回
    /// - Ok(usize): 处理的记录数
    /// - Err: 存储错误（整批回滚）
    ///
    /// # 说明
    /// - 命中已有自然键则更新，否则插入；重复导入同一文件不产生重复行
    async fn upsert_batch(
        &self,
        kind: RecordKind,
        profile_id: &str,
        records: &[DomainRecord],
    ) -> RepositoryResult<usize>;

    /// 查询档案下指定类别的全部记录（按写入顺序）
    async fn list_records(
        &self,
        kind: RecordKind,
        profile_id: &str,
    ) -> RepositoryResult<Vec<DomainRecord>>;

    /// 统计档案下指定类别的记录数
    async fn count_records(&self, kind: RecordKind, profile_id: &str) -> RepositoryResult<usize>;
}

#[async_trait]
impl<T: RemoteStore + ?Sized> RemoteStore for Arc<T> {
    async fn upsert_batch(
        &self,
        kind: RecordKind,
        profile_id: &str,
        records: &[DomainRecord],
    ) -> RepositoryResult<usize> {
        (**self).upsert_batch(kind, profile_id, records).await
    }

    async fn list_records(
        &self,
        kind: RecordKind,
        profile_id: &str,
    ) -> RepositoryResult<Vec<DomainRecord>> {
        (**self).list_records(kind, profile_id).await
    }

    async fn count_records(&self, kind: RecordKind, profile_id: &str) -> RepositoryResult<usize> {
        (**self).count_records(kind, profile_id).await
    }
}
