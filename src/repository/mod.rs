// ==========================================
// 角色档案追踪 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽存储细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod local_cache;
pub mod local_cache_impl;
pub mod remote_store;
pub mod remote_store_impl;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use local_cache::{cache_key, InMemoryLocalCache, LocalCache};
pub use local_cache_impl::SqliteLocalCache;
pub use remote_store::RemoteStore;
pub use remote_store_impl::SqliteRemoteStore;
