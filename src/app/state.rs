// ==========================================
// 角色档案追踪 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::ImportApi;
use crate::auth::SessionState;
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::ReconciliationEngine;
use crate::importer::{RecordImporter, RecordImporterImpl};
use crate::repository::{SqliteLocalCache, SqliteRemoteStore};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "PERSONA_TRACKER_DB_PATH";

const DB_FILE_NAME: &str = "persona_tracker.db";

/// 应用状态
///
/// 所有组件共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 会话（由登录流程更新）
    pub session: Arc<SessionState>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 远端存储
    pub remote_store: Arc<SqliteRemoteStore>,

    /// 本地缓存
    pub local_cache: Arc<SqliteLocalCache>,

    /// 导入器
    pub importer: Arc<dyn RecordImporter>,

    /// 导入API
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Err: 数据库打开、建表或组件初始化失败
    pub fn new(db_path: String) -> Result<Self> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path)
            .with_context(|| format!("无法打开数据库: {}", db_path))?;
        init_schema(&conn).context("数据库建表失败")?;
        Self::from_connection(db_path, Arc::new(Mutex::new(conn)))
    }

    /// 从已建表的共享连接创建
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Result<Self> {
        let session = Arc::new(SessionState::new());

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| anyhow!("无法创建ConfigManager: {}", e))?,
        );
        let remote_store = Arc::new(
            SqliteRemoteStore::from_connection(conn.clone())
                .context("无法创建SqliteRemoteStore")?,
        );
        let local_cache = Arc::new(SqliteLocalCache::from_connection(conn));

        let engine = ReconciliationEngine::new(
            remote_store.clone(),
            local_cache.clone(),
            session.clone(),
        );
        let importer: Arc<dyn RecordImporter> =
            Arc::new(RecordImporterImpl::new(engine, config_manager.clone()));

        let import_api = Arc::new(ImportApi::new(
            importer.clone(),
            remote_store.clone(),
            config_manager.clone(),
        ));

        Ok(Self {
            db_path,
            session,
            config_manager,
            remote_store,
            local_cache,
            importer,
            import_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先使用环境变量 PERSONA_TRACKER_DB_PATH，其次为用户数据目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(format!("./{}", DB_FILE_NAME));

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染正式数据
        #[cfg(debug_assertions)]
        let dir = data_dir.join("persona-tracker-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("persona-tracker");

        // 目录创建失败时回落到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RecordKind;
    use crate::importer::ImportFile;
    use crate::repository::RemoteStore;
    use tempfile::NamedTempFile;

    #[test]
    fn test_new_reports_unopenable_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let bad_path = temp_dir.path().join("missing").join("db.sqlite");

        let err = AppState::new(bad_path.to_string_lossy().to_string()).err().unwrap();
        assert!(err.to_string().contains("无法打开数据库"));
    }

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
    }

    #[tokio::test]
    async fn test_app_state_wires_import_flow() {
        let temp_file = NamedTempFile::new().unwrap();
        let state = AppState::new(temp_file.path().to_str().unwrap().to_string()).unwrap();
        state.session.sign_in("u1");
        state.session.select_profile("p1");

        let file = ImportFile::csv("notes.csv", "Title,Content,Category,Pinned\nSafehouse,Watson,places,true\n");
        let response = state
            .import_api
            .import_dropped_file(file, RecordKind::Note, None)
            .await;

        assert!(response.outcome.is_success());
        assert_eq!(response.outcome.accepted, 1);
        assert_eq!(
            state.remote_store.count_records(RecordKind::Note, "p1").await.unwrap(),
            1
        );
    }
}
