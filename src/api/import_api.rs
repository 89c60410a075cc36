// ==========================================
// 角色档案追踪 - 导入API
// ==========================================
// 职责: 封装导入/导出/模板，导入结果附带用户通知
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{config_keys, ImportConfigReader};
use crate::domain::outcome::{Notification, ReconciliationOutcome};
use crate::domain::types::RecordKind;
use crate::importer::error::ImportError;
use crate::importer::{exporter, ImportFile, RecordImporter};
use crate::repository::RemoteStore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 导入API响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 导入结果
    pub outcome: ReconciliationOutcome,
    /// 展示给用户的通知
    pub notification: Notification,
}

impl From<ReconciliationOutcome> for ImportApiResponse {
    fn from(outcome: ReconciliationOutcome) -> Self {
        let notification = outcome.to_notification();
        Self {
            outcome,
            notification,
        }
    }
}

/// 导入API
pub struct ImportApi {
    importer: Arc<dyn RecordImporter>,
    remote: Arc<dyn RemoteStore>,
    config: Arc<dyn ImportConfigReader>,
}

impl ImportApi {
    pub fn new(
        importer: Arc<dyn RecordImporter>,
        remote: Arc<dyn RemoteStore>,
        config: Arc<dyn ImportConfigReader>,
    ) -> Self {
        Self {
            importer,
            remote,
            config,
        }
    }

    /// 导入拖放/上传的文件
    pub async fn import_dropped_file(
        &self,
        file: ImportFile,
        kind: RecordKind,
        active_profile_id: Option<&str>,
    ) -> ImportApiResponse {
        self.importer
            .import_file(&file, kind, active_profile_id)
            .await
            .into()
    }

    /// 从本地路径导入
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - kind: 记录类别名（如 "missions"、"npc"）
    /// - active_profile_id: 当前档案（None 时取会话中的活动档案）
    ///
    /// # 返回
    /// - Err(InvalidInput): 路径为空或类别未知
    pub async fn import_path(
        &self,
        file_path: &str,
        kind: &str,
        active_profile_id: Option<&str>,
    ) -> ApiResult<ImportApiResponse> {
        if file_path.trim().is_empty() {
            return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
        }
        let kind = kind.parse::<RecordKind>().map_err(ApiError::InvalidInput)?;

        let outcome = self
            .importer
            .import_from_path(Path::new(file_path.trim()), kind, active_profile_id)
            .await;
        Ok(outcome.into())
    }

    /// 下载导入模板（仅表头，使用当前配置的分隔符）
    pub async fn template_for(&self, kind: RecordKind) -> ApiResult<String> {
        let delimiter = self.delimiter().await?;
        Ok(exporter::template_csv(kind, delimiter)?)
    }

    /// 导出档案下指定类别的记录（CSV，可再次导入）
    pub async fn export_records(&self, kind: RecordKind, profile_id: &str) -> ApiResult<String> {
        if profile_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("档案ID不能为空".to_string()));
        }

        let delimiter = self.delimiter().await?;
        let records = self.remote.list_records(kind, profile_id.trim()).await?;
        let text = exporter::export_csv(&records, kind, delimiter)?;

        info!(kind = %kind, profile_id, count = records.len(), "导出完成");
        Ok(text)
    }

    async fn delimiter(&self) -> Result<u8, ImportError> {
        self.config
            .get_delimiter()
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: config_keys::IMPORT_DELIMITER.to_string(),
                message: e.to_string(),
            })
    }
}
