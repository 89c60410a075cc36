// ==========================================
// 角色档案追踪 - 导入结果模型
// ==========================================
// 职责: 对外单一结果 / 内部双写报告 / 用户通知
// ==========================================

use crate::domain::types::{RecordKind, Severity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// ImportFailure - 导入失败原因
// ==========================================
// 单元格格式错误不在此列：一律宽松回落为缺省值
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ImportFailure {
    #[error("表头缺少必需列: {}（期望列: {}）", missing.join(", "), expected.join(", "))]
    SchemaMismatch {
        expected: Vec<String>,
        missing: Vec<String>,
    },

    #[error("前置条件不满足: {message}")]
    PreconditionFailed { message: String },

    #[error("远端写入失败: {message}")]
    RemoteWriteFailed { message: String },

    #[error("本地缓存写入失败: {message}")]
    LocalWriteFailed { message: String },

    #[error("文件类型不支持: {media_type}（仅支持 CSV 文本）")]
    UnsupportedFormat { media_type: String },

    #[error("文件读取失败: {message}")]
    UnreadableFile { message: String },
}

// ==========================================
// StoreWriteResult - 单一存储写入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StoreWriteResult {
    Written(usize),
    Skipped,
    Failed(String),
}

impl StoreWriteResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, StoreWriteResult::Failed(_))
    }
}

// ==========================================
// WriteReport - 双写报告（本地 + 远端）
// ==========================================
// 两侧互不回滚；对外合并为一个结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReport {
    pub kind: RecordKind,
    pub profile_id: String,
    pub batch_size: usize,
    pub local: StoreWriteResult,
    pub remote: StoreWriteResult,
}

impl WriteReport {
    /// 合并为对外结果：远端失败优先，其次本地失败
    pub fn into_outcome(self) -> ReconciliationOutcome {
        if let StoreWriteResult::Failed(message) = self.remote {
            return ReconciliationOutcome::failed(
                self.kind,
                ImportFailure::RemoteWriteFailed { message },
            );
        }
        if let StoreWriteResult::Failed(message) = self.local {
            return ReconciliationOutcome::failed(
                self.kind,
                ImportFailure::LocalWriteFailed { message },
            );
        }
        ReconciliationOutcome::success(self.kind, self.batch_size)
    }
}

// ==========================================
// ReconciliationOutcome - 对外导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    pub kind: RecordKind,
    pub accepted: usize, // 仅在完全成功时等于批次大小
    pub failure: Option<ImportFailure>,
}

impl ReconciliationOutcome {
    pub fn success(kind: RecordKind, accepted: usize) -> Self {
        Self {
            kind,
            accepted,
            failure: None,
        }
    }

    pub fn failed(kind: RecordKind, failure: ImportFailure) -> Self {
        Self {
            kind,
            accepted: 0,
            failure: Some(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// 转换为用户通知
    pub fn to_notification(&self) -> Notification {
        match &self.failure {
            None if self.accepted == 0 => Notification {
                title: "没有可导入的数据".to_string(),
                description: format!("文件中没有{}数据行", self.kind.display_name()),
                severity: Severity::Info,
            },
            None => Notification {
                title: "导入成功".to_string(),
                description: format!(
                    "已导入 {} 条{}",
                    self.accepted,
                    self.kind.display_name()
                ),
                severity: Severity::Success,
            },
            Some(ImportFailure::SchemaMismatch { expected, .. }) => Notification {
                title: "文件格式不正确".to_string(),
                description: format!("CSV 表头应包含: {}", expected.join(", ")),
                severity: Severity::Error,
            },
            Some(ImportFailure::PreconditionFailed { message }) => Notification {
                title: "无法导入".to_string(),
                description: message.clone(),
                severity: Severity::Warning,
            },
            Some(failure) => Notification {
                title: "导入失败".to_string(),
                description: failure.to_string(),
                severity: Severity::Error,
            },
        }
    }
}

// ==========================================
// Notification - 用户通知
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}
