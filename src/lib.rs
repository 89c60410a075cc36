// ==========================================
// 角色档案追踪 - 核心库
// ==========================================
// 范围: 表格导入 → 标准化 → 转换 → 本地缓存 + 远端存储对账
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录类别、领域记录、导入结果
pub mod domain;

// 数据仓储层 - 远端存储与本地缓存
pub mod repository;

// 会话层 - 当前用户与活动档案
pub mod auth;

// 引擎层 - 对账规则
pub mod engine;

// 导入层 - 解析、标准化、转换、编排
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 面向界面的接口
pub mod api;

// 应用层 - 组件装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{LocalMergeMode, MissionType, Rarity, RecordKind, Severity};

// 领域实体与结果
pub use domain::{
    CharacterSheet, DomainRecord, EquipmentItem, ImportFailure, Mission, Note, Notification,
    NpcEntry, ReconciliationOutcome,
};

// 引擎
pub use engine::{ReconcileOptions, ReconciliationEngine};

// 导入
pub use importer::{ImportFile, RecordImporter, RecordImporterImpl};

// API
pub use api::{ImportApi, ImportApiResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "角色档案追踪";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
