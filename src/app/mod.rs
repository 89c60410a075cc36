// ==========================================
// 角色档案追踪 - 应用层
// ==========================================
// 职责: 组装存储、会话、配置与导入器
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
