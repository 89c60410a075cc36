// ==========================================
// 角色档案追踪 - API 层
// ==========================================
// 职责: 提供面向界面的导入/导出接口
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportApiResponse};
