// ==========================================
// 角色档案追踪 - 引擎层
// ==========================================
// 职责: 对账规则（档案解析、本地合并、双写报告）
// 红线: Engine 不拼 SQL，存储细节交给 Repository
// ==========================================

pub mod reconciliation;

// 重导出核心引擎
pub use reconciliation::{merge_local, ReconcileOptions, ReconciliationEngine};
