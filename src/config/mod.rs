// ==========================================
// 角色档案追踪 - 配置层
// ==========================================
// 职责: 导入相关配置的读取与覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_defaults, config_keys, parse_delimiter, ConfigManager};
pub use import_config_trait::{ConfigError, ImportConfigReader};
