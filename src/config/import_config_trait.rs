// ==========================================
// 角色档案追踪 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::LocalMergeMode;
use async_trait::async_trait;
use std::error::Error;

/// 配置读取错误（跨 await 传递，需 Send + Sync）
pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取 CSV 分隔符
    ///
    /// # 返回
    /// - u8: 单字节分隔符；配置为 "tab" 或 "\t" 时返回制表符
    ///
    /// # 默认值
    /// - ','
    async fn get_delimiter(&self) -> Result<u8, ConfigError>;

    /// 获取本地缓存合并模式
    ///
    /// # 默认值
    /// - LocalMergeMode::Append（与远端 UPSERT 无关，仅影响本地缓存）
    async fn get_local_merge_mode(&self) -> Result<LocalMergeMode, ConfigError>;

    /// 获取本地缓存键命名空间
    ///
    /// # 默认值
    /// - "persona-tracker"
    async fn get_cache_namespace(&self) -> Result<String, ConfigError>;
}
