// ==========================================
// 角色档案追踪 - 记录导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 解析 → 表头校验 → 标准化 → 转换 → 对账
// ==========================================

use crate::domain::outcome::ReconciliationOutcome;
use crate::domain::record::{DomainRecord, NormalizedRecord, ParsedTable, RawRow};
use crate::domain::types::RecordKind;
use crate::importer::error::ImportResult;
use crate::importer::import_file::ImportFile;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// RecordImporter Trait
// ==========================================
// 用途: 导入主接口（唯一对外入口）
// 实现者: RecordImporterImpl
#[async_trait]
pub trait RecordImporter: Send + Sync {
    /// 导入单个文件
    ///
    /// # 参数
    /// - file: 上传的文件（名称 + 媒体类型 + 文本内容）
    /// - kind: 记录类别
    /// - active_profile_id: 当前档案（None 时通过会话解析）
    ///
    /// # 返回
    /// - ReconciliationOutcome: 成功（含条数）或类型化失败原因
    ///
    /// # 说明
    /// - 所有失败在此边界转换为结果值，不向外抛出
    async fn import_file(
        &self,
        file: &ImportFile,
        kind: RecordKind,
        active_profile_id: Option<&str>,
    ) -> ReconciliationOutcome;

    /// 从本地路径读取并导入
    async fn import_from_path(
        &self,
        file_path: &Path,
        kind: RecordKind,
        active_profile_id: Option<&str>,
    ) -> ReconciliationOutcome;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件的导入是独立的，互不影响
    /// - 返回顺序与输入顺序一致
    async fn batch_import(
        &self,
        files: Vec<(ImportFile, RecordKind)>,
        active_profile_id: Option<&str>,
    ) -> Vec<ReconciliationOutcome>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文本 → 表头 + 数据行
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文本
    ///
    /// # 参数
    /// - text: 文件全文
    /// - delimiter: 列分隔符
    ///
    /// # 返回
    /// - Ok(ParsedTable): 首行为表头，其余为数据行；空文本得到空表头与零数据行
    /// - Err: 读取器无法解码
    fn parse(&self, text: &str, delimiter: u8) -> ImportResult<ParsedTable>;
}

// ==========================================
// RowNormalizer Trait
// ==========================================
// 用途: 表头 + 数据行 → 标准化记录
// 实现者: RowNormalizerImpl
pub trait RowNormalizer: Send + Sync {
    /// 列名 → 字段键（小写 + 空白折叠为 `_`）
    fn normalize_label(&self, label: &str) -> String;

    /// 按位置拼接表头与单元格
    fn normalize(&self, header: &[String], rows: &[RawRow]) -> Vec<NormalizedRecord>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 标准化记录 → 领域记录（纯函数，不失败）
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    fn transform(&self, record: &NormalizedRecord, kind: RecordKind) -> DomainRecord;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格宽松类型转换
// 实现者: DataCleanerImpl
pub trait DataCleaner: Send + Sync {
    /// 文本字段：缺失或空白 → 空串
    fn text_or_default(&self, value: Option<&str>) -> String;

    /// 计数字段：非数字 → 0
    fn parse_count(&self, value: Option<&str>) -> i32;

    /// 百分比字段：非数字 → 0，并截断到 [0, 100]
    fn parse_percentage(&self, value: Option<&str>) -> u8;

    /// 标记字段：仅字面量 "true" 为真（大小写敏感）
    fn parse_flag(&self, value: Option<&str>) -> bool;

    /// 标识：已有非空 id 沿用，否则生成
    fn id_or_synthesize(&self, value: Option<&str>) -> String;
}
