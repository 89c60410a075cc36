// ==========================================
// 角色档案追踪 - 导入层
// ==========================================
// 职责: 上传文件 → 领域记录 → 对账
// 支持: CSV 及其他单字节分隔文本
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod exporter;
pub mod field_mapper;
pub mod file_parser;
pub mod header_schema;
pub mod import_file;
pub mod record_importer_impl;
pub mod record_importer_trait;
pub mod row_normalizer;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use exporter::{export_csv, template_csv, to_row};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, DEFAULT_DELIMITER};
pub use import_file::ImportFile;
pub use record_importer_impl::RecordImporterImpl;
pub use row_normalizer::RowNormalizer as RowNormalizerImpl;

// 重导出 Trait 接口
pub use record_importer_trait::{DataCleaner, FieldMapper, FileParser, RecordImporter, RowNormalizer};
