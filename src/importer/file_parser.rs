// ==========================================
// 角色档案追踪 - 文件解析器实现
// ==========================================
// 阶段 0: 文本 → 表头 + 数据行
// 规则: 逐行 TRIM、丢弃空行、按分隔符切分并 TRIM 单元格
// ==========================================

use crate::domain::record::{ParsedTable, RawRow};
use crate::importer::error::ImportResult;
use crate::importer::record_importer_trait::FileParser;
use csv::{ReaderBuilder, Trim};

/// 默认列分隔符
pub const DEFAULT_DELIMITER: u8 = b',';

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, text: &str, delimiter: u8) -> ImportResult<ParsedTable> {
        // 去掉 UTF-8 BOM（表格软件导出常见）
        let text = text.trim_start_matches('\u{feff}');

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .flexible(true) // 允许行长度不一致
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let mut rows: Vec<RawRow> = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: RawRow = record.iter().map(|cell| cell.trim().to_string()).collect();

            // 跳过空白行
            if row.len() == 1 && row[0].is_empty() {
                continue;
            }
            rows.push(row);
        }

        let mut rows = rows.into_iter();
        let header = rows.next().unwrap_or_default();

        Ok(ParsedTable {
            header,
            rows: rows.collect(),
        })
    }
}
