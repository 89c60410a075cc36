// ==========================================
// 角色档案追踪 - 行标准化实现
// ==========================================
// 阶段 1: 表头 + 数据行 → NormalizedRecord
// 列名 → 字段键: 小写 + 内部空白折叠为 `_`
// ==========================================

use crate::domain::record::{NormalizedRecord, RawRow};
use crate::importer::record_importer_trait::RowNormalizer as RowNormalizerTrait;

/// 字段键分隔符
pub const KEY_SEPARATOR: &str = "_";

pub struct RowNormalizer;

impl RowNormalizerTrait for RowNormalizer {
    fn normalize_label(&self, label: &str) -> String {
        label
            .split_whitespace()
            .map(|part| part.to_lowercase())
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR)
    }

    fn normalize(&self, header: &[String], rows: &[RawRow]) -> Vec<NormalizedRecord> {
        // 键只计算一次，保证所有行的键集合与顺序一致
        let keys: Vec<String> = header.iter().map(|h| self.normalize_label(h)).collect();

        rows.iter()
            .enumerate()
            .map(|(idx, row)| {
                // 行号从 1 开始，不含表头
                let mut record = NormalizedRecord::new(idx + 1);
                for (col_idx, key) in keys.iter().enumerate() {
                    // 缺失的尾部单元格视为空串；多余单元格丢弃
                    let value = row.get(col_idx).cloned().unwrap_or_default();
                    record.insert(key.clone(), value);
                }
                record
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_normalize_label() {
        let normalizer = RowNormalizer;
        assert_eq!(normalizer.normalize_label("Street Cred"), "street_cred");
        assert_eq!(normalizer.normalize_label("  Street \t  Cred "), "street_cred");
        assert_eq!(normalizer.normalize_label("NAME"), "name");
    }

    #[test]
    fn test_normalize_zips_positionally() {
        let normalizer = RowNormalizer;
        let rows = vec![vec!["The Heist".to_string(), "main".to_string()]];
        let records = normalizer.normalize(&header(&["Name", "Type"]), &rows);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("name"), Some("The Heist"));
        assert_eq!(records[0].get("type"), Some("main"));
        assert_eq!(records[0].row_number, 1);
    }

    #[test]
    fn test_normalize_key_set_identical_across_rows() {
        let normalizer = RowNormalizer;
        let rows = vec![
            vec!["Cyberarm".to_string()],
            vec![
                "Optics".to_string(),
                "Eyes".to_string(),
                "true".to_string(),
                "extra".to_string(),
            ],
        ];
        let records = normalizer.normalize(&header(&["Name", "Slot", "Installed"]), &rows);

        let first: Vec<&str> = records[0].keys().collect();
        let second: Vec<&str> = records[1].keys().collect();
        assert_eq!(first, vec!["name", "slot", "installed"]);
        assert_eq!(first, second);

        // 缺失单元格 → 空串
        assert_eq!(records[0].get("slot"), Some(""));
        // 多余单元格被丢弃
        assert_eq!(records[1].len(), 3);
    }

    #[test]
    fn test_normalize_no_rows() {
        let normalizer = RowNormalizer;
        assert!(normalizer.normalize(&header(&["Name"]), &[]).is_empty());
    }
}
