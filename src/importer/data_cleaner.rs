// ==========================================
// 角色档案追踪 - 数据清洗器实现
// ==========================================
// 宽松策略: 单元格格式错误一律回落为缺省值，不阻断整批导入
// ==========================================

use crate::importer::record_importer_trait::DataCleaner as DataCleanerTrait;
use chrono::Utc;
use uuid::Uuid;

/// 生成 id 时随机后缀长度
const ID_SUFFIX_LEN: usize = 9;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn text_or_default(&self, value: Option<&str>) -> String {
        value.map(|v| v.trim().to_string()).unwrap_or_default()
    }

    fn parse_count(&self, value: Option<&str>) -> i32 {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return 0;
        };

        if let Ok(n) = raw.parse::<i32>() {
            return n;
        }

        // 兼容小数文本（向零截断）
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => f.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32,
            _ => 0,
        }
    }

    fn parse_percentage(&self, value: Option<&str>) -> u8 {
        self.parse_count(value).clamp(0, 100) as u8
    }

    fn parse_flag(&self, value: Option<&str>) -> bool {
        // 精确字面量匹配；"TRUE"、"yes"、"installed" 均为 false
        value.map(str::trim) == Some("true")
    }

    fn id_or_synthesize(&self, value: Option<&str>) -> String {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(id) => id.to_string(),
            None => synthesize_id(),
        }
    }
}

/// 生成本地唯一 id：毫秒时间戳 + 随机后缀
///
/// 仅满足本地缓存的唯一性要求，不保证全局唯一
pub fn synthesize_id() -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(ID_SUFFIX_LEN)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}
