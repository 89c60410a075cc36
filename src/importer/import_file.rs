// ==========================================
// 角色档案追踪 - 上传文件
// ==========================================
// 职责: 文件名 + 媒体类型 + 文本内容；媒体类型准入判断
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::path::Path;

/// 视为分隔文本的媒体类型
const DELIMITED_TEXT_MEDIA_TYPES: &[&str] = &[
    "text/csv",
    "application/csv",
    "text/comma-separated-values",
    "application/vnd.ms-excel", // Windows 浏览器对 .csv 的上报值
    "text/plain",
];

/// 未提供媒体类型时按扩展名判断
const DELIMITED_TEXT_EXTENSIONS: &[&str] = &["csv", "txt"];

#[derive(Debug, Clone, PartialEq)]
pub struct ImportFile {
    pub file_name: String,
    pub media_type: Option<String>,
    pub contents: String,
}

impl ImportFile {
    pub fn new(
        file_name: impl Into<String>,
        media_type: Option<&str>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.map(|m| m.to_string()),
            contents: contents.into(),
        }
    }

    /// 构造 CSV 文件（媒体类型 text/csv）
    pub fn csv(file_name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self::new(file_name, Some("text/csv"), contents)
    }

    /// 从本地路径读取（媒体类型按扩展名推断）
    pub async fn from_path(path: &Path) -> ImportResult<Self> {
        let contents = tokio::fs::read_to_string(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ImportError::FileReadError(format!("无效文件名: {}", path.display())))?
            .to_string();

        Ok(Self {
            file_name,
            media_type: None,
            contents,
        })
    }

    /// 是否为可导入的分隔文本
    ///
    /// 媒体类型为空白（浏览器无法识别时）按扩展名判断
    pub fn is_delimited_text(&self) -> bool {
        match self.media_type_essence() {
            Some(essence) => DELIMITED_TEXT_MEDIA_TYPES.contains(&essence.as_str()),
            None => Path::new(&self.file_name)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| DELIMITED_TEXT_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false),
        }
    }

    /// 拒绝信息中展示的类型描述
    pub fn describe_media_type(&self) -> String {
        match self.media_type.as_deref().map(str::trim) {
            Some(media_type) if !media_type.is_empty() => media_type.to_string(),
            _ => self.file_name.clone(),
        }
    }

    // 去掉参数部分，如 "text/csv; charset=utf-8"
    fn media_type_essence(&self) -> Option<String> {
        let essence = self
            .media_type
            .as_deref()?
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        (!essence.is_empty()).then_some(essence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_media_type_gate() {
        assert!(ImportFile::csv("missions.csv", "").is_delimited_text());
        assert!(ImportFile::new("a", Some("text/csv; charset=utf-8"), "").is_delimited_text());
        assert!(!ImportFile::new("a.png", Some("image/png"), "").is_delimited_text());
        assert!(!ImportFile::new("a.json", Some("application/json"), "").is_delimited_text());
    }

    #[test]
    fn test_extension_fallback() {
        assert!(ImportFile::new("Gear.CSV", None, "").is_delimited_text());
        assert!(!ImportFile::new("gear.xlsx", None, "").is_delimited_text());
        assert!(!ImportFile::new("gear", None, "").is_delimited_text());
    }

    #[test]
    fn test_blank_media_type_uses_extension() {
        assert!(ImportFile::new("missions.csv", Some(""), "").is_delimited_text());
        assert!(ImportFile::new("notes.txt", Some("  "), "").is_delimited_text());
        assert!(!ImportFile::new("portrait.png", Some(""), "").is_delimited_text());
        assert_eq!(
            ImportFile::new("portrait.png", Some(""), "").describe_media_type(),
            "portrait.png"
        );
    }

    #[tokio::test]
    async fn test_from_path() {
        let mut temp_file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(temp_file, "Title,Content,Category,Pinned").unwrap();

        let file = ImportFile::from_path(temp_file.path()).await.unwrap();
        assert!(file.is_delimited_text());
        assert!(file.contents.starts_with("Title"));
    }

    #[tokio::test]
    async fn test_from_path_missing() {
        let result = ImportFile::from_path(Path::new("non_existent.csv")).await;
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
