// ==========================================
// 角色档案追踪 - 领域类型定义
// ==========================================
// 职责: 记录类别 / 枚举字段 / 通知级别 / 本地合并策略
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 记录类别 (Record Kind)
// ==========================================
// 封闭枚举: 决定表头 schema、转换函数、远端表与缓存键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Note,           // 笔记
    Npc,            // 关系条目（NPC）
    Mission,        // 任务
    Equipment,      // 装备
    CharacterSheet, // 角色卡
}

impl RecordKind {
    /// 全部类别（固定顺序）
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Note,
        RecordKind::Npc,
        RecordKind::Mission,
        RecordKind::Equipment,
        RecordKind::CharacterSheet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Note => "note",
            RecordKind::Npc => "npc",
            RecordKind::Mission => "mission",
            RecordKind::Equipment => "equipment",
            RecordKind::CharacterSheet => "character_sheet",
        }
    }

    /// 本地缓存键后缀（拼接在命名空间之后）
    pub fn cache_suffix(&self) -> &'static str {
        match self {
            RecordKind::Note => "-notes",
            RecordKind::Npc => "-npcs",
            RecordKind::Mission => "-missions",
            RecordKind::Equipment => "-equipment",
            RecordKind::CharacterSheet => "-character",
        }
    }

    /// 远端存储表名
    pub fn table_name(&self) -> &'static str {
        match self {
            RecordKind::Note => "notes",
            RecordKind::Npc => "npcs",
            RecordKind::Mission => "missions",
            RecordKind::Equipment => "equipment",
            RecordKind::CharacterSheet => "character_sheets",
        }
    }

    /// 用户可读名称（通知文案使用）
    pub fn display_name(&self) -> &'static str {
        match self {
            RecordKind::Note => "笔记",
            RecordKind::Npc => "关系条目",
            RecordKind::Mission => "任务",
            RecordKind::Equipment => "装备",
            RecordKind::CharacterSheet => "角色卡",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "note" | "notes" => Ok(RecordKind::Note),
            "npc" | "npcs" | "relationship" | "relationships" => Ok(RecordKind::Npc),
            "mission" | "missions" | "quest" | "quests" | "job" => Ok(RecordKind::Mission),
            "equipment" | "item" | "items" => Ok(RecordKind::Equipment),
            "character" | "character_sheet" | "sheet" => Ok(RecordKind::CharacterSheet),
            other => Err(format!(
                "未知记录类别: '{}'（支持: note, npc, mission, equipment, character_sheet）",
                other
            )),
        }
    }
}

// ==========================================
// 任务类型 (Mission Type)
// ==========================================
// 缺省值: main
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionType {
    #[default]
    Main, // 主线
    Side, // 支线
    Gig,  // 零活
}

impl MissionType {
    /// 宽松解析：空值或未知值一律回落到缺省值
    pub fn from_cell(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "side" => MissionType::Side,
            "gig" => MissionType::Gig,
            _ => MissionType::Main,
        }
    }
}

impl fmt::Display for MissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissionType::Main => write!(f, "main"),
            MissionType::Side => write!(f, "side"),
            MissionType::Gig => write!(f, "gig"),
        }
    }
}

// ==========================================
// 装备稀有度 (Rarity)
// ==========================================
// 缺省值: common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// 宽松解析：空值或未知值一律回落到 common
    pub fn from_cell(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "uncommon" => Rarity::Uncommon,
            "rare" => Rarity::Rare,
            "epic" => Rarity::Epic,
            "legendary" => Rarity::Legendary,
            _ => Rarity::Common,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rarity::Common => write!(f, "common"),
            Rarity::Uncommon => write!(f, "uncommon"),
            Rarity::Rare => write!(f, "rare"),
            Rarity::Epic => write!(f, "epic"),
            Rarity::Legendary => write!(f, "legendary"),
        }
    }
}

// ==========================================
// 通知级别 (Severity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

// ==========================================
// 本地缓存合并策略 (Local Merge Mode)
// ==========================================
// Append: 直接追加（重复导入会产生重复条目）
// DedupeByNaturalKey: 按 profile + 自然键替换已有条目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalMergeMode {
    #[default]
    Append,
    DedupeByNaturalKey,
}

impl fmt::Display for LocalMergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalMergeMode::Append => write!(f, "append"),
            LocalMergeMode::DedupeByNaturalKey => write!(f, "dedupe_by_natural_key"),
        }
    }
}

impl FromStr for LocalMergeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "append" => Ok(LocalMergeMode::Append),
            "dedupe" | "dedupe_by_natural_key" => Ok(LocalMergeMode::DedupeByNaturalKey),
            other => Err(format!("未知合并策略: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_kind_aliases() {
        assert_eq!("Quest".parse::<RecordKind>(), Ok(RecordKind::Mission));
        assert_eq!("relationship".parse::<RecordKind>(), Ok(RecordKind::Npc));
        assert_eq!("character-sheet".parse::<RecordKind>(), Ok(RecordKind::CharacterSheet));
        assert!("spaceship".parse::<RecordKind>().is_err());
    }

    #[test]
    fn test_categorical_defaults() {
        assert_eq!(MissionType::from_cell(""), MissionType::Main);
        assert_eq!(MissionType::from_cell(" SIDE "), MissionType::Side);
        assert_eq!(MissionType::from_cell("heist"), MissionType::Main);
        assert_eq!(Rarity::from_cell("epic"), Rarity::Epic);
        assert_eq!(Rarity::from_cell(""), Rarity::Common);
    }

    #[test]
    fn test_merge_mode_parse() {
        assert_eq!("append".parse::<LocalMergeMode>(), Ok(LocalMergeMode::Append));
        assert_eq!(
            "dedupe".parse::<LocalMergeMode>(),
            Ok(LocalMergeMode::DedupeByNaturalKey)
        );
        assert_eq!(LocalMergeMode::DedupeByNaturalKey.to_string(), "dedupe_by_natural_key");
    }
}
