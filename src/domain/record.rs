// ==========================================
// 角色档案追踪 - 导入记录模型
// ==========================================
// 职责: 原始行 / 标准化记录 / 各类别领域记录
// 生命周期: RawRow 与 NormalizedRecord 仅存在于单次导入调用内
// ==========================================

use crate::domain::types::{MissionType, Rarity, RecordKind};
use serde::{Deserialize, Serialize};

/// 原始行：按列顺序排列的字符串单元格
pub type RawRow = Vec<String>;

// ==========================================
// ParsedTable - 解析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    pub header: RawRow,
    pub rows: Vec<RawRow>,
}

impl ParsedTable {
    pub fn has_data_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

// ==========================================
// NormalizedRecord - 标准化记录
// ==========================================
// 键集合由表头确定，同一文件所有行一致
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub row_number: usize,
    fields: Vec<(String, String)>,
}

impl NormalizedRecord {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            fields: Vec::new(),
        }
    }

    /// 写入字段；重复键保留第一次出现的值
    pub fn insert(&mut self, key: String, value: String) {
        if self.fields.iter().any(|(k, _)| *k == key) {
            return;
        }
        self.fields.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ==========================================
// Mission - 任务
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub profile_id: Option<String>, // 所属档案（对账时写入）
    pub name: String,               // 自然键
    pub mission_type: MissionType,
    pub progress: u8, // 百分比 [0, 100]
    pub notes: String,
    pub completed: bool,
}

// ==========================================
// NpcEntry - 关系条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcEntry {
    pub id: String,
    pub profile_id: Option<String>,
    pub name: String, // 自然键
    pub relationship: String,
    pub affinity: i32,
    pub trust: i32,
    pub notes: String,
}

// ==========================================
// EquipmentItem - 装备
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub id: String,
    pub profile_id: Option<String>,
    pub name: String, // 自然键
    pub slot: String,
    pub installed: bool,
    pub description: String,
    pub rarity: Rarity,
}

// ==========================================
// Note - 笔记
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub profile_id: Option<String>,
    pub title: String, // 自然键
    pub content: String,
    pub category: String,
    pub pinned: bool,
}

// ==========================================
// CharacterSheet - 角色卡
// ==========================================
// 每个档案仅一张角色卡，自然键即档案本身
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub id: String,
    pub profile_id: Option<String>,
    pub name: String,
    pub role: String,
    pub level: i32,
    pub health: i32,
    pub street_cred: i32,
    pub background: String,
}

// ==========================================
// DomainRecord - 领域记录（按类别封闭）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainRecord {
    Note(Note),
    Npc(NpcEntry),
    Mission(Mission),
    Equipment(EquipmentItem),
    CharacterSheet(CharacterSheet),
}

impl DomainRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            DomainRecord::Note(_) => RecordKind::Note,
            DomainRecord::Npc(_) => RecordKind::Npc,
            DomainRecord::Mission(_) => RecordKind::Mission,
            DomainRecord::Equipment(_) => RecordKind::Equipment,
            DomainRecord::CharacterSheet(_) => RecordKind::CharacterSheet,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            DomainRecord::Note(r) => &r.id,
            DomainRecord::Npc(r) => &r.id,
            DomainRecord::Mission(r) => &r.id,
            DomainRecord::Equipment(r) => &r.id,
            DomainRecord::CharacterSheet(r) => &r.id,
        }
    }

    pub fn set_id(&mut self, id: &str) {
        let slot = match self {
            DomainRecord::Note(r) => &mut r.id,
            DomainRecord::Npc(r) => &mut r.id,
            DomainRecord::Mission(r) => &mut r.id,
            DomainRecord::Equipment(r) => &mut r.id,
            DomainRecord::CharacterSheet(r) => &mut r.id,
        };
        *slot = id.to_string();
    }

    /// 自然键（在档案范围内唯一）
    ///
    /// 角色卡每档案唯一，返回空串
    pub fn natural_key(&self) -> &str {
        match self {
            DomainRecord::Note(r) => &r.title,
            DomainRecord::Npc(r) => &r.name,
            DomainRecord::Mission(r) => &r.name,
            DomainRecord::Equipment(r) => &r.name,
            DomainRecord::CharacterSheet(_) => "",
        }
    }

    pub fn profile_id(&self) -> Option<&str> {
        match self {
            DomainRecord::Note(r) => r.profile_id.as_deref(),
            DomainRecord::Npc(r) => r.profile_id.as_deref(),
            DomainRecord::Mission(r) => r.profile_id.as_deref(),
            DomainRecord::Equipment(r) => r.profile_id.as_deref(),
            DomainRecord::CharacterSheet(r) => r.profile_id.as_deref(),
        }
    }

    pub fn set_profile_id(&mut self, profile_id: &str) {
        let slot = match self {
            DomainRecord::Note(r) => &mut r.profile_id,
            DomainRecord::Npc(r) => &mut r.profile_id,
            DomainRecord::Mission(r) => &mut r.profile_id,
            DomainRecord::Equipment(r) => &mut r.profile_id,
            DomainRecord::CharacterSheet(r) => &mut r.profile_id,
        };
        *slot = Some(profile_id.to_string());
    }

    /// 是否与另一条记录指向同一远端行（profile + 自然键）
    pub fn same_identity(&self, other: &DomainRecord) -> bool {
        self.kind() == other.kind()
            && self.profile_id() == other.profile_id()
            && self.natural_key() == other.natural_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mission(name: &str) -> DomainRecord {
        DomainRecord::Mission(Mission {
            id: "m-1".to_string(),
            profile_id: None,
            name: name.to_string(),
            mission_type: MissionType::Main,
            progress: 40,
            notes: String::new(),
            completed: false,
        })
    }

    #[test]
    fn test_normalized_record_keeps_first_value() {
        let mut record = NormalizedRecord::new(1);
        record.insert("name".to_string(), "A".to_string());
        record.insert("name".to_string(), "B".to_string());
        assert_eq!(record.get("name"), Some("A"));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_set_profile_and_identity() {
        let mut a = sample_mission("The Heist");
        let mut b = sample_mission("The Heist");
        a.set_profile_id("p1");
        assert!(!a.same_identity(&b));
        b.set_profile_id("p1");
        assert!(a.same_identity(&b));
        assert_eq!(a.profile_id(), Some("p1"));
    }

    #[test]
    fn test_serde_tagged_by_kind() {
        let json = serde_json::to_value(sample_mission("Ghost Town")).unwrap();
        assert_eq!(json["kind"], "mission");
        assert_eq!(json["mission_type"], "main");

        let back: DomainRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), RecordKind::Mission);
        assert_eq!(back.natural_key(), "Ghost Town");
    }
}
