// ==========================================
// 角色档案追踪 - 字段映射器实现
// ==========================================
// 阶段 2: 标准化记录 → 领域记录（按类别分派）
// 纯函数: 无副作用，不失败
// ==========================================

use crate::domain::record::{
    CharacterSheet, DomainRecord, EquipmentItem, Mission, NormalizedRecord, Note, NpcEntry,
};
use crate::domain::types::{MissionType, Rarity, RecordKind};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::record_importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait,
};

/// 可选 id 列的字段键
const ID_KEY: &str = "id";

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn transform(&self, record: &NormalizedRecord, kind: RecordKind) -> DomainRecord {
        let cleaner = DataCleaner;
        match kind {
            RecordKind::Note => DomainRecord::Note(map_note(record, &cleaner)),
            RecordKind::Npc => DomainRecord::Npc(map_npc(record, &cleaner)),
            RecordKind::Mission => DomainRecord::Mission(map_mission(record, &cleaner)),
            RecordKind::Equipment => DomainRecord::Equipment(map_equipment(record, &cleaner)),
            RecordKind::CharacterSheet => {
                DomainRecord::CharacterSheet(map_character_sheet(record, &cleaner))
            }
        }
    }
}

fn map_note(row: &NormalizedRecord, c: &DataCleaner) -> Note {
    Note {
        id: c.id_or_synthesize(row.get(ID_KEY)),
        profile_id: None,
        title: c.text_or_default(row.get("title")),
        content: c.text_or_default(row.get("content")),
        category: c.text_or_default(row.get("category")),
        pinned: c.parse_flag(row.get("pinned")),
    }
}

fn map_npc(row: &NormalizedRecord, c: &DataCleaner) -> NpcEntry {
    NpcEntry {
        id: c.id_or_synthesize(row.get(ID_KEY)),
        profile_id: None,
        name: c.text_or_default(row.get("name")),
        relationship: c.text_or_default(row.get("relationship")),
        affinity: c.parse_count(row.get("affinity")),
        trust: c.parse_count(row.get("trust")),
        notes: c.text_or_default(row.get("notes")),
    }
}

fn map_mission(row: &NormalizedRecord, c: &DataCleaner) -> Mission {
    Mission {
        id: c.id_or_synthesize(row.get(ID_KEY)),
        profile_id: None,
        name: c.text_or_default(row.get("name")),
        mission_type: MissionType::from_cell(row.get("type").unwrap_or_default()),
        progress: c.parse_percentage(row.get("progress")),
        notes: c.text_or_default(row.get("notes")),
        completed: c.parse_flag(row.get("completed")),
    }
}

fn map_equipment(row: &NormalizedRecord, c: &DataCleaner) -> EquipmentItem {
    EquipmentItem {
        id: c.id_or_synthesize(row.get(ID_KEY)),
        profile_id: None,
        name: c.text_or_default(row.get("name")),
        slot: c.text_or_default(row.get("slot")),
        installed: c.parse_flag(row.get("installed")),
        description: c.text_or_default(row.get("description")),
        rarity: Rarity::from_cell(row.get("rarity").unwrap_or_default()),
    }
}

fn map_character_sheet(row: &NormalizedRecord, c: &DataCleaner) -> CharacterSheet {
    CharacterSheet {
        id: c.id_or_synthesize(row.get(ID_KEY)),
        profile_id: None,
        name: c.text_or_default(row.get("name")),
        role: c.text_or_default(row.get("role")),
        level: c.parse_count(row.get("level")),
        health: c.parse_count(row.get("health")),
        street_cred: c.parse_count(row.get("street_cred")),
        background: c.text_or_default(row.get("background")),
    }
}
