// ==========================================
// 角色档案追踪 - 记录导出
// ==========================================
// 职责: 领域记录 → 扁平列布局（与导入表头一致）
// 用途: 导出备份 / 下载导入模板
// ==========================================

use crate::domain::record::DomainRecord;
use crate::domain::types::RecordKind;
use crate::importer::error::ImportResult;
use crate::importer::header_schema::required_labels;
use csv::WriterBuilder;

/// 按 schema 列顺序输出单元格
pub fn to_row(record: &DomainRecord) -> Vec<String> {
    match record {
        DomainRecord::Note(r) => vec![
            r.title.clone(),
            r.content.clone(),
            r.category.clone(),
            r.pinned.to_string(),
        ],
        DomainRecord::Npc(r) => vec![
            r.name.clone(),
            r.relationship.clone(),
            r.affinity.to_string(),
            r.trust.to_string(),
            r.notes.clone(),
        ],
        DomainRecord::Mission(r) => vec![
            r.name.clone(),
            r.mission_type.to_string(),
            r.progress.to_string(),
            r.notes.clone(),
            r.completed.to_string(),
        ],
        DomainRecord::Equipment(r) => vec![
            r.name.clone(),
            r.slot.clone(),
            r.installed.to_string(),
            r.description.clone(),
            r.rarity.to_string(),
        ],
        DomainRecord::CharacterSheet(r) => vec![
            r.name.clone(),
            r.role.clone(),
            r.level.to_string(),
            r.health.to_string(),
            r.street_cred.to_string(),
            r.background.clone(),
        ],
    }
}

/// 导出指定类别的记录为 CSV 文本（含表头）
///
/// 其他类别的记录被跳过
pub fn export_csv(records: &[DomainRecord], kind: RecordKind, delimiter: u8) -> ImportResult<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(required_labels(kind))?;
    for record in records.iter().filter(|r| r.kind() == kind) {
        writer.write_record(to_row(record))?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// 导入模板（仅表头，分隔符与导入一致）
pub fn template_csv(kind: RecordKind, delimiter: u8) -> ImportResult<String> {
    export_csv(&[], kind, delimiter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{EquipmentItem, Mission, Note};
    use crate::domain::types::{MissionType, Rarity};
    use crate::importer::field_mapper::FieldMapper;
    use crate::importer::file_parser::{CsvParser, DEFAULT_DELIMITER};
    use crate::importer::record_importer_trait::{FieldMapper as _, FileParser, RowNormalizer as _};
    use crate::importer::row_normalizer::RowNormalizer;

    fn mission() -> DomainRecord {
        DomainRecord::Mission(Mission {
            id: "m-1".to_string(),
            profile_id: Some("p1".to_string()),
            name: "The Heist".to_string(),
            mission_type: MissionType::Side,
            progress: 55,
            notes: "Meet Dex, then the hotel".to_string(),
            completed: false,
        })
    }

    #[test]
    fn test_to_row_schema_order() {
        assert_eq!(
            to_row(&mission()),
            vec!["The Heist", "side", "55", "Meet Dex, then the hotel", "false"]
        );
    }

    #[test]
    fn test_export_then_reimport_reproduces_values() {
        let records = vec![
            mission(),
            DomainRecord::Note(Note {
                id: "n-1".to_string(),
                profile_id: None,
                title: "ignored".to_string(),
                content: String::new(),
                category: String::new(),
                pinned: true,
            }),
        ];
        let text = export_csv(&records, RecordKind::Mission, DEFAULT_DELIMITER).unwrap();

        let table = CsvParser.parse(&text, DEFAULT_DELIMITER).unwrap();
        assert_eq!(table.rows.len(), 1);

        let normalized = RowNormalizer.normalize(&table.header, &table.rows);
        let DomainRecord::Mission(back) = FieldMapper.transform(&normalized[0], RecordKind::Mission)
        else {
            panic!("应为任务记录");
        };
        let DomainRecord::Mission(source) = mission() else {
            unreachable!()
        };

        assert_eq!(back.name, source.name);
        assert_eq!(back.mission_type, source.mission_type);
        assert_eq!(back.progress, source.progress);
        assert_eq!(back.notes, source.notes);
        assert_eq!(back.completed, source.completed);
    }

    #[test]
    fn test_export_equipment_flag_text() {
        let item = DomainRecord::Equipment(EquipmentItem {
            id: "e-1".to_string(),
            profile_id: None,
            name: "Cyberarm".to_string(),
            slot: "Arms".to_string(),
            installed: true,
            description: String::new(),
            rarity: Rarity::Epic,
        });
        let text = export_csv(&[item], RecordKind::Equipment, DEFAULT_DELIMITER).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("Name,Slot,Installed,Description,Rarity"));
        assert_eq!(lines.next(), Some("Cyberarm,Arms,true,,epic"));
    }

    #[test]
    fn test_template_header_only() {
        assert_eq!(
            template_csv(RecordKind::CharacterSheet, DEFAULT_DELIMITER).unwrap(),
            "Name,Role,Level,Health,Street Cred,Background\n"
        );
    }

    #[test]
    fn test_template_uses_given_delimiter() {
        assert_eq!(
            template_csv(RecordKind::Note, b';').unwrap(),
            "Title;Content;Category;Pinned\n"
        );
        assert_eq!(
            template_csv(RecordKind::Note, b'\t').unwrap(),
            "Title\tContent\tCategory\tPinned\n"
        );
    }
}
