// ==========================================
// 角色档案追踪 - 表头 Schema 注册表
// ==========================================
// 职责: 记录类别 → 必需列名集合；表头完整性校验
// 规则: 大小写不敏感、顺序无关、整列名匹配；多余列忽略
// ==========================================

use crate::domain::types::RecordKind;

const NOTE_LABELS: &[&str] = &["Title", "Content", "Category", "Pinned"];
const NPC_LABELS: &[&str] = &["Name", "Relationship", "Affinity", "Trust", "Notes"];
const MISSION_LABELS: &[&str] = &["Name", "Type", "Progress", "Notes", "Completed"];
const EQUIPMENT_LABELS: &[&str] = &["Name", "Slot", "Installed", "Description", "Rarity"];
const CHARACTER_SHEET_LABELS: &[&str] =
    &["Name", "Role", "Level", "Health", "Street Cred", "Background"];

/// 获取记录类别的必需列名（按导出顺序）
pub fn required_labels(kind: RecordKind) -> &'static [&'static str] {
    match kind {
        RecordKind::Note => NOTE_LABELS,
        RecordKind::Npc => NPC_LABELS,
        RecordKind::Mission => MISSION_LABELS,
        RecordKind::Equipment => EQUIPMENT_LABELS,
        RecordKind::CharacterSheet => CHARACTER_SHEET_LABELS,
    }
}

/// 校验表头是否包含全部必需列
pub fn validate<S: AsRef<str>>(header: &[S], kind: RecordKind) -> bool {
    missing_labels(header, kind).is_empty()
}

/// 返回表头中缺失的必需列（保持 schema 顺序）
pub fn missing_labels<S: AsRef<str>>(header: &[S], kind: RecordKind) -> Vec<String> {
    let present: Vec<String> = header
        .iter()
        .map(|label| label.as_ref().trim().to_lowercase())
        .collect();

    required_labels(kind)
        .iter()
        .filter(|label| !present.iter().any(|p| *p == label.to_lowercase()))
        .map(|label| label.to_string())
        .collect()
}

/// 必需列名（owned，用于错误报告）
pub fn expected_labels(kind: RecordKind) -> Vec<String> {
    required_labels(kind).iter().map(|l| l.to_string()).collect()
}
