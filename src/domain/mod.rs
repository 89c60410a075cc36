// ==========================================
// 角色档案追踪 - 领域模型层
// ==========================================
// 职责: 定义记录类别、领域记录、导入结果
// 红线: 不含数据访问逻辑
// ==========================================

pub mod outcome;
pub mod record;
pub mod types;

// 重导出核心类型
pub use outcome::{ImportFailure, Notification, ReconciliationOutcome, StoreWriteResult, WriteReport};
pub use record::{
    CharacterSheet, DomainRecord, EquipmentItem, Mission, NormalizedRecord, Note, NpcEntry,
    ParsedTable, RawRow,
};
pub use types::{LocalMergeMode, MissionType, Rarity, RecordKind, Severity};
