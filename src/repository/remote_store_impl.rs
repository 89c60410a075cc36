// ==========================================
// 角色档案追踪 - 远端存储 Repository 实现
// ==========================================
// 职责: 实现远端记录读写（使用 rusqlite）
// 策略: INSERT ... ON CONFLICT DO UPDATE，整批一个事务
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::record::{
    CharacterSheet, DomainRecord, EquipmentItem, Mission, Note, NpcEntry,
};
use crate::domain::types::{MissionType, Rarity, RecordKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::remote_store::RemoteStore;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, Row, Transaction};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

// ==========================================
// UPSERT 语句（按类别）
// ==========================================
// 冲突时保留原 id 与 created_at
const NOTE_UPSERT: &str = r#"
    INSERT INTO notes (id, profile_id, title, content, category, pinned, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
    ON CONFLICT(profile_id, title) DO UPDATE SET
        content = excluded.content,
        category = excluded.category,
        pinned = excluded.pinned,
        updated_at = excluded.updated_at
"#;

const NPC_UPSERT: &str = r#"
    INSERT INTO npcs (id, profile_id, name, relationship, affinity, trust, notes, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
    ON CONFLICT(profile_id, name) DO UPDATE SET
        relationship = excluded.relationship,
        affinity = excluded.affinity,
        trust = excluded.trust,
        notes = excluded.notes,
        updated_at = excluded.updated_at
"#;

const MISSION_UPSERT: &str = r#"
    INSERT INTO missions (id, profile_id, name, mission_type, progress, notes, completed, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
    ON CONFLICT(profile_id, name) DO UPDATE SET
        mission_type = excluded.mission_type,
        progress = excluded.progress,
        notes = excluded.notes,
        completed = excluded.completed,
        updated_at = excluded.updated_at
"#;

const EQUIPMENT_UPSERT: &str = r#"
    INSERT INTO equipment (id, profile_id, name, slot, installed, description, rarity, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
    ON CONFLICT(profile_id, name) DO UPDATE SET
        slot = excluded.slot,
        installed = excluded.installed,
        description = excluded.description,
        rarity = excluded.rarity,
        updated_at = excluded.updated_at
"#;

const CHARACTER_SHEET_UPSERT: &str = r#"
    INSERT INTO character_sheets (id, profile_id, name, role, level, health, street_cred, background, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
    ON CONFLICT(profile_id) DO UPDATE SET
        name = excluded.name,
        role = excluded.role,
        level = excluded.level,
        health = excluded.health,
        street_cred = excluded.street_cred,
        background = excluded.background,
        updated_at = excluded.updated_at
"#;

fn upsert_sql(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Note => NOTE_UPSERT,
        RecordKind::Npc => NPC_UPSERT,
        RecordKind::Mission => MISSION_UPSERT,
        RecordKind::Equipment => EQUIPMENT_UPSERT,
        RecordKind::CharacterSheet => CHARACTER_SHEET_UPSERT,
    }
}

fn select_sql(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Note => {
            "SELECT id, profile_id, title, content, category, pinned FROM notes \
             WHERE profile_id = ?1 ORDER BY rowid"
        }
        RecordKind::Npc => {
            "SELECT id, profile_id, name, relationship, affinity, trust, notes FROM npcs \
             WHERE profile_id = ?1 ORDER BY rowid"
        }
        RecordKind::Mission => {
            "SELECT id, profile_id, name, mission_type, progress, notes, completed FROM missions \
             WHERE profile_id = ?1 ORDER BY rowid"
        }
        RecordKind::Equipment => {
            "SELECT id, profile_id, name, slot, installed, description, rarity FROM equipment \
             WHERE profile_id = ?1 ORDER BY rowid"
        }
        RecordKind::CharacterSheet => {
            "SELECT id, profile_id, name, role, level, health, street_cred, background \
             FROM character_sheets WHERE profile_id = ?1 ORDER BY rowid"
        }
    }
}

fn row_to_record(kind: RecordKind, row: &Row) -> rusqlite::Result<DomainRecord> {
    let record = match kind {
        RecordKind::Note => DomainRecord::Note(Note {
            id: row.get(0)?,
            profile_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            category: row.get(4)?,
            pinned: row.get(5)?,
        }),
        RecordKind::Npc => DomainRecord::Npc(NpcEntry {
            id: row.get(0)?,
            profile_id: row.get(1)?,
            name: row.get(2)?,
            relationship: row.get(3)?,
            affinity: row.get(4)?,
            trust: row.get(5)?,
            notes: row.get(6)?,
        }),
        RecordKind::Mission => DomainRecord::Mission(Mission {
            id: row.get(0)?,
            profile_id: row.get(1)?,
            name: row.get(2)?,
            mission_type: MissionType::from_cell(&row.get::<_, String>(3)?),
            progress: row.get(4)?,
            notes: row.get(5)?,
            completed: row.get(6)?,
        }),
        RecordKind::Equipment => DomainRecord::Equipment(EquipmentItem {
            id: row.get(0)?,
            profile_id: row.get(1)?,
            name: row.get(2)?,
            slot: row.get(3)?,
            installed: row.get(4)?,
            description: row.get(5)?,
            rarity: Rarity::from_cell(&row.get::<_, String>(6)?),
        }),
        RecordKind::CharacterSheet => DomainRecord::CharacterSheet(CharacterSheet {
            id: row.get(0)?,
            profile_id: row.get(1)?,
            name: row.get(2)?,
            role: row.get(3)?,
            level: row.get(4)?,
            health: row.get(5)?,
            street_cred: row.get(6)?,
            background: row.get(7)?,
        }),
    };
    Ok(record)
}

// ==========================================
// SqliteRemoteStore
// ==========================================
pub struct SqliteRemoteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRemoteStore {
    /// 创建新的 Repository 实例（建表幂等）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 在事务中批量 UPSERT
    fn upsert_batch_tx(
        tx: &Transaction,
        kind: RecordKind,
        profile_id: &str,
        records: &[DomainRecord],
    ) -> RepositoryResult<usize> {
        let now = Utc::now().to_rfc3339();
        let mut stmt = tx.prepare(upsert_sql(kind))?;

        let mut count = 0;
        for record in records {
            if record.kind() != kind {
                warn!(expected = %kind, actual = %record.kind(), id = record.id(), "记录类别不匹配，跳过");
                continue;
            }

            match record {
                DomainRecord::Note(r) => stmt.execute(params![
                    r.id, profile_id, r.title, r.content, r.category, r.pinned, now,
                ])?,
                DomainRecord::Npc(r) => stmt.execute(params![
                    r.id, profile_id, r.name, r.relationship, r.affinity, r.trust, r.notes, now,
                ])?,
                DomainRecord::Mission(r) => stmt.execute(params![
                    r.id,
                    profile_id,
                    r.name,
                    r.mission_type.to_string(),
                    r.progress,
                    r.notes,
                    r.completed,
                    now,
                ])?,
                DomainRecord::Equipment(r) => stmt.execute(params![
                    r.id,
                    profile_id,
                    r.name,
                    r.slot,
                    r.installed,
                    r.description,
                    r.rarity.to_string(),
                    now,
                ])?,
                DomainRecord::CharacterSheet(r) => stmt.execute(params![
                    r.id,
                    profile_id,
                    r.name,
                    r.role,
                    r.level,
                    r.health,
                    r.street_cred,
                    r.background,
                    now,
                ])?,
            };
            count += 1;
        }

        Ok(count)
    }
}

#[async_trait]
impl RemoteStore for SqliteRemoteStore {
    async fn upsert_batch(
        &self,
        kind: RecordKind,
        profile_id: &str,
        records: &[DomainRecord],
    ) -> RepositoryResult<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let count = Self::upsert_batch_tx(&tx, kind, profile_id, records)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        debug!(table = kind.table_name(), profile_id, count, "远端 UPSERT 完成");
        Ok(count)
    }

    async fn list_records(
        &self,
        kind: RecordKind,
        profile_id: &str,
    ) -> RepositoryResult<Vec<DomainRecord>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let mut stmt = conn.prepare(select_sql(kind))?;
        let rows = stmt.query_map(params![profile_id], |row| row_to_record(kind, row))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    async fn count_records(&self, kind: RecordKind, profile_id: &str) -> RepositoryResult<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        // 表名来自封闭枚举，不接受外部输入
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE profile_id = ?1",
            kind.table_name()
        );
        let count: i64 = conn.query_row(&sql, params![profile_id], |row| row.get(0))?;
        Ok(count as usize)
    }
}
