// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证 config_kv 配置驱动导入行为
// ==========================================


use persona_tracker::auth::SessionState;
use persona_tracker::config::{config_keys, ConfigManager, ImportConfigReader};
use persona_tracker::domain::{LocalMergeMode, RecordKind};
use persona_tracker::engine::ReconciliationEngine;
use persona_tracker::importer::{ImportFile, RecordImporter, RecordImporterImpl};
use persona_tracker::repository::{
    cache_key, InMemoryLocalCache, LocalCache, RemoteStore, SqliteRemoteStore,
};
use std::sync::Arc;
use test_helpers::{create_test_db, insert_test_config, open_test_connection, NPC_CSV};

#[tokio::test]
async fn test_config_manager_reads_inserted_values() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_test_config(&conn, config_keys::IMPORT_DELIMITER, "tab").expect("insert");
    insert_test_config(&conn, config_keys::LOCAL_MERGE_MODE, "dedupe").expect("insert");

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    assert_eq!(config_manager.get_delimiter().await.expect("delimiter"), b'\t');
    assert_eq!(
        config_manager.get_local_merge_mode().await.expect("merge mode"),
        LocalMergeMode::DedupeByNaturalKey
    );
    assert_eq!(
        config_manager.get_cache_namespace().await.expect("namespace"),
        "persona-tracker"
    );
}

#[tokio::test]
async fn test_stored_config_drives_import() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = Arc::new(ConfigManager::new(&db_path).expect("Failed to create ConfigManager"));
    config
        .set_global_config_value(config_keys::LOCAL_MERGE_MODE, "dedupe_by_natural_key")
        .expect("set");
    config
        .set_global_config_value(config_keys::CACHE_NAMESPACE, "v2")
        .expect("set");

    let remote = Arc::new(SqliteRemoteStore::new(&db_path).expect("Failed to create store"));
    let local = Arc::new(InMemoryLocalCache::new());
    let engine = ReconciliationEngine::new(
        remote.clone(),
        local.clone(),
        Arc::new(SessionState::signed_in("u1", "p1")),
    );
    let importer = RecordImporterImpl::new(engine, config);

    let file = ImportFile::csv("npcs.csv", NPC_CSV);
    importer.import_file(&file, RecordKind::Npc, None).await;
    importer.import_file(&file, RecordKind::Npc, None).await;

    let cached = local
        .read(&cache_key("v2", RecordKind::Npc))
        .await
        .expect("Failed to read cache");
    assert_eq!(cached.len(), 3);
    assert_eq!(
        remote
            .count_records(RecordKind::Npc, "p1")
            .await
            .expect("count"),
        3
    );
}
