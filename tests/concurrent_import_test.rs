// ==========================================
// 并发导入测试
// ==========================================
// 测试目标: 验证批量导入功能与并发导入时的存储一致性
// ==========================================


use persona_tracker::domain::{ImportFailure, RecordKind};
use persona_tracker::importer::{ImportFile, RecordImporter};
use persona_tracker::logging;
use std::sync::Arc;
use std::time::Instant;
use test_helpers::*;

#[tokio::test]
async fn test_batch_import_multiple_kinds() {
    logging::init_test();
    let harness = TestHarness::signed_in();

    let files = vec![
        (ImportFile::csv("missions.csv", MISSION_CSV), RecordKind::Mission),
        (ImportFile::csv("npcs.csv", NPC_CSV), RecordKind::Npc),
        (ImportFile::csv("equipment.csv", EQUIPMENT_CSV), RecordKind::Equipment),
        (ImportFile::csv("notes.csv", NOTE_CSV), RecordKind::Note),
        (ImportFile::csv("character.csv", CHARACTER_CSV), RecordKind::CharacterSheet),
    ];

    let start = Instant::now();
    let outcomes = harness.importer.batch_import(files, None).await;
    tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "批量导入耗时");

    assert_eq!(outcomes.len(), 5);
    assert!(outcomes.iter().all(|o| o.is_success()));

    // 返回顺序与输入一致
    let accepted: Vec<(RecordKind, usize)> =
        outcomes.iter().map(|o| (o.kind, o.accepted)).collect();
    assert_eq!(
        accepted,
        vec![
            (RecordKind::Mission, 2),
            (RecordKind::Npc, 3),
            (RecordKind::Equipment, 1),
            (RecordKind::Note, 1),
            (RecordKind::CharacterSheet, 1),
        ]
    );

    for (kind, expected) in accepted {
        assert_eq!(harness.remote_count(kind, TEST_PROFILE).await, expected);
        assert_eq!(harness.cached(kind).await.len(), expected);
    }
}

#[tokio::test]
async fn test_batch_import_failures_are_independent() {
    let harness = TestHarness::signed_in();

    let files = vec![
        (ImportFile::csv("missions.csv", "Name,Type\nA,main\n"), RecordKind::Mission),
        (ImportFile::csv("npcs.csv", NPC_CSV), RecordKind::Npc),
        (ImportFile::new("npcs.pdf", Some("application/pdf"), ""), RecordKind::Npc),
    ];

    let outcomes = harness.importer.batch_import(files, None).await;

    assert!(matches!(
        outcomes[0].failure,
        Some(ImportFailure::SchemaMismatch { .. })
    ));
    assert!(outcomes[1].is_success());
    assert!(matches!(
        outcomes[2].failure,
        Some(ImportFailure::UnsupportedFormat { .. })
    ));
    assert_eq!(harness.remote_count(RecordKind::Npc, TEST_PROFILE).await, 3);
}

#[tokio::test]
async fn test_parallel_tasks_share_stores() {
    let harness = Arc::new(TestHarness::signed_in());

    let mut handles = Vec::new();
    for i in 0..8 {
        let harness = harness.clone();
        handles.push(tokio::spawn(async move {
            let contents = format!(
                "Title,Content,Category,Pinned\nNote {},body,misc,false\n",
                i
            );
            harness
                .importer
                .import_file(&ImportFile::csv("notes.csv", contents), RecordKind::Note, None)
                .await
        }));
    }

    for handle in handles {
        let outcome = handle.await.expect("task panicked");
        assert!(outcome.is_success());
    }

    assert_eq!(harness.remote_count(RecordKind::Note, TEST_PROFILE).await, 8);
}
