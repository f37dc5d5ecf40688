//! File-backed storage: WAL, read pool, persistence across reopen.

use sieve_core::config::StorageConfig;
use sieve_core::models::{ChunkPayload, SparseVector};
use sieve_core::traits::DualVectorStore;
use sieve_storage::pool::pragmas::verify_wal_mode;
use sieve_storage::{SqliteVectorStore, StorageEngine};

fn payload(text: &str) -> ChunkPayload {
    ChunkPayload {
        text: text.to_string(),
        source_doc_id: "doc".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn chunks_survive_reopen_and_reads_use_pool() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sieve.db");
    let config = StorageConfig::default();

    {
        let engine = StorageEngine::open(&path, &config).unwrap();
        assert_eq!(engine.pool().readers.size(), config.read_pool_size);
        let store = SqliteVectorStore::new(engine, 4);
        store
            .upsert_chunk(
                "persisted",
                &[0.0, 1.0, 0.0, 0.0],
                &SparseVector::from_pairs([(42, 1.0)]),
                &payload("kept on disk"),
            )
            .await
            .unwrap();
    }

    let engine = StorageEngine::open(&path, &config).unwrap();
    let wal = engine.read(verify_wal_mode).await.unwrap();
    assert!(wal, "file-backed databases run in WAL mode");

    let store = SqliteVectorStore::new(engine, 4);
    let chunk = store.get_chunk("persisted").await.unwrap().unwrap();
    assert_eq!(chunk.payload.text, "kept on disk");

    let hits = store
        .query_sparse(&SparseVector::from_pairs([(42, 1.0)]), 5, None)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert!(store.consistency_report().await.unwrap().is_consistent());
}

#[tokio::test]
async fn from_config_without_path_is_in_memory() {
    let engine = StorageEngine::from_config(&StorageConfig::default()).unwrap();
    assert!(engine.pool().db_path.is_none());
    assert_eq!(engine.pool().readers.size(), 0);

    let store = SqliteVectorStore::new(engine, 2);
    assert_eq!(store.count().await.unwrap(), 0);
}
