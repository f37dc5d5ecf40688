//! Property tests for the dual-vector store.

use proptest::prelude::*;

use sieve_core::models::ChunkPayload;
use sieve_core::traits::DualVectorStore;
use sieve_embeddings::HashingEmbedder;
use sieve_storage::{SqliteVectorStore, StorageEngine};

const DIMS: usize = 128;

const DISTRACTORS: &[&str] = &[
    "quarterly revenue report for the board",
    "database replication lag investigation",
    "capital cities of european countries",
];

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{3,9}", 2..8).prop_map(|words| words.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_exact_text_is_retrieved_in_top_three(text in text_strategy()) {
        let rt = runtime();
        let found = rt.block_on(async {
            let store = SqliteVectorStore::new(StorageEngine::open_in_memory().unwrap(), DIMS);
            let embedder = HashingEmbedder::new(DIMS, 1 << 18);

            for (i, distractor) in DISTRACTORS.iter().enumerate() {
                let e = embedder.embed_sync(distractor).unwrap();
                store
                    .upsert_chunk(&format!("d{i}"), &e.dense, &e.sparse, &ChunkPayload::default())
                    .await
                    .unwrap();
            }
            let e = embedder.embed_sync(&text).unwrap();
            store
                .upsert_chunk("target", &e.dense, &e.sparse, &ChunkPayload::default())
                .await
                .unwrap();

            let sparse = store.query_sparse(&e.sparse, 3, None).await.unwrap();
            let dense = store.query_dense(&e.dense, 3, None).await.unwrap();
            (
                sparse.iter().any(|h| h.chunk_id == "target"),
                dense.iter().any(|h| h.chunk_id == "target"),
            )
        });
        prop_assert!(found.0, "sparse search missed the exact text");
        prop_assert!(found.1, "dense search missed the exact text");
    }

    #[test]
    fn prop_store_stays_consistent_across_upserts(
        writes in prop::collection::vec((0usize..5, text_strategy()), 1..12)
    ) {
        let rt = runtime();
        let (report, distinct) = rt.block_on(async {
            let store = SqliteVectorStore::new(StorageEngine::open_in_memory().unwrap(), DIMS);
            let embedder = HashingEmbedder::new(DIMS, 1 << 18);
            for (slot, text) in &writes {
                let e = embedder.embed_sync(text).unwrap();
                store
                    .upsert_chunk(&format!("c{slot}"), &e.dense, &e.sparse, &ChunkPayload::default())
                    .await
                    .unwrap();
            }
            let distinct: std::collections::BTreeSet<_> = writes.iter().map(|(s, _)| *s).collect();
            (store.consistency_report().await.unwrap(), distinct.len())
        });
        prop_assert!(report.is_consistent(), "{report:?}");
        prop_assert_eq!(report.total_chunks, distinct);
    }
}
